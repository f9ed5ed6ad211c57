//! One-shot warning messages carried across a redirect in the query string.

use actix_web::{http::header, HttpResponse};

pub const WARNING_PARAM: &str = "warning";

/// The path of the input form with `messages` attached.
pub fn location_with_warnings(messages: &[String]) -> String {
    if messages.is_empty() {
        return "/".to_string();
    }

    let params: Vec<String> = messages
        .iter()
        .map(|m| format!("{WARNING_PARAM}={}", urlencoding::encode(m)))
        .collect();

    format!("/?{}", params.join("&"))
}

/// Send the user back to the input form, showing `messages` there.
pub fn redirect_with_warnings(messages: &[String]) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location_with_warnings(messages)))
        .finish()
}

/// Every `warning` parameter in `query`, decoded, in order.
pub fn warnings_from_query(query: &str) -> Vec<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .filter(|(key, _)| *key == WARNING_PARAM)
        .filter_map(|(_, value)| {
            urlencoding::decode(&value.replace('+', " "))
                .ok()
                .map(|v| v.into_owned())
        })
        .filter(|v| !v.is_empty())
        .collect()
}
