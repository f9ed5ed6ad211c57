mod flash;
mod render;

use std::sync::Arc;

use actix_web::error::{InternalError, UrlencodedError};
use actix_web::http::header::ContentType;
use actix_web::{middleware, web, App, HttpRequest, HttpResponse, HttpServer};
use anyhow::Context;
use libmhcweb::output::allele_listing;
use libmhcweb::pipeline::{dispatch, dispatch_api};
use libmhcweb::predictor::Predictor;
use serde::Deserialize;

use crate::config::ServerConfig;
use flash::{redirect_with_warnings, warnings_from_query};
use render::{index_page, result_page};

/// Read-only state shared by every worker.
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<dyn Predictor>,
    pub max_input_bytes: usize,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResultsForm {
    pub alleles: String,
    pub peptides: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ApiForm {
    pub allele: String,
    pub peptide: String,
}

/// Room in a form body for the allele field and the other parameters.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// The largest form body accepted.
///
/// URL-encoding can triple the size of the peptide text, and input
/// over `max_input_bytes` has to reach truncation rather than be rejected.
pub fn form_limit(max_input_bytes: usize) -> usize {
    max_input_bytes
        .saturating_mul(3)
        .saturating_add(FORM_OVERHEAD_BYTES)
}

fn form_error_message(err: &UrlencodedError) -> String {
    match err {
        UrlencodedError::Overflow { limit, .. } => {
            format!("Peptide/protein input is too large to submit (limit {limit} bytes)")
        }
        err => format!("Invalid form submission: {err}"),
    }
}

/// Form extraction sized for `max_input_bytes`.
///
/// Rejected bodies get the same treatment as any other failed query:
/// a warning on the input form, or an `ERROR:` line from the API.
pub fn form_config(max_input_bytes: usize) -> web::FormConfig {
    web::FormConfig::default()
        .limit(form_limit(max_input_bytes))
        .error_handler(|err, req| {
            let message = form_error_message(&err);
            log::info!("rejected form body for {}: {err}", req.path());

            let response = if req.path() == "/api-predict" {
                let mut response = match &err {
                    UrlencodedError::Overflow { .. } => HttpResponse::PayloadTooLarge(),
                    _ => HttpResponse::BadRequest(),
                };
                response
                    .content_type(ContentType::plaintext())
                    .body(format!("ERROR: {message}"))
            } else {
                redirect_with_warnings(&[message])
            };

            InternalError::from_response(err, response).into()
        })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/results", web::post().to(results_post))
        .route("/results", web::get().to(results_get))
        .route("/api-predict", web::post().to(api_post))
        .route("/api-predict", web::get().to(api_get))
        .route("/alleles", web::get().to(alleles));
}

fn plain_text(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(body)
}

async fn index(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    let warnings = warnings_from_query(req.query_string());
    HttpResponse::Ok().content_type(ContentType::html()).body(index_page(
        state.predictor.version(),
        state.predictor.supported_alleles(),
        &warnings,
    ))
}

async fn results(state: web::Data<AppState>, form: ResultsForm) -> actix_web::Result<HttpResponse> {
    let predictor = Arc::clone(&state.predictor);
    let max_input_bytes = state.max_input_bytes;

    let outcome = web::block(move || {
        dispatch(
            predictor.as_ref(),
            &form.alleles,
            &form.peptides,
            max_input_bytes,
        )
    })
    .await?;

    let messages = outcome.messages();
    Ok(match &outcome.result {
        Ok(table) => HttpResponse::Ok()
            .content_type(ContentType::html())
            .body(result_page(state.predictor.version(), table, &messages)),
        Err(_) => redirect_with_warnings(&messages),
    })
}

async fn results_post(
    state: web::Data<AppState>,
    form: web::Form<ResultsForm>,
) -> actix_web::Result<HttpResponse> {
    results(state, form.into_inner()).await
}

async fn results_get(
    state: web::Data<AppState>,
    query: web::Query<ResultsForm>,
) -> actix_web::Result<HttpResponse> {
    results(state, query.into_inner()).await
}

async fn api(state: web::Data<AppState>, form: ApiForm) -> actix_web::Result<HttpResponse> {
    let predictor = Arc::clone(&state.predictor);
    let max_input_bytes = state.max_input_bytes;

    let body = web::block(move || {
        dispatch_api(
            predictor.as_ref(),
            &form.allele,
            &form.peptide,
            max_input_bytes,
        )
    })
    .await?
    .unwrap_or_else(|err| {
        log::info!("api query failed ({}): {err}", err.kind());
        format!("ERROR: {}", err.api_message())
    });

    Ok(plain_text(body))
}

async fn api_post(
    state: web::Data<AppState>,
    form: web::Form<ApiForm>,
) -> actix_web::Result<HttpResponse> {
    api(state, form.into_inner()).await
}

async fn api_get(
    state: web::Data<AppState>,
    query: web::Query<ApiForm>,
) -> actix_web::Result<HttpResponse> {
    api(state, query.into_inner()).await
}

async fn alleles(state: web::Data<AppState>) -> HttpResponse {
    plain_text(allele_listing(state.predictor.as_ref()))
}

pub async fn run(config: ServerConfig, predictor: Arc<dyn Predictor>) -> anyhow::Result<()> {
    log::info!(
        "serving {} ({} alleles, lengths {}) on http://{}:{} with {} workers",
        predictor.version(),
        predictor.supported_alleles().len(),
        predictor.supported_peptide_lengths(),
        config.host,
        config.port,
        config.workers,
    );

    let max_input_bytes = config.max_input_bytes;
    let state = web::Data::new(AppState {
        predictor,
        max_input_bytes,
    });

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .app_data(form_config(max_input_bytes))
            .configure(configure)
    })
    .workers(config.workers)
    .bind((config.host.clone(), config.port))
    .context(format!("failed to bind {}:{}", config.host, config.port))?
    .run()
    .await
    .context("server exited with an error")
}
