use libmhcweb::output::{Cell, WideResultTable};

const TITLE: &str = "MHC I binding predictions";

const STYLE: &str = "
body { font-family: sans-serif; margin: 2em; }
.warning { background: #fff3cd; border: 1px solid #e0c36c; padding: 0.5em; margin: 0.5em 0; }
table { border-collapse: collapse; }
th, td { border: 1px solid #ccc; padding: 0.2em 0.6em; }
td.num { text-align: right; }
textarea { width: 40em; height: 15em; font-family: monospace; }
footer { margin-top: 2em; color: #666; font-size: small; }
";

/// Escape text for use in HTML content and attribute values.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn warnings_html(messages: &[String]) -> String {
    messages
        .iter()
        .map(|m| format!("<div class=\"warning\">{}</div>\n", escape(m)))
        .collect()
}

fn page(version: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{TITLE}</title>\n\
         <style>{STYLE}</style>\n\
         </head>\n\
         <body>\n\
         <h1><a href=\"/\">{TITLE}</a></h1>\n\
         {body}\
         <footer>predictor: {}</footer>\n\
         </body>\n\
         </html>\n",
        escape(version)
    )
}

/// The input form, listing every supported allele.
pub fn index_page(version: &str, alleles: &[String], warnings: &[String]) -> String {
    let mut body = warnings_html(warnings);

    body.push_str(
        "<form method=\"post\" action=\"/results\">\n\
         <p><label for=\"alleles\">Alleles (space separated)</label><br>\n\
         <input type=\"text\" id=\"alleles\" name=\"alleles\" list=\"supported-alleles\" size=\"60\"></p>\n\
         <datalist id=\"supported-alleles\">\n",
    );
    body.extend(
        alleles
            .iter()
            .map(|allele| format!("<option value=\"{}\">\n", escape(allele))),
    );
    body.push_str(
        "</datalist>\n\
         <p><label for=\"peptides\">Peptides (whitespace separated) or FASTA protein sequences</label><br>\n\
         <textarea id=\"peptides\" name=\"peptides\"></textarea></p>\n\
         <p><input type=\"submit\" value=\"Predict\"></p>\n\
         </form>\n",
    );
    body.push_str(&format!(
        "<p>{} supported alleles; full list at <a href=\"/alleles\">/alleles</a>.</p>\n",
        alleles.len()
    ));

    page(version, &body)
}

/// The wide prediction table, with any notices raised while building it.
pub fn result_page(version: &str, table: &WideResultTable, messages: &[String]) -> String {
    let mut body = warnings_html(messages);
    let columns = table.columns();

    body.push_str(&format!("<p>{} peptides</p>\n", table.len()));
    body.push_str("<table>\n<thead>\n<tr>");
    body.extend(
        columns
            .iter()
            .map(|column| format!("<th>{}</th>", escape(table.column_label(column)))),
    );
    body.push_str("</tr>\n</thead>\n<tbody>\n");

    for row in &table.rows {
        body.push_str("<tr>");
        body.extend(columns.iter().map(|column| match row.cell(column) {
            Cell::Text(text) => format!("<td>{}</td>", escape(text)),
            cell => format!("<td class=\"num\">{cell}</td>"),
        }));
        body.push_str("</tr>\n");
    }
    body.push_str("</tbody>\n</table>\n");

    page(version, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use libmhcweb::output::tabulate;
    use libmhcweb::structs::PredictionRecord;

    #[test]
    fn test_escape() {
        check!(escape("HLA-A*02:01") == "HLA-A*02:01");
        check!(escape("<b>\"a\" & 'b'</b>") == "&lt;b&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/b&gt;");
    }

    #[test]
    fn test_index_page() {
        let page = index_page(
            "mhcflurry 2.1.0",
            &["HLA-A*02:01".to_string(), "H-2-Kb".to_string()],
            &["Select at least one allele".to_string()],
        );

        check!(page.contains("<option value=\"HLA-A*02:01\">"));
        check!(page.contains("<option value=\"H-2-Kb\">"));
        check!(page.contains("name=\"alleles\""));
        check!(page.contains("name=\"peptides\""));
        check!(page.contains("action=\"/results\""));
        check!(page.contains("<div class=\"warning\">Select at least one allele</div>"));
        check!(page.contains("predictor: mhcflurry 2.1.0"));
    }

    #[test]
    fn test_warnings_are_escaped() {
        let page = index_page("v", &[], &["<script>".to_string()]);
        check!(!page.contains("<script>"));
        check!(page.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_result_page() {
        let table = tabulate(&[
            PredictionRecord::new("SIINFEKL", "HLA-A*02:01", 300.0),
            PredictionRecord::new("SIINFEKL", "HLA-B*07:02", 12.5),
        ]);
        let page = result_page("v", &table, &[]);

        check!(page.contains(
            "<tr><th>peptide</th><th>length</th><th>tightest_affinity</th>\
             <th>HLA-A*02:01</th><th>HLA-B*07:02</th></tr>"
        ));
        check!(page.contains(
            "<tr><td>SIINFEKL</td><td class=\"num\">8</td><td class=\"num\">12.50</td>\
             <td class=\"num\">300.00</td><td class=\"num\">12.50</td></tr>"
        ));
        check!(!page.contains("class=\"warning\""));
    }
}
