//! The single HTML page served by the validator.

use std::fmt::Write;

use super::handlers::CheckReport;

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn section(out: &mut String, title: &str, body: &str, id: &str) {
    let text = if body.trim().is_empty() { "(no output)" } else { body };
    let _ = write!(
        out,
        "<h2>{}</h2>\n<pre id=\"{}\">{}</pre>\n",
        escape_html(title),
        id,
        escape_html(text)
    );
}

/// Render the form, with results when a submission was checked.
pub fn render(yaml_content: &str, report: Option<&CheckReport>) -> String {
    let mut out = String::from(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Policy checker</title></head>\n<body>\n<h1>Policy checker</h1>\n",
    );
    let _ = write!(
        out,
        "<form method=\"post\" action=\"/\">\n<label for=\"yaml_content\">YAML Content</label>\n\
         <textarea id=\"yaml_content\" name=\"yaml_content\" rows=\"24\" cols=\"100\">{}</textarea>\n\
         <button type=\"submit\">Check</button>\n</form>\n",
        escape_html(yaml_content)
    );

    if let Some(r) = report {
        let yaml = if r.yaml_validation.is_empty() { "YAML is well formed." } else { &r.yaml_validation };
        section(&mut out, "YAML syntax", yaml, "yaml_validation_output");
        section(&mut out, "Engine validate", &r.validation_output, "validation_output");
        section(&mut out, "Engine run", &r.dry_run_output, "dry_run_output");
    }
    out.push_str("</body>\n</html>\n");
    out
}
