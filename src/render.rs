use axum::http::StatusCode;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown template: {0}")]
    UnknownTemplate(String),
}

/// Typed response descriptor handed across the templating boundary:
/// a status, a template name, and the data mapping the template consumes.
#[derive(Debug)]
pub struct Page {
    pub status: StatusCode,
    pub template: &'static str,
    pub data: Value,
}

impl Page {
    pub fn new(template: &'static str, data: Value) -> Self {
        Self {
            status: StatusCode::OK,
            template,
            data,
        }
    }
}

/// The external templating collaborator: takes a template name and a data
/// mapping, returns markup. Implementations must be safe for concurrent use.
pub trait TemplateEngine: Send + Sync {
    fn render(&self, template: &str, data: &Value) -> Result<String, RenderError>;
}

/// Built-in engine covering the seven page templates with plain HTML.
/// Detail pages show a field table, search pages a form plus a results
/// table. Swappable behind [`TemplateEngine`] for anything fancier.
pub struct BasicHtml;

impl TemplateEngine for BasicHtml {
    fn render(&self, template: &str, data: &Value) -> Result<String, RenderError> {
        match template {
            "home" => Ok(home_page(data)),
            "item.html" | "teamItem.html" | "gameItem.html" => Ok(detail_page(data)),
            "search.html" | "teamSearch.html" | "gameSearch.html" => Ok(search_page(data)),
            other => Err(RenderError::UnknownTemplate(other.to_string())),
        }
    }
}

/// Display text for a single field value. Strings pass through, numbers
/// are formatted, null becomes empty.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn page_title(data: &Value) -> String {
    value_text(&data["pageTitle"])
}

fn shell(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n\
         <body>\n<header><nav><a href=\"/\">Home</a> | <a href=\"/search\">Players</a> | \
         <a href=\"/teamSearch\">Teams</a> | <a href=\"/gameSearch\">Games</a></nav></header>\n\
         {}\n</body>\n</html>\n",
        escape(title),
        body
    )
}

fn home_page(data: &Value) -> String {
    let title = page_title(data);
    let greeting = match &data["user"] {
        Value::String(user) if !user.is_empty() => {
            format!("<p>Signed in as {}.</p>", escape(user))
        }
        _ => "<p>Welcome, guest.</p>".to_string(),
    };
    let body = format!("<h1>{}</h1>\n{}", escape(&title), greeting);
    shell(&title, &body)
}

fn detail_page(data: &Value) -> String {
    let title = page_title(data);
    let mut body = format!("<h1>{}</h1>\n", escape(&title));
    if let Some(row) = data["results"].as_array().and_then(|rows| rows.first()) {
        body.push_str(&field_table(row));
    }
    shell(&title, &body)
}

fn search_page(data: &Value) -> String {
    let title = page_title(data);
    let action = value_text(&data["action"]);
    let form = &data["form"];

    let mut body = format!(
        "<h1>{}</h1>\n<form method=\"post\" action=\"{}\">\n\
         <label>Search <input type=\"text\" name=\"search\" value=\"{}\"></label>\n\
         <button type=\"submit\">Search</button>\n</form>\n",
        escape(&title),
        escape(&action),
        escape(&value_text(&form["value"])),
    );
    if let Value::String(error) = &form["error"] {
        body.push_str(&format!("<p class=\"error\">{}</p>\n", escape(error)));
    }

    // results: null means no search was run; an empty array is a valid
    // "no matches" outcome and is reported as such
    match data["results"].as_array() {
        Some(rows) if rows.is_empty() => body.push_str("<p>No matching results.</p>\n"),
        Some(rows) => body.push_str(&results_table(rows)),
        None => {}
    }
    shell(&title, &body)
}

fn field_table(row: &Value) -> String {
    let mut table = String::from("<table>\n");
    if let Some(fields) = row.as_object() {
        for (name, value) in fields {
            table.push_str(&format!(
                "<tr><th>{}</th><td>{}</td></tr>\n",
                escape(name),
                escape(&value_text(value))
            ));
        }
    }
    table.push_str("</table>\n");
    table
}

fn results_table(rows: &[Value]) -> String {
    let mut table = String::from("<table>\n<tr>");
    if let Some(first) = rows.first().and_then(Value::as_object) {
        for name in first.keys() {
            table.push_str(&format!("<th>{}</th>", escape(name)));
        }
    }
    table.push_str("</tr>\n");
    for row in rows {
        table.push_str("<tr>");
        if let Some(fields) = row.as_object() {
            for value in fields.values() {
                table.push_str(&format!("<td>{}</td>", escape(&value_text(value))));
            }
        }
        table.push_str("</tr>\n");
    }
    table.push_str("</table>\n");
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_template_is_an_error() {
        let err = BasicHtml.render("missing.html", &json!({})).unwrap_err();
        assert!(matches!(err, RenderError::UnknownTemplate(_)));
    }

    #[test]
    fn detail_page_shows_title_and_fields() {
        let markup = BasicHtml
            .render(
                "teamItem.html",
                &json!({
                    "pageTitle": "TeamA",
                    "results": [{"teamID": 1, "name": "TeamA", "city": "Springfield"}],
                }),
            )
            .unwrap();
        assert!(markup.contains("<title>TeamA</title>"));
        assert!(markup.contains("<td>Springfield</td>"));
    }

    #[test]
    fn search_page_distinguishes_no_search_from_no_matches() {
        let not_run = BasicHtml
            .render(
                "search.html",
                &json!({"pageTitle": "Search", "action": "/search", "form": {}, "results": null}),
            )
            .unwrap();
        assert!(!not_run.contains("No matching results."));

        let empty = BasicHtml
            .render(
                "search.html",
                &json!({"pageTitle": "Search", "action": "/search", "form": {"value": "zz"}, "results": []}),
            )
            .unwrap();
        assert!(empty.contains("No matching results."));
    }

    #[test]
    fn markup_escapes_row_values() {
        let markup = BasicHtml
            .render(
                "item.html",
                &json!({
                    "pageTitle": "<script>",
                    "results": [{"fname": "<b>Jo</b>"}],
                }),
            )
            .unwrap();
        assert!(!markup.contains("<script>"));
        assert!(markup.contains("&lt;b&gt;Jo&lt;/b&gt;"));
    }

    #[test]
    fn home_page_greets_signed_in_user() {
        let markup = BasicHtml
            .render("home", &json!({"pageTitle": "Home", "user": "amy"}))
            .unwrap();
        assert!(markup.contains("Signed in as amy."));

        let anonymous = BasicHtml
            .render("home", &json!({"pageTitle": "Home", "user": null}))
            .unwrap();
        assert!(anonymous.contains("Welcome, guest."));
    }
}
