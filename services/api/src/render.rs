//! Server-side HTML for the applicant form and its result panel.

use placement_advisor::placement::{FeatureField, PlacementAssessment, RawSubmission};
use std::fmt::Write;

/// What the page should show below the form.
pub(crate) enum PageResult<'a> {
    Empty,
    Assessment(&'a PlacementAssessment),
    Message(&'a str),
}

pub(crate) fn render_page(submitted: Option<&RawSubmission>, result: PageResult<'_>) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Placement Readiness</title>\n</head>\n<body>\n\
         <h1>Placement Readiness Check</h1>\n\
         <form method=\"post\" action=\"/predict\">\n",
    );

    for field in FeatureField::ALL {
        let bounds = field.bounds();
        let value = submitted
            .and_then(|raw| raw.get(field.form_key()))
            .map(String::as_str)
            .map(escape_html)
            .unwrap_or_default();
        let _ = writeln!(
            html,
            "<label>{label} <input type=\"number\" step=\"any\" name=\"{key}\" min=\"{min}\" \
             max=\"{max}\" value=\"{value}\" required></label><br>",
            label = escape_html(field.label()),
            key = field.form_key(),
            min = bounds.start(),
            max = bounds.end(),
        );
    }
    html.push_str("<button type=\"submit\">Predict</button>\n</form>\n");

    match result {
        PageResult::Empty => {}
        PageResult::Message(message) => {
            let _ = writeln!(
                html,
                "<pre class=\"result error\">{}</pre>",
                escape_html(message)
            );
        }
        PageResult::Assessment(assessment) => {
            let class = match assessment.outcome.code() {
                1 => "positive",
                _ => "negative",
            };
            let _ = writeln!(
                html,
                "<pre class=\"result {class}\">{}</pre>",
                escape_html(&assessment.explanation)
            );
            let _ = writeln!(
                html,
                "<p>Placement probability: {:.1}%</p>",
                assessment.probability.percent()
            );
            html.push_str("<table class=\"input-summary\">\n");
            for (field, value) in assessment.features.entries() {
                let _ = writeln!(
                    html,
                    "<tr><th>{}</th><td>{value}</td></tr>",
                    escape_html(field.label())
                );
            }
            html.push_str("</table>\n");
        }
    }

    html.push_str("</body>\n</html>\n");
    html
}

pub(crate) fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
