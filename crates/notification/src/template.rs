use askama::Template;
use lunchline_menu::Report;

use crate::Email;

#[derive(Template)]
#[template(path = "menu-report.html")]
pub struct MenuReportHtmlTemplate<'a> {
    pub report: &'a Report,
}

/// Builds the message for a report. The HTML part falls back to the plain
/// text when the template can't be rendered.
pub fn render_email(report: &Report) -> Email {
    let plain = report.to_string();

    let html = match (MenuReportHtmlTemplate { report }).render() {
        Ok(html) => html,
        Err(err) => {
            tracing::error!(err = %err, "failed to render menu template");
            fallback_html(&plain)
        }
    };

    Email {
        subject: report.subject.clone(),
        html,
        plain,
    }
}

fn fallback_html(plain: &str) -> String {
    let Ok(escaped) = askama::filters::escape(plain, askama::filters::Html);
    format!("<pre>{escaped}</pre>")
}
