//! Server-rendered HTML page.

use crate::pipeline::{AnalysisReport, EvidenceOutcome};
use crate::render::prediction_line;

pub const PAGE_TITLE: &str = "FactFlow — Fake News Detection + Evidence Summarizer";

/// What to show below the input form.
pub enum PageContent<'a> {
    Empty,
    Warning(&'a str),
    Error(&'a str),
    Report(&'a AnalysisReport),
}

/// Render the full page, keeping `text` in the text area.
pub fn render_page(text: &str, content: PageContent<'_>) -> String {
    let body = match content {
        PageContent::Empty => String::new(),
        PageContent::Warning(message) => {
            format!(r#"<p class="warning">{}</p>"#, escape_html(message))
        }
        PageContent::Error(message) => {
            format!(r#"<p class="error">{}</p>"#, escape_html(message))
        }
        PageContent::Report(report) => render_report(report),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
body {{ font-family: system-ui, sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; }}
textarea {{ width: 100%; min-height: 10rem; }}
.prediction {{ font-size: 1.25rem; font-weight: 600; }}
.warning {{ color: #a15c00; }}
.error {{ color: #b00020; }}
.evidence {{ margin: 1rem 0; }}
</style>
</head>
<body>
<h1>🧠 {title}</h1>
<form method="post" action="/analyze">
<label for="text">Enter a news claim or article:</label>
<textarea id="text" name="text">{text}</textarea>
<button type="submit">Analyze</button>
</form>
{body}
</body>
</html>
"#,
        title = escape_html(PAGE_TITLE),
        text = escape_html(text),
        body = body,
    )
}

fn render_report(report: &AnalysisReport) -> String {
    let mut html = format!(
        r#"<p class="prediction">{}</p>"#,
        escape_html(&prediction_line(&report.prediction))
    );

    html.push_str("\n<h2>Evidence</h2>\n");
    if let Some(notice) = report.evidence.notice() {
        let class = match report.evidence {
            EvidenceOutcome::NoHits => "notice",
            _ => "warning",
        };
        html.push_str(&format!(
            r#"<p class="{}">{}</p>"#,
            class,
            escape_html(&notice)
        ));
        html.push('\n');
    }

    for entry in report.evidence.entries() {
        html.push_str(&format!(
            r#"<div class="evidence"><p><strong>{}</strong></p><p>{}</p><p><a href="{}" rel="noopener noreferrer" target="_blank">Read more</a></p></div>"#,
            escape_html(&entry.title),
            escape_html(&entry.summary),
            escape_html(entry.href.as_str()),
        ));
        html.push('\n');
    }

    html
}

pub fn escape_html(text: &str) -> String {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_empty_page_has_form() {
        let html = render_page("", PageContent::Empty);
        assert!(html.contains("<title>FactFlow — Fake News Detection + Evidence Summarizer</title>"));
        assert!(html.contains(r#"<form method="post" action="/analyze">"#));
        assert!(html.contains(">Analyze</button>"));
    }

    #[test]
    fn test_warning_keeps_input_escaped() {
        let html = render_page("<script>", PageContent::Warning("Please enter something."));
        assert!(html.contains("&lt;script&gt;</textarea>"));
        assert!(html.contains(r#"<p class="warning">Please enter something.</p>"#));
    }
}
