//! HTML presentation of [`ResultsView`] and the analysis page around it.

use crate::controller::Status;
use crate::domain::AnalysisForm;
use crate::render::view::{AnomalyRow, FinancialRow, ResultsView, TableBody, ANOMALY_COLUMNS, FINANCIAL_COLUMNS};
use std::fmt::Write;

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

/// Inner HTML of `#financialTable tbody`.
pub fn financial_tbody(body: &TableBody<FinancialRow>) -> String {
    match body {
        TableBody::Rows { rows } => rows.iter().fold(String::new(), |mut out, row| {
            out.push_str("<tr>");
            for cell in row.cells() {
                let _ = write!(out, "<td>{}</td>", escape(cell));
            }
            out.push_str("</tr>\n");
            out
        }),
        TableBody::Placeholder { colspan, text } => placeholder_row(*colspan, text),
    }
}

/// Inner HTML of `#anomalyTable tbody`.
pub fn anomaly_tbody(body: &TableBody<AnomalyRow>) -> String {
    match body {
        TableBody::Rows { rows } => rows.iter().fold(String::new(), |mut out, row| {
            let class = escape(&row.class);
            let _ = writeln!(
                out,
                "<tr class=\"{class}\"><td>{}</td><td><span class=\"flag-dot {class}\"></span>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&row.year),
                escape(&row.severity),
                escape(&row.condition),
                escape(&row.interpretation),
            );
            out
        }),
        TableBody::Placeholder { colspan, text } => placeholder_row(*colspan, text),
    }
}

fn placeholder_row(colspan: usize, text: &str) -> String {
    format!(
        "<tr><td colspan=\"{colspan}\" style=\"text-align: center; color: #999;\">{}</td></tr>\n",
        escape(text)
    )
}

pub fn status_line(status: Option<&Status>) -> String {
    match status {
        Some(status) => format!(
            "<div id=\"statusMessage\" class=\"status-message {}\">{}</div>",
            status.kind.as_str(),
            escape(&status.message)
        ),
        None => "<div id=\"statusMessage\" class=\"status-message\"></div>".to_string(),
    }
}

/// Results region. Hidden until there is something to show; when shown it scrolls itself
/// into view on load.
pub fn results_section(view: Option<&ResultsView>) -> String {
    let Some(view) = view else {
        return "<section id=\"resultsSection\" style=\"display: none;\"></section>".to_string();
    };

    format!(
        "<section id=\"resultsSection\" style=\"display: block;\">\n\
<h2>Financial Metrics</h2>\n\
<table id=\"financialTable\"><thead>{}</thead><tbody>\n{}</tbody></table>\n\
<h2>Anomalies</h2>\n\
<table id=\"anomalyTable\"><thead>{}</thead><tbody>\n{}</tbody></table>\n\
<h2>Analyst Narrative</h2>\n\
<div id=\"agentNarrative\">{}</div>\n\
</section>\n\
<script>document.getElementById('resultsSection').scrollIntoView({{ behavior: 'smooth' }});</script>",
        header_row(&FINANCIAL_COLUMNS),
        financial_tbody(&view.financials),
        header_row(&ANOMALY_COLUMNS),
        anomaly_tbody(&view.anomalies),
        escape(&view.narrative),
    )
}

fn header_row(columns: &[&str]) -> String {
    let mut out = String::from("<tr>");
    for col in columns {
        let _ = write!(out, "<th>{}</th>", escape(col));
    }
    out.push_str("</tr>");
    out
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Page<'a> {
    /// Form target; `None` renders a read-only report without inputs.
    pub form_action: Option<&'a str>,
    pub form: Option<&'a AnalysisForm>,
    pub status: Option<&'a Status>,
    pub results: Option<&'a ResultsView>,
}

impl Page<'_> {
    pub fn render(&self) -> String {
        let form = match self.form_action {
            Some(action) => input_form(action, self.form),
            None => String::new(),
        };

        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
<title>Agentic Financial Browser</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
<div class=\"container\">\n<h1>Agentic Financial Browser</h1>\n{form}\n{}\n{}\n</div>\n</body>\n</html>\n",
            status_line(self.status),
            results_section(self.results),
        )
    }
}

fn input_form(action: &str, form: Option<&AnalysisForm>) -> String {
    let (symbol, market, url) = form
        .map(|f| (escape(&f.symbol), escape(&f.market), escape(&f.url)))
        .unwrap_or_default();
    format!(
        "<form method=\"post\" action=\"{}\" class=\"input-panel\">\n\
<input id=\"symbolInput\" name=\"symbol\" placeholder=\"Stock symbol (e.g. AAPL, TCS)\" value=\"{}\">\n\
<input id=\"marketInput\" name=\"market\" placeholder=\"Market (e.g. NSE, NASDAQ)\" value=\"{}\">\n\
<input id=\"urlInput\" name=\"url\" placeholder=\"Custom URL (optional)\" value=\"{}\">\n\
<button id=\"analyzeBtn\" type=\"submit\">Analyze</button>\n\
</form>",
        escape(action),
        symbol,
        market,
        url,
    )
}

const STYLE: &str = "\
body { font-family: -apple-system, 'Helvetica Neue', Arial, sans-serif; background: #f5f5f7; color: #1d1d1f; }\
.container { max-width: 1100px; margin: 0 auto; padding: 2rem; }\
.input-panel { display: flex; gap: 0.5rem; margin-bottom: 1rem; }\
.input-panel input { flex: 1; padding: 0.5rem; }\
.status-message { min-height: 1.5rem; margin-bottom: 1rem; }\
.status-message.info { color: #007aff; }\
.status-message.loading { color: #ff9f0a; }\
.status-message.success { color: #34c759; }\
.status-message.error { color: #ff3b30; }\
table { width: 100%; border-collapse: collapse; margin-bottom: 1.5rem; background: #fff; }\
th, td { padding: 0.4rem 0.6rem; border-bottom: 1px solid #d2d2d7; text-align: left; }\
tr.red { background: #ffecec; }\
tr.orange { background: #fff4e5; }\
tr.yellow { background: #fffbe5; }\
tr.green { background: #ecfff0; }\
.flag-dot { display: inline-block; width: 10px; height: 10px; border-radius: 50%; margin-right: 6px; }\
.flag-dot.red { background: #ff3b30; }\
.flag-dot.orange { background: #ff9f0a; }\
.flag-dot.yellow { background: #ffd60a; }\
.flag-dot.green { background: #34c759; }\
#agentNarrative { white-space: pre-wrap; background: #fff; padding: 1rem; }";
