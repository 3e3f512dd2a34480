use finbrowse_core::render::view::{ANOMALY_COLUMNS, FINANCIAL_COLUMNS};
use finbrowse_core::render::{ResultsView, TableBody};

pub fn render_results(view: &ResultsView) -> String {
    let financials = match &view.financials {
        TableBody::Rows { rows } => text_table(&FINANCIAL_COLUMNS, rows.iter().map(|r| r.cells())),
        TableBody::Placeholder { text, .. } => text_table(&FINANCIAL_COLUMNS, [[*text; 1]]),
    };
    let anomalies = match &view.anomalies {
        TableBody::Rows { rows } => text_table(&ANOMALY_COLUMNS, rows.iter().map(|r| r.cells())),
        TableBody::Placeholder { text, .. } => text_table(&ANOMALY_COLUMNS, [[*text; 1]]),
    };

    format!(
        "Financial Metrics\n{financials}\nAnomalies\n{anomalies}\nAnalyst Narrative\n{}\n",
        view.narrative
    )
}

/// Left-aligned columns separated by two spaces. A row with a single cell is a
/// placeholder and is printed across the full width.
fn text_table<'a, const N: usize>(
    headers: &[&str],
    rows: impl IntoIterator<Item = [&'a str; N]>,
) -> String {
    let rows: Vec<Vec<&str>> = rows.into_iter().map(|r| r.to_vec()).collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows.iter().filter(|r| r.len() == headers.len()) {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = format_line(headers, &widths);
    let rule_len = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    out.push_str(&"-".repeat(rule_len));
    out.push('\n');
    for row in &rows {
        if row.len() == headers.len() {
            out.push_str(&format_line(row, &widths));
        } else {
            out.push_str(&row.join("  "));
            out.push('\n');
        }
    }
    out
}

fn format_line(cells: &[&str], widths: &[usize]) -> String {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| format!("{cell:<w$}"))
        .collect::<Vec<_>>()
        .join("  ");
    format!("{}\n", line.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use finbrowse_core::domain::AnalysisResponse;
    use serde_json::json;

    #[test]
    fn aligns_rows_under_headers() {
        let res: AnalysisResponse = serde_json::from_value(json!({
            "years": [{"label": "FY2023", "revenue": 2_500_000.0}],
            "anomalies": [{"year": 2023, "color": "red", "condition": "C", "interpretation": "I"}],
            "narrative": "n"
        }))
        .unwrap();
        let out = render_results(&ResultsView::from_response(&res));

        assert!(out.contains("Year    Revenue  AR   Cash  Debt  DSO (days)  Cash/AR  Cash/Debt\n"));
        assert!(out.contains("FY2023  2.50M    N/A  N/A   N/A   N/A         N/A      N/A\n"));
        assert!(out.contains("2023  RED   C          I\n"));
        assert!(out.ends_with("Analyst Narrative\nn\n"));
    }

    #[test]
    fn placeholders_print_once() {
        let out = render_results(&ResultsView::from_response(&AnalysisResponse::default()));
        assert_eq!(out.matches("No financial data available").count(), 1);
        assert_eq!(out.matches("No anomalies detected").count(), 1);
        assert!(out.contains("No narrative available."));
    }
}
