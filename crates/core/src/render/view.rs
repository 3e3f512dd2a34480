//! Presentation-independent view of one analysis response.
//!
//! Surfaces (the web page, the terminal) only lay these strings out; every formatting
//! and placeholder decision is made here.

use crate::domain::{AnalysisResponse, AnomalyRecord, YearRecord};
use crate::render::format::{format_number, format_ratio};
use crate::render::NOT_AVAILABLE;
use serde::Serialize;

pub const FINANCIAL_COLUMNS: [&str; 8] = [
    "Year",
    "Revenue",
    "AR",
    "Cash",
    "Debt",
    "DSO (days)",
    "Cash/AR",
    "Cash/Debt",
];

pub const ANOMALY_COLUMNS: [&str; 4] = ["Year", "Flag", "Condition", "Interpretation"];

pub const NO_FINANCIAL_DATA: &str = "No financial data available";
pub const NO_ANOMALIES: &str = "No anomalies detected";
pub const NO_NARRATIVE: &str = "No narrative available.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableBody<R> {
    Rows { rows: Vec<R> },
    /// A single row spanning every column.
    Placeholder { colspan: usize, text: &'static str },
}

impl<R> TableBody<R> {
    fn from_rows(rows: Vec<R>, colspan: usize, text: &'static str) -> Self {
        if rows.is_empty() {
            TableBody::Placeholder { colspan, text }
        } else {
            TableBody::Rows { rows }
        }
    }

    /// Number of `<tr>` elements this body renders to.
    pub fn row_count(&self) -> usize {
        match self {
            TableBody::Rows { rows } => rows.len(),
            TableBody::Placeholder { .. } => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinancialRow {
    pub period: String,
    pub revenue: String,
    pub ar: String,
    pub cash: String,
    pub debt: String,
    pub dso: String,
    pub cash_ar: String,
    pub cash_debt: String,
}

impl FinancialRow {
    pub fn from_record(rec: &YearRecord) -> Self {
        Self {
            period: rec
                .period_label()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            revenue: format_number(rec.revenue),
            ar: format_number(rec.ar),
            cash: format_number(rec.cash),
            debt: format_number(rec.debt),
            dso: format_ratio(rec.dso, 1),
            cash_ar: format_ratio(rec.cash_ar, 2),
            cash_debt: format_ratio(rec.cash_debt, 2),
        }
    }

    pub fn cells(&self) -> [&str; 8] {
        [
            self.period.as_str(),
            self.revenue.as_str(),
            self.ar.as_str(),
            self.cash.as_str(),
            self.debt.as_str(),
            self.dso.as_str(),
            self.cash_ar.as_str(),
            self.cash_debt.as_str(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnomalyRow {
    /// Row class; the raw color keyword.
    pub class: String,
    pub year: String,
    /// Uppercased color shown next to the flag dot.
    pub severity: String,
    pub condition: String,
    pub interpretation: String,
}

impl AnomalyRow {
    pub fn from_record(rec: &AnomalyRecord) -> Self {
        Self {
            class: rec.color.as_str().to_string(),
            year: rec
                .year
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            severity: rec.color.label(),
            condition: rec.condition.clone(),
            interpretation: rec.interpretation.clone(),
        }
    }

    pub fn cells(&self) -> [&str; 4] {
        [
            self.year.as_str(),
            self.severity.as_str(),
            self.condition.as_str(),
            self.interpretation.as_str(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsView {
    pub financials: TableBody<FinancialRow>,
    pub anomalies: TableBody<AnomalyRow>,
    pub narrative: String,
}

impl ResultsView {
    pub fn from_response(res: &AnalysisResponse) -> Self {
        let financials = res.years.iter().map(FinancialRow::from_record).collect();
        let anomalies = res.anomalies.iter().map(AnomalyRow::from_record).collect();

        Self {
            financials: TableBody::from_rows(
                financials,
                FINANCIAL_COLUMNS.len(),
                NO_FINANCIAL_DATA,
            ),
            anomalies: TableBody::from_rows(anomalies, ANOMALY_COLUMNS.len(), NO_ANOMALIES),
            narrative: res
                .narrative
                .as_deref()
                .filter(|s| !s.is_empty())
                .unwrap_or(NO_NARRATIVE)
                .to_string(),
        }
    }
}
