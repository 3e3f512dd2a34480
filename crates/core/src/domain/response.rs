use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub market: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub years: Vec<YearRecord>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub anomalies: Vec<AnomalyRecord>,
    #[serde(default)]
    pub narrative: Option<String>,
}

/// One fiscal period with its raw amounts and the ratios derived from them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YearRecord {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub year: Option<Period>,
    #[serde(default)]
    pub revenue: Option<f64>,
    #[serde(default)]
    pub ar: Option<f64>,
    #[serde(default)]
    pub cash: Option<f64>,
    #[serde(default)]
    pub debt: Option<f64>,
    #[serde(default)]
    pub dso: Option<f64>,
    #[serde(default)]
    pub cash_ar: Option<f64>,
    #[serde(default)]
    pub cash_debt: Option<f64>,
}

impl YearRecord {
    /// `label` wins over `year`; an empty label counts as missing.
    pub fn period_label(&self) -> Option<String> {
        self.label
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .or_else(|| self.year.as_ref().map(Period::to_string))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRecord {
    #[serde(default)]
    pub year: Option<Period>,
    pub color: FlagColor,
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub interpretation: String,
}

/// A year key as sent by the backend: `2023`, `"FY2023"` or occasionally a float.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Period {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Int(v) => write!(f, "{v}"),
            Period::Float(v) => write!(f, "{v}"),
            Period::Text(v) => f.write_str(v),
        }
    }
}

/// Severity classification assigned by the backend. Doubles as the CSS class of the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FlagColor {
    Red,
    Orange,
    Yellow,
    Green,
    Other(String),
}

impl FlagColor {
    pub fn as_str(&self) -> &str {
        match self {
            FlagColor::Red => "red",
            FlagColor::Orange => "orange",
            FlagColor::Yellow => "yellow",
            FlagColor::Green => "green",
            FlagColor::Other(s) => s,
        }
    }

    pub fn label(&self) -> String {
        self.as_str().to_uppercase()
    }
}

impl From<String> for FlagColor {
    fn from(s: String) -> Self {
        match s.as_str() {
            "red" => FlagColor::Red,
            "orange" => FlagColor::Orange,
            "yellow" => FlagColor::Yellow,
            "green" => FlagColor::Green,
            _ => FlagColor::Other(s),
        }
    }
}

impl From<FlagColor> for String {
    fn from(c: FlagColor) -> Self {
        c.as_str().to_string()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
