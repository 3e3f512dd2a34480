use crate::client::AnalysisError;
use serde::{Deserialize, Serialize};

/// Raw, untrimmed values as typed into the three input fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AnalysisForm {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub market: String,
    #[serde(default)]
    pub url: String,
}

impl AnalysisForm {
    pub fn new(
        symbol: impl Into<String>,
        market: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            market: market.into(),
            url: url.into(),
        }
    }

    pub fn to_request(&self) -> Result<AnalysisRequest, AnalysisError> {
        AnalysisRequest::try_new(&self.symbol, &self.market, &self.url)
    }
}

/// Body of `POST /api/analyze`. `market` and `url` serialize as `null` when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub symbol: String,
    pub market: Option<String>,
    pub url: Option<String>,
}

impl AnalysisRequest {
    pub fn try_new(symbol: &str, market: &str, url: &str) -> Result<Self, AnalysisError> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(AnalysisError::Validation(
                "Please enter a stock symbol".to_string(),
            ));
        }

        Ok(Self {
            symbol: symbol.to_string(),
            market: non_empty(market),
            url: non_empty(url),
        })
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn trims_symbol_and_normalizes_empty_optionals() {
        let req = AnalysisRequest::try_new("  AAPL \n", "", "   ").unwrap();
        assert_eq!(req.symbol, "AAPL");
        assert_eq!(req.market, None);
        assert_eq!(req.url, None);
    }

    #[test]
    fn keeps_trimmed_market_and_url() {
        let req = AnalysisRequest::try_new("TCS", " NSE ", " https://example.com/tcs ").unwrap();
        assert_eq!(req.market.as_deref(), Some("NSE"));
        assert_eq!(req.url.as_deref(), Some("https://example.com/tcs"));
    }

    #[test]
    fn rejects_empty_and_whitespace_symbols() {
        for symbol in ["", " ", "\t\n  "] {
            let err = AnalysisRequest::try_new(symbol, "NSE", "").unwrap_err();
            assert!(matches!(err, AnalysisError::Validation(_)), "{symbol:?}");
            assert_eq!(err.to_string(), "Please enter a stock symbol");
        }
    }

    #[test]
    fn serializes_absent_fields_as_null() {
        let req = AnalysisRequest::try_new("MSFT", "", "").unwrap();
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"symbol": "MSFT", "market": null, "url": null})
        );
    }

    #[test]
    fn form_deserializes_with_missing_fields() {
        let form: AnalysisForm = serde_json::from_value(json!({"symbol": "INFY"})).unwrap();
        assert_eq!(form, AnalysisForm::new("INFY", "", ""));
        assert_eq!(form.to_request().unwrap().symbol, "INFY");
    }
}
