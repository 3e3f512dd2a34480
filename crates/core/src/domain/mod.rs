pub mod request;
pub mod response;

pub use request::{AnalysisForm, AnalysisRequest};
pub use response::{AnalysisResponse, AnomalyRecord, FlagColor, Period, YearRecord};
