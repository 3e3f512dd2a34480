pub mod error;
pub mod http;

pub use error::AnalysisError;
pub use http::HttpAnalysisClient;

use crate::domain::{AnalysisRequest, AnalysisResponse};

#[async_trait::async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Address shown to users when a request fails.
    fn base_url(&self) -> &str;

    async fn analyze(&self, req: &AnalysisRequest) -> Result<AnalysisResponse, AnalysisError>;
}
