use serde::Serialize;

use crate::models::{CreditBalance, ExtractionJob, ExtractionSource};

use super::{ApiClient, ApiError};

/// Payload for submitting a new extraction job. `content` is the link/text
/// body or an upload reference for photo/voice sources.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitExtractionRequest {
    pub source: ExtractionSource,
    pub content: String,
}

impl ApiClient {
    pub async fn submit_extraction(
        &self,
        request: &SubmitExtractionRequest,
    ) -> Result<ExtractionJob, ApiError> {
        self.post("/extractions", request).await
    }

    /// Polled by the UI until the job's status is terminal.
    pub async fn get_extraction_job(&self, job_id: &str) -> Result<ExtractionJob, ApiError> {
        self.get(&format!("/extractions/{job_id}")).await
    }

    pub async fn get_credit_balance(&self) -> Result<CreditBalance, ApiError> {
        self.get("/subscription/credits").await
    }
}
