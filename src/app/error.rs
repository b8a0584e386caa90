use crate::core::FailureStage;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

pub const INCOMPLETE_DATA: &str = "Incomplete data. Provide accountId, numbers and stars.";

/// Failure body of the betting API: `{success:false, step, message}`.
#[derive(Debug, Serialize)]
pub struct ApiFailure {
    #[serde(skip)]
    pub status: StatusCode,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<FailureStage>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Spent cheque reference, only set when registration failed after the spend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

impl ApiFailure {
    pub fn new(status: StatusCode, step: Option<FailureStage>, message: impl Into<String>) -> Self {
        Self {
            status,
            success: false,
            step,
            message: message.into(),
            error: None,
            credential: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, Some(FailureStage::Validation), message)
    }

    /// 每個階段對應的 HTTP 狀態碼
    pub fn for_stage(stage: FailureStage, message: impl Into<String>) -> Self {
        let status = match stage {
            FailureStage::Validation => StatusCode::BAD_REQUEST,
            FailureStage::CredentialIssuance => StatusCode::PAYMENT_REQUIRED,
            FailureStage::Registration => StatusCode::BAD_REQUEST,
        };
        Self::new(status, Some(stage), message)
    }

    pub fn internal(message: impl Into<String>, error: impl Into<String>) -> Self {
        let mut failure = Self::new(StatusCode::INTERNAL_SERVER_ERROR, None, message);
        failure.error = Some(error.into());
        failure
    }

    pub fn with_credential(mut self, credential: Option<String>) -> Self {
        self.credential = credential;
        self
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}
