use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::application::usecases::proposals::ProposalError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

impl IntoResponse for ProposalError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            ProposalError::NotFound(_) => self.to_string(),
            ProposalError::Internal(source) => {
                error!(error = %format!("{source:#}"), "proposals: request failed");
                // Don't leak internal error detail to client
                "Internal server error".to_string()
            }
        };

        let body = Json(ErrorResponse {
            code: status.as_u16(),
            message,
        });

        (status, body).into_response()
    }
}
