//! Submission transport seam

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::TransportError;
use crate::form::Form;

/// What the server answered to a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportResponse {
    pub status: u16,
    #[serde(default)]
    pub body: String,
}

impl TransportResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }
}

/// Performs the network submission of a validated form.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn submit(&self, form: &Form) -> Result<TransportResponse, TransportError>;
}
