//! Driven port deciding whether a submission is a genuine identity document.

use async_trait::async_trait;

use crate::domain::{DocumentStatus, DocumentSubmission};

use super::define_port_error;

define_port_error! {
    /// Infrastructure failures raised by classifier adapters.
    pub enum DocumentClassifierError {
        Unavailable { message: String } => "document classifier unavailable: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentClassifier: Send + Sync {
    async fn classify(
        &self,
        submission: &DocumentSubmission,
    ) -> Result<DocumentStatus, DocumentClassifierError>;
}
