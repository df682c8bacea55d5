//! Driven port deciding whether an e-sports profile URL is genuine.

use async_trait::async_trait;

use crate::domain::EsportsPlatform;

use super::define_port_error;

define_port_error! {
    /// Infrastructure failures raised by verifier adapters.
    pub enum EsportsProfileVerifierError {
        /// The verifier backend could not be reached or answered garbage.
        Unavailable { message: String } => "profile verifier unavailable: {message}",
    }
}

/// Verdict for a single profile URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileVerdict {
    pub is_valid: bool,
    pub message: String,
}

impl ProfileVerdict {
    pub fn valid(message: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: message.into(),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EsportsProfileVerifier: Send + Sync {
    async fn verify(
        &self,
        platform: EsportsPlatform,
        profile_url: &str,
    ) -> Result<ProfileVerdict, EsportsProfileVerifierError>;
}
