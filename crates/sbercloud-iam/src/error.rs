//! IAM client error types

use sbercloud_provider::ConfigValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IamError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid identity endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("IAM returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Request signing failed: {0}")]
    Signing(String),

    #[error("Missing X-Subject-Token header in token response")]
    MissingToken,
}

impl IamError {
    /// Map onto the validation error surfaced to the host
    pub fn into_validation_error(self, insecure: bool) -> ConfigValidationError {
        match self {
            IamError::Http(e) => {
                let unreachable = e.is_connect() || e.is_timeout();
                transport_error(error_chain(&e), unreachable, insecure)
            }
            IamError::InvalidEndpoint(url) => ConfigValidationError::EndpointUnreachable(url),
            IamError::Api { status, message } if status == 401 || status == 403 => {
                ConfigValidationError::AuthenticationFailed(message)
            }
            IamError::Api { status, message } => {
                ConfigValidationError::Api(format!("{}: {}", status, message))
            }
            other => ConfigValidationError::Api(other.to_string()),
        }
    }
}

/// Classify a failure below the HTTP layer
///
/// Certificate failures surface as connect errors, so they are checked
/// first; with `insecure` set they cannot be the cause.
fn transport_error(detail: String, unreachable: bool, insecure: bool) -> ConfigValidationError {
    if !insecure && is_certificate_error(&detail) {
        ConfigValidationError::UntrustedCertificate(detail)
    } else if unreachable {
        ConfigValidationError::EndpointUnreachable(detail)
    } else {
        ConfigValidationError::Api(detail)
    }
}

/// Joins an error with all of its sources
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn is_certificate_error(detail: &str) -> bool {
    let detail = detail.to_ascii_lowercase();
    detail.contains("certificate") || detail.contains("unknownissuer")
}

pub type Result<T> = std::result::Result<T, IamError>;
