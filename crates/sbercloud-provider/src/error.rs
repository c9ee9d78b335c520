//! Provider error types

use thiserror::Error;

/// Provider errors
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Invalid provider configuration:\n{0}")]
    InvalidInput(ValidationErrors),

    #[error("Configuration validation failed: {0}")]
    ConfigValidation(#[from] ConfigValidationError),

    #[error("Duplicate registration: {0}")]
    DuplicateRegistration(String),

    #[error("Invalid object name: {0}")]
    InvalidName(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Rejection reported by the identity validation step
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("region must be set: provide `region` or SBC_REGION_NAME")]
    MissingRegion,

    #[error(
        "no credentials supplied: set `access_key`/`secret_key` \
        or `user_name`/`password`/`account_name`"
    )]
    MissingCredentials,

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Identity endpoint unreachable: {0}")]
    EndpointUnreachable(String),

    #[error("Untrusted certificate (set `insecure` to skip verification): {0}")]
    UntrustedCertificate(String),

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("API error: {0}")]
    Api(String),
}

/// A single failed precondition on one input field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\": {}", self.field, self.message)
    }
}

/// Every precondition failure found while parsing raw inputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn extend(&mut self, other: ValidationErrors) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Whether any error concerns the named field
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// `Ok(())` when empty, otherwise the collected errors as `InvalidInput`
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ProviderError::InvalidInput(self))
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  - {}", error)?;
        }
        Ok(())
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;
