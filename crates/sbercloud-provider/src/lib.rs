//! SberCloud Provider
//!
//! This crate prepares the configuration object shared by every SberCloud
//! resource and data source: it resolves the provider inputs, derives the
//! tenant and endpoint settings, and validates the result against the
//! identity service.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              Orchestration host                  │
//! └─────────────────┬───────────────────────────────┘
//!                   │ ProviderInputs + host version
//! ┌─────────────────▼───────────────────────────────┐
//! │              sbercloud-provider                  │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │  resolve: explicit → env → default       │   │
//! │  │  preconditions (required_with)           │   │
//! │  │  derive: tenant, domain, cloud, region   │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────┐            │
//! │  │   Registry   │  │  NamedLocks  │            │
//! │  └──────────────┘  └──────────────┘            │
//! └───────┬─────────────────────────────────────────┘
//!         │ trait IdentityValidator
//! ┌───────▼───────┐
//! │ sbercloud-iam │
//! └───────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use sbercloud_provider::{NamedLocks, ProcessEnv, Provider, ProviderInputs};
//! use sbercloud_iam::IamValidator;
//! use std::sync::Arc;
//!
//! let provider = Provider::new(IamValidator::new(), Arc::new(NamedLocks::new()));
//! let inputs = ProviderInputs {
//!     region: Some("ru-moscow-1".to_string()),
//!     ..Default::default()
//! };
//! let context = provider.configure(&inputs, &ProcessEnv).await?;
//! ```

pub mod config;
pub mod env;
pub mod error;
pub mod lock;
pub mod provider;
pub mod registry;
pub mod schema;
pub mod validator;

// Re-exports
pub use config::{
    AuthMethod, CLOUD, ClientConfig, ConfigSummary, HOST_VERSION_PLACEHOLDER,
    ProviderConfiguration, ProviderInputs, resolve,
};
pub use env::{EnvSource, ProcessEnv};
pub use error::{ConfigValidationError, FieldError, ProviderError, Result, ValidationErrors};
pub use lock::{NamedLockGuard, NamedLocks};
pub use provider::{Provider, ProviderContext};
pub use registry::{NAME_PREFIX, ObjectKind, RegisteredObject, Registry, Service};
pub use schema::{DEFAULT_AUTH_URL, Field, FieldKind, FieldSpec, SCHEMA, SUGGESTED_REGION};
pub use validator::{IdentityValidator, Session};
