//! SberCloud IAM validator
//!
//! This crate implements the `IdentityValidator` trait for SberCloud's
//! identity service, so a resolved provider configuration can be checked
//! before any resource touches the cloud.
//!
//! # Authentication
//!
//! - AK/SK: requests are signed with `SDK-HMAC-SHA256` and the tenant is
//!   looked up with `GET /v3/projects?name=...`
//! - Password: a project-scoped token is issued with `POST /v3/auth/tokens`
//!
//! # Example
//!
//! ```ignore
//! use sbercloud_iam::IamValidator;
//! use sbercloud_provider::{NamedLocks, ProcessEnv, Provider, ProviderInputs};
//! use std::sync::Arc;
//!
//! let provider = Provider::new(IamValidator::new(), Arc::new(NamedLocks::new()));
//! let context = provider.configure(&ProviderInputs::new(), &ProcessEnv).await?;
//! println!("project: {:?}", context.session.project_id);
//! ```

pub mod client;
pub mod error;
pub mod signer;
pub mod validator;

pub use client::{
    CONNECT_TIMEOUT, IamClient, PasswordCredentials, ProjectInfo, REQUEST_TIMEOUT, TokenInfo,
};
pub use error::{IamError, Result};
pub use signer::{SignedHeaders, Signer};
pub use validator::IamValidator;
