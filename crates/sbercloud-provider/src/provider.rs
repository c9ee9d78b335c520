//! Provider instantiation
//!
//! `Provider::configure` turns raw host inputs into a validated, immutable
//! [`ProviderContext`]: resolve every field, check the preconditions, derive
//! the client configuration, then run the identity validator once.

use crate::config::{ClientConfig, ProviderInputs, resolve};
use crate::env::EnvSource;
use crate::error::Result;
use crate::lock::NamedLocks;
use crate::registry::Registry;
use crate::schema::{FieldSpec, SCHEMA};
use crate::validator::{IdentityValidator, Session};
use std::sync::Arc;

/// Everything resource implementations receive after configuration
#[derive(Debug, Clone)]
pub struct ProviderContext {
    pub config: Arc<ClientConfig>,
    pub session: Arc<Session>,
    pub locks: Arc<NamedLocks>,
}

/// The SberCloud provider
pub struct Provider<V> {
    validator: V,
    locks: Arc<NamedLocks>,
    registry: Registry,
    host_version: Option<String>,
}

impl<V: IdentityValidator> Provider<V> {
    pub fn new(validator: V, locks: Arc<NamedLocks>) -> Self {
        Self {
            validator,
            locks,
            registry: Registry::builtin(),
            host_version: None,
        }
    }

    /// Protocol version reported by the orchestrating host
    pub fn with_host_version(mut self, version: impl Into<String>) -> Self {
        self.host_version = Some(version.into());
        self
    }

    pub fn schema(&self) -> &'static [FieldSpec] {
        &SCHEMA
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn validator(&self) -> &V {
        &self.validator
    }

    /// Resolve, check and validate the configuration
    ///
    /// Nothing is kept on failure; either a fully validated context is
    /// returned or an error.
    pub async fn configure(
        &self,
        inputs: &ProviderInputs,
        env: &impl EnvSource,
    ) -> Result<ProviderContext> {
        let config = resolve(inputs, env)?.into_client_config(self.host_version.as_deref());

        tracing::info!(
            region = %config.region,
            tenant = %config.tenant_name,
            auth_url = %config.identity_endpoint,
            validator = self.validator.name(),
            "Validating provider configuration"
        );

        let session = match self.validator.validate(&config).await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Provider configuration rejected: {}", e);
                return Err(e.into());
            }
        };

        tracing::info!(
            auth_method = %session.auth_method,
            project_id = session.project_id.as_deref().unwrap_or(""),
            "Provider configured"
        );

        Ok(ProviderContext {
            config: Arc::new(config),
            session: Arc::new(session),
            locks: Arc::clone(&self.locks),
        })
    }
}
