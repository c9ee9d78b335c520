//! Identity validation against SberCloud IAM

use crate::client::{IamClient, PasswordCredentials, REQUEST_TIMEOUT};
use async_trait::async_trait;
use sbercloud_provider::{
    AuthMethod, ClientConfig, ConfigValidationError, IdentityValidator, Session,
};
use std::time::Duration;

/// Validates provider configuration by authenticating against IAM
#[derive(Debug, Clone, Copy)]
pub struct IamValidator {
    timeout: Duration,
}

impl Default for IamValidator {
    fn default() -> Self {
        Self {
            timeout: REQUEST_TIMEOUT,
        }
    }
}

impl IamValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upper bound for each IAM request; expiry reports the endpoint unreachable
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn validate_aksk(
        &self,
        client: &IamClient,
        config: &ClientConfig,
    ) -> Result<Session, ConfigValidationError> {
        let (Some(access_key), Some(secret_key)) = (&config.access_key, &config.secret_key) else {
            return Err(ConfigValidationError::MissingCredentials);
        };

        let projects = client
            .list_projects(access_key, secret_key, &config.tenant_name)
            .await
            .map_err(|e| e.into_validation_error(config.insecure))?;

        let project = projects
            .into_iter()
            .find(|p| p.name == config.tenant_name)
            .ok_or_else(|| ConfigValidationError::ProjectNotFound(config.tenant_name.clone()))?;

        tracing::debug!("Project {} resolved to {}", project.name, project.id);
        Ok(Session::new(AuthMethod::AkSk).with_project_id(project.id))
    }

    async fn validate_password(
        &self,
        client: &IamClient,
        config: &ClientConfig,
    ) -> Result<Session, ConfigValidationError> {
        let (Some(user_name), Some(password)) = (&config.username, &config.password) else {
            return Err(ConfigValidationError::MissingCredentials);
        };
        let credentials = PasswordCredentials {
            user_name,
            password,
            domain_name: config.domain_name.as_deref().unwrap_or_default(),
            project_name: &config.tenant_name,
        };

        let token = client
            .issue_token(&credentials)
            .await
            .map_err(|e| e.into_validation_error(config.insecure))?;

        let mut session = Session::new(AuthMethod::Password).with_token(token.token);
        if let Some(project_id) = token.project_id {
            session = session.with_project_id(project_id);
        }
        if let Some(expires_at) = token.expires_at {
            session = session.with_expires_at(expires_at);
        }
        Ok(session)
    }
}

#[async_trait]
impl IdentityValidator for IamValidator {
    fn name(&self) -> &str {
        "iam"
    }

    async fn validate(&self, config: &ClientConfig) -> Result<Session, ConfigValidationError> {
        if config.region.is_empty() {
            return Err(ConfigValidationError::MissingRegion);
        }
        let method = config
            .auth_method()
            .ok_or(ConfigValidationError::MissingCredentials)?;

        let client =
            IamClient::with_timeout(&config.identity_endpoint, config.insecure, self.timeout)
                .map_err(|e| e.into_validation_error(config.insecure))?;

        tracing::info!("Authenticating against {} using {}", client.endpoint(), method);

        match method {
            AuthMethod::AkSk => self.validate_aksk(&client, config).await,
            AuthMethod::Password => self.validate_password(&client, config).await,
        }
    }
}
