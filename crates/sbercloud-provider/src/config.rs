//! Provider configuration resolution
//!
//! Each field is resolved through an ordered chain:
//! explicit value → environment variable → hardcoded default → absent.
//! Empty strings count as absent at every step. After all fields are
//! resolved, the mutual-presence preconditions are checked and the derived
//! client configuration is built.

use crate::env::EnvSource;
use crate::error::{FieldError, Result, ValidationErrors};
use crate::schema::{Field, parse_bool};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Cloud partition every SberCloud endpoint lives under
pub const CLOUD: &str = "hc.sbercloud.ru";

/// Stored when the host does not report its protocol version
pub const HOST_VERSION_PLACEHOLDER: &str = "0.11+compatible";

/// Explicit, possibly-absent provider inputs as supplied by the host
#[derive(Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderInputs {
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub auth_url: Option<String>,
    pub region: Option<String>,
    pub user_name: Option<String>,
    pub project_name: Option<String>,
    pub password: Option<String>,
    pub account_name: Option<String>,
    pub insecure: Option<bool>,
}

impl std::fmt::Debug for ProviderInputs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("ProviderInputs")
            .field("access_key", &self.access_key)
            .field("secret_key", &redact(&self.secret_key))
            .field("auth_url", &self.auth_url)
            .field("region", &self.region)
            .field("user_name", &self.user_name)
            .field("project_name", &self.project_name)
            .field("password", &redact(&self.password))
            .field("account_name", &self.account_name)
            .field("insecure", &self.insecure)
            .finish()
    }
}

impl ProviderInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a provider block from a YAML file keyed by field name
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Layer `overrides` on top of `self`; any value set in `overrides` wins
    pub fn merge(self, overrides: ProviderInputs) -> Self {
        Self {
            access_key: overrides.access_key.or(self.access_key),
            secret_key: overrides.secret_key.or(self.secret_key),
            auth_url: overrides.auth_url.or(self.auth_url),
            region: overrides.region.or(self.region),
            user_name: overrides.user_name.or(self.user_name),
            project_name: overrides.project_name.or(self.project_name),
            password: overrides.password.or(self.password),
            account_name: overrides.account_name.or(self.account_name),
            insecure: overrides.insecure.or(self.insecure),
        }
    }

    fn explicit_str(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::AccessKey => &self.access_key,
            Field::SecretKey => &self.secret_key,
            Field::AuthUrl => &self.auth_url,
            Field::Region => &self.region,
            Field::UserName => &self.user_name,
            Field::ProjectName => &self.project_name,
            Field::Password => &self.password,
            Field::AccountName => &self.account_name,
            Field::Insecure => return None,
        };
        value.as_deref()
    }
}

/// Inputs after per-field resolution and precondition checks
#[derive(Debug)]
pub struct ProviderConfiguration {
    pub access_key: Option<String>,
    pub secret_key: Option<SecretString>,
    pub auth_url: String,
    pub region: Option<String>,
    pub user_name: Option<String>,
    pub project_name: Option<String>,
    pub password: Option<SecretString>,
    pub account_name: Option<String>,
    pub insecure: bool,
}

impl ProviderConfiguration {
    /// Whether a field ended up with a value
    pub fn is_present(&self, field: Field) -> bool {
        match field {
            Field::AccessKey => self.access_key.is_some(),
            Field::SecretKey => self.secret_key.is_some(),
            Field::AuthUrl => true,
            Field::Region => self.region.is_some(),
            Field::UserName => self.user_name.is_some(),
            Field::ProjectName => self.project_name.is_some(),
            Field::Password => self.password.is_some(),
            Field::AccountName => self.account_name.is_some(),
            Field::Insecure => true,
        }
    }

    /// Mutual-presence preconditions over the resolved values
    fn required_with_errors(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for field in Field::ALL {
            let required_with = field.spec().required_with;
            if required_with.is_empty() || !self.is_present(field) {
                continue;
            }
            let missing: Vec<_> = required_with
                .iter()
                .filter(|other| !self.is_present(**other))
                .collect();
            if missing.is_empty() {
                continue;
            }
            let all: Vec<_> = std::iter::once(field.name())
                .chain(required_with.iter().map(|f| f.name()))
                .collect();
            errors.push(FieldError::new(
                field.name(),
                format!("all of `{}` must be specified", all.join(",")),
            ));
        }
        errors
    }

    /// Build the client configuration handed to the validator and resources
    ///
    /// An empty or missing project name falls back to the region.
    pub fn into_client_config(self, host_version: Option<&str>) -> ClientConfig {
        let region = self.region.unwrap_or_default();
        let tenant_name = match self.project_name {
            Some(project) if !project.is_empty() => project,
            _ => region.clone(),
        };
        let host_version = host_version
            .filter(|v| !v.is_empty())
            .unwrap_or(HOST_VERSION_PLACEHOLDER)
            .to_string();

        ClientConfig {
            access_key: self.access_key,
            secret_key: self.secret_key,
            domain_name: self.account_name,
            identity_endpoint: self.auth_url,
            insecure: self.insecure,
            password: self.password,
            region,
            tenant_name,
            username: self.user_name,
            host_version,
            cloud: CLOUD.to_string(),
            region_client: true,
        }
    }
}

/// Resolve every field and check the mutual-presence preconditions
///
/// Does not check `region`; its absence is reported by the validation step.
pub fn resolve(inputs: &ProviderInputs, env: &impl EnvSource) -> Result<ProviderConfiguration> {
    let mut errors = ValidationErrors::new();

    let insecure = match resolve_bool(inputs.insecure, Field::Insecure, env) {
        Ok(value) => value,
        Err(e) => {
            errors.push(e);
            false
        }
    };

    let config = ProviderConfiguration {
        access_key: resolve_str(inputs, Field::AccessKey, env),
        secret_key: resolve_str(inputs, Field::SecretKey, env).map(SecretString::from),
        auth_url: resolve_str(inputs, Field::AuthUrl, env).unwrap_or_default(),
        region: resolve_str(inputs, Field::Region, env),
        user_name: resolve_str(inputs, Field::UserName, env),
        project_name: resolve_str(inputs, Field::ProjectName, env),
        password: resolve_str(inputs, Field::Password, env).map(SecretString::from),
        account_name: resolve_str(inputs, Field::AccountName, env),
        insecure,
    };
    errors.extend(config.required_with_errors());
    errors.into_result()?;

    tracing::debug!(
        region = config.region.as_deref().unwrap_or(""),
        auth_url = %config.auth_url,
        insecure = config.insecure,
        "Resolved provider inputs"
    );
    Ok(config)
}

fn resolve_str(inputs: &ProviderInputs, field: Field, env: &impl EnvSource) -> Option<String> {
    let spec = field.spec();
    if let Some(value) = inputs.explicit_str(field).filter(|v| !v.is_empty()) {
        return Some(value.to_string());
    }
    if let Some(value) = env.var(spec.env_var).filter(|v| !v.is_empty()) {
        return Some(value);
    }
    spec.default.map(str::to_string)
}

fn resolve_bool(
    explicit: Option<bool>,
    field: Field,
    env: &impl EnvSource,
) -> std::result::Result<bool, FieldError> {
    let spec = field.spec();
    if let Some(value) = explicit {
        return Ok(value);
    }
    let raw = env
        .var(spec.env_var)
        .filter(|v| !v.is_empty())
        .or_else(|| spec.default.map(str::to_string));
    match raw {
        Some(raw) => parse_bool(&raw).ok_or_else(|| {
            FieldError::new(
                spec.name,
                format!("{} is not a valid boolean: {:?}", spec.env_var, raw),
            )
        }),
        None => Ok(false),
    }
}

/// The resolved configuration consumed by resource implementations
///
/// Immutable once built; share it behind an `Arc`.
#[derive(Debug)]
pub struct ClientConfig {
    pub access_key: Option<String>,
    pub secret_key: Option<SecretString>,
    /// Mapped from `account_name`
    pub domain_name: Option<String>,
    pub identity_endpoint: String,
    pub insecure: bool,
    pub password: Option<SecretString>,
    /// Empty when no region was supplied
    pub region: String,
    /// Project name, or the region when no project name was given
    pub tenant_name: String,
    pub username: Option<String>,
    pub host_version: String,
    pub cloud: String,
    /// Build per-region service clients
    pub region_client: bool,
}

/// How the validator authenticates against the identity endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    /// Request signing with an access key / secret key pair
    AkSk,
    /// Username / password / account token request
    Password,
}

impl std::fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthMethod::AkSk => write!(f, "aksk"),
            AuthMethod::Password => write!(f, "password"),
        }
    }
}

impl ClientConfig {
    /// AK/SK takes priority over a password when both are configured
    pub fn auth_method(&self) -> Option<AuthMethod> {
        if self.access_key.is_some() && self.secret_key.is_some() {
            Some(AuthMethod::AkSk)
        } else if self.username.is_some() && self.password.is_some() {
            Some(AuthMethod::Password)
        } else {
            None
        }
    }

    /// Base URL of a regional service, e.g. `https://vpc.ru-moscow-1.hc.sbercloud.ru/`
    pub fn service_endpoint(&self, service: &str) -> String {
        if self.region_client && !self.region.is_empty() {
            format!("https://{}.{}.{}/", service, self.region, self.cloud)
        } else {
            format!("https://{}.{}/", service, self.cloud)
        }
    }

    /// Non-secret view for display and diagnostics
    pub fn summary(&self) -> ConfigSummary {
        ConfigSummary {
            identity_endpoint: self.identity_endpoint.clone(),
            region: self.region.clone(),
            tenant_name: self.tenant_name.clone(),
            domain_name: self.domain_name.clone(),
            username: self.username.clone(),
            access_key: self.access_key.clone(),
            has_secret_key: self.secret_key.is_some(),
            has_password: self
                .password
                .as_ref()
                .is_some_and(|p| !p.expose_secret().is_empty()),
            auth_method: self.auth_method(),
            insecure: self.insecure,
            cloud: self.cloud.clone(),
            region_client: self.region_client,
            host_version: self.host_version.clone(),
        }
    }
}

/// Printable configuration with secrets reduced to presence flags
#[derive(Debug, Clone, Serialize)]
pub struct ConfigSummary {
    pub identity_endpoint: String,
    pub region: String,
    pub tenant_name: String,
    pub domain_name: Option<String>,
    pub username: Option<String>,
    pub access_key: Option<String>,
    pub has_secret_key: bool,
    pub has_password: bool,
    pub auth_method: Option<AuthMethod>,
    pub insecure: bool,
    pub cloud: String,
    pub region_client: bool,
    pub host_version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::schema::DEFAULT_AUTH_URL;
    use std::collections::HashMap;

    fn no_env() -> HashMap<&'static str, &'static str> {
        HashMap::new()
    }

    fn region_only(region: &str) -> ProviderInputs {
        ProviderInputs {
            region: Some(region.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_project_name_falls_back_to_region() {
        let inputs = ProviderInputs {
            region: Some("ru-moscow-1".to_string()),
            project_name: Some(String::new()),
            ..Default::default()
        };

        let config = resolve(&inputs, &no_env()).unwrap().into_client_config(None);
        assert_eq!(config.tenant_name, "ru-moscow-1");
    }

    #[test]
    fn test_project_name_kept_when_set() {
        let inputs = ProviderInputs {
            region: Some("ru-moscow-1".to_string()),
            project_name: Some("proj-a".to_string()),
            ..Default::default()
        };

        let config = resolve(&inputs, &no_env()).unwrap().into_client_config(None);
        assert_eq!(config.tenant_name, "proj-a");
        assert_eq!(config.region, "ru-moscow-1");
    }

    #[test]
    fn test_project_name_from_env_overrides_region_fallback() {
        let env: HashMap<&str, &str> = [("SBC_PROJECT_NAME", "ru-moscow-1_team")]
            .into_iter()
            .collect();

        let config = resolve(&region_only("ru-moscow-1"), &env)
            .unwrap()
            .into_client_config(None);
        assert_eq!(config.tenant_name, "ru-moscow-1_team");
    }

    #[test]
    fn test_empty_auth_url_uses_default() {
        let inputs = ProviderInputs {
            auth_url: Some(String::new()),
            region: Some("r1".to_string()),
            ..Default::default()
        };

        let config = resolve(&inputs, &no_env()).unwrap();
        assert_eq!(config.auth_url, "https://iam.ru-moscow-1.hc.sbercloud.ru/v3");
        assert_eq!(config.auth_url, DEFAULT_AUTH_URL);
    }

    #[test]
    fn test_explicit_beats_env() {
        let env: HashMap<&str, &str> = [
            ("SBC_REGION_NAME", "env-region"),
            ("SBC_AUTH_URL", "https://iam.env.example/v3"),
            ("SBC_INSECURE", "true"),
        ]
        .into_iter()
        .collect();
        let inputs = ProviderInputs {
            region: Some("explicit-region".to_string()),
            auth_url: Some("https://iam.explicit.example/v3".to_string()),
            insecure: Some(false),
            ..Default::default()
        };

        let config = resolve(&inputs, &env).unwrap();
        assert_eq!(config.region.as_deref(), Some("explicit-region"));
        assert_eq!(config.auth_url, "https://iam.explicit.example/v3");
        assert!(!config.insecure);
    }

    #[test]
    fn test_env_beats_default() {
        let env: HashMap<&str, &str> = [
            ("SBC_AUTH_URL", "https://iam.env.example/v3"),
            ("SBC_INSECURE", "1"),
        ]
        .into_iter()
        .collect();

        let config = resolve(&ProviderInputs::new(), &env).unwrap();
        assert_eq!(config.auth_url, "https://iam.env.example/v3");
        assert!(config.insecure);
    }

    #[test]
    fn test_insecure_defaults_to_false() {
        let config = resolve(&ProviderInputs::new(), &no_env()).unwrap();
        assert!(!config.insecure);
    }

    #[test]
    fn test_invalid_insecure_env() {
        let env: HashMap<&str, &str> = [("SBC_INSECURE", "maybe")].into_iter().collect();

        match resolve(&ProviderInputs::new(), &env) {
            Err(ProviderError::InvalidInput(errors)) => {
                assert!(errors.has_field("insecure"));
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_region_is_not_a_resolution_error() {
        let config = resolve(&ProviderInputs::new(), &no_env()).unwrap();
        assert!(config.region.is_none());

        let client = config.into_client_config(None);
        assert_eq!(client.region, "");
        assert_eq!(client.tenant_name, "");
    }

    #[test]
    fn test_access_key_requires_secret_key() {
        let inputs = ProviderInputs {
            access_key: Some("AK".to_string()),
            ..region_only("ru-moscow-1")
        };

        match resolve(&inputs, &no_env()) {
            Err(ProviderError::InvalidInput(errors)) => {
                assert_eq!(errors.len(), 1);
                assert!(errors.has_field("access_key"));
                assert!(errors.to_string().contains("access_key,secret_key"));
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_secret_key_from_env_completes_pair() {
        let env: HashMap<&str, &str> = [("SBC_SECRET_KEY", "SK")].into_iter().collect();
        let inputs = ProviderInputs {
            access_key: Some("AK".to_string()),
            ..region_only("ru-moscow-1")
        };

        let config = resolve(&inputs, &env).unwrap().into_client_config(None);
        assert_eq!(config.auth_method(), Some(AuthMethod::AkSk));
        assert_eq!(
            config.secret_key.as_ref().map(|s| s.expose_secret().to_string()),
            Some("SK".to_string())
        );
    }

    #[test]
    fn test_password_triple_reports_every_missing_field() {
        let inputs = ProviderInputs {
            user_name: Some("alice".to_string()),
            ..region_only("ru-moscow-1")
        };

        match resolve(&inputs, &no_env()) {
            Err(ProviderError::InvalidInput(errors)) => {
                assert_eq!(errors.len(), 1);
                assert!(errors.has_field("user_name"));
                assert!(errors.to_string().contains("user_name,password,account_name"));
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }

        let inputs = ProviderInputs {
            user_name: Some("alice".to_string()),
            password: Some("secret".to_string()),
            ..region_only("ru-moscow-1")
        };
        match resolve(&inputs, &no_env()) {
            Err(ProviderError::InvalidInput(errors)) => {
                assert_eq!(errors.len(), 2);
                assert!(errors.has_field("user_name"));
                assert!(errors.has_field("password"));
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_complete_password_triple() {
        let inputs = ProviderInputs {
            user_name: Some("alice".to_string()),
            password: Some("secret".to_string()),
            account_name: Some("acme".to_string()),
            ..region_only("ru-moscow-1")
        };

        let config = resolve(&inputs, &no_env()).unwrap().into_client_config(None);
        assert_eq!(config.auth_method(), Some(AuthMethod::Password));
        assert_eq!(config.domain_name.as_deref(), Some("acme"));
        assert_eq!(config.username.as_deref(), Some("alice"));
    }

    #[test]
    fn test_derived_fields() {
        let config = resolve(&region_only("ru-moscow-1"), &no_env())
            .unwrap()
            .into_client_config(Some("1.5.7"));

        assert_eq!(config.cloud, "hc.sbercloud.ru");
        assert!(config.region_client);
        assert_eq!(config.host_version, "1.5.7");
        assert_eq!(config.auth_method(), None);
    }

    #[test]
    fn test_host_version_placeholder() {
        let config = resolve(&region_only("ru-moscow-1"), &no_env()).unwrap();
        assert_eq!(config.into_client_config(None).host_version, "0.11+compatible");

        let config = resolve(&region_only("ru-moscow-1"), &no_env()).unwrap();
        assert_eq!(config.into_client_config(Some("")).host_version, "0.11+compatible");
    }

    #[test]
    fn test_service_endpoint() {
        let config = resolve(&region_only("ru-moscow-1"), &no_env())
            .unwrap()
            .into_client_config(None);

        assert_eq!(
            config.service_endpoint("vpc"),
            "https://vpc.ru-moscow-1.hc.sbercloud.ru/"
        );
    }

    #[test]
    fn test_summary_hides_secrets() {
        let inputs = ProviderInputs {
            user_name: Some("alice".to_string()),
            password: Some("hunter2".to_string()),
            account_name: Some("acme".to_string()),
            ..region_only("ru-moscow-1")
        };
        let config = resolve(&inputs, &no_env()).unwrap().into_client_config(None);

        let json = serde_json::to_string(&config.summary()).unwrap();
        assert!(json.contains("\"has_password\":true"));
        assert!(!json.contains("hunter2"));
        assert!(!format!("{:?}", config).contains("hunter2"));
    }

    #[test]
    fn test_yaml_inputs_and_merge() {
        let file = ProviderInputs::from_yaml_str(
            "region: ru-moscow-1\nproject_name: from-file\ninsecure: true\n",
        )
        .unwrap();
        let flags = ProviderInputs {
            project_name: Some("from-flag".to_string()),
            ..Default::default()
        };

        let merged = file.merge(flags);
        assert_eq!(merged.region.as_deref(), Some("ru-moscow-1"));
        assert_eq!(merged.project_name.as_deref(), Some("from-flag"));
        assert_eq!(merged.insecure, Some(true));
    }

    #[test]
    fn test_yaml_rejects_unknown_field() {
        let result = ProviderInputs::from_yaml_str("regoin: ru-moscow-1\n");
        assert!(matches!(result, Err(ProviderError::Yaml(_))));
    }

    #[test]
    fn test_yaml_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("provider.yaml");
        std::fs::write(&path, "region: ru-moscow-1\naccount_name: acme\n").unwrap();

        let inputs = ProviderInputs::from_yaml_file(&path).unwrap();
        assert_eq!(inputs.account_name.as_deref(), Some("acme"));
        assert!(ProviderInputs::from_yaml_str("").unwrap().region.is_none());
    }
}
