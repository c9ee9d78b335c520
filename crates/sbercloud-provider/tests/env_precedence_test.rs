//! Resolution against the real process environment
//!
//! Variables are scoped to each test with `temp_env`.

use sbercloud_provider::{
    DEFAULT_AUTH_URL, Field, ProcessEnv, ProviderError, ProviderInputs, resolve,
};

/// Every SBC_* variable unset, plus the given overrides
fn sbc_vars(
    overrides: &[(&'static str, &'static str)],
) -> Vec<(&'static str, Option<&'static str>)> {
    Field::ALL
        .iter()
        .map(|f| {
            let value = overrides
                .iter()
                .find(|(k, _)| *k == f.env_var())
                .map(|(_, v)| *v);
            (f.env_var(), value)
        })
        .collect()
}

#[test]
fn test_env_supplies_missing_fields() {
    temp_env::with_vars(
        sbc_vars(&[
            ("SBC_REGION_NAME", "ru-moscow-1"),
            ("SBC_ACCESS_KEY", "AK-ENV"),
            ("SBC_SECRET_KEY", "SK-ENV"),
        ]),
        || {
            let config = resolve(&ProviderInputs::new(), &ProcessEnv)
                .unwrap()
                .into_client_config(None);

            assert_eq!(config.region, "ru-moscow-1");
            assert_eq!(config.tenant_name, "ru-moscow-1");
            assert_eq!(config.access_key.as_deref(), Some("AK-ENV"));
            assert_eq!(config.identity_endpoint, DEFAULT_AUTH_URL);
        },
    );
}

#[test]
fn test_explicit_values_win_over_env() {
    temp_env::with_vars(
        sbc_vars(&[
            ("SBC_REGION_NAME", "env-region"),
            ("SBC_PROJECT_NAME", "env-project"),
            ("SBC_AUTH_URL", "https://iam.env.example/v3"),
            ("SBC_INSECURE", "true"),
        ]),
        || {
            let inputs = ProviderInputs {
                region: Some("ru-moscow-1".to_string()),
                project_name: Some("proj-a".to_string()),
                auth_url: Some("https://iam.explicit.example/v3".to_string()),
                insecure: Some(false),
                ..Default::default()
            };
            let config = resolve(&inputs, &ProcessEnv).unwrap().into_client_config(None);

            assert_eq!(config.region, "ru-moscow-1");
            assert_eq!(config.tenant_name, "proj-a");
            assert_eq!(config.identity_endpoint, "https://iam.explicit.example/v3");
            assert!(!config.insecure);
        },
    );
}

#[test]
fn test_empty_env_project_name_falls_back_to_region() {
    temp_env::with_vars(
        sbc_vars(&[("SBC_REGION_NAME", "ru-moscow-1"), ("SBC_PROJECT_NAME", "")]),
        || {
            let config = resolve(&ProviderInputs::new(), &ProcessEnv)
                .unwrap()
                .into_client_config(None);
            assert_eq!(config.tenant_name, "ru-moscow-1");
        },
    );
}

#[test]
fn test_insecure_from_env() {
    temp_env::with_vars(sbc_vars(&[("SBC_INSECURE", "true")]), || {
        let config = resolve(&ProviderInputs::new(), &ProcessEnv).unwrap();
        assert!(config.insecure);
    });

    temp_env::with_vars(sbc_vars(&[]), || {
        let config = resolve(&ProviderInputs::new(), &ProcessEnv).unwrap();
        assert!(!config.insecure);
    });
}

#[test]
fn test_env_completes_password_triple() {
    temp_env::with_vars(
        sbc_vars(&[("SBC_PASSWORD", "from-env"), ("SBC_ACCOUNT_NAME", "acme")]),
        || {
            let inputs = ProviderInputs {
                region: Some("ru-moscow-1".to_string()),
                user_name: Some("alice".to_string()),
                ..Default::default()
            };
            let config = resolve(&inputs, &ProcessEnv).unwrap().into_client_config(None);
            assert_eq!(config.domain_name.as_deref(), Some("acme"));
        },
    );
}

#[test]
fn test_env_half_pair_is_rejected() {
    temp_env::with_vars(sbc_vars(&[("SBC_SECRET_KEY", "SK-ENV")]), || {
        match resolve(&ProviderInputs::new(), &ProcessEnv) {
            Err(ProviderError::InvalidInput(errors)) => {
                assert!(errors.has_field("secret_key"));
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    });
}
