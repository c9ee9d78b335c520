//! Provider configuration schema
//!
//! Describes each configuration input: its environment variable, default,
//! sensitivity and the fields it must be supplied together with.

use crate::error::Result;
use serde::Serialize;

/// Default identity endpoint for the Moscow region
pub const DEFAULT_AUTH_URL: &str = "https://iam.ru-moscow-1.hc.sbercloud.ru/v3";

/// Region suggested to interactive hosts when none is configured
pub const SUGGESTED_REGION: &str = "ru-moscow-1";

/// A provider configuration input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    AccessKey,
    SecretKey,
    AuthUrl,
    Region,
    UserName,
    ProjectName,
    Password,
    AccountName,
    Insecure,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::AccessKey,
        Field::SecretKey,
        Field::AuthUrl,
        Field::Region,
        Field::UserName,
        Field::ProjectName,
        Field::Password,
        Field::AccountName,
        Field::Insecure,
    ];

    /// Schema key of the field
    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// Environment variable consulted when no explicit value is given
    pub fn env_var(self) -> &'static str {
        self.spec().env_var
    }

    pub fn spec(self) -> &'static FieldSpec {
        // SCHEMA is laid out in declaration order
        &SCHEMA[self as usize]
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Value type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    String,
    Bool,
}

/// Schema entry for one input
#[derive(Debug, Clone, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub env_var: &'static str,
    /// Hardcoded fallback after the environment; `None` means absent
    pub default: Option<&'static str>,
    pub required: bool,
    /// Never logged or printed
    pub sensitive: bool,
    /// Fields that must be present whenever this one is
    pub required_with: &'static [Field],
    /// Prompt hint for interactive hosts; never applied automatically
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_default: Option<&'static str>,
    pub description: &'static str,
}

pub static SCHEMA: [FieldSpec; 9] = [
    FieldSpec {
        name: "access_key",
        kind: FieldKind::String,
        env_var: "SBC_ACCESS_KEY",
        default: None,
        required: false,
        sensitive: false,
        required_with: &[Field::SecretKey],
        input_default: None,
        description: "The access key for API operations.",
    },
    FieldSpec {
        name: "secret_key",
        kind: FieldKind::String,
        env_var: "SBC_SECRET_KEY",
        default: None,
        required: false,
        sensitive: true,
        required_with: &[Field::AccessKey],
        input_default: None,
        description: "The secret key for API operations.",
    },
    FieldSpec {
        name: "auth_url",
        kind: FieldKind::String,
        env_var: "SBC_AUTH_URL",
        default: Some(DEFAULT_AUTH_URL),
        required: false,
        sensitive: false,
        required_with: &[],
        input_default: None,
        description: "The Identity authentication URL.",
    },
    FieldSpec {
        name: "region",
        kind: FieldKind::String,
        env_var: "SBC_REGION_NAME",
        default: None,
        required: true,
        sensitive: false,
        required_with: &[],
        input_default: Some(SUGGESTED_REGION),
        description: "The SberCloud region to connect to.",
    },
    FieldSpec {
        name: "user_name",
        kind: FieldKind::String,
        env_var: "SBC_USERNAME",
        default: None,
        required: false,
        sensitive: false,
        required_with: &[Field::Password, Field::AccountName],
        input_default: None,
        description: "Username to login with.",
    },
    FieldSpec {
        name: "project_name",
        kind: FieldKind::String,
        env_var: "SBC_PROJECT_NAME",
        default: None,
        required: false,
        sensitive: false,
        required_with: &[],
        input_default: None,
        description: "The name of the Project to login with.",
    },
    FieldSpec {
        name: "password",
        kind: FieldKind::String,
        env_var: "SBC_PASSWORD",
        default: None,
        required: false,
        sensitive: true,
        required_with: &[Field::UserName, Field::AccountName],
        input_default: None,
        description: "Password to login with.",
    },
    FieldSpec {
        name: "account_name",
        kind: FieldKind::String,
        env_var: "SBC_ACCOUNT_NAME",
        default: None,
        required: false,
        sensitive: false,
        required_with: &[Field::Password, Field::UserName],
        input_default: None,
        description: "The name of the Account to login with.",
    },
    FieldSpec {
        name: "insecure",
        kind: FieldKind::Bool,
        env_var: "SBC_INSECURE",
        default: Some("false"),
        required: false,
        sensitive: false,
        required_with: &[],
        input_default: None,
        description: "Trust self-signed certificates.",
    },
];

/// Parses a boolean the way the host's configuration layer does
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Serialises the whole schema as pretty JSON
pub fn schema_json() -> Result<String> {
    Ok(serde_json::to_string_pretty(&SCHEMA[..])?)
}
