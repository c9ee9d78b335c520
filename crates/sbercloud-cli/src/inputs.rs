//! Command-line provider inputs
//!
//! Flags are layered over an optional YAML provider block. Environment
//! variables are not read here; the resolver consults them for whatever
//! is still unset.

use anyhow::Context;
use clap::Args;
use sbercloud_provider::ProviderInputs;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub struct InputArgs {
    /// YAML file holding a provider block keyed by field name
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub access_key: Option<String>,

    #[arg(long)]
    pub secret_key: Option<String>,

    /// Identity endpoint
    #[arg(long)]
    pub auth_url: Option<String>,

    #[arg(short, long)]
    pub region: Option<String>,

    #[arg(long)]
    pub user_name: Option<String>,

    /// Defaults to the region when unset
    #[arg(long)]
    pub project_name: Option<String>,

    #[arg(long)]
    pub password: Option<String>,

    /// Account (domain) name for password login
    #[arg(long)]
    pub account_name: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub insecure: Option<bool>,
}

impl InputArgs {
    /// File values first, then flags on top
    pub fn into_provider_inputs(self) -> anyhow::Result<ProviderInputs> {
        let base = match &self.config {
            Some(path) => ProviderInputs::from_yaml_file(path)
                .with_context(|| format!("Failed to load provider config {}", path.display()))?,
            None => ProviderInputs::new(),
        };

        let flags = ProviderInputs {
            access_key: self.access_key,
            secret_key: self.secret_key,
            auth_url: self.auth_url,
            region: self.region,
            user_name: self.user_name,
            project_name: self.project_name,
            password: self.password,
            account_name: self.account_name,
            insecure: self.insecure,
        };

        let inputs = base.merge(flags);
        tracing::debug!(?inputs, "Gathered provider inputs");
        Ok(inputs)
    }
}
