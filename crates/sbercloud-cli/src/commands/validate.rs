use crate::inputs::InputArgs;
use colored::Colorize;
use sbercloud_iam::IamValidator;
use sbercloud_provider::{NamedLocks, ProcessEnv, Provider};
use std::sync::Arc;

pub async fn handle(inputs: InputArgs, host_version: Option<String>) -> anyhow::Result<()> {
    let inputs = inputs.into_provider_inputs()?;

    let mut provider = Provider::new(IamValidator::new(), Arc::new(NamedLocks::new()));
    if let Some(version) = host_version {
        provider = provider.with_host_version(version);
    }

    println!("{}", "Validating provider configuration...".blue());
    let context = provider.configure(&inputs, &ProcessEnv).await?;

    println!("{}", "✓ Provider configuration is valid".green().bold());
    println!();
    println!("  Region:     {}", context.config.region.cyan());
    println!("  Project:    {}", context.config.tenant_name.cyan());
    println!("  Endpoint:   {}", context.config.identity_endpoint);
    println!("  Auth:       {}", context.session.auth_method);
    if let Some(project_id) = &context.session.project_id {
        println!("  Project ID: {}", project_id);
    }
    if let Some(expires_at) = context.session.expires_at {
        println!("  Expires:    {}", expires_at.to_rfc3339());
    }
    if context.config.insecure {
        println!("  {}", "TLS certificate verification is disabled".yellow());
    }
    Ok(())
}
