use crate::inputs::InputArgs;
use sbercloud_provider::{ProcessEnv, resolve};

/// Print the resolved client configuration as JSON; secrets are reduced to flags
pub fn handle(inputs: InputArgs, host_version: Option<String>) -> anyhow::Result<()> {
    let inputs = inputs.into_provider_inputs()?;
    let config = resolve(&inputs, &ProcessEnv)?.into_client_config(host_version.as_deref());

    println!("{}", serde_json::to_string_pretty(&config.summary())?);
    Ok(())
}
