use anyhow::bail;
use colored::Colorize;
use sbercloud_provider::{RegisteredObject, Registry, Service};

pub fn handle(service: Option<&str>) -> anyhow::Result<()> {
    let registry = Registry::builtin();

    let objects: Vec<&RegisteredObject> = match service {
        Some(name) => {
            let Some(service) = Service::parse(name) else {
                bail!("Unknown service '{}': expected iam, vpc or dns", name);
            };
            registry.by_service(service)
        }
        None => {
            let mut all = registry.data_sources();
            all.extend(registry.resources());
            all
        }
    };

    for object in objects {
        println!(
            "{:<12} {:<40} {} ({})",
            object.kind.to_string().dimmed(),
            object.name.cyan(),
            object.upstream,
            object.service
        );
    }
    Ok(())
}
