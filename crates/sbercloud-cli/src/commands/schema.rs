use colored::Colorize;
use sbercloud_provider::SCHEMA;
use sbercloud_provider::schema::schema_json;

pub fn handle(json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", schema_json()?);
        return Ok(());
    }

    for spec in SCHEMA.iter() {
        let mut flags = Vec::new();
        if spec.required {
            flags.push("required".to_string());
        }
        if spec.sensitive {
            flags.push("sensitive".to_string());
        }
        if let Some(default) = spec.default {
            flags.push(format!("default: {}", default));
        }
        if !spec.required_with.is_empty() {
            let with: Vec<_> = spec.required_with.iter().map(|f| f.name()).collect();
            flags.push(format!("with: {}", with.join(",")));
        }

        println!(
            "{} ({}) [{}]",
            spec.name.cyan().bold(),
            spec.env_var,
            flags.join("; ")
        );
        println!("    {}", spec.description);
    }
    Ok(())
}
