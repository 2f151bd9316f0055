use anyhow::{anyhow, Result};
use colored::*;

use crate::utils::portal_config::PortalConfig;

/// Print the effective configuration
pub fn list(config: &PortalConfig, format: &str) -> Result<()> {
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(config)?),
        "yaml" => println!("{}", serde_yaml::to_string(config)?),
        _ => print_config_text(&serde_yaml::to_value(config)?),
    }
    Ok(())
}

/// Print one value of the effective configuration, e.g. `api.base_url`
pub fn get(config: &PortalConfig, section: &str, format: &str) -> Result<()> {
    let root = serde_yaml::to_value(config)?;
    let parts: Vec<&str> = section.split('.').filter(|p| !p.is_empty()).collect();
    let value = navigate_config_path(&root, &parts)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&value)?),
        "yaml" => println!("{}", serde_yaml::to_string(&value)?),
        _ => print_config_value(section, &value),
    }
    Ok(())
}

/// Follow a dotted path through mappings and sequences (numeric keys)
fn navigate_config_path(root: &serde_yaml::Value, path: &[&str]) -> Result<serde_yaml::Value> {
    if path.is_empty() {
        return Err(anyhow!("Empty configuration path"));
    }

    let mut current = root;
    for (i, &key) in path.iter().enumerate() {
        current = match current {
            serde_yaml::Value::Mapping(map) => map
                .get(serde_yaml::Value::String(key.to_string()))
                .ok_or_else(|| anyhow!("Configuration key '{}' not found", path[..=i].join(".")))?,
            serde_yaml::Value::Sequence(seq) => key
                .parse::<usize>()
                .ok()
                .and_then(|index| seq.get(index))
                .ok_or_else(|| anyhow!("Configuration key '{}' not found", path[..=i].join(".")))?,
            _ => {
                return Err(anyhow!(
                    "Cannot navigate further from '{}': not a mapping",
                    path[..i].join(".")
                ))
            }
        };
    }

    Ok(current.clone())
}

fn print_config_text(root: &serde_yaml::Value) {
    println!("{}", "=== Amn Configuration ===".bold());
    println!();

    if let serde_yaml::Value::Mapping(sections) = root {
        for (name, values) in sections {
            if let serde_yaml::Value::String(name) = name {
                println!("{}", format!("[{}]", name).cyan().bold());
            }
            print_yaml_value(values, 1);
            println!();
        }
    }
}

fn print_config_value(path: &str, value: &serde_yaml::Value) {
    println!("{}: {}", "Path".bold(), path.cyan());
    println!("{}: {}", "Type".bold(), value_type_name(value).yellow());
    println!("{}:", "Value".bold());
    print_yaml_value(value, 1);
}

fn value_type_name(value: &serde_yaml::Value) -> &str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "boolean",
        serde_yaml::Value::Number(_) => "number",
        serde_yaml::Value::String(_) => "string",
        serde_yaml::Value::Sequence(_) => "array",
        serde_yaml::Value::Mapping(_) => "object",
        serde_yaml::Value::Tagged(_) => "tagged",
    }
}

fn print_yaml_value(value: &serde_yaml::Value, indent_level: usize) {
    let indent = "  ".repeat(indent_level);

    match value {
        serde_yaml::Value::Null => println!("{}null", indent),
        serde_yaml::Value::Bool(b) => println!("{}{}", indent, b.to_string().blue()),
        serde_yaml::Value::Number(n) => println!("{}{}", indent, n.to_string().magenta()),
        serde_yaml::Value::String(s) if s.contains('/') => println!("{}{}", indent, s.green()),
        serde_yaml::Value::String(s) => println!("{}{}", indent, s.yellow()),
        serde_yaml::Value::Sequence(seq) => {
            for item in seq {
                println!("{}-", indent);
                print_yaml_value(item, indent_level + 1);
            }
        }
        serde_yaml::Value::Mapping(map) => {
            for (key, val) in map {
                let key = key.as_str().map(str::to_string).unwrap_or_else(|| format!("{:?}", key));
                match val {
                    serde_yaml::Value::Sequence(_) | serde_yaml::Value::Mapping(_) => {
                        println!("{}{}:", indent, key.cyan());
                        print_yaml_value(val, indent_level + 1);
                    }
                    _ => {
                        print!("{}{}: ", indent, key.cyan());
                        print_yaml_value(val, 0);
                    }
                }
            }
        }
        serde_yaml::Value::Tagged(tagged) => {
            println!("{}!{}", indent, tagged.tag);
            print_yaml_value(&tagged.value, indent_level + 1);
        }
    }
}
