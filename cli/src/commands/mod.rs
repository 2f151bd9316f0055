use anyhow::{anyhow, Result};
use api_client::ContentApi;
use colored::*;
use fields::{Language, Settings, SettingsHandle, Theme};
use navigation::{find_domain, DomainTree};
use serde_json::json;
use std::sync::Arc;

use crate::utils::portal_config::PortalConfig;

pub mod config;
pub mod health;
pub mod list;
pub mod search;
pub mod show;

/// How a command ended, mapped to the process exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    NotFound,
}

/// Shared state handed to every command
pub struct Context {
    pub config: PortalConfig,
    pub api: Arc<dyn ContentApi>,
    pub settings: SettingsHandle,
    pub format: String,
}

impl Context {
    pub fn new(config: PortalConfig, api: Arc<dyn ContentApi>, format: String) -> Self {
        let settings = SettingsHandle::new(Settings {
            language: config.language,
            theme: Theme::default(),
        });
        Self {
            config,
            api,
            settings,
            format,
        }
    }

    pub fn language(&self) -> Language {
        self.settings.language()
    }

    pub fn json(&self) -> bool {
        self.format == "json"
    }

    pub fn domain(&self, id: &str) -> Result<&DomainTree> {
        find_domain(&self.config.domains, id).map_err(|_| {
            let known: Vec<&str> = self.config.domains.iter().map(|d| d.id.as_str()).collect();
            anyhow!("Unknown domain '{}' (known: {})", id, known.join(", "))
        })
    }
}

/// Report a path that did not resolve
pub fn report_not_found(ctx: &Context, level: usize, slug: &str, back_href: &str) -> Result<Outcome> {
    if ctx.json() {
        let body = json!({
            "status": "not_found",
            "level": level,
            "slug": slug,
            "back": back_href,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        let message = match ctx.language() {
            Language::Ar => format!("لم يتم العثور على \"{}\"", slug),
            Language::En => format!("Nothing matches \"{}\"", slug),
        };
        eprintln!("{} {}", "Not found:".yellow().bold(), message);
        eprintln!("  {} {}", "Back to:".bold(), back_href.cyan());
    }
    Ok(Outcome::NotFound)
}
