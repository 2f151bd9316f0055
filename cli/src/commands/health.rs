use anyhow::Result;
use api_client::ApiError;
use colored::*;
use serde_json::json;

use super::{Context, Outcome};

/// Execute the health check command
pub async fn execute(ctx: &Context) -> Result<Outcome> {
    let health_status = check_health(ctx).await;

    if ctx.json() {
        println!("{}", serde_json::to_string_pretty(&health_status)?);
    } else {
        print_health_status_text(&health_status);
    }

    Ok(Outcome::Done)
}

/// Check the configuration and the backend
async fn check_health(ctx: &Context) -> serde_json::Value {
    let mut status = json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "components": {
            "configuration": check_configuration(ctx),
            "backend": check_backend(ctx).await,
        }
    });

    let all_healthy = status["components"]
        .as_object()
        .map(|components| {
            components
                .values()
                .all(|v| v["status"].as_str() == Some("healthy"))
        })
        .unwrap_or(false);

    if !all_healthy {
        status["status"] = json!("degraded");
    }

    status
}

fn check_configuration(ctx: &Context) -> serde_json::Value {
    let domains: Vec<&str> = ctx.config.domains.iter().map(|d| d.id.as_str()).collect();
    json!({
        "status": "healthy",
        "message": format!("{} domain(s) configured", domains.len()),
        "domains": domains,
        "language": ctx.language().code(),
    })
}

async fn check_backend(ctx: &Context) -> serde_json::Value {
    let endpoint = ctx.config.api.base_url.clone();
    match ctx.api.health().await {
        Ok(()) => json!({
            "status": "healthy",
            "message": "Backend is running and responsive",
            "endpoint": endpoint,
        }),
        Err(ApiError::Http { status, .. }) => json!({
            "status": "unhealthy",
            "message": format!("Backend returned status: {}", status),
            "endpoint": endpoint,
        }),
        Err(e) => json!({
            "status": "offline",
            "message": format!("Backend is not reachable: {}", e),
            "endpoint": endpoint,
        }),
    }
}

/// Print health status in a formatted text output
fn print_health_status_text(status: &serde_json::Value) {
    println!("{}", "=== Amn Portal Health Check ===".bold());
    println!();

    let overall_status = status["status"].as_str().unwrap_or("unknown");
    let status_display = match overall_status {
        "healthy" => "HEALTHY".green().bold(),
        "degraded" => "DEGRADED".yellow().bold(),
        _ => "UNKNOWN".white().bold(),
    };

    println!("Overall Status: {}", status_display);
    println!("Timestamp: {}", status["timestamp"].as_str().unwrap_or(""));
    println!();

    println!("{}", "Components:".bold());
    println!("{}", "─".repeat(50));

    if let Some(components) = status["components"].as_object() {
        for (name, component) in components {
            let comp_status = component["status"].as_str().unwrap_or("unknown");
            let status_icon = match comp_status {
                "healthy" => "✓".green(),
                "unhealthy" => "✗".red(),
                "offline" => "○".white(),
                _ => "?".white(),
            };

            println!(
                "{} {:<15} {}",
                status_icon,
                name.bold(),
                component["message"].as_str().unwrap_or("")
            );
            if let Some(endpoint) = component["endpoint"].as_str() {
                println!("  {:<15} {}", "", endpoint.dimmed());
            }
        }
    }
}
