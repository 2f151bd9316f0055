use anyhow::{bail, Result};
use colored::*;
use content::MediaBlock;
use navigation::{DetailController, DetailState, DetailView, PlainTextSanitizer};

use super::{report_not_found, Context, Outcome};

/// Execute the show command: resolve a detail path and print the page
pub async fn execute(ctx: &Context, domain_id: &str, slugs: Vec<String>) -> Result<Outcome> {
    let domain = ctx.domain(domain_id)?;
    let controller = DetailController::new(ctx.api.clone(), domain.clone())
        .with_ancestor_page_size(ctx.config.listing.ancestor_page_size);

    match controller.resolve(slugs).await? {
        DetailState::Ready(detail) => {
            let view = detail.view(ctx.language(), &PlainTextSanitizer, &ctx.config.site);
            if ctx.json() {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print_view_text(&view);
            }
            Ok(Outcome::Done)
        }
        DetailState::NotFound {
            level,
            slug,
            back_href,
        } => report_not_found(ctx, level, &slug, &back_href),
        DetailState::Error { level, message } => {
            bail!("Failed to resolve level {}: {}", level, message)
        }
        other => bail!("Path resolution stopped early: {:?}", other),
    }
}

fn print_view_text(view: &DetailView) {
    let trail: Vec<String> = view.breadcrumbs.iter().map(|b| b.label.clone()).collect();
    println!("{}", trail.join(" › ").dimmed());
    println!();
    println!("{}", view.title.bold());
    if !view.summary.is_empty() {
        println!("{}", view.summary.italic());
    }
    if !view.body.is_empty() {
        println!();
        println!("{}", view.body);
    }

    if !view.media.is_empty() {
        println!();
        for media in &view.media {
            let (kind, url) = match media {
                MediaBlock::Image(url) => ("Image", url),
                MediaBlock::Video(url) => ("Video", url),
                MediaBlock::Document(url) => ("Document", url),
            };
            println!("{} {}", format!("{}:", kind).bold(), url.cyan());
        }
    }

    println!();
    println!("{} {}", "Link:".bold(), view.share_url.green());
}
