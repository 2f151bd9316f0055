use anyhow::{bail, Context as _, Result};
use api_client::ParentRef;
use colored::*;
use content::{ContentNode, RoutePath, Sluggable};
use navigation::{DetailController, DetailState, ListByParent, ListParams, ListState};
use serde_json::json;

use super::{report_not_found, Context, Outcome};

/// Execute the list command: the children of a domain root or of a resolved path
pub async fn execute(
    ctx: &Context,
    domain_id: &str,
    slugs: Vec<String>,
    page: u32,
    query: Option<String>,
) -> Result<Outcome> {
    let domain = ctx.domain(domain_id)?;
    let language = ctx.language();

    let (collection, params, route, heading) = if slugs.is_empty() {
        let Some(collection) = domain.collection(0) else {
            bail!("Domain '{}' has no levels", domain.id);
        };
        (
            collection.to_string(),
            ListParams::new(ParentRef::Root),
            domain.root(),
            domain.title.resolve(language),
        )
    } else {
        let controller = DetailController::new(ctx.api.clone(), domain.clone())
            .with_ancestor_page_size(ctx.config.listing.ancestor_page_size)
            .with_body_fetch(false);
        match controller.resolve(slugs).await? {
            DetailState::Ready(detail) => {
                let (Some(collection), Some(params)) =
                    (detail.child_collection(), detail.child_params())
                else {
                    bail!("{} has no children to list", detail.route);
                };
                (
                    collection.to_string(),
                    params,
                    detail.route.clone(),
                    detail.node.title(language),
                )
            }
            DetailState::NotFound {
                level,
                slug,
                back_href,
            } => return report_not_found(ctx, level, &slug, &back_href),
            DetailState::Error { level, message } => {
                bail!("Failed to resolve level {}: {}", level, message)
            }
            other => bail!("Path resolution stopped early: {:?}", other),
        }
    };

    let list = ListByParent::new(ctx.api.clone(), collection);
    list.load(
        params
            .page(page)
            .page_size(ctx.config.listing.page_size)
            .query(query),
    )
    .await
    .with_context(|| format!("Failed to list {}", list.collection()))?;

    let state = list.state();
    if ctx.json() {
        println!("{}", serde_json::to_string_pretty(&list_json(ctx, &state, &route))?);
    } else {
        print_list_text(ctx, &state, &route, &heading);
    }
    Ok(Outcome::Done)
}

fn item_href(route: &RoutePath, item: &ContentNode) -> String {
    route.child(item.slug()).href()
}

fn list_json(ctx: &Context, state: &ListState, route: &RoutePath) -> serde_json::Value {
    let language = ctx.language();
    let items: Vec<_> = state
        .items
        .iter()
        .map(|item| {
            json!({
                "id": item.id,
                "title": item.title(language),
                "summary": item.summary(language),
                "href": item_href(route, item),
            })
        })
        .collect();

    json!({
        "route": route.href(),
        "pagination": state.pagination,
        "items": items,
    })
}

fn print_list_text(ctx: &Context, state: &ListState, route: &RoutePath, heading: &str) {
    let language = ctx.language();
    println!("{}", format!("=== {} ===", heading).bold());
    println!("{}", route.href().dimmed());
    println!();

    if state.items.is_empty() {
        println!("{}", "Nothing to show".yellow());
        return;
    }

    for item in &state.items {
        println!("{}", item.title(language).bold());
        let summary = item.summary(language);
        if !summary.is_empty() {
            println!("    {}", content::truncate_with_ellipsis(&summary, 120));
        }
        println!("    {}", item_href(route, item).green());
    }

    let pagination = &state.pagination;
    println!();
    println!(
        "Page {}/{} ({} items)",
        pagination.current_page, pagination.pages_count, pagination.items_count
    );
    if pagination.has_next() {
        println!(
            "{}",
            format!("Next: --page {}", pagination.current_page + 1).dimmed()
        );
    }
}
