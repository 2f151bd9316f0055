use anyhow::{anyhow, Context as _, Result};
use colored::*;
use entities::EntityType;
use search::{SearchAggregator, SearchSession, SearchState};
use serde_json::json;

use super::{Context, Outcome};

/// Execute the search command
pub async fn execute(
    ctx: &Context,
    query: &str,
    page: u32,
    page_size: Option<u32>,
    entity_type: Option<String>,
) -> Result<Outcome> {
    let filter = entity_type
        .map(|t| t.parse::<EntityType>())
        .transpose()
        .map_err(|e| anyhow!("{}", e))?;

    // One-shot lookup: `submit` dispatches without waiting out a debounce window
    let session = SearchSession::new(SearchAggregator::new(ctx.api.clone()))
        .with_page_size(page_size.unwrap_or(ctx.config.search.page_size));
    session
        .submit(query, page)
        .await
        .with_context(|| format!("Search for '{}' failed", query))?;
    session.set_filter(filter);

    let state = session.state();
    if ctx.json() {
        println!("{}", serde_json::to_string_pretty(&search_json(ctx, &state))?);
    } else {
        print_search_text(ctx, &state);
    }
    Ok(Outcome::Done)
}

fn search_json(ctx: &Context, state: &SearchState) -> serde_json::Value {
    let language = ctx.language();
    let facets: Vec<_> = state
        .facets()
        .into_iter()
        .map(|f| {
            json!({
                "entityType": f.entity_type,
                "count": f.count,
                "label": f.label.resolve(language),
            })
        })
        .collect();
    let results: Vec<_> = state
        .visible_results()
        .into_iter()
        .map(|r| {
            json!({
                "id": r.id,
                "entityType": r.entity_type,
                "title": r.title(language),
                "summary": r.summary(language),
                "route": r.navigation_route,
                "createdAt": r.created_at().map(|t| t.to_rfc3339()),
            })
        })
        .collect();

    json!({
        "query": state.query,
        "filter": state.active_filter,
        "pagination": state.response.as_ref().map(|r| r.pagination),
        "totalResults": state.response.as_ref().map_or(0, |r| r.metadata.total_results),
        "facets": facets,
        "results": results,
    })
}

fn print_search_text(ctx: &Context, state: &SearchState) {
    let language = ctx.language();
    println!("{}", format!("=== Search: \"{}\" ===", state.query).bold());

    let Some(response) = &state.response else {
        return;
    };
    if response.all_results.is_empty() {
        println!("{}", "No results".yellow());
        return;
    }

    println!(
        "{} results, page {}/{} ({} ms)",
        response.metadata.total_results,
        response.pagination.current_page,
        response.pagination.pages_count,
        response.metadata.execution_time_ms
    );

    let facets: Vec<String> = state
        .facets()
        .iter()
        .map(|f| {
            let label = format!("{} ({})", f.label.resolve(language), f.count);
            if state.active_filter == Some(f.entity_type) {
                label.green().bold().to_string()
            } else {
                label
            }
        })
        .collect();
    println!("{} {}", "Types:".bold(), facets.join(" | "));
    println!("{}", "─".repeat(50));

    for result in state.visible_results() {
        println!(
            "{} {}",
            format!("[{}]", result.entity_type.label().resolve(language)).cyan(),
            result.title(language).bold()
        );
        let summary = result.summary(language);
        if !summary.is_empty() {
            println!("    {}", content::truncate_with_ellipsis(&summary, 120));
        }
        if let Some(route) = &result.navigation_route {
            println!("    {}", route.green());
        }
    }
}
