use anyhow::{Result, bail};
use colored::Colorize;
use servio_application::{DiscoveryPage, PageStatus};
use servio_core::serviceman::{ServicemanBackend, ServicemanFilters, SortKey};
use servio_interaction::HttpBackend;
use std::sync::Arc;

use super::AppContext;
use super::render;

pub fn listing_filters(
    category: Option<u64>,
    available: bool,
    min_rating: Option<f64>,
    ordering: Option<SortKey>,
) -> ServicemanFilters {
    ServicemanFilters {
        category,
        is_available: available.then_some(true),
        min_rating,
        ordering,
    }
}

pub async fn listing(
    ctx: &AppContext,
    backend: Arc<HttpBackend>,
    filters: ServicemanFilters,
    query: Option<String>,
    sort: Option<SortKey>,
) -> Result<()> {
    let page = open_page(ctx, backend, query, sort).await;
    let status = page.load_listing(filters).await;
    ensure_ready(&status)?;

    let query = page.query().await;
    render::print_view("Servicemen", &query, &page.view().await);
    Ok(())
}

pub async fn category(
    ctx: &AppContext,
    backend: Arc<HttpBackend>,
    category_id: u64,
    query: Option<String>,
    sort: Option<SortKey>,
) -> Result<()> {
    let page = open_page(ctx, backend.clone(), query, sort).await;
    let (header, status) = tokio::join!(
        backend.category(category_id),
        page.load_category(category_id)
    );
    ensure_ready(&status)?;

    let title = match header {
        Ok(category) => category.name,
        Err(e) => {
            tracing::warn!("Could not load category {}: {}", category_id, e);
            format!("Category {category_id}")
        }
    };

    let query = page.query().await;
    render::print_view(&title, &query, &page.view().await);
    Ok(())
}

pub async fn categories(backend: Arc<HttpBackend>) -> Result<()> {
    let categories = backend.list_categories().await?;
    if categories.is_empty() {
        println!("{}", "No categories yet.".yellow());
        return Ok(());
    }

    for category in &categories {
        println!("{}", render::category_line(category));
    }
    Ok(())
}

async fn open_page(
    ctx: &AppContext,
    backend: Arc<HttpBackend>,
    query: Option<String>,
    sort: Option<SortKey>,
) -> DiscoveryPage {
    let page = DiscoveryPage::with_sort(
        backend,
        sort.unwrap_or(ctx.config.discovery.default_sort),
    );
    if let Some(text) = query {
        page.set_query(text).await;
    }
    page
}

fn ensure_ready(status: &PageStatus) -> Result<()> {
    match status {
        PageStatus::Errored { message } => {
            eprintln!("{}", message.red());
            bail!("Loading servicemen failed; run the command again to retry");
        }
        _ => Ok(()),
    }
}
