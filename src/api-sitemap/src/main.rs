use axum::{middleware, routing::get};
use core_sitemap::{SitemapOptionsBuilder, SitemapRequest, server_addr, settings_from_env, setup_logging};
use data_model_sitemap::errors::CallbackError;
use data_model_sitemap::models::{EntryMeta, RouteDescriptor, RouteEntry, RouteSitemap, SITEMAP_CONFIG_KEY};
use serde_json::json;
use tower_http::trace::TraceLayer;

use api_sitemap::SitemapRouter;
use api_sitemap::routes::logging_middleware;

const SLUGS: [&str; 12] = [
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven", "twelve",
];

const FRUITS: [&str; 3] = ["apple", "banana", "cherry"];

/// Lists the concrete pages behind the demo's parameterized routes.
async fn demo_dynamic_routes(pattern: String, _request: SitemapRequest) -> Result<Vec<RouteEntry>, CallbackError> {
    let entries = match pattern.as_str() {
        "/blog/{slug}" => SLUGS.iter().map(|slug| RouteEntry::from(format!("/blog/slug-{}", slug))).collect(),
        "/handy/{fruits}" => FRUITS.iter().map(|fruit| RouteEntry::from(format!("/handy/{}", fruit))).collect(),
        _ => Vec::new(),
    };
    Ok(entries)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    setup_logging("api_sitemap=debug,core_sitemap=debug,route_sitemap=info,tower_http=debug")?;

    let mut settings = settings_from_env()?;
    if std::env::var("SITEMAP_MAX_PER_PAGE").is_err() {
        // Small pages so the sitemap index shows up with the demo routes.
        settings.max_per_page = 5;
    }
    let options = SitemapOptionsBuilder::from_settings(settings)
        .exclude_tag("private")
        .dynamic_routes(demo_dynamic_routes)
        .build()?;

    let app = SitemapRouter::new()
        .get("/", get(|| async { "home" }))
        .route(
            RouteDescriptor::get("/handy-dandy").with_plugin(SITEMAP_CONFIG_KEY, json!(true)),
            get(|| async { "handy" }),
        )
        .route(
            RouteDescriptor::get("/handy/{fruits}").with_sitemap(RouteSitemap::with_meta(EntryMeta {
                sitemap: Some("/sitemap-handy".to_string()),
                ..Default::default()
            })),
            get(|| async { "handy" }),
        )
        .route(
            RouteDescriptor::get("/blog/{slug}").with_sitemap(RouteSitemap::with_meta(EntryMeta {
                section: Some("Blog".to_string()),
                ..Default::default()
            })),
            get(|| async { "blog post" }),
        )
        .route(RouteDescriptor::get("/admin").with_tag("private"), get(|| async { "admin" }))
        .route(
            RouteDescriptor::get("/old-home").with_sitemap(RouteSitemap::disabled()),
            get(|| async { "moved" }),
        )
        .untracked("/health", get(|| async { "ok" }))
        .into_router(options)
        // Custom route access logging
        .layer(middleware::from_fn(logging_middleware::log_route_access))
        // Tracing middleware
        .layer(TraceLayer::new_for_http());

    let addr = server_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Server running");
    axum::serve(listener, app).await?;
    Ok(())
}
