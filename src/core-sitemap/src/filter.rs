//! Route filter: turns the route table into sitemap entries.
//!
//! Tags and opt-out flags are checked before any dynamic route is resolved;
//! `excludeUrls` is checked afterwards, against the concrete paths.

use data_model_sitemap::errors::SitemapError;
use data_model_sitemap::models::{RouteDescriptor, RouteSitemap, SitemapEntry};

use crate::batch::process_in_order;
use crate::callbacks::RouteMetaData;
use crate::config::SitemapOptions;
use crate::request::SitemapRequest;

/// Paths that are never listed, besides the sitemap endpoint itself.
pub const SKIPPED_PATHS: [&str; 2] = ["/favicon.ico", "/robots.txt"];

/// Builds the entries for every listable route in `routes`.
///
/// `base` is `<protocol>://<host>`, used to derive absolute urls. Per-route
/// resolution runs concurrently; any callback failure fails the whole call.
pub async fn filter_routes(
    routes: Vec<RouteDescriptor>,
    options: &SitemapOptions,
    request: &SitemapRequest,
    base: &str,
) -> Result<Vec<SitemapEntry>, SitemapError> {
    let include_all = request.include_all();
    let eligible: Vec<(RouteDescriptor, RouteSitemap)> = routes
        .into_iter()
        .filter_map(|route| eligible_route(route, options, include_all))
        .collect();

    let concurrency = options.settings.concurrency;
    let entries = process_in_order(
        eligible,
        |(route, config), _index| resolve_route(route, config, options, request, base),
        concurrency,
    )
    .await?;

    let entries: Vec<SitemapEntry> = entries
        .into_iter()
        .filter(|entry| !options.settings.exclude_urls.contains(&entry.path))
        .collect();

    match &options.route_meta_data {
        Some(source) => {
            process_in_order(
                entries,
                |entry, _index| apply_route_meta(source.as_ref(), entry),
                concurrency,
            )
            .await
        }
        None => Ok(entries),
    }
}

async fn apply_route_meta(
    source: &dyn RouteMetaData,
    mut entry: SitemapEntry,
) -> Result<Vec<SitemapEntry>, SitemapError> {
    match source.route_meta_data(&entry).await? {
        Some(meta) => {
            entry.apply(meta);
            Ok(vec![entry])
        }
        None => {
            tracing::debug!(path = %entry.path, "Excluded by route metadata");
            Ok(vec![])
        }
    }
}

/// Returns the route and its sitemap block if it may be listed at all.
fn eligible_route(
    route: RouteDescriptor,
    options: &SitemapOptions,
    include_all: bool,
) -> Option<(RouteDescriptor, RouteSitemap)> {
    if !route.is_get() {
        return None;
    }
    if route.path == options.settings.endpoint || SKIPPED_PATHS.contains(&route.path.as_str()) {
        return None;
    }
    if route.has_any_tag(&options.settings.exclude_tags) {
        return None;
    }

    let config = match route.sitemap_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(path = %route.path, error = %e, "Ignoring malformed sitemap block");
            RouteSitemap::default()
        }
    };
    if !config.enabled && !include_all {
        return None;
    }
    Some((route, config))
}

async fn resolve_route(
    route: RouteDescriptor,
    config: RouteSitemap,
    options: &SitemapOptions,
    request: &SitemapRequest,
    base: &str,
) -> Result<Vec<SitemapEntry>, SitemapError> {
    let default_sitemap = options.endpoint();

    if !route.is_parameterized() {
        let entry = SitemapEntry::from_parts(route.path, config.meta, base, default_sitemap)?;
        return Ok(vec![entry]);
    }

    let Some(resolver) = &options.dynamic_routes else {
        tracing::warn!(path = %route.path, "Not found in dynamic routes");
        return Ok(vec![]);
    };

    resolver
        .resolve(&route.path, request)
        .await?
        .into_iter()
        .map(|resolved| {
            let (path, meta) = resolved.into_parts();
            SitemapEntry::from_parts(path, meta.inherit_from_route(&config.meta), base, default_sitemap)
        })
        .collect()
}
