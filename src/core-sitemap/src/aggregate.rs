//! Page aggregator: merges additional routes, assigns sub-sitemaps and orders the result.

use data_model_sitemap::errors::SitemapError;
use data_model_sitemap::models::SitemapEntry;

use crate::batch::process_in_order;
use crate::callbacks::AssignSitemap;
use crate::config::SitemapOptions;

/// Produces the sorted entries of the sub-sitemap named `requested`.
///
/// `entries` is the route filter's output in discovery order. An unknown
/// sub-sitemap is not-found; the default one (the endpoint) always exists.
pub async fn aggregate(
    mut entries: Vec<SitemapEntry>,
    options: &SitemapOptions,
    requested: &str,
    base: &str,
) -> Result<Vec<SitemapEntry>, SitemapError> {
    if let Some(source) = &options.additional_routes {
        let additional = source.additional_routes().await?;
        tracing::debug!(count = additional.len(), "Merging additional routes");
        for route in additional {
            let (path, meta) = route.into_parts();
            if options.settings.exclude_urls.contains(&path) {
                continue;
            }
            entries.push(SitemapEntry::from_parts(path, meta, base, options.endpoint())?);
        }
    }

    if let Some(assigner) = &options.assign_sitemap {
        entries = process_in_order(
            entries,
            |entry, _index| assign(assigner.as_ref(), entry),
            options.settings.concurrency,
        )
        .await?;
    }

    if requested != options.endpoint() && !entries.iter().any(|entry| entry.sitemap == requested) {
        return Err(SitemapError::NotFound(format!("No sitemap named {}", requested)));
    }

    entries.retain(|entry| entry.sitemap == requested);
    sort_entries(&mut entries);
    Ok(entries)
}

async fn assign(assigner: &dyn AssignSitemap, mut entry: SitemapEntry) -> Result<Vec<SitemapEntry>, SitemapError> {
    if let Some(sitemap) = assigner.assign_sitemap(&entry).await? {
        entry.sitemap = sitemap;
    }
    Ok(vec![entry])
}

/// Sorts by path, keeping discovery order among equal paths, then drops duplicate paths.
pub fn sort_entries(entries: &mut Vec<SitemapEntry>) {
    entries.sort_by(|a, b| a.path.cmp(&b.path));
    entries.dedup_by(|later, earlier| later.path == earlier.path);
}
