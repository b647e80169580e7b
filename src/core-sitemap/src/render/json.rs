use data_model_sitemap::errors::SitemapError;
use data_model_sitemap::models::SitemapEntry;

use super::render_error;

/// Bare paths, or whole entries when `include_meta` is set.
pub fn render(entries: &[SitemapEntry], include_meta: bool) -> Result<String, SitemapError> {
    if include_meta {
        serde_json::to_string(entries).map_err(render_error)
    } else {
        let paths: Vec<&str> = entries.iter().map(|entry| entry.path.as_str()).collect();
        serde_json::to_string(&paths).map_err(render_error)
    }
}
