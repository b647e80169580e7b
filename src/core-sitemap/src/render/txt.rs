use data_model_sitemap::models::SitemapEntry;

/// One absolute url per line.
pub fn render(entries: &[SitemapEntry]) -> String {
    entries.iter().map(|entry| entry.url.as_str()).collect::<Vec<_>>().join("\n")
}
