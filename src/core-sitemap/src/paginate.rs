//! Splits large XML sitemaps into pages behind a sitemap index.

use data_model_sitemap::errors::SitemapError;
use data_model_sitemap::models::{OutputType, SitemapEntry};

/// What the renderer receives after pagination.
#[derive(Debug, Clone, PartialEq)]
pub enum Paged {
    /// Entries to list directly.
    Entries(Vec<SitemapEntry>),
    /// Absolute urls of the pages, for a sitemap index.
    Index(Vec<String>),
}

/// Applies pagination to `entries`, which must already be sorted.
///
/// Only XML is paginated. `page` is 1-based. `index_base` is the absolute url
/// of the sub-sitemap without extension; page `n` lives at `<index_base>-<n>.xml`.
pub fn paginate(
    entries: Vec<SitemapEntry>,
    output: OutputType,
    page: Option<usize>,
    max_per_page: usize,
    index_base: &str,
) -> Result<Paged, SitemapError> {
    if output != OutputType::Xml {
        return Ok(Paged::Entries(entries));
    }
    let max_per_page = max_per_page.max(1);

    match page {
        None if entries.len() > max_per_page => {
            let page_count = entries.len().div_ceil(max_per_page);
            tracing::debug!(entries = entries.len(), page_count, "Serving sitemap index");
            Ok(Paged::Index(
                (1..=page_count).map(|n| format!("{}-{}.xml", index_base, n)).collect(),
            ))
        }
        None => Ok(Paged::Entries(entries)),
        Some(page) => {
            let start = page.saturating_sub(1).saturating_mul(max_per_page);
            let slice: Vec<SitemapEntry> = entries.into_iter().skip(start).take(max_per_page).collect();
            if slice.is_empty() {
                return Err(SitemapError::NotFound(format!("Page {} is out of range", page)));
            }
            Ok(Paged::Entries(slice))
        }
    }
}

#[cfg(test)]
mod tests {
    use data_model_sitemap::models::EntryMeta;

    use super::*;

    const INDEX_BASE: &str = "http://localhost/sitemap";

    fn entries(count: usize) -> Vec<SitemapEntry> {
        (1..=count)
            .map(|n| {
                SitemapEntry::from_parts(format!("/page-{:02}", n), EntryMeta::default(), "http://localhost", "/sitemap")
                    .unwrap()
            })
            .collect()
    }

    fn paths(paged: Paged) -> Vec<String> {
        match paged {
            Paged::Entries(entries) => entries.into_iter().map(|e| e.path).collect(),
            Paged::Index(urls) => panic!("expected entries, got index {:?}", urls),
        }
    }

    #[test]
    fn test_index_when_over_limit() {
        let paged = paginate(entries(12), OutputType::Xml, None, 5, INDEX_BASE).unwrap();
        assert_eq!(
            paged,
            Paged::Index(vec![
                "http://localhost/sitemap-1.xml".to_string(),
                "http://localhost/sitemap-2.xml".to_string(),
                "http://localhost/sitemap-3.xml".to_string(),
            ])
        );
    }

    #[test]
    fn test_page_slice() {
        let paged = paginate(entries(12), OutputType::Xml, Some(2), 5, INDEX_BASE).unwrap();
        assert_eq!(
            paths(paged),
            vec!["/page-06", "/page-07", "/page-08", "/page-09", "/page-10"]
        );

        let last = paginate(entries(12), OutputType::Xml, Some(3), 5, INDEX_BASE).unwrap();
        assert_eq!(paths(last), vec!["/page-11", "/page-12"]);
    }

    #[test]
    fn test_page_out_of_range() {
        let result = paginate(entries(12), OutputType::Xml, Some(4), 5, INDEX_BASE);
        assert!(matches!(result, Err(SitemapError::NotFound(_))));
    }

    #[test]
    fn test_at_limit_is_not_indexed() {
        let paged = paginate(entries(5), OutputType::Xml, None, 5, INDEX_BASE).unwrap();
        assert_eq!(paths(paged).len(), 5);
    }

    #[test]
    fn test_explicit_page_on_small_list() {
        let paged = paginate(entries(3), OutputType::Xml, Some(1), 5, INDEX_BASE).unwrap();
        assert_eq!(paths(paged).len(), 3);
        assert!(paginate(entries(3), OutputType::Xml, Some(2), 5, INDEX_BASE).is_err());
    }

    #[test]
    fn test_non_xml_is_inert() {
        for output in [OutputType::Html, OutputType::Txt, OutputType::Json] {
            let paged = paginate(entries(12), output, None, 5, INDEX_BASE).unwrap();
            assert_eq!(paths(paged).len(), 12);
        }
    }
}
