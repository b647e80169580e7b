//! The incoming request as the core sees it, and the sitemap path grammar.

use std::collections::BTreeMap;

use data_model_sitemap::errors::SitemapError;
use data_model_sitemap::models::OutputType;

/// Framework-independent view of a sitemap request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitemapRequest {
    pub path: String,
    pub query: BTreeMap<String, String>,
    /// Value of the `Host` header, or the uri authority.
    pub host: Option<String>,
    /// Scheme of the request uri, when the server saw one.
    pub scheme: Option<String>,
    pub user_agent: Option<String>,
    /// Prefix the serving router is mounted under, e.g. `/api`. Empty at the root.
    pub mount: String,
}

impl SitemapRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_mount(mut self, mount: impl Into<String>) -> Self {
        self.mount = mount.into();
        self
    }

    /// True when the query parameter is present with a truthy value (`meta=1`, `all=true`, ...).
    pub fn flag(&self, name: &str) -> bool {
        match self.query.get(name) {
            Some(value) => !matches!(value.trim(), "" | "0" | "false" | "no"),
            None => false,
        }
    }

    /// `all=1`: list routes that opted out of the sitemap.
    pub fn include_all(&self) -> bool {
        self.flag("all")
    }

    /// `meta=1`: JSON output carries whole entries instead of bare paths.
    pub fn include_meta(&self) -> bool {
        self.flag("meta")
    }
}

/// What a sitemap request path asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapPath {
    /// Sub-sitemap name: the endpoint, optionally followed by `-<name>`.
    pub sitemap: String,
    /// 1-based page number.
    pub page: Option<usize>,
    pub output: OutputType,
}

/// True if `path` is the endpoint or a variant of it (`<endpoint>-...` or `<endpoint>.<type>`).
///
/// Variants may still be malformed; [`parse_sitemap_path`] decides.
pub fn is_sitemap_path(endpoint: &str, path: &str) -> bool {
    match path.strip_prefix(endpoint) {
        Some("") => true,
        Some(rest) => (rest.starts_with('-') || rest.starts_with('.')) && !rest.contains('/'),
        None => false,
    }
}

/// Parses `<endpoint>[-<name>][-<page>][.<type>]`.
///
/// A trailing `-<digits>` is always a page number. Without an extension the output is JSON.
/// Anything that doesn't fit the grammar is not-found.
pub fn parse_sitemap_path(endpoint: &str, path: &str) -> Result<SitemapPath, SitemapError> {
    let not_found = || SitemapError::NotFound(format!("No sitemap at {}", path));

    let file_start = path.rfind('/').map_or(0, |i| i + 1);
    let (stem, output) = match path[file_start..].rfind('.') {
        Some(dot) => {
            let dot = file_start + dot;
            (&path[..dot], path[dot + 1..].parse::<OutputType>()?)
        }
        None => (path, OutputType::default()),
    };

    let suffix = stem.strip_prefix(endpoint).ok_or_else(not_found)?;
    if suffix.is_empty() {
        return Ok(SitemapPath {
            sitemap: endpoint.to_string(),
            page: None,
            output,
        });
    }
    if !suffix.starts_with('-') || suffix.contains('/') {
        return Err(not_found());
    }

    let (name, page) = match suffix.rsplit_once('-') {
        Some((head, digits)) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
            let page = digits.parse::<usize>().map_err(|_| not_found())?;
            if page == 0 {
                return Err(not_found());
            }
            (head, Some(page))
        }
        _ => (suffix, None),
    };

    if !name.is_empty() && (name.len() == 1 || name.ends_with('-')) {
        return Err(not_found());
    }

    Ok(SitemapPath {
        sitemap: format!("{}{}", endpoint, name),
        page,
        output,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(path: &str) -> Result<SitemapPath, SitemapError> {
        parse_sitemap_path("/sitemap", path)
    }

    #[test]
    fn test_default_sitemap() {
        let parsed = parse("/sitemap.xml").unwrap();
        assert_eq!(parsed.sitemap, "/sitemap");
        assert_eq!(parsed.page, None);
        assert_eq!(parsed.output, OutputType::Xml);
    }

    #[test]
    fn test_missing_extension_is_json() {
        let parsed = parse("/sitemap").unwrap();
        assert_eq!(parsed.output, OutputType::Json);
    }

    #[test]
    fn test_page_suffix() {
        let parsed = parse("/sitemap-2.xml").unwrap();
        assert_eq!(parsed.sitemap, "/sitemap");
        assert_eq!(parsed.page, Some(2));
    }

    #[test]
    fn test_named_sub_sitemap() {
        let parsed = parse("/sitemap-huh.json").unwrap();
        assert_eq!(parsed.sitemap, "/sitemap-huh");
        assert_eq!(parsed.page, None);

        let parsed = parse("/sitemap-news-3.xml").unwrap();
        assert_eq!(parsed.sitemap, "/sitemap-news");
        assert_eq!(parsed.page, Some(3));
    }

    #[test]
    fn test_nested_endpoint() {
        let parsed = parse_sitemap_path("/docs/map", "/docs/map-1.xml").unwrap();
        assert_eq!(parsed.sitemap, "/docs/map");
        assert_eq!(parsed.page, Some(1));
    }

    #[test]
    fn test_not_found_paths() {
        for path in [
            "/sitemap.pdf",
            "/other.xml",
            "/sitemapx.xml",
            "/sitemap-0.xml",
            "/sitemap-.xml",
            "/sitemap--2.xml",
            "/sitemap/inner.xml",
            "/sitemap-99999999999999999999999.xml",
        ] {
            assert!(
                matches!(parse(path), Err(SitemapError::NotFound(_))),
                "expected not-found for {}",
                path
            );
        }
    }

    #[test]
    fn test_is_sitemap_path() {
        for path in ["/sitemap", "/sitemap.xml", "/sitemap.pdf", "/sitemap-2.xml", "/sitemap-news"] {
            assert!(is_sitemap_path("/sitemap", path), "{}", path);
        }
        for path in ["/", "/about-us", "/sitemaps", "/sitemap/inner.xml", "/blog/sitemap.xml", "/site"] {
            assert!(!is_sitemap_path("/sitemap", path), "{}", path);
        }
        assert!(is_sitemap_path("/docs/map", "/docs/map-1.xml"));
        assert!(!is_sitemap_path("/docs/map", "/map.xml"));
    }

    #[test]
    fn test_query_flags() {
        let request = SitemapRequest::new("/sitemap.json")
            .with_query("meta", "1")
            .with_query("all", "0");
        assert!(request.include_meta());
        assert!(!request.include_all());
        assert!(!request.flag("missing"));
    }
}
