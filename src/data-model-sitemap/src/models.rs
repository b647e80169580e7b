use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use axum::http::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::SitemapError;

/// Key under which a route keeps its sitemap configuration block.
pub const SITEMAP_CONFIG_KEY: &str = "sitemap";

/// Section assigned to entries that don't name one.
pub const DEFAULT_SECTION: &str = "none";

//
// Route table
//

/// A route registered with the host server. Read-only to the sitemap.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDescriptor {
    pub method: Method,
    /// Path pattern, with parameters written as `{name}`.
    pub path: String,
    pub tags: BTreeSet<String>,
    /// Per-plugin configuration blocks, keyed by plugin name.
    pub plugins: Map<String, Value>,
}

impl RouteDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            tags: BTreeSet::new(),
            plugins: Map::new(),
        }
    }

    /// Shorthand for a GET route.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Attaches an arbitrary configuration block for the named plugin.
    pub fn with_plugin(mut self, key: impl Into<String>, value: Value) -> Self {
        self.plugins.insert(key.into(), value);
        self
    }

    /// Attaches the sitemap configuration block.
    pub fn with_sitemap(self, sitemap: RouteSitemap) -> Self {
        let value = serde_json::to_value(RouteSitemapRepr::from(sitemap)).unwrap_or(Value::Bool(true));
        self.with_plugin(SITEMAP_CONFIG_KEY, value)
    }

    pub fn is_get(&self) -> bool {
        self.method == Method::GET
    }

    /// True if the path contains a `{param}` placeholder and can't be listed literally.
    pub fn is_parameterized(&self) -> bool {
        self.path.contains('{')
    }

    /// True if any of this route's tags is in `tags`.
    pub fn has_any_tag(&self, tags: &BTreeSet<String>) -> bool {
        !self.tags.is_disjoint(tags)
    }

    /// Reads the sitemap configuration block. A route without one is enabled with no metadata.
    pub fn sitemap_config(&self) -> Result<RouteSitemap, serde_json::Error> {
        match self.plugins.get(SITEMAP_CONFIG_KEY) {
            Some(value) => serde_json::from_value::<RouteSitemapRepr>(value.clone()).map(RouteSitemap::from),
            None => Ok(RouteSitemap::default()),
        }
    }
}

/// The sitemap block of a route: `false` disables it, `true` or an object enables it.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSitemap {
    pub enabled: bool,
    pub meta: EntryMeta,
}

impl Default for RouteSitemap {
    fn default() -> Self {
        Self {
            enabled: true,
            meta: EntryMeta::default(),
        }
    }
}

impl RouteSitemap {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            meta: EntryMeta::default(),
        }
    }

    pub fn with_meta(meta: EntryMeta) -> Self {
        Self { enabled: true, meta }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RouteSitemapRepr {
    Flag(bool),
    Block(EntryMeta),
}

impl From<RouteSitemapRepr> for RouteSitemap {
    fn from(repr: RouteSitemapRepr) -> Self {
        match repr {
            RouteSitemapRepr::Flag(enabled) => Self {
                enabled,
                meta: EntryMeta::default(),
            },
            RouteSitemapRepr::Block(meta) => Self::with_meta(meta),
        }
    }
}

impl From<RouteSitemap> for RouteSitemapRepr {
    fn from(sitemap: RouteSitemap) -> Self {
        match sitemap {
            RouteSitemap { enabled: false, .. } => Self::Flag(false),
            RouteSitemap { meta, .. } if meta.is_empty() => Self::Flag(true),
            RouteSitemap { meta, .. } => Self::Block(meta),
        }
    }
}

//
// Entries
//

/// How often a page is expected to change, per the sitemap protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFreq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional presentation and sitemap-protocol fields of an entry.
///
/// Used for a route's own sitemap block, for objects returned by resolvers,
/// and for the overlay returned by the metadata callback.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastmod: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changefreq: Option<ChangeFreq>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<f64>,
    /// Absolute URL. Derived from the path when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Name of the sub-sitemap this entry belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sitemap: Option<String>,
}

impl EntryMeta {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Fills the section, title and sub-sitemap from the owning route's block when they're missing.
    pub fn inherit_from_route(mut self, route: &EntryMeta) -> Self {
        if self.section.is_none() {
            self.section.clone_from(&route.section);
        }
        if self.title.is_none() {
            self.title.clone_from(&route.title);
        }
        if self.sitemap.is_none() {
            self.sitemap.clone_from(&route.sitemap);
        }
        self
    }
}

/// An entry as supplied by a caller: a bare path, or a path with metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RouteEntry {
    Path(String),
    Detailed {
        path: String,
        #[serde(flatten)]
        meta: EntryMeta,
    },
}

impl RouteEntry {
    pub fn detailed(path: impl Into<String>, meta: EntryMeta) -> Self {
        Self::Detailed {
            path: path.into(),
            meta,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Self::Path(path) | Self::Detailed { path, .. } => path,
        }
    }

    pub fn into_parts(self) -> (String, EntryMeta) {
        match self {
            Self::Path(path) => (path, EntryMeta::default()),
            Self::Detailed { path, meta } => (path, meta),
        }
    }
}

impl From<&str> for RouteEntry {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

impl From<String> for RouteEntry {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

/// One listed destination in a rendered sitemap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapEntry {
    pub path: String,
    pub url: String,
    pub section: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastmod: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changefreq: Option<ChangeFreq>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<f64>,
    pub sitemap: String,
}

impl SitemapEntry {
    /// Builds an entry for `path`. `base` is `<protocol>://<host>`, used when `meta` carries no url.
    pub fn from_parts(path: String, meta: EntryMeta, base: &str, default_sitemap: &str) -> Result<Self, SitemapError> {
        if !path.starts_with('/') {
            return Err(SitemapError::InvalidEntry(format!(
                "entry path must start with '/', got '{}'",
                path
            )));
        }
        let url = meta.url.unwrap_or_else(|| format!("{}{}", base, path));
        Ok(Self {
            path,
            url,
            section: meta.section.unwrap_or_else(|| DEFAULT_SECTION.to_string()),
            title: meta.title,
            lastmod: meta.lastmod,
            changefreq: meta.changefreq,
            priority: meta.priority,
            sitemap: meta.sitemap.unwrap_or_else(|| default_sitemap.to_string()),
        })
    }

    /// Merges `meta` into this entry. Fields set on `meta` win.
    pub fn apply(&mut self, meta: EntryMeta) {
        let EntryMeta {
            section,
            title,
            lastmod,
            changefreq,
            priority,
            url,
            sitemap,
        } = meta;
        if let Some(section) = section {
            self.section = section;
        }
        if let Some(url) = url {
            self.url = url;
        }
        if let Some(sitemap) = sitemap {
            self.sitemap = sitemap;
        }
        self.title = title.or(self.title.take());
        self.lastmod = lastmod.or(self.lastmod.take());
        self.changefreq = changefreq.or(self.changefreq);
        self.priority = priority.or(self.priority);
    }

    /// Hyperlink text: the title when present, else the absolute url.
    pub fn link_text(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.url)
    }
}

//
// Output
//

/// Representation requested through the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputType {
    Html,
    Xml,
    Txt,
    #[default]
    Json,
}

impl OutputType {
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Html => "text/html; charset=utf-8",
            Self::Xml => "text/xml; charset=utf-8",
            Self::Txt => "text/plain; charset=utf-8",
            Self::Json => "application/json",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Xml => "xml",
            Self::Txt => "txt",
            Self::Json => "json",
        }
    }
}

impl FromStr for OutputType {
    type Err = SitemapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "html" => Ok(Self::Html),
            "xml" => Ok(Self::Xml),
            "txt" => Ok(Self::Txt),
            "json" => Ok(Self::Json),
            other => Err(SitemapError::NotFound(format!("No handler found for file type {}", other))),
        }
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
