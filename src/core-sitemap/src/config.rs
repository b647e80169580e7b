//! Sitemap configuration: validated once at startup, then shared read-only by every request.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::callbacks::{AdditionalRoutes, AssignSitemap, DynamicRoutes, HtmlView, RouteMetaData};

/// Path where the sitemap is served when none is configured.
pub const DEFAULT_ENDPOINT: &str = "/sitemap";

/// Entries per XML page before a sitemap index is produced.
pub const DEFAULT_MAX_PER_PAGE: usize = 1000;

/// Bound on concurrently running per-route callbacks.
pub const DEFAULT_CONCURRENCY: usize = 16;

/// Rejected configuration. Raised before the endpoint is registered.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("endpoint must not be empty")]
    EmptyEndpoint,

    #[error("endpoint must start with '/': {0}")]
    RelativeEndpoint(String),

    #[error("endpoint must not end with '/': {0}")]
    TrailingSlash(String),

    #[error("endpoint must not contain '{{', '}}' or '.': {0}")]
    InvalidEndpointCharacter(String),

    #[error("maxPerPage must be a positive number")]
    NonPositiveMaxPerPage,

    #[error("concurrency must be a positive number")]
    NonPositiveConcurrency,

    #[error("htmlView '{0}' is set but no view engine was supplied")]
    MissingViewEngine(String),
}

/// The serializable part of the configuration, e.g. loaded from a JSON or TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct SitemapSettings {
    /// Path where the sitemap can be fetched, without extension.
    pub endpoint: String,
    pub max_per_page: usize,
    /// Routes tagged with any of these are never listed.
    pub exclude_tags: BTreeSet<String>,
    /// Paths that are never listed, whatever produced them.
    pub exclude_urls: BTreeSet<String>,
    /// List every url as https, e.g. behind a TLS-terminating proxy.
    pub force_https: bool,
    pub log_request: bool,
    /// Template to render HTML with instead of the built-in list.
    pub html_view: Option<String>,
    pub concurrency: usize,
    /// Host used in absolute urls instead of the request's `Host` header.
    pub host: Option<String>,
}

impl Default for SitemapSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            max_per_page: DEFAULT_MAX_PER_PAGE,
            exclude_tags: BTreeSet::new(),
            exclude_urls: BTreeSet::new(),
            force_https: false,
            log_request: false,
            html_view: None,
            concurrency: DEFAULT_CONCURRENCY,
            host: None,
        }
    }
}

impl SitemapSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = self.endpoint.as_str();
        if endpoint.is_empty() {
            return Err(ConfigError::EmptyEndpoint);
        }
        if !endpoint.starts_with('/') {
            return Err(ConfigError::RelativeEndpoint(endpoint.to_string()));
        }
        if endpoint.ends_with('/') {
            return Err(ConfigError::TrailingSlash(endpoint.to_string()));
        }
        if endpoint.contains(['{', '}', '.']) {
            return Err(ConfigError::InvalidEndpointCharacter(endpoint.to_string()));
        }
        if self.max_per_page == 0 {
            return Err(ConfigError::NonPositiveMaxPerPage);
        }
        if self.concurrency == 0 {
            return Err(ConfigError::NonPositiveConcurrency);
        }
        Ok(())
    }
}

/// Validated sitemap configuration.
#[derive(Clone)]
pub struct SitemapOptions {
    pub(crate) settings: SitemapSettings,
    pub(crate) dynamic_routes: Option<Arc<dyn DynamicRoutes>>,
    pub(crate) additional_routes: Option<Arc<dyn AdditionalRoutes>>,
    pub(crate) route_meta_data: Option<Arc<dyn RouteMetaData>>,
    pub(crate) assign_sitemap: Option<Arc<dyn AssignSitemap>>,
    pub(crate) view_engine: Option<Arc<dyn HtmlView>>,
}

impl std::fmt::Debug for SitemapOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SitemapOptions")
            .field("settings", &self.settings)
            .field("dynamic_routes", &self.dynamic_routes.is_some())
            .field("additional_routes", &self.additional_routes.is_some())
            .field("route_meta_data", &self.route_meta_data.is_some())
            .field("assign_sitemap", &self.assign_sitemap.is_some())
            .field("view_engine", &self.view_engine.is_some())
            .finish()
    }
}

impl SitemapOptions {
    /// Creates a new builder for SitemapOptions.
    pub fn builder() -> SitemapOptionsBuilder {
        SitemapOptionsBuilder::default()
    }

    pub fn settings(&self) -> &SitemapSettings {
        &self.settings
    }

    /// Path of the default sitemap, which is also its sub-sitemap name.
    pub fn endpoint(&self) -> &str {
        &self.settings.endpoint
    }

    pub fn log_request(&self) -> bool {
        self.settings.log_request
    }
}

/// Builder for SitemapOptions.
#[derive(Default)]
pub struct SitemapOptionsBuilder {
    settings: SitemapSettings,
    dynamic_routes: Option<Arc<dyn DynamicRoutes>>,
    additional_routes: Option<Arc<dyn AdditionalRoutes>>,
    route_meta_data: Option<Arc<dyn RouteMetaData>>,
    assign_sitemap: Option<Arc<dyn AssignSitemap>>,
    view_engine: Option<Arc<dyn HtmlView>>,
}

impl SitemapOptionsBuilder {
    /// Starts from previously loaded settings.
    pub fn from_settings(settings: SitemapSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.settings.endpoint = endpoint.into();
        self
    }

    pub fn max_per_page(mut self, max_per_page: usize) -> Self {
        self.settings.max_per_page = max_per_page;
        self
    }

    pub fn exclude_tag(mut self, tag: impl Into<String>) -> Self {
        self.settings.exclude_tags.insert(tag.into());
        self
    }

    pub fn exclude_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.settings.exclude_tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn exclude_url(mut self, path: impl Into<String>) -> Self {
        self.settings.exclude_urls.insert(path.into());
        self
    }

    pub fn exclude_urls<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.settings.exclude_urls.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn force_https(mut self, force_https: bool) -> Self {
        self.settings.force_https = force_https;
        self
    }

    pub fn log_request(mut self, log_request: bool) -> Self {
        self.settings.log_request = log_request;
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.settings.host = Some(host.into());
        self
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.settings.concurrency = concurrency;
        self
    }

    /// Renders HTML through `engine` using the template named `view`.
    pub fn html_view(mut self, view: impl Into<String>, engine: impl HtmlView + 'static) -> Self {
        self.settings.html_view = Some(view.into());
        self.view_engine = Some(Arc::new(engine));
        self
    }

    /// Supplies the template engine alone, for settings that already name an `htmlView`.
    pub fn view_engine(mut self, engine: impl HtmlView + 'static) -> Self {
        self.view_engine = Some(Arc::new(engine));
        self
    }

    pub fn dynamic_routes(mut self, resolver: impl DynamicRoutes + 'static) -> Self {
        self.dynamic_routes = Some(Arc::new(resolver));
        self
    }

    pub fn additional_routes(mut self, source: impl AdditionalRoutes + 'static) -> Self {
        self.additional_routes = Some(Arc::new(source));
        self
    }

    pub fn route_meta_data(mut self, source: impl RouteMetaData + 'static) -> Self {
        self.route_meta_data = Some(Arc::new(source));
        self
    }

    pub fn assign_sitemap(mut self, assigner: impl AssignSitemap + 'static) -> Self {
        self.assign_sitemap = Some(Arc::new(assigner));
        self
    }

    /// Validates and builds the SitemapOptions.
    pub fn build(self) -> Result<SitemapOptions, ConfigError> {
        self.settings.validate()?;
        if let Some(view) = &self.settings.html_view
            && self.view_engine.is_none()
        {
            return Err(ConfigError::MissingViewEngine(view.clone()));
        }
        Ok(SitemapOptions {
            settings: self.settings,
            dynamic_routes: self.dynamic_routes,
            additional_routes: self.additional_routes,
            route_meta_data: self.route_meta_data,
            assign_sitemap: self.assign_sitemap,
            view_engine: self.view_engine,
        })
    }
}
