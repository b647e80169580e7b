//! Extension points supplied by the host.
//!
//! Every asynchronous extension point is also implemented for plain closures
//! returning a future, so hosts can pass `|pattern, request| async move { ... }`.

use std::future::Future;

use async_trait::async_trait;
use data_model_sitemap::errors::CallbackError;
use data_model_sitemap::models::{EntryMeta, RouteDescriptor, RouteEntry, SitemapEntry};

use crate::render::HtmlViewContext;
use crate::request::SitemapRequest;

/// Source of the host's currently registered routes. Read on every request.
pub trait RouteTable: Send + Sync {
    fn table(&self) -> Vec<RouteDescriptor>;
}

impl RouteTable for Vec<RouteDescriptor> {
    fn table(&self) -> Vec<RouteDescriptor> {
        self.clone()
    }
}

/// Lists concrete paths for a parameterized route pattern such as `/user/{name}`.
#[async_trait]
pub trait DynamicRoutes: Send + Sync {
    async fn resolve(&self, pattern: &str, request: &SitemapRequest) -> Result<Vec<RouteEntry>, CallbackError>;
}

#[async_trait]
impl<F, Fut> DynamicRoutes for F
where
    F: Fn(String, SitemapRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<RouteEntry>, CallbackError>> + Send + 'static,
{
    async fn resolve(&self, pattern: &str, request: &SitemapRequest) -> Result<Vec<RouteEntry>, CallbackError> {
        (self)(pattern.to_string(), request.clone()).await
    }
}

/// Entries to list that don't come from the route table.
#[async_trait]
pub trait AdditionalRoutes: Send + Sync {
    async fn additional_routes(&self) -> Result<Vec<RouteEntry>, CallbackError>;
}

#[async_trait]
impl<F, Fut> AdditionalRoutes for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<RouteEntry>, CallbackError>> + Send + 'static,
{
    async fn additional_routes(&self) -> Result<Vec<RouteEntry>, CallbackError> {
        (self)().await
    }
}

/// Per-entry metadata. `Ok(None)` drops the entry from every output.
#[async_trait]
pub trait RouteMetaData: Send + Sync {
    async fn route_meta_data(&self, entry: &SitemapEntry) -> Result<Option<EntryMeta>, CallbackError>;
}

#[async_trait]
impl<F, Fut> RouteMetaData for F
where
    F: Fn(SitemapEntry) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<EntryMeta>, CallbackError>> + Send + 'static,
{
    async fn route_meta_data(&self, entry: &SitemapEntry) -> Result<Option<EntryMeta>, CallbackError> {
        (self)(entry.clone()).await
    }
}

/// Chooses the sub-sitemap an entry belongs to. `Ok(None)` keeps its current assignment.
#[async_trait]
pub trait AssignSitemap: Send + Sync {
    async fn assign_sitemap(&self, entry: &SitemapEntry) -> Result<Option<String>, CallbackError>;
}

#[async_trait]
impl<F, Fut> AssignSitemap for F
where
    F: Fn(SitemapEntry) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<String>, CallbackError>> + Send + 'static,
{
    async fn assign_sitemap(&self, entry: &SitemapEntry) -> Result<Option<String>, CallbackError> {
        (self)(entry.clone()).await
    }
}

/// External template engine used when a custom HTML view is configured.
pub trait HtmlView: Send + Sync {
    fn render(&self, view: &str, context: &HtmlViewContext) -> Result<String, CallbackError>;
}

impl<F> HtmlView for F
where
    F: Fn(&str, &HtmlViewContext) -> Result<String, CallbackError> + Send + Sync,
{
    fn render(&self, view: &str, context: &HtmlViewContext) -> Result<String, CallbackError> {
        (self)(view, context)
    }
}
