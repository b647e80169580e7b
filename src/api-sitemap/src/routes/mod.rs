use std::sync::Arc;

use axum::routing::MethodRouter;
use axum::{Router, middleware};
use core_sitemap::{RouteTable, SitemapOptions};
use data_model_sitemap::models::RouteDescriptor;

use crate::registry::RouteRegistry;

pub mod logging_middleware;
pub mod sitemap;

pub use sitemap::SitemapState;

//
// Router
//

/// An axum router that records every listable route it registers.
pub struct SitemapRouter<S = ()> {
    router: Router<S>,
    registry: RouteRegistry,
}

impl<S> Default for SitemapRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> SitemapRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::with_registry(RouteRegistry::new())
    }

    /// Records routes into an existing registry, e.g. one shared by several routers.
    pub fn with_registry(registry: RouteRegistry) -> Self {
        Self {
            router: Router::new(),
            registry,
        }
    }

    /// Serves `method_router` at the descriptor's path and records the descriptor.
    ///
    /// Registering the same path again with another method merges the two,
    /// as `axum::Router::route` does.
    pub fn route(mut self, descriptor: RouteDescriptor, method_router: MethodRouter<S>) -> Self {
        self.router = self.router.route(&descriptor.path, method_router);
        self.registry.register(descriptor);
        self
    }

    /// Shorthand for a GET route with no tags or sitemap block.
    pub fn get(self, path: &str, method_router: MethodRouter<S>) -> Self {
        self.route(RouteDescriptor::get(path), method_router)
    }

    /// Serves a route without recording it, so it never appears in the sitemap.
    pub fn untracked(mut self, path: &str, method_router: MethodRouter<S>) -> Self {
        self.router = self.router.route(path, method_router);
        self
    }

    /// Applies `f` to the wrapped router, e.g. to add layers or nest services.
    pub fn map_router(mut self, f: impl FnOnce(Router<S>) -> Router<S>) -> Self {
        self.router = f(self.router);
        self
    }

    pub fn registry(&self) -> RouteRegistry {
        self.registry.clone()
    }

    /// Adds the sitemap endpoint, backed by this router's registry.
    ///
    /// The endpoint wraps the routes and fallback registered so far. A fallback
    /// set on the returned router still handles unknown paths but replaces the
    /// wrapped one, so set it through [`SitemapRouter::map_router`] first.
    pub fn into_router(self, options: SitemapOptions) -> Router<S> {
        let endpoint = RouteDescriptor::get(options.endpoint());
        let app = with_sitemap(self.router, options, self.registry.clone());
        self.registry.register(endpoint);
        app
    }
}

/// Adds the sitemap endpoint to a router whose routes are listed by `routes`.
///
/// Only `<endpoint>`, `<endpoint>-<name>[-<page>]` and their `.<type>` forms
/// are answered; every other request reaches `router` unchanged.
pub fn with_sitemap<S>(router: Router<S>, options: SitemapOptions, routes: impl RouteTable + 'static) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    tracing::info!(endpoint = %options.endpoint(), "Serving sitemap");
    let state = Arc::new(SitemapState {
        options,
        routes: Arc::new(routes),
    });
    router.layer(middleware::from_fn_with_state(state, sitemap::intercept_sitemap))
}
