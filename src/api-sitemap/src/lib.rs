//! Serves route sitemaps from an axum application.
//!
//! Register routes through [`SitemapRouter`] so they are recorded in a
//! [`RouteRegistry`], then call [`SitemapRouter::into_router`] to add the
//! sitemap endpoint.

pub mod registry;
pub mod routes;

pub use registry::RouteRegistry;
pub use routes::{SitemapRouter, with_sitemap};
