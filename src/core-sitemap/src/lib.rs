//! # Route sitemaps
//!
//! Turns a server's route table into a sitemap: filters the routes, resolves
//! parameterized ones through caller-supplied callbacks, merges extra entries,
//! splits the result into sub-sitemaps and pages, and renders it as HTML, XML,
//! plain text or JSON.
//!
//! The core knows nothing about the HTTP framework. The host supplies its
//! routes through [`RouteTable`] and a [`SitemapRequest`] describing the
//! incoming request, then calls [`generate_sitemap`].

pub mod aggregate;
mod batch;
pub mod callbacks;
pub mod common;
pub mod config;
pub mod filter;
pub mod paginate;
pub mod render;
pub mod request;
mod sitemap;

pub use callbacks::{AdditionalRoutes, AssignSitemap, DynamicRoutes, HtmlView, RouteMetaData, RouteTable};
pub use common::env::{EnvConfigError, server_addr, settings_from_env};
pub use common::logging::setup_logging;
pub use config::{ConfigError, SitemapOptions, SitemapOptionsBuilder, SitemapSettings};
pub use render::{HtmlViewContext, Rendered, Section};
pub use request::{SitemapPath, SitemapRequest, is_sitemap_path, parse_sitemap_path};
pub use sitemap::{REQUEST_LOG_TARGET, base_url, generate_sitemap};
