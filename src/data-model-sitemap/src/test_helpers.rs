//! Fixtures for building route tables in tests.

use axum::http::Method;

use crate::models::{ChangeFreq, EntryMeta, RouteDescriptor, RouteSitemap};

/// A GET route whose sitemap block puts it under `section`.
pub fn route_in_section(path: &str, section: &str) -> RouteDescriptor {
    RouteDescriptor::get(path).with_sitemap(RouteSitemap::with_meta(EntryMeta {
        section: Some(section.to_string()),
        ..Default::default()
    }))
}

/// A GET route carrying the full set of sitemap-protocol tags.
pub fn route_with_protocol_tags(path: &str, lastmod: &str, changefreq: ChangeFreq, priority: f64) -> RouteDescriptor {
    RouteDescriptor::get(path).with_sitemap(RouteSitemap::with_meta(EntryMeta {
        lastmod: Some(lastmod.to_string()),
        changefreq: Some(changefreq),
        priority: Some(priority),
        ..Default::default()
    }))
}

/// A GET route that opts out of the sitemap.
pub fn hidden_route(path: &str) -> RouteDescriptor {
    RouteDescriptor::get(path).with_sitemap(RouteSitemap::disabled())
}

/// A small table mixing static, sectioned, tagged, non-GET and parameterized routes.
pub fn sample_route_table() -> Vec<RouteDescriptor> {
    vec![
        RouteDescriptor::get("/path1"),
        route_in_section("/story1", "Stories"),
        route_in_section("/story2", "Stories"),
        route_in_section("/interview1", "Interviews"),
        RouteDescriptor::get("/admin").with_tag("private"),
        RouteDescriptor::new(Method::POST, "/submit"),
        RouteDescriptor::get("/path/{param}"),
        hidden_route("/redirect"),
        RouteDescriptor::get("/favicon.ico"),
    ]
}

/// `count` static GET routes named `/page-01`, `/page-02`, ...
pub fn numbered_routes(count: usize) -> Vec<RouteDescriptor> {
    (1..=count)
        .map(|n| RouteDescriptor::get(format!("/page-{:02}", n)))
        .collect()
}
