use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Query, Request, State},
    http::{HeaderMap, Method, Uri, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use core_sitemap::{RouteTable, SitemapOptions, SitemapRequest, generate_sitemap, is_sitemap_path};
use data_model_sitemap::errors::SitemapError;

/// Shared by every sitemap request. Built once when the endpoint is registered.
pub struct SitemapState {
    pub options: SitemapOptions,
    pub routes: Arc<dyn RouteTable>,
}

/// GET <endpoint>[-<name>][-<page>][.<type>] - Render the sitemap
///
/// Runs as middleware so the host keeps every other path, including its
/// fallback. Requests outside the endpoint's file names pass through untouched.
pub async fn intercept_sitemap(State(state): State<Arc<SitemapState>>, request: Request, next: Next) -> Response {
    let is_read = request.method() == Method::GET || request.method() == Method::HEAD;
    if !is_read || !is_sitemap_path(state.options.endpoint(), request.uri().path()) {
        return next.run(request).await;
    }

    let query = match Query::<BTreeMap<String, String>>::try_from_uri(request.uri()) {
        Ok(Query(query)) => query,
        Err(rejection) => return rejection.into_response(),
    };
    let original = request.extensions().get::<OriginalUri>().map(|OriginalUri(uri)| uri);
    let sitemap_request = sitemap_request(request.uri(), original, request.headers(), query);

    match generate_sitemap(&state.options, state.routes.as_ref(), &sitemap_request).await {
        Ok(rendered) => ([(header::CONTENT_TYPE, rendered.content_type)], rendered.body).into_response(),
        Err(e) => {
            match &e {
                SitemapError::NotFound(reason) => tracing::debug!(path = %sitemap_request.path, "{}", reason),
                other => tracing::error!(path = %sitemap_request.path, error = %other, "Sitemap request failed"),
            }
            e.into_response()
        }
    }
}

fn sitemap_request(
    uri: &Uri,
    original: Option<&Uri>,
    headers: &HeaderMap,
    query: BTreeMap<String, String>,
) -> SitemapRequest {
    let header_str = |name: header::HeaderName| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string);
    let uri_for_host = original.unwrap_or(uri);
    SitemapRequest {
        path: uri.path().to_string(),
        query,
        host: header_str(header::HOST).or_else(|| uri_for_host.authority().map(|a| a.to_string())),
        scheme: uri_for_host.scheme_str().map(str::to_string),
        user_agent: header_str(header::USER_AGENT),
        mount: original.map(|o| mount_prefix(o.path(), uri.path())).unwrap_or_default(),
    }
}

/// The prefix a nested router strips: `/api` for `/api/sitemap.xml` seen as `/sitemap.xml`.
fn mount_prefix(original: &str, stripped: &str) -> String {
    original
        .strip_suffix(stripped)
        .map(|prefix| prefix.trim_end_matches('/').to_string())
        .unwrap_or_default()
}
