use data_model_sitemap::errors::SitemapError;
use data_model_sitemap::models::OutputType;

use crate::aggregate::aggregate;
use crate::callbacks::RouteTable;
use crate::config::SitemapOptions;
use crate::filter::filter_routes;
use crate::paginate::paginate;
use crate::render::{Rendered, render};
use crate::request::{SitemapRequest, parse_sitemap_path};

/// Log target of the per-request log line enabled by `logRequest`.
pub const REQUEST_LOG_TARGET: &str = "route_sitemap::request";

/// `<protocol>://<host><mount>` for absolute urls.
///
/// Protocol is https when forced by configuration, else the request's scheme,
/// else http. Host is the configured one, else the request's, else `localhost`.
/// `mount` is the prefix the serving router is nested under.
pub fn base_url(options: &SitemapOptions, request: &SitemapRequest) -> String {
    let protocol = if options.settings.force_https {
        "https"
    } else {
        request.scheme.as_deref().unwrap_or("http")
    };
    let host = options
        .settings
        .host
        .as_deref()
        .or(request.host.as_deref())
        .unwrap_or("localhost");
    format!("{}://{}{}", protocol, host, request.mount)
}

/// Answers one sitemap request against the current route table.
pub async fn generate_sitemap(
    options: &SitemapOptions,
    routes: &dyn RouteTable,
    request: &SitemapRequest,
) -> Result<Rendered, SitemapError> {
    if options.log_request() {
        log_request(request);
    }

    let target = parse_sitemap_path(options.endpoint(), &request.path)?;
    if target.page.is_some() && target.output != OutputType::Xml {
        return Err(SitemapError::NotFound(format!(
            "Pages are only available as xml, not {}",
            target.output
        )));
    }

    let base = base_url(options, request);
    let entries = filter_routes(routes.table(), options, request, &base).await?;
    let entries = aggregate(entries, options, &target.sitemap, &base).await?;
    tracing::debug!(
        sitemap = %target.sitemap,
        output = %target.output,
        entries = entries.len(),
        "Aggregated sitemap entries"
    );

    let index_base = format!("{}{}", base, target.sitemap);
    let paged = paginate(
        entries,
        target.output,
        target.page,
        options.settings.max_per_page,
        &index_base,
    )?;
    render(paged, target.output, options, request)
}

fn log_request(request: &SitemapRequest) {
    let timestamp = chrono::Utc::now().to_rfc3339();
    let path = format!("{}{}", request.mount, request.path);
    match &request.user_agent {
        Some(user_agent) => tracing::info!(
            target: REQUEST_LOG_TARGET,
            request = %path,
            timestamp = %timestamp,
            user_agent = %user_agent,
            "Sitemap requested"
        ),
        None => tracing::info!(
            target: REQUEST_LOG_TARGET,
            request = %path,
            timestamp = %timestamp,
            "Sitemap requested"
        ),
    }
}

#[cfg(test)]
mod tests {
    use data_model_sitemap::errors::CallbackError;
    use data_model_sitemap::models::{ChangeFreq, RouteDescriptor, RouteEntry, SitemapEntry};
    use data_model_sitemap::test_helpers::{numbered_routes, route_with_protocol_tags, sample_route_table};

    use tracing_test::traced_test;

    use super::*;
    use crate::render::HtmlViewContext;

    fn request(path: &str) -> SitemapRequest {
        SitemapRequest::new(path).with_host("localhost:9000")
    }

    #[test]
    fn test_base_url() {
        let options = SitemapOptions::builder().build().unwrap();
        assert_eq!(base_url(&options, &request("/sitemap")), "http://localhost:9000");
        assert_eq!(base_url(&options, &SitemapRequest::new("/sitemap")), "http://localhost");

        let mut secure = request("/sitemap");
        secure.scheme = Some("https".to_string());
        assert_eq!(base_url(&options, &secure), "https://localhost:9000");

        let options = SitemapOptions::builder()
            .force_https(true)
            .host("example.com")
            .build()
            .unwrap();
        assert_eq!(base_url(&options, &request("/sitemap")), "https://example.com");
    }

    #[tokio::test]
    async fn test_txt_lists_eligible_routes_sorted() {
        let options = SitemapOptions::builder().exclude_tag("private").build().unwrap();
        let rendered = generate_sitemap(&options, &sample_route_table(), &request("/sitemap.txt"))
            .await
            .unwrap();
        assert_eq!(rendered.content_type, "text/plain; charset=utf-8");
        assert_eq!(
            rendered.body,
            "http://localhost:9000/interview1\nhttp://localhost:9000/path1\n\
             http://localhost:9000/story1\nhttp://localhost:9000/story2"
        );
    }

    #[tokio::test]
    async fn test_default_output_is_json_paths() {
        let options = SitemapOptions::builder().build().unwrap();
        let routes = vec![RouteDescriptor::get("/b"), RouteDescriptor::get("/a")];
        let rendered = generate_sitemap(&options, &routes, &request("/sitemap")).await.unwrap();
        assert_eq!(rendered.content_type, "application/json");
        assert_eq!(rendered.body, r#"["/a","/b"]"#);
    }

    #[tokio::test]
    async fn test_xml_with_protocol_tags() {
        let options = SitemapOptions::builder().build().unwrap();
        let routes = vec![route_with_protocol_tags("/path1", "2005-01-01", ChangeFreq::Monthly, 0.8)];
        let rendered = generate_sitemap(&options, &routes, &request("/sitemap.xml")).await.unwrap();
        assert!(rendered.body.contains(
            "<url><loc>http://localhost:9000/path1</loc><lastmod>2005-01-01</lastmod>\
             <changefreq>monthly</changefreq><priority>0.8</priority></url>"
        ));
    }

    #[tokio::test]
    async fn test_index_then_pages() {
        let options = SitemapOptions::builder().max_per_page(5).build().unwrap();
        let routes = numbered_routes(12);

        let index = generate_sitemap(&options, &routes, &request("/sitemap.xml")).await.unwrap();
        assert_eq!(index.body.matches("<sitemap>").count(), 3);
        assert!(index.body.contains("<loc>http://localhost:9000/sitemap-3.xml</loc>"));

        let page = generate_sitemap(&options, &routes, &request("/sitemap-2.xml")).await.unwrap();
        assert_eq!(page.body.matches("<url>").count(), 5);
        assert!(page.body.contains("/page-06</loc>"));
        assert!(page.body.contains("/page-10</loc>"));
        assert!(!page.body.contains("/page-11</loc>"));

        let missing = generate_sitemap(&options, &routes, &request("/sitemap-4.xml")).await;
        assert!(matches!(missing, Err(SitemapError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_page_on_non_xml_is_not_found() {
        let options = SitemapOptions::builder().max_per_page(5).build().unwrap();
        let result = generate_sitemap(&options, &numbered_routes(12), &request("/sitemap-2.txt")).await;
        assert!(matches!(result, Err(SitemapError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_unknown_type_is_not_found() {
        let options = SitemapOptions::builder().build().unwrap();
        let result = generate_sitemap(&options, &sample_route_table(), &request("/sitemap.pdf")).await;
        assert!(matches!(result, Err(SitemapError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_meta_flag_returns_entries() {
        let options = SitemapOptions::builder().build().unwrap();
        let routes = vec![RouteDescriptor::get("/path1")];
        let rendered = generate_sitemap(&options, &routes, &request("/sitemap.json").with_query("meta", "1"))
            .await
            .unwrap();
        let entries: Vec<SitemapEntry> = serde_json::from_str(&rendered.body).unwrap();
        assert_eq!(entries[0].url, "http://localhost:9000/path1");
        assert_eq!(entries[0].section, "none");
    }

    #[tokio::test]
    async fn test_assign_sitemap_partitions_every_entry_once() {
        let options = SitemapOptions::builder()
            .additional_routes(|| async { Ok(vec![RouteEntry::from("/news/extra")]) })
            .assign_sitemap(|entry: SitemapEntry| async move {
                Ok(entry.path.starts_with("/news").then(|| "/sitemap-news".to_string()))
            })
            .build()
            .unwrap();
        let routes = vec![
            RouteDescriptor::get("/about"),
            RouteDescriptor::get("/news/1"),
            RouteDescriptor::get("/contact"),
        ];

        let default = generate_sitemap(&options, &routes, &request("/sitemap.json")).await.unwrap();
        assert_eq!(default.body, r#"["/about","/contact"]"#);

        let news = generate_sitemap(&options, &routes, &request("/sitemap-news.json")).await.unwrap();
        assert_eq!(news.body, r#"["/news/1","/news/extra"]"#);

        let unknown = generate_sitemap(&options, &routes, &request("/sitemap-sports.json")).await;
        assert!(matches!(unknown, Err(SitemapError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_custom_html_view() {
        let engine = |view: &str, context: &HtmlViewContext| -> Result<String, CallbackError> {
            Ok(format!("{}:{}:{}", view, context.entries.len(), context.sections.len()))
        };
        let options = SitemapOptions::builder().html_view("sitemap", engine).build().unwrap();
        let rendered = generate_sitemap(&options, &sample_route_table(), &request("/sitemap.html"))
            .await
            .unwrap();
        assert_eq!(rendered.content_type, "text/html; charset=utf-8");
        assert_eq!(rendered.body, "sitemap:5:3");
    }

    #[tokio::test]
    async fn test_custom_endpoint() {
        let options = SitemapOptions::builder().endpoint("/endpoint").build().unwrap();
        let routes = vec![RouteDescriptor::get("/path1"), RouteDescriptor::get("/endpoint")];
        let rendered = generate_sitemap(&options, &routes, &request("/endpoint.txt")).await.unwrap();
        assert_eq!(rendered.body, "http://localhost:9000/path1");

        let result = generate_sitemap(&options, &routes, &request("/sitemap.txt")).await;
        assert!(matches!(result, Err(SitemapError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_mount_prefixes_urls_and_index() {
        let options = SitemapOptions::builder().max_per_page(5).build().unwrap();
        let request = request("/sitemap.xml").with_mount("/api");
        assert_eq!(base_url(&options, &request), "http://localhost:9000/api");

        let index = generate_sitemap(&options, &numbered_routes(12), &request).await.unwrap();
        assert!(index.body.contains("<loc>http://localhost:9000/api/sitemap-1.xml</loc>"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_request_log_line() {
        let options = SitemapOptions::builder().log_request(true).build().unwrap();
        let request = request("/sitemap.txt").with_user_agent("crawler/1.0");
        generate_sitemap(&options, &sample_route_table(), &request).await.unwrap();

        assert!(logs_contain(REQUEST_LOG_TARGET));
        assert!(logs_contain("request=/sitemap.txt"));
        assert!(logs_contain("user_agent=crawler/1.0"));
        logs_assert(|lines: &[&str]| {
            let line = lines
                .iter()
                .find(|line| line.contains("Sitemap requested"))
                .ok_or("no request log line")?;
            let timestamp = line
                .split("timestamp=")
                .nth(1)
                .and_then(|rest| rest.split_whitespace().next())
                .ok_or("no timestamp field")?;
            chrono::DateTime::parse_from_rfc3339(timestamp).map_err(|e| format!("{}: {}", timestamp, e))?;
            Ok(())
        });
    }

    #[tokio::test]
    #[traced_test]
    async fn test_request_log_without_user_agent() {
        let options = SitemapOptions::builder().log_request(true).build().unwrap();
        generate_sitemap(&options, &sample_route_table(), &request("/sitemap.json")).await.unwrap();

        assert!(logs_contain("Sitemap requested"));
        assert!(!logs_contain("user_agent="));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_malformed_request_is_logged() {
        let options = SitemapOptions::builder().log_request(true).build().unwrap();
        let result = generate_sitemap(&options, &sample_route_table(), &request("/sitemap.pdf")).await;

        assert!(matches!(result, Err(SitemapError::NotFound(_))));
        assert!(logs_contain("request=/sitemap.pdf"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_no_request_log_by_default() {
        let options = SitemapOptions::builder().build().unwrap();
        let request = request("/sitemap.txt").with_user_agent("crawler/1.0");
        generate_sitemap(&options, &sample_route_table(), &request).await.unwrap();

        assert!(!logs_contain("Sitemap requested"));
        assert!(!logs_contain("crawler/1.0"));
    }
}
