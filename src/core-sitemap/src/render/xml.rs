//! Sitemap protocol documents.
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"><url><loc>https://example.com/</loc></url></urlset>
//! ```

use data_model_sitemap::errors::SitemapError;
use data_model_sitemap::models::SitemapEntry;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::render_error;

pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// A `<urlset>` with one `<url>` per entry. Optional children appear only when set.
pub fn render_urlset(entries: &[SitemapEntry]) -> Result<String, SitemapError> {
    let mut writer = start_document("urlset")?;
    for entry in entries {
        write_event(&mut writer, Event::Start(BytesStart::new("url")))?;
        write_text_element(&mut writer, "loc", &entry.url)?;
        if let Some(lastmod) = &entry.lastmod {
            write_text_element(&mut writer, "lastmod", lastmod)?;
        }
        if let Some(changefreq) = entry.changefreq {
            write_text_element(&mut writer, "changefreq", changefreq.as_str())?;
        }
        if let Some(priority) = entry.priority {
            write_text_element(&mut writer, "priority", &format_priority(priority))?;
        }
        write_event(&mut writer, Event::End(BytesEnd::new("url")))?;
    }
    finish_document(writer, "urlset")
}

/// A `<sitemapindex>` pointing at each page url.
pub fn render_index(pages: &[String]) -> Result<String, SitemapError> {
    let mut writer = start_document("sitemapindex")?;
    for page in pages {
        write_event(&mut writer, Event::Start(BytesStart::new("sitemap")))?;
        write_text_element(&mut writer, "loc", page)?;
        write_event(&mut writer, Event::End(BytesEnd::new("sitemap")))?;
    }
    finish_document(writer, "sitemapindex")
}

fn start_document(root: &str) -> Result<Writer<Vec<u8>>, SitemapError> {
    let mut writer = Writer::new(Vec::new());
    write_event(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_event(&mut writer, Event::Text(BytesText::from_escaped("\n")))?;
    write_event(
        &mut writer,
        Event::Start(BytesStart::new(root).with_attributes([("xmlns", SITEMAP_NS)])),
    )?;
    Ok(writer)
}

fn finish_document(mut writer: Writer<Vec<u8>>, root: &str) -> Result<String, SitemapError> {
    write_event(&mut writer, Event::End(BytesEnd::new(root)))?;
    String::from_utf8(writer.into_inner()).map_err(render_error)
}

fn write_text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<(), SitemapError> {
    write_event(writer, Event::Start(BytesStart::new(name)))?;
    write_event(writer, Event::Text(BytesText::new(text)))?;
    write_event(writer, Event::End(BytesEnd::new(name)))
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), SitemapError> {
    writer.write_event(event).map_err(render_error)
}

/// `0.8` stays `0.8`; whole numbers keep one decimal, so `1` becomes `1.0`.
fn format_priority(priority: f64) -> String {
    if priority.fract() == 0.0 {
        format!("{:.1}", priority)
    } else {
        priority.to_string()
    }
}
