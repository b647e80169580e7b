//! Output renderers.

mod html;
mod json;
mod txt;
mod xml;

pub use html::{HtmlViewContext, Section, group_sections};

use data_model_sitemap::errors::SitemapError;
use data_model_sitemap::models::OutputType;

use crate::config::SitemapOptions;
use crate::paginate::Paged;
use crate::request::SitemapRequest;

/// A finished response body and its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub content_type: &'static str,
    pub body: String,
}

/// Formats a paginated entry list in the requested representation.
pub fn render(
    paged: Paged,
    output: OutputType,
    options: &SitemapOptions,
    request: &SitemapRequest,
) -> Result<Rendered, SitemapError> {
    let entries = match paged {
        Paged::Index(pages) => {
            return Ok(Rendered {
                content_type: OutputType::Xml.content_type(),
                body: xml::render_index(&pages)?,
            });
        }
        Paged::Entries(entries) => entries,
    };

    let body = match output {
        OutputType::Html => match (&options.settings.html_view, &options.view_engine) {
            (Some(view), Some(engine)) => {
                let context = HtmlViewContext::new(entries);
                engine.render(view, &context)?
            }
            _ => html::render_list(&entries),
        },
        OutputType::Xml => xml::render_urlset(&entries)?,
        OutputType::Txt => txt::render(&entries),
        OutputType::Json => json::render(&entries, request.include_meta())?,
    };

    Ok(Rendered {
        content_type: output.content_type(),
        body,
    })
}

/// Maps a serializer failure to a request error.
pub(crate) fn render_error<E: std::fmt::Display>(err: E) -> SitemapError {
    SitemapError::Render(err.to_string())
}
