use std::collections::BTreeMap;

use data_model_sitemap::models::{DEFAULT_SECTION, SitemapEntry};
use quick_xml::escape::escape;
use serde::Serialize;

/// Entries sharing a section name, in path order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub name: String,
    pub entries: Vec<SitemapEntry>,
}

/// What a custom HTML view is rendered with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HtmlViewContext {
    pub entries: Vec<SitemapEntry>,
    pub sections: Vec<Section>,
}

impl HtmlViewContext {
    pub fn new(entries: Vec<SitemapEntry>) -> Self {
        let sections = group_sections(&entries);
        Self { entries, sections }
    }
}

/// Groups entries by section: the unnamed `none` section first, then the rest by name.
///
/// Order within a section follows the input.
pub fn group_sections(entries: &[SitemapEntry]) -> Vec<Section> {
    let mut unnamed = Vec::new();
    let mut named: BTreeMap<&str, Vec<SitemapEntry>> = BTreeMap::new();
    for entry in entries {
        if entry.section == DEFAULT_SECTION {
            unnamed.push(entry.clone());
        } else {
            named.entry(entry.section.as_str()).or_default().push(entry.clone());
        }
    }

    let mut sections = Vec::with_capacity(named.len() + 1);
    if !unnamed.is_empty() {
        sections.push(Section {
            name: DEFAULT_SECTION.to_string(),
            entries: unnamed,
        });
    }
    sections.extend(named.into_iter().map(|(name, entries)| Section {
        name: name.to_string(),
        entries,
    }));
    sections
}

/// Built-in HTML: a bare list for unsectioned entries, then a heading and list per section.
pub fn render_list(entries: &[SitemapEntry]) -> String {
    group_sections(entries)
        .iter()
        .map(|section| {
            let list = link_list(&section.entries);
            if section.name == DEFAULT_SECTION {
                list
            } else {
                format!("<h2>{}</h2>{}", escape(section.name.as_str()), list)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn link_list(entries: &[SitemapEntry]) -> String {
    let items: String = entries
        .iter()
        .map(|entry| {
            format!(
                "<li><a href=\"{}\">{}</a></li>",
                escape(entry.url.as_str()),
                escape(entry.link_text())
            )
        })
        .collect();
    format!("<ul>{}</ul>", items)
}

#[cfg(test)]
mod tests {
    use data_model_sitemap::models::EntryMeta;

    use super::*;

    fn entry(path: &str, section: Option<&str>) -> SitemapEntry {
        let meta = EntryMeta {
            section: section.map(str::to_string),
            ..Default::default()
        };
        SitemapEntry::from_parts(path.to_string(), meta, "http://localhost", "/sitemap").unwrap()
    }

    #[test]
    fn test_sections_after_unnamed_list() {
        let entries = vec![
            entry("/interview1", Some("Interviews")),
            entry("/path1", None),
            entry("/story1", Some("Stories")),
            entry("/story2", Some("Stories")),
        ];
        assert_eq!(
            render_list(&entries),
            "<ul><li><a href=\"http://localhost/path1\">http://localhost/path1</a></li></ul> \
             <h2>Interviews</h2><ul><li><a href=\"http://localhost/interview1\">http://localhost/interview1</a></li></ul> \
             <h2>Stories</h2><ul><li><a href=\"http://localhost/story1\">http://localhost/story1</a></li>\
             <li><a href=\"http://localhost/story2\">http://localhost/story2</a></li></ul>"
        );
    }

    #[test]
    fn test_sections_sorted_by_name() {
        let entries = vec![entry("/a", Some("Zebra")), entry("/b", Some("Apple")), entry("/c", Some("Mango"))];
        let names: Vec<String> = group_sections(&entries).into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Apple", "Mango", "Zebra"]);
    }

    #[test]
    fn test_no_unnamed_list_when_all_sectioned() {
        let html = render_list(&[entry("/story1", Some("Stories"))]);
        assert!(html.starts_with("<h2>Stories</h2>"));
    }

    #[test]
    fn test_title_is_link_text_and_escaped() {
        let mut e = entry("/q", None);
        e.title = Some("Tom & Jerry <3".to_string());
        e.url = "http://localhost/q?a=1&b=2".to_string();
        assert_eq!(
            render_list(&[e]),
            "<ul><li><a href=\"http://localhost/q?a=1&amp;b=2\">Tom &amp; Jerry &lt;3</a></li></ul>"
        );
    }

    #[test]
    fn test_empty() {
        assert_eq!(render_list(&[]), "");
    }
}
