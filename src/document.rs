//! Document assembly: object numbering, deferred token substitution and the
//! object graph handed to the writer.
//!
//! Numbering is fixed before any bytes exist: the catalog is object 1, the
//! page tree object 2, each page takes a (page, content) pair starting at 3,
//! and the single font object comes last so every page can reference it.

use crate::constants::*;
use crate::drawing::fmt_num;
use crate::flow::PageStream;
use std::collections::BTreeMap;
use tracing::{debug, instrument, trace};

/// Logical role of an object in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectRole {
    Catalog,
    PageTree,
    /// Page dictionary for the page at this position in the page list
    Page(usize),
    /// Content stream for the page at this position in the page list
    Content(usize),
    Font,
}

/// Object numbers of one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageObjects {
    pub page: u32,
    pub content: u32,
}

/// Role-to-number table built before serialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectNumbering {
    pub catalog: u32,
    pub page_tree: u32,
    pub pages: Vec<PageObjects>,
    pub font: u32,
}

impl ObjectNumbering {
    /// Assign numbers for a document with `page_count` pages
    pub fn assign(page_count: usize) -> Self {
        let pages: Vec<PageObjects> = (0..page_count as u32)
            .map(|i| PageObjects {
                page: 3 + 2 * i,
                content: 4 + 2 * i,
            })
            .collect();
        let font = 3 + 2 * page_count as u32;

        Self {
            catalog: 1,
            page_tree: 2,
            pages,
            font,
        }
    }

    /// Total number of objects (excluding the free-list head)
    pub fn object_count(&self) -> u32 {
        self.font
    }

    /// Every (number, role) pair in ascending object-number order
    pub fn entries(&self) -> Vec<(u32, ObjectRole)> {
        let mut entries = vec![
            (self.catalog, ObjectRole::Catalog),
            (self.page_tree, ObjectRole::PageTree),
        ];
        for (i, objects) in self.pages.iter().enumerate() {
            entries.push((objects.page, ObjectRole::Page(i)));
            entries.push((objects.content, ObjectRole::Content(i)));
        }
        entries.push((self.font, ObjectRole::Font));
        entries
    }

    /// Number assigned to a role
    pub fn number(&self, role: ObjectRole) -> Option<u32> {
        match role {
            ObjectRole::Catalog => Some(self.catalog),
            ObjectRole::PageTree => Some(self.page_tree),
            ObjectRole::Page(i) => self.pages.get(i).map(|p| p.page),
            ObjectRole::Content(i) => self.pages.get(i).map(|p| p.content),
            ObjectRole::Font => Some(self.font),
        }
    }
}

/// Replace the deferred page tokens in every page's content.
///
/// Content pages are numbered 1..=N in order, where N counts content pages
/// only; the cover is neither numbered nor counted.
pub fn substitute_page_tokens(pages: &[PageStream]) -> Vec<String> {
    let total = pages.iter().filter(|p| !p.is_cover).count();
    let total_text = total.to_string();
    let mut index = 0;

    pages
        .iter()
        .map(|page| {
            let content = page.content.replace(PAGE_TOTAL_TOKEN, &total_text);
            if page.is_cover {
                return content;
            }
            index += 1;
            debug_assert_eq!(page.page_index.unwrap_or(index), index);
            content.replace(PAGE_NUMBER_TOKEN, &index.to_string())
        })
        .collect()
}

/// Serialized objects keyed by object number
#[derive(Debug, Clone)]
pub struct ObjectGraph {
    pub numbering: ObjectNumbering,
    /// Complete `N 0 obj ... endobj` bytes of every object
    pub objects: BTreeMap<u32, Vec<u8>>,
}

impl ObjectGraph {
    /// Build the object graph for the given pages
    #[instrument(skip_all, fields(pages = pages.len()))]
    pub fn build(pages: &[PageStream]) -> Self {
        debug_assert!(!pages.is_empty(), "a document needs at least one page");

        let numbering = ObjectNumbering::assign(pages.len());
        let contents = substitute_page_tokens(pages);
        let mut objects = BTreeMap::new();

        for (number, role) in numbering.entries() {
            let body = match role {
                ObjectRole::Catalog => catalog_body(&numbering),
                ObjectRole::PageTree => page_tree_body(&numbering),
                ObjectRole::Page(i) => page_body(&numbering, i),
                ObjectRole::Content(i) => stream_body(contents[i].as_bytes()),
                ObjectRole::Font => font_body(),
            };
            trace!("Object {} ({:?}): {} bytes", number, role, body.len());
            objects.insert(number, wrap_object(number, &body));
        }

        debug!("Built object graph with {} objects", objects.len());
        Self { numbering, objects }
    }

    /// Number of objects in the graph
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the graph has no objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

fn wrap_object(number: u32, body: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(body.len() + 32);
    bytes.extend_from_slice(format!("{number} 0 obj\n").as_bytes());
    bytes.extend_from_slice(body);
    bytes.extend_from_slice(b"\nendobj\n");
    bytes
}

fn catalog_body(numbering: &ObjectNumbering) -> Vec<u8> {
    format!("<< /Type /Catalog /Pages {} 0 R >>", numbering.page_tree).into_bytes()
}

fn page_tree_body(numbering: &ObjectNumbering) -> Vec<u8> {
    let kids: Vec<String> = numbering
        .pages
        .iter()
        .map(|p| format!("{} 0 R", p.page))
        .collect();
    format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        numbering.pages.len()
    )
    .into_bytes()
}

fn page_body(numbering: &ObjectNumbering, index: usize) -> Vec<u8> {
    let objects = numbering.pages[index];
    format!(
        "<< /Type /Page /Parent {} 0 R /MediaBox [0 0 {} {}] \
         /Resources << /Font << /{} {} 0 R >> >> /Contents {} 0 R >>",
        numbering.page_tree,
        fmt_num(PAGE_WIDTH),
        fmt_num(PAGE_HEIGHT),
        FONT_RESOURCE,
        numbering.font,
        objects.content
    )
    .into_bytes()
}

fn stream_body(data: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(data.len() + 48);
    body.extend_from_slice(format!("<< /Length {} >>\nstream\n", data.len()).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(b"\nendstream");
    body
}

fn font_body() -> Vec<u8> {
    format!(
        "<< /Type /Font /Subtype /Type1 /BaseFont /{BASE_FONT} /Encoding /WinAnsiEncoding >>"
    )
    .into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(cover: bool, content_pages: usize) -> Vec<PageStream> {
        let mut pages = Vec::new();
        if cover {
            pages.push(PageStream::cover("BT (cover) Tj ET\n".to_string()));
        }
        for i in 1..=content_pages {
            pages.push(PageStream::content(
                format!("BT (body {i}) Tj ET\nBT (Page {PAGE_NUMBER_TOKEN} of {PAGE_TOTAL_TOKEN}) Tj ET\n"),
                i,
            ));
        }
        pages
    }

    #[test]
    fn test_numbering_scheme() {
        let numbering = ObjectNumbering::assign(3);
        assert_eq!(numbering.catalog, 1);
        assert_eq!(numbering.page_tree, 2);
        assert_eq!(
            numbering.pages,
            vec![
                PageObjects { page: 3, content: 4 },
                PageObjects { page: 5, content: 6 },
                PageObjects { page: 7, content: 8 },
            ]
        );
        assert_eq!(numbering.font, 9);
        assert_eq!(numbering.object_count(), 9);
    }

    #[test]
    fn test_entries_are_sequential() {
        let numbering = ObjectNumbering::assign(4);
        let numbers: Vec<u32> = numbering.entries().iter().map(|(n, _)| *n).collect();
        let expected: Vec<u32> = (1..=numbering.object_count()).collect();
        assert_eq!(numbers, expected);
        for (number, role) in numbering.entries() {
            assert_eq!(numbering.number(role), Some(number));
        }
        assert_eq!(numbering.number(ObjectRole::Page(4)), None);
    }

    #[test]
    fn test_substitution_skips_cover() {
        let contents = substitute_page_tokens(&pages(true, 3));
        assert_eq!(contents[0], "BT (cover) Tj ET\n");
        assert!(contents[1].contains("(Page 1 of 3)"));
        assert!(contents[2].contains("(Page 2 of 3)"));
        assert!(contents[3].contains("(Page 3 of 3)"));
        for content in &contents {
            assert!(!content.contains(PAGE_NUMBER_TOKEN));
            assert!(!content.contains(PAGE_TOTAL_TOKEN));
        }
    }

    #[test]
    fn test_page_tree_lists_kids_in_order() {
        let graph = ObjectGraph::build(&pages(true, 2));
        let tree = String::from_utf8(graph.objects[&2].clone()).unwrap();
        assert!(tree.starts_with("2 0 obj\n<< /Type /Pages /Kids [3 0 R 5 0 R 7 0 R] /Count 3 >>"));
        let page_objects = graph
            .objects
            .values()
            .filter(|o| String::from_utf8_lossy(o).contains("/Type /Page /Parent"))
            .count();
        assert_eq!(page_objects, 3);
    }

    #[test]
    fn test_pages_reference_font_and_contents() {
        let graph = ObjectGraph::build(&pages(false, 2));
        let page = String::from_utf8(graph.objects[&5].clone()).unwrap();
        assert!(page.contains("/Font << /F1 7 0 R >>"));
        assert!(page.contains("/Contents 6 0 R"));
        assert!(page.contains("/MediaBox [0 0 612 792]"));
        let font = String::from_utf8(graph.objects[&7].clone()).unwrap();
        assert!(font.contains("/BaseFont /Helvetica"));
    }

    #[test]
    fn test_stream_length_matches_data() {
        let graph = ObjectGraph::build(&pages(false, 1));
        let content = String::from_utf8(graph.objects[&4].clone()).unwrap();
        let expected = "BT (body 1) Tj ET\nBT (Page 1 of 1) Tj ET\n";
        assert!(content.contains(&format!("<< /Length {} >>", expected.len())));
        assert!(content.contains(&format!("stream\n{expected}\nendstream")));
    }
}
