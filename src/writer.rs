//! Byte-level serialization: header, objects, cross-reference table, trailer

use crate::document::ObjectGraph;
use crate::flow::PageStream;
use tracing::{debug, instrument, trace};

/// File header; the second line marks the file as binary
pub const PDF_HEADER: &[u8] = b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n";

/// Append-only output buffer whose length is the next write offset
#[derive(Debug, Clone, Default)]
pub struct PdfBuffer {
    bytes: Vec<u8>,
}

impl PdfBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Current length, i.e. the offset the next append will start at
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether nothing has been written yet
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Append bytes and return the offset they start at
    pub fn append(&mut self, bytes: &[u8]) -> usize {
        let offset = self.bytes.len();
        self.bytes.extend_from_slice(bytes);
        offset
    }

    /// Give up the buffer
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Starting byte offset of every object, in ascending object-number order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OffsetTable {
    entries: Vec<(u32, usize)>,
}

impl OffsetTable {
    /// Record where object `number` begins. Objects must be recorded in
    /// write order, which is also ascending number order.
    pub fn record(&mut self, number: u32, offset: usize) {
        debug_assert_eq!(number as usize, self.entries.len() + 1);
        debug_assert!(self.entries.last().is_none_or(|&(_, last)| last < offset));
        self.entries.push((number, offset));
    }

    /// Offset of an object
    pub fn offset(&self, number: u32) -> Option<usize> {
        self.entries
            .iter()
            .find(|(n, _)| *n == number)
            .map(|(_, offset)| *offset)
    }

    /// All (number, offset) pairs
    pub fn entries(&self) -> &[(u32, usize)] {
        &self.entries
    }

    /// Number of recorded objects
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no object has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the cross-reference section, free-list head included
    pub fn to_xref(&self) -> String {
        let mut xref = format!("xref\n0 {}\n", self.entries.len() + 1);
        xref.push_str("0000000000 65535 f \n");
        for (_, offset) in &self.entries {
            xref.push_str(&format!("{offset:010} 00000 n \n"));
        }
        xref
    }
}

/// A finished document and the bookkeeping used to write it
#[derive(Debug, Clone)]
pub struct SerializedDocument {
    pub bytes: Vec<u8>,
    pub offsets: OffsetTable,
    /// Byte offset of the `xref` keyword
    pub xref_offset: usize,
}

/// Write the object graph to bytes.
///
/// Objects are written in ascending number order and each offset is captured
/// immediately before its bytes are appended.
#[instrument(skip_all, fields(objects = graph.len()))]
pub fn serialize(graph: &ObjectGraph) -> SerializedDocument {
    let mut buffer = PdfBuffer::new();
    let mut offsets = OffsetTable::default();

    buffer.append(PDF_HEADER);
    for (&number, object) in &graph.objects {
        let offset = buffer.append(object);
        trace!("Wrote object {} at offset {}", number, offset);
        offsets.record(number, offset);
    }

    let xref_offset = buffer.append(offsets.to_xref().as_bytes());
    let trailer = format!(
        "trailer\n<< /Size {} /Root {} 0 R >>\nstartxref\n{}\n%%EOF\n",
        offsets.len() + 1,
        graph.numbering.catalog,
        xref_offset
    );
    buffer.append(trailer.as_bytes());

    debug!(
        "Serialized {} objects into {} bytes",
        offsets.len(),
        buffer.len()
    );
    SerializedDocument {
        bytes: buffer.into_bytes(),
        offsets,
        xref_offset,
    }
}

/// Assemble and serialize pages into a complete PDF file
pub fn write_pdf(pages: &[PageStream]) -> SerializedDocument {
    serialize(&ObjectGraph::build(pages))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{PAGE_NUMBER_TOKEN, PAGE_TOTAL_TOKEN};

    fn sample_pages() -> Vec<PageStream> {
        let footer = format!("BT (Page {PAGE_NUMBER_TOKEN} of {PAGE_TOTAL_TOKEN}) Tj ET\n");
        vec![
            PageStream::cover("BT (cover) Tj ET\n".to_string()),
            PageStream::content(format!("BT (first) Tj ET\n{footer}"), 1),
            PageStream::content(format!("BT (second) Tj ET\n{footer}"), 2),
        ]
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_buffer_append_returns_offsets() {
        let mut buffer = PdfBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.append(b"abc"), 0);
        assert_eq!(buffer.append(b"de"), 3);
        assert_eq!(buffer.len(), 5);
    }

    #[test]
    fn test_starts_with_header_and_ends_with_eof() {
        let doc = write_pdf(&sample_pages());
        assert!(doc.bytes.starts_with(b"%PDF-1.4\n"));
        assert!(doc.bytes.ends_with(b"%%EOF\n"));
    }

    #[test]
    fn test_offsets_point_at_their_objects() {
        let pages = sample_pages();
        let graph = ObjectGraph::build(&pages);
        let doc = serialize(&graph);

        assert_eq!(doc.offsets.len(), graph.len());
        for (&number, object) in &graph.objects {
            let offset = doc.offsets.offset(number).unwrap();
            assert_eq!(&doc.bytes[offset..offset + object.len()], object.as_slice());
            let prefix = format!("{number} 0 obj\n");
            assert!(doc.bytes[offset..].starts_with(prefix.as_bytes()));
        }
    }

    #[test]
    fn test_xref_entries_match_offsets() {
        let doc = write_pdf(&sample_pages());
        let xref = String::from_utf8_lossy(&doc.bytes[doc.xref_offset..]).to_string();
        let mut lines = xref.lines();
        assert_eq!(lines.next(), Some("xref"));
        assert_eq!(lines.next(), Some(format!("0 {}", doc.offsets.len() + 1).as_str()));
        assert_eq!(lines.next(), Some("0000000000 65535 f "));
        for &(_, offset) in doc.offsets.entries() {
            assert_eq!(lines.next(), Some(format!("{offset:010} 00000 n ").as_str()));
        }
        assert_eq!(lines.next(), Some("trailer"));
    }

    #[test]
    fn test_xref_entries_are_twenty_bytes() {
        let table = OffsetTable {
            entries: vec![(1, 15), (2, 1234567)],
        };
        let xref = table.to_xref();
        for line in xref.split_inclusive('\n').skip(2) {
            assert_eq!(line.len(), 20, "{line:?}");
        }
    }

    #[test]
    fn test_startxref_points_at_xref_keyword() {
        let doc = write_pdf(&sample_pages());
        assert!(doc.bytes[doc.xref_offset..].starts_with(b"xref\n"));
        let tail = String::from_utf8_lossy(&doc.bytes[doc.xref_offset..]).to_string();
        assert!(tail.contains(&format!("startxref\n{}\n%%EOF", doc.xref_offset)));
        assert!(tail.contains("/Size 10 /Root 1 0 R"));
    }

    #[test]
    fn test_no_placeholder_survives() {
        let doc = write_pdf(&sample_pages());
        assert!(!contains(&doc.bytes, PAGE_NUMBER_TOKEN.as_bytes()));
        assert!(!contains(&doc.bytes, PAGE_TOTAL_TOKEN.as_bytes()));
        assert!(contains(&doc.bytes, b"(Page 1 of 2)"));
        assert!(contains(&doc.bytes, b"(Page 2 of 2)"));
    }
}
