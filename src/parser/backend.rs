//! PDF backend abstraction layer.
//!
//! [`PageSource`] is the seam between document assembly and the concrete PDF
//! library: it only knows how many pages there are and which glyph runs each
//! page produces. [`LopdfSource`] implements it with `lopdf` and the content
//! stream scanner.

use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId, Stream};

use crate::error::{Error, Result};
use crate::model::GlyphRun;

use super::content::{scan_glyph_runs, FontResolver};
use super::fonts::{resolve, FontMetrics};

/// A value from a PDF content stream operand.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfValue {
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Other,
}

impl PdfValue {
    /// Numeric value, if the operand is a number.
    pub fn as_number(&self) -> Option<f32> {
        match self {
            PdfValue::Integer(i) => Some(*i as f32),
            PdfValue::Real(r) => Some(*r),
            _ => None,
        }
    }
}

/// A single operation from a PDF content stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

impl ContentOp {
    /// Create an operation.
    pub fn new(operator: impl Into<String>, operands: Vec<PdfValue>) -> Self {
        Self {
            operator: operator.into(),
            operands,
        }
    }
}

/// Upstream text layer: page count and positioned glyph runs per page.
///
/// Pages are 1-indexed.
pub trait PageSource {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Glyph runs of a page in extraction order.
    fn glyph_runs(&self, page: u32) -> Result<Vec<GlyphRun>>;
}

/// Simple text decoding fallback when no encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

/// [`PageSource`] backed by `lopdf::Document`.
pub struct LopdfSource {
    doc: LopdfDocument,
    pages: BTreeMap<u32, ObjectId>,
}

impl LopdfSource {
    /// Load from a file path.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let doc = LopdfDocument::load(path)?;
        Self::from_document(doc)
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        Self::from_document(doc)
    }

    /// Load from a reader.
    pub fn load_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::load_bytes(&data)
    }

    /// Wrap an already loaded document.
    pub fn from_document(doc: LopdfDocument) -> Result<Self> {
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }
        let pages = doc.get_pages();
        Ok(Self { doc, pages })
    }

    /// Get PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    fn page_id(&self, page: u32) -> Result<ObjectId> {
        self.pages
            .get(&page)
            .copied()
            .ok_or(Error::PageOutOfRange(page, self.page_count()))
    }

    /// Decompressed content stream of a page.
    ///
    /// A page without `/Contents` has an empty stream. Array contents are
    /// concatenated with a separating space.
    fn page_content(&self, page: u32, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::extraction(page, e.to_string()))?;

        let Ok(contents) = page_dict.get(b"Contents") else {
            return Ok(Vec::new());
        };

        match resolve(&self.doc, contents) {
            Object::Stream(s) => stream_bytes(page, s),
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    let Object::Stream(s) = resolve(&self.doc, obj) else {
                        return Err(Error::extraction(page, "Invalid content stream entry"));
                    };
                    content.extend_from_slice(&stream_bytes(page, s)?);
                    content.push(b' ');
                }
                Ok(content)
            }
            Object::Null => Ok(Vec::new()),
            _ => Err(Error::extraction(page, "Invalid content stream")),
        }
    }

    fn decode_content(&self, page: u32, data: &[u8]) -> Result<Vec<ContentOp>> {
        let content = lopdf::content::Content::decode(data)
            .map_err(|e| Error::extraction(page, e.to_string()))?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operator: op.operator,
                operands: op.operands.iter().map(convert_object).collect(),
            })
            .collect())
    }
}

impl PageSource for LopdfSource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn glyph_runs(&self, page: u32) -> Result<Vec<GlyphRun>> {
        let page_id = self.page_id(page)?;

        let data = self.page_content(page, page_id)?;
        if data.is_empty() {
            return Ok(Vec::new());
        }
        let ops = self.decode_content(page, &data)?;

        let fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::extraction(page, e.to_string()))?;
        let resolver = LopdfFonts::new(&self.doc, fonts);

        Ok(scan_glyph_runs(&ops, &resolver))
    }
}

/// Font lookup for one page: encodings through lopdf, widths cached per font.
struct LopdfFonts<'a> {
    doc: &'a LopdfDocument,
    fonts: BTreeMap<Vec<u8>, &'a Dictionary>,
    metrics: HashMap<Vec<u8>, FontMetrics>,
}

impl<'a> LopdfFonts<'a> {
    fn new(doc: &'a LopdfDocument, fonts: BTreeMap<Vec<u8>, &'a Dictionary>) -> Self {
        let metrics = fonts
            .iter()
            .map(|(name, dict)| (name.clone(), FontMetrics::from_dict(doc, dict)))
            .collect();
        Self {
            doc,
            fonts,
            metrics,
        }
    }
}

impl FontResolver for LopdfFonts<'_> {
    fn metrics(&self, font: &[u8]) -> Option<&FontMetrics> {
        self.metrics.get(font)
    }

    fn decode(&self, font: &[u8], bytes: &[u8]) -> String {
        if let Some(font_dict) = self.fonts.get(font) {
            if let Ok(enc) = font_dict.get_font_encoding(self.doc) {
                match LopdfDocument::decode_text(&enc, bytes) {
                    Ok(text) => return text,
                    Err(e) => log::warn!(
                        "Failed to decode text in font {}: {}",
                        String::from_utf8_lossy(font),
                        e
                    ),
                }
            }
        }
        decode_text_simple(bytes)
    }
}

/// Stream data with filters applied; unfiltered streams are returned as is.
fn stream_bytes(page: u32, stream: &Stream) -> Result<Vec<u8>> {
    if stream.dict.get(b"Filter").is_err() {
        return Ok(stream.content.clone());
    }
    stream
        .decompressed_content()
        .map_err(|e| Error::extraction(page, e.to_string()))
}

/// Convert a `lopdf::Object` to [`PdfValue`].
fn convert_object(obj: &Object) -> PdfValue {
    match obj {
        Object::Integer(i) => PdfValue::Integer(*i),
        Object::Real(r) => PdfValue::Real(*r),
        Object::Name(n) => PdfValue::Name(n.clone()),
        Object::String(b, _) => PdfValue::Str(b.clone()),
        Object::Array(arr) => PdfValue::Array(arr.iter().map(convert_object).collect()),
        _ => PdfValue::Other,
    }
}
