//! Glyph width metrics for simple and composite fonts.

use std::collections::HashMap;

use lopdf::{Dictionary, Document as LopdfDocument, Object};

/// Width used when a font gives no usable metrics, in thousandths of an em.
pub const DEFAULT_GLYPH_WIDTH: f32 = 500.0;

/// Horizontal glyph metrics of one font resource.
///
/// Widths are in glyph space (thousandths of an em). Simple fonts map
/// single-byte codes through `/FirstChar` and `/Widths`; Type0 fonts use
/// two-byte codes and the descendant font's `/W` array.
#[derive(Debug, Clone, PartialEq)]
pub struct FontMetrics {
    first_char: u32,
    widths: Vec<f32>,
    cid_widths: HashMap<u32, f32>,
    default_width: f32,
    two_byte: bool,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self {
            first_char: 0,
            widths: Vec::new(),
            cid_widths: HashMap::new(),
            default_width: DEFAULT_GLYPH_WIDTH,
            two_byte: false,
        }
    }
}

impl FontMetrics {
    /// Metrics for a simple font with a `/Widths` table starting at `first_char`.
    pub fn simple(first_char: u32, widths: Vec<f32>, missing_width: Option<f32>) -> Self {
        Self {
            first_char,
            widths,
            default_width: missing_width.unwrap_or(DEFAULT_GLYPH_WIDTH),
            ..Self::default()
        }
    }

    /// Metrics for a composite (Type0) font with two-byte codes.
    pub fn composite(cid_widths: HashMap<u32, f32>, default_width: Option<f32>) -> Self {
        Self {
            cid_widths,
            default_width: default_width.unwrap_or(DEFAULT_GLYPH_WIDTH),
            two_byte: true,
            ..Self::default()
        }
    }

    /// Read metrics from a font dictionary.
    ///
    /// Missing or malformed entries fall back to [`DEFAULT_GLYPH_WIDTH`]
    /// rather than failing: widths only affect spacing.
    pub fn from_dict(doc: &LopdfDocument, font: &Dictionary) -> Self {
        let subtype = font.get(b"Subtype").and_then(Object::as_name).ok();
        if subtype == Some(b"Type0".as_slice()) {
            return Self::from_type0(doc, font);
        }

        let first_char = font
            .get(b"FirstChar")
            .and_then(Object::as_i64)
            .ok()
            .and_then(|c| u32::try_from(c).ok())
            .unwrap_or(0);

        let widths = font
            .get(b"Widths")
            .ok()
            .and_then(|o| resolve(doc, o).as_array().ok())
            .map(|arr| arr.iter().map(|w| number(doc, w).unwrap_or(0.0)).collect())
            .unwrap_or_default();

        let missing_width = font
            .get(b"FontDescriptor")
            .ok()
            .and_then(|o| resolve(doc, o).as_dict().ok())
            .and_then(|d| d.get(b"MissingWidth").ok())
            .and_then(|w| number(doc, w));

        Self::simple(first_char, widths, missing_width)
    }

    fn from_type0(doc: &LopdfDocument, font: &Dictionary) -> Self {
        let descendant = font
            .get(b"DescendantFonts")
            .ok()
            .and_then(|o| resolve(doc, o).as_array().ok())
            .and_then(|arr| arr.first())
            .and_then(|o| resolve(doc, o).as_dict().ok());

        let Some(descendant) = descendant else {
            log::debug!("Type0 font without a descendant font, using default widths");
            return Self::composite(HashMap::new(), None);
        };

        let default_width = descendant.get(b"DW").ok().and_then(|w| number(doc, w));
        let cid_widths = descendant
            .get(b"W")
            .ok()
            .and_then(|o| resolve(doc, o).as_array().ok())
            .map(|arr| parse_cid_widths(doc, arr))
            .unwrap_or_default();

        Self::composite(cid_widths, default_width)
    }

    /// Whether character codes are two bytes wide.
    pub fn is_two_byte(&self) -> bool {
        self.two_byte
    }

    /// Split a shown string into character codes.
    pub fn codes(&self, bytes: &[u8]) -> Vec<u32> {
        if self.two_byte {
            bytes
                .chunks(2)
                .map(|pair| match pair {
                    [hi, lo] => u32::from(*hi) << 8 | u32::from(*lo),
                    [single] => u32::from(*single),
                    _ => 0,
                })
                .collect()
        } else {
            bytes.iter().map(|&b| u32::from(b)).collect()
        }
    }

    /// Width of a character code in thousandths of an em.
    pub fn width(&self, code: u32) -> f32 {
        if self.two_byte {
            return self
                .cid_widths
                .get(&code)
                .copied()
                .unwrap_or(self.default_width);
        }

        code.checked_sub(self.first_char)
            .and_then(|i| self.widths.get(i as usize))
            .copied()
            .unwrap_or(self.default_width)
    }
}

/// Largest CID addressable by a two-byte code.
const MAX_CID: u32 = 0xFFFF;

/// Parse a CID `/W` array: `c [w1 w2 ...]` or `c_first c_last w` entries.
///
/// Entries outside `0..=MAX_CID` are dropped and ranges are clamped to it.
fn parse_cid_widths(doc: &LopdfDocument, arr: &[Object]) -> HashMap<u32, f32> {
    let mut widths = HashMap::new();
    let mut i = 0;

    while i < arr.len() {
        let Some(first) = code(doc, &arr[i]) else {
            break;
        };

        match arr.get(i + 1).map(|o| resolve(doc, o)) {
            Some(Object::Array(list)) => {
                for (offset, w) in list.iter().enumerate() {
                    let Some(cid) = first.checked_add(offset as i64) else {
                        break;
                    };
                    if cid > i64::from(MAX_CID) {
                        break;
                    }
                    if let (Some(cid), Some(w)) = (cid_in_range(cid), number(doc, w)) {
                        widths.insert(cid, w);
                    }
                }
                i += 2;
            }
            Some(last) => {
                let (Some(last), Some(w)) = (
                    code(doc, last),
                    arr.get(i + 2).and_then(|w| number(doc, w)),
                ) else {
                    break;
                };
                let start = first.max(0);
                let end = last.min(i64::from(MAX_CID));
                for cid in (start..=end).filter_map(cid_in_range) {
                    widths.insert(cid, w);
                }
                i += 3;
            }
            None => break,
        }
    }

    widths
}

/// A character code operand as an integer.
fn code(doc: &LopdfDocument, obj: &Object) -> Option<i64> {
    match resolve(doc, obj) {
        Object::Integer(i) => Some(*i),
        Object::Real(r) if r.is_finite() => Some(*r as i64),
        _ => None,
    }
}

fn cid_in_range(cid: i64) -> Option<u32> {
    u32::try_from(cid).ok().filter(|&cid| cid <= MAX_CID)
}

/// Follow a reference to its target object, or return the object itself.
pub(crate) fn resolve<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

fn number(doc: &LopdfDocument, obj: &Object) -> Option<f32> {
    match resolve(doc, obj) {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
