//! Content stream interpretation.
//!
//! Walks the operators of a page content stream, tracking the graphics and
//! text state, and emits one [`GlyphRun`] per text-showing operator with its
//! device-space origin and advance.

use crate::model::GlyphRun;

use super::backend::{ContentOp, PdfValue};
use super::fonts::FontMetrics;

/// `TJ` adjustment (thousandths of an em) above which a word break is assumed.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Font lookup used while scanning a page.
pub trait FontResolver {
    /// Width metrics of a font resource, if known.
    fn metrics(&self, font: &[u8]) -> Option<&FontMetrics>;

    /// Decode shown bytes to text using the font's encoding.
    fn decode(&self, font: &[u8], bytes: &[u8]) -> String;
}

/// 2D affine transformation `[a b c d e f]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn translation(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Concatenate: `self` applied first, then `other`.
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// Transform a point.
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            x * self.a + y * self.c + self.e,
            x * self.b + y * self.d + self.f,
        )
    }

    fn from_operands(operands: &[PdfValue]) -> Option<Self> {
        let mut n = operands.iter().map(PdfValue::as_number);
        Some(Self::new(
            n.next()??,
            n.next()??,
            n.next()??,
            n.next()??,
            n.next()??,
            n.next()??,
        ))
    }
}

#[derive(Debug, Clone)]
struct TextState {
    font: Vec<u8>,
    size: f32,
    char_spacing: f32,
    word_spacing: f32,
    horizontal_scaling: f32,
    leading: f32,
    rise: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font: Vec::new(),
            size: 12.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scaling: 1.0,
            leading: 0.0,
            rise: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct GraphicsState {
    ctm: Matrix,
    text: TextState,
}

/// Interpret decoded content operations and collect the page's glyph runs.
///
/// Runs come out in content-stream order. Strings that decode to nothing
/// produce no run but still move the pen. Text-showing operators outside a
/// `BT`/`ET` pair are ignored.
pub fn scan_glyph_runs<R: FontResolver + ?Sized>(ops: &[ContentOp], fonts: &R) -> Vec<GlyphRun> {
    let mut scanner = Scanner::new(fonts);
    for op in ops {
        scanner.apply(op);
    }
    scanner.runs
}

struct Scanner<'r, R: ?Sized> {
    fonts: &'r R,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    in_text: bool,
    runs: Vec<GlyphRun>,
}

impl<'r, R: FontResolver + ?Sized> Scanner<'r, R> {
    fn new(fonts: &'r R) -> Self {
        Self {
            fonts,
            state: GraphicsState::default(),
            stack: Vec::new(),
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            in_text: false,
            runs: Vec::new(),
        }
    }

    fn apply(&mut self, op: &ContentOp) {
        let operands = op.operands.as_slice();
        let num = |i: usize| operands.get(i).and_then(PdfValue::as_number);

        match op.operator.as_str() {
            "q" => self.stack.push(self.state.clone()),
            "Q" => {
                if let Some(state) = self.stack.pop() {
                    self.state = state;
                }
            }
            "cm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    self.state.ctm = m.multiply(&self.state.ctm);
                }
            }
            "BT" => {
                self.in_text = true;
                self.text_matrix = Matrix::IDENTITY;
                self.line_matrix = Matrix::IDENTITY;
            }
            "ET" => self.in_text = false,
            "Tf" => {
                if let Some(PdfValue::Name(name)) = operands.first() {
                    self.state.text.font = name.clone();
                }
                if let Some(size) = num(1) {
                    self.state.text.size = size;
                }
            }
            "Tc" => self.state.text.char_spacing = num(0).unwrap_or(0.0),
            "Tw" => self.state.text.word_spacing = num(0).unwrap_or(0.0),
            "Tz" => self.state.text.horizontal_scaling = num(0).unwrap_or(100.0) / 100.0,
            "TL" => self.state.text.leading = num(0).unwrap_or(0.0),
            "Ts" => self.state.text.rise = num(0).unwrap_or(0.0),
            "Td" => {
                if let (Some(tx), Some(ty)) = (num(0), num(1)) {
                    self.move_line(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (num(0), num(1)) {
                    self.state.text.leading = -ty;
                    self.move_line(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    self.text_matrix = m;
                    self.line_matrix = m;
                }
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(text) = operands.first() {
                    self.show(std::slice::from_ref(text));
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(items)) = operands.first() {
                    self.show(items);
                }
            }
            "'" => {
                self.next_line();
                if let Some(text) = operands.first() {
                    self.show(std::slice::from_ref(text));
                }
            }
            "\"" => {
                if let (Some(aw), Some(ac)) = (num(0), num(1)) {
                    self.state.text.word_spacing = aw;
                    self.state.text.char_spacing = ac;
                }
                self.next_line();
                if let Some(text) = operands.get(2) {
                    self.show(std::slice::from_ref(text));
                }
            }
            _ => {}
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = Matrix::translation(tx, ty).multiply(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        let leading = self.state.text.leading;
        self.move_line(0.0, -leading);
    }

    /// Show strings and `TJ` adjustments as one run.
    fn show(&mut self, items: &[PdfValue]) {
        if !self.in_text {
            return;
        }

        let ts = &self.state.text;
        let device = self.text_matrix.multiply(&self.state.ctm);
        let (x, y) = device.apply(0.0, ts.rise);

        let mut text = String::new();
        let mut advance = 0.0;

        for item in items {
            match item {
                PdfValue::Str(bytes) => {
                    text.push_str(&self.fonts.decode(&ts.font, bytes));
                    advance += self.string_advance(bytes);
                }
                other => {
                    let Some(adjustment) = other.as_number() else {
                        continue;
                    };
                    advance -= adjustment / 1000.0 * ts.size * ts.horizontal_scaling;
                    if -adjustment > TJ_SPACE_THRESHOLD && ends_with_word(&text) {
                        text.push(' ');
                    }
                }
            }
        }

        let moved = Matrix::translation(advance, 0.0).multiply(&self.text_matrix);
        let (end_x, _) = moved.multiply(&self.state.ctm).apply(0.0, ts.rise);
        self.text_matrix = moved;

        if !text.is_empty() {
            self.runs.push(GlyphRun::new(text, x, end_x - x, y));
        }
    }

    /// Horizontal displacement of a string in unscaled text space.
    fn string_advance(&self, bytes: &[u8]) -> f32 {
        let ts = &self.state.text;
        let fallback = FontMetrics::default();
        let metrics = self.fonts.metrics(&ts.font).unwrap_or(&fallback);

        metrics
            .codes(bytes)
            .into_iter()
            .map(|code| {
                let mut tx = metrics.width(code) / 1000.0 * ts.size + ts.char_spacing;
                if code == 32 && !metrics.is_two_byte() {
                    tx += ts.word_spacing;
                }
                tx * ts.horizontal_scaling
            })
            .sum()
    }
}

/// Whether a `TJ` gap after `text` should become a space.
fn ends_with_word(text: &str) -> bool {
    text.chars()
        .last()
        .is_some_and(|c| !c.is_whitespace() && !is_spaceless_script_char(c))
}

/// Characters from scripts written without word spaces (Chinese, Japanese).
///
/// Hangul is not included: Korean uses word spaces.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and extensions
    (0x4E00..=0x9FFF).contains(&code)
        || (0x3400..=0x4DBF).contains(&code)
        || (0x20000..=0x2EBEF).contains(&code)
        // Hiragana, Katakana
        || (0x3040..=0x30FF).contains(&code)
        // CJK Symbols and Punctuation
        || (0x3000..=0x303F).contains(&code)
}
