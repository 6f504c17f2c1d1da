//! Content stream interpreter.
//!
//! Walks the operators decoded by `lopdf`, maintaining graphics and text
//! state, and emits glyph and path events to a [`ContentHandler`]. Form
//! XObjects are interpreted recursively up to [`MAX_FORM_DEPTH`].

use std::collections::HashMap;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream};
use rigreport_core::Ctm;

use crate::error::BackendError;
use crate::font::LoadedFont;
use crate::handler::{CharEvent, ContentHandler, PaintOp, PathEvent, PathSegment};
use crate::interpreter_state::InterpreterState;
use crate::lopdf_backend::{number, resolve};
use crate::text_state::TextState;

/// Deepest nesting of Form XObjects that is followed.
pub const MAX_FORM_DEPTH: usize = 12;

/// Interpret a decoded content stream against `resources`.
pub fn interpret_content(
    doc: &Document,
    content: &[u8],
    resources: &Dictionary,
    handler: &mut dyn ContentHandler,
    gstate: &mut InterpreterState,
) -> Result<(), BackendError> {
    let mut tstate = TextState::new();
    let mut interpreter = Interpreter { doc, handler };
    interpreter.run(content, resources, 0, gstate, &mut tstate)
}

/// Path under construction; points are stored in device space.
#[derive(Debug, Default)]
struct PathBuilder {
    segments: Vec<PathSegment>,
    start: Option<(f64, f64)>,
    current: Option<(f64, f64)>,
}

impl PathBuilder {
    fn move_to(&mut self, p: (f64, f64)) {
        self.segments.push(PathSegment::MoveTo(p.0, p.1));
        self.start = Some(p);
        self.current = Some(p);
    }

    fn line_to(&mut self, p: (f64, f64)) {
        if self.current.is_none() {
            self.move_to(p);
            return;
        }
        self.segments.push(PathSegment::LineTo(p.0, p.1));
        self.current = Some(p);
    }

    fn curve_to(&mut self, c1: (f64, f64), c2: (f64, f64), p: (f64, f64)) {
        if self.current.is_none() {
            self.move_to(c1);
        }
        self.segments.push(PathSegment::CurveTo([c1, c2, p]));
        self.current = Some(p);
    }

    fn close(&mut self) {
        if self.current.is_some() {
            self.segments.push(PathSegment::ClosePath);
            self.current = self.start;
        }
    }

    fn rect(&mut self, ctm: &Ctm, x: f64, y: f64, w: f64, h: f64) {
        self.move_to(ctm.transform(x, y));
        self.line_to(ctm.transform(x + w, y));
        self.line_to(ctm.transform(x + w, y + h));
        self.line_to(ctm.transform(x, y + h));
        self.close();
    }

    fn take(&mut self) -> Vec<PathSegment> {
        self.start = None;
        self.current = None;
        std::mem::take(&mut self.segments)
    }
}

struct Interpreter<'a, 'h> {
    doc: &'a Document,
    handler: &'h mut dyn ContentHandler,
}

impl Interpreter<'_, '_> {
    fn run(
        &mut self,
        content: &[u8],
        resources: &Dictionary,
        depth: usize,
        gstate: &mut InterpreterState,
        tstate: &mut TextState,
    ) -> Result<(), BackendError> {
        if depth > MAX_FORM_DEPTH {
            return Err(BackendError::Interpreter(format!(
                "Form XObject recursion depth {depth} exceeds limit {MAX_FORM_DEPTH}"
            )));
        }
        let operations = Content::decode(content)
            .map_err(|e| BackendError::Interpreter(format!("cannot decode content stream: {e}")))?
            .operations;

        let mut fonts: HashMap<String, LoadedFont> = HashMap::new();
        let mut path = PathBuilder::default();

        for op in &operations {
            let operands = op.operands.as_slice();
            match op.operator.as_str() {
                "q" => gstate.save(),
                "Q" => {
                    gstate.restore();
                }
                "cm" => {
                    if let Some([a, b, c, d, e, f]) = numbers::<6>(operands) {
                        gstate.concat(&Ctm::new(a, b, c, d, e, f));
                    }
                }
                "w" => {
                    if let Some([width]) = numbers::<1>(operands) {
                        gstate.set_line_width(width);
                    }
                }

                "m" => {
                    if let Some([x, y]) = numbers::<2>(operands) {
                        path.move_to(gstate.ctm().transform(x, y));
                    }
                }
                "l" => {
                    if let Some([x, y]) = numbers::<2>(operands) {
                        path.line_to(gstate.ctm().transform(x, y));
                    }
                }
                "c" => {
                    if let Some([x1, y1, x2, y2, x3, y3]) = numbers::<6>(operands) {
                        let ctm = gstate.ctm();
                        path.curve_to(ctm.transform(x1, y1), ctm.transform(x2, y2), ctm.transform(x3, y3));
                    }
                }
                "v" => {
                    if let (Some([x2, y2, x3, y3]), Some(current)) = (numbers::<4>(operands), path.current) {
                        let ctm = gstate.ctm();
                        path.curve_to(current, ctm.transform(x2, y2), ctm.transform(x3, y3));
                    }
                }
                "y" => {
                    if let Some([x1, y1, x3, y3]) = numbers::<4>(operands) {
                        let ctm = gstate.ctm();
                        let end = ctm.transform(x3, y3);
                        path.curve_to(ctm.transform(x1, y1), end, end);
                    }
                }
                "h" => path.close(),
                "re" => {
                    if let Some([x, y, w, h]) = numbers::<4>(operands) {
                        path.rect(gstate.ctm(), x, y, w, h);
                    }
                }

                "S" => self.paint(&mut path, PaintOp::Stroke, gstate),
                "s" => {
                    path.close();
                    self.paint(&mut path, PaintOp::Stroke, gstate);
                }
                "f" | "F" | "f*" => self.paint(&mut path, PaintOp::Fill, gstate),
                "B" | "B*" => self.paint(&mut path, PaintOp::FillAndStroke, gstate),
                "b" | "b*" => {
                    path.close();
                    self.paint(&mut path, PaintOp::FillAndStroke, gstate);
                }
                "n" => {
                    path.take();
                }

                "BT" => tstate.begin_text(),
                "ET" => {}
                "Tc" => {
                    if let Some([v]) = numbers::<1>(operands) {
                        tstate.char_spacing = v;
                    }
                }
                "Tw" => {
                    if let Some([v]) = numbers::<1>(operands) {
                        tstate.word_spacing = v;
                    }
                }
                "Tz" => {
                    if let Some([v]) = numbers::<1>(operands) {
                        tstate.set_h_scaling_percent(v);
                    }
                }
                "TL" => {
                    if let Some([v]) = numbers::<1>(operands) {
                        tstate.leading = v;
                    }
                }
                "Ts" => {
                    if let Some([v]) = numbers::<1>(operands) {
                        tstate.rise = v;
                    }
                }
                "Tf" => {
                    if let (Some(Object::Name(name)), Some(size)) =
                        (operands.first(), operands.get(1).and_then(number))
                    {
                        tstate.font = Some(String::from_utf8_lossy(name).into_owned());
                        tstate.font_size = size;
                    }
                }
                "Td" => {
                    if let Some([tx, ty]) = numbers::<2>(operands) {
                        tstate.move_text(tx, ty);
                    }
                }
                "TD" => {
                    if let Some([tx, ty]) = numbers::<2>(operands) {
                        tstate.move_text_set_leading(tx, ty);
                    }
                }
                "Tm" => {
                    if let Some([a, b, c, d, e, f]) = numbers::<6>(operands) {
                        tstate.set_matrix(Ctm::new(a, b, c, d, e, f));
                    }
                }
                "T*" => tstate.next_line(),
                "Tj" | "'" | "\"" | "TJ" => {
                    let font_key = tstate.font.clone().unwrap_or_default();
                    if !fonts.contains_key(&font_key) {
                        let font = self.load_font(resources, &font_key);
                        fonts.insert(font_key.clone(), font);
                    }
                    if let Some(font) = fonts.get(&font_key) {
                        self.show(op, font, gstate, tstate);
                    }
                }

                "Do" => {
                    if let Some(Object::Name(name)) = operands.first() {
                        self.do_xobject(name, resources, depth, gstate, tstate)?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn paint(&mut self, path: &mut PathBuilder, paint_op: PaintOp, gstate: &InterpreterState) {
        let segments = path.take();
        if segments.is_empty() {
            return;
        }
        let ctm = gstate.ctm();
        let scale = (ctm.a * ctm.d - ctm.b * ctm.c).abs().sqrt();
        self.handler.on_path_painted(PathEvent {
            segments,
            paint_op,
            line_width: gstate.line_width() * scale,
        });
    }

    fn load_font(&mut self, resources: &Dictionary, name: &str) -> LoadedFont {
        let dict = resources
            .get(b"Font")
            .ok()
            .and_then(|fonts| resolve(self.doc, fonts).as_dict().ok())
            .and_then(|fonts| fonts.get(name.as_bytes()).ok())
            .and_then(|font| resolve(self.doc, font).as_dict().ok());
        match dict {
            Some(dict) => LoadedFont::load(self.doc, dict),
            None => {
                self.handler
                    .on_warning(format!("font /{name} not found in resources"));
                LoadedFont::fallback(name)
            }
        }
    }

    /// `Tj`, `'`, `"` and `TJ`.
    fn show(&mut self, op: &Operation, font: &LoadedFont, gstate: &InterpreterState, tstate: &mut TextState) {
        let operands = op.operands.as_slice();
        match op.operator.as_str() {
            "Tj" => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    self.show_string(bytes, font, gstate, tstate);
                }
            }
            "'" => {
                tstate.next_line();
                if let Some(Object::String(bytes, _)) = operands.first() {
                    self.show_string(bytes, font, gstate, tstate);
                }
            }
            "\"" => {
                if let [aw, ac, Object::String(bytes, _)] = operands {
                    if let (Some(aw), Some(ac)) = (number(aw), number(ac)) {
                        tstate.word_spacing = aw;
                        tstate.char_spacing = ac;
                    }
                    tstate.next_line();
                    self.show_string(bytes, font, gstate, tstate);
                }
            }
            "TJ" => {
                let Some(Object::Array(items)) = operands.first() else {
                    return;
                };
                for item in items {
                    match item {
                        Object::String(bytes, _) => self.show_string(bytes, font, gstate, tstate),
                        other => {
                            if let Some(adjustment) = number(other) {
                                let tx = tstate.adjustment_advance(adjustment);
                                tstate.advance(tx);
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn show_string(&mut self, bytes: &[u8], font: &LoadedFont, gstate: &InterpreterState, tstate: &mut TextState) {
        for glyph in font.codes(bytes) {
            let width = font.width(glyph.code);
            self.handler.on_char(CharEvent {
                char_code: glyph.code,
                unicode: font.unicode(glyph.code),
                font_name: font.name.clone(),
                font_size: tstate.font_size,
                text_matrix: tstate.matrix().to_array(),
                ctm: gstate.ctm_array(),
                displacement: width,
                h_scaling: tstate.h_scaling,
                rise: tstate.rise,
                ascent: font.ascent(),
                descent: font.descent(),
            });
            let word_space = glyph.len == 1 && glyph.code == 32;
            let tx = tstate.glyph_advance(width, word_space);
            tstate.advance(tx);
        }
    }

    fn do_xobject(
        &mut self,
        name: &[u8],
        resources: &Dictionary,
        depth: usize,
        gstate: &mut InterpreterState,
        tstate: &mut TextState,
    ) -> Result<(), BackendError> {
        let stream = resources
            .get(b"XObject")
            .ok()
            .and_then(|xobjects| resolve(self.doc, xobjects).as_dict().ok())
            .and_then(|xobjects| xobjects.get(name).ok())
            .and_then(|xobject| resolve(self.doc, xobject).as_stream().ok());
        let Some(stream) = stream else {
            self.handler.on_warning(format!(
                "XObject /{} not found in resources",
                String::from_utf8_lossy(name)
            ));
            return Ok(());
        };
        if !matches!(stream.dict.get(b"Subtype").and_then(Object::as_name), Ok(b"Form")) {
            return Ok(());
        }
        self.run_form(stream, resources, depth, gstate, tstate)
    }

    fn run_form(
        &mut self,
        stream: &Stream,
        parent_resources: &Dictionary,
        depth: usize,
        gstate: &mut InterpreterState,
        tstate: &mut TextState,
    ) -> Result<(), BackendError> {
        let content = stream
            .get_plain_content()
            .map_err(|e| BackendError::Interpreter(format!("cannot decode Form XObject: {e}")))?;
        let resources = stream
            .dict
            .get(b"Resources")
            .ok()
            .and_then(|r| resolve(self.doc, r).as_dict().ok())
            .unwrap_or(parent_resources);

        gstate.save();
        if let Some(matrix) = stream.dict.get(b"Matrix").ok().and_then(matrix_from_object) {
            gstate.concat(&matrix);
        }
        let saved_text = tstate.clone();
        let result = self.run(&content, resources, depth + 1, gstate, tstate);
        *tstate = saved_text;
        gstate.restore();
        result
    }
}

/// The first `N` operands as numbers, or `None` if any is missing or not numeric.
fn numbers<const N: usize>(operands: &[Object]) -> Option<[f64; N]> {
    let mut values = [0.0; N];
    for (slot, operand) in values.iter_mut().zip(operands.get(..N)?) {
        *slot = number(operand)?;
    }
    Some(values)
}

/// A six-number array as a matrix.
pub(crate) fn matrix_from_object(obj: &Object) -> Option<Ctm> {
    let items = obj.as_array().ok()?;
    let [a, b, c, d, e, f] = numbers::<6>(items)?;
    Some(Ctm::new(a, b, c, d, e, f))
}
