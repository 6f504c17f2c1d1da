//! Text state parameters and the text/line matrices.

use rigreport_core::Ctm;

#[derive(Debug, Clone, PartialEq)]
pub struct TextState {
    /// `Tc`
    pub char_spacing: f64,
    /// `Tw`
    pub word_spacing: f64,
    /// `Tz` as a fraction.
    pub h_scaling: f64,
    /// `TL`
    pub leading: f64,
    /// Resource name selected by `Tf`.
    pub font: Option<String>,
    pub font_size: f64,
    /// `Ts`
    pub rise: f64,
    matrix: Ctm,
    line_matrix: Ctm,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            char_spacing: 0.0,
            word_spacing: 0.0,
            h_scaling: 1.0,
            leading: 0.0,
            font: None,
            font_size: 0.0,
            rise: 0.0,
            matrix: Ctm::identity(),
            line_matrix: Ctm::identity(),
        }
    }
}

impl TextState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn matrix(&self) -> &Ctm {
        &self.matrix
    }

    /// `BT` resets both matrices.
    pub fn begin_text(&mut self) {
        self.matrix = Ctm::identity();
        self.line_matrix = Ctm::identity();
    }

    /// `Tz`, given in percent.
    pub fn set_h_scaling_percent(&mut self, percent: f64) {
        self.h_scaling = percent / 100.0;
    }

    /// `Tm`
    pub fn set_matrix(&mut self, matrix: Ctm) {
        self.matrix = matrix;
        self.line_matrix = matrix;
    }

    /// `Td`
    pub fn move_text(&mut self, tx: f64, ty: f64) {
        self.line_matrix = Ctm::translation(tx, ty).concat(&self.line_matrix);
        self.matrix = self.line_matrix;
    }

    /// `TD`: like `Td`, also setting the leading to `-ty`.
    pub fn move_text_set_leading(&mut self, tx: f64, ty: f64) {
        self.leading = -ty;
        self.move_text(tx, ty);
    }

    /// `T*`
    pub fn next_line(&mut self) {
        self.move_text(0.0, -self.leading);
    }

    /// Move the text matrix right by `tx` text space units after a glyph or a `TJ` adjustment.
    pub fn advance(&mut self, tx: f64) {
        self.matrix = Ctm::translation(tx, 0.0).concat(&self.matrix);
    }

    /// Horizontal displacement for a glyph of width `w0` (glyph units).
    ///
    /// `word_space` is set for a single-byte code 32.
    pub fn glyph_advance(&self, w0: f64, word_space: bool) -> f64 {
        let spacing = self.char_spacing + if word_space { self.word_spacing } else { 0.0 };
        (w0 / 1000.0 * self.font_size + spacing) * self.h_scaling
    }

    /// Displacement for a number inside a `TJ` array.
    pub fn adjustment_advance(&self, adjustment: f64) -> f64 {
        -adjustment / 1000.0 * self.font_size * self.h_scaling
    }
}
