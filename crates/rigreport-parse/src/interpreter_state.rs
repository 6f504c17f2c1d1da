//! Graphics state stack for the content stream interpreter.
//!
//! Only the parts that affect geometry are tracked: the CTM and the line
//! width. `q` pushes a copy, `Q` pops it.

use rigreport_core::Ctm;

#[derive(Debug, Clone, Copy, PartialEq)]
struct GraphicsState {
    ctm: Ctm,
    line_width: f64,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Ctm::identity(),
            line_width: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InterpreterState {
    current: GraphicsState,
    stack: Vec<GraphicsState>,
}

impl InterpreterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A state whose CTM starts at `ctm` instead of identity.
    pub fn with_ctm(ctm: Ctm) -> Self {
        Self {
            current: GraphicsState {
                ctm,
                ..GraphicsState::default()
            },
            stack: Vec::new(),
        }
    }

    pub fn ctm(&self) -> &Ctm {
        &self.current.ctm
    }

    pub fn ctm_array(&self) -> [f64; 6] {
        self.current.ctm.to_array()
    }

    pub fn line_width(&self) -> f64 {
        self.current.line_width
    }

    /// `q`
    pub fn save(&mut self) {
        self.stack.push(self.current);
    }

    /// `Q`. Returns `false` on an unbalanced restore, which leaves the state unchanged.
    pub fn restore(&mut self) -> bool {
        match self.stack.pop() {
            Some(state) => {
                self.current = state;
                true
            }
            None => false,
        }
    }

    /// `cm`: the new matrix is applied before the current CTM.
    pub fn concat(&mut self, matrix: &Ctm) {
        self.current.ctm = matrix.concat(&self.current.ctm);
    }

    /// `w`
    pub fn set_line_width(&mut self, width: f64) {
        self.current.line_width = width;
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let state = InterpreterState::new();
        assert_eq!(*state.ctm(), Ctm::identity());
        assert_eq!(state.line_width(), 1.0);
        assert_eq!(state.stack_depth(), 0);
    }

    #[test]
    fn save_restore_round_trip() {
        let mut state = InterpreterState::new();
        state.save();
        state.set_line_width(3.0);
        state.concat(&Ctm::translation(10.0, 20.0));
        assert_eq!(state.ctm_array(), [1.0, 0.0, 0.0, 1.0, 10.0, 20.0]);
        assert!(state.restore());
        assert_eq!(state.line_width(), 1.0);
        assert_eq!(*state.ctm(), Ctm::identity());
    }

    #[test]
    fn unbalanced_restore_is_ignored() {
        let mut state = InterpreterState::new();
        state.set_line_width(2.0);
        assert!(!state.restore());
        assert_eq!(state.line_width(), 2.0);
    }

    #[test]
    fn cm_composes_with_existing_ctm() {
        let mut state = InterpreterState::with_ctm(Ctm::new(2.0, 0.0, 0.0, 2.0, 0.0, 0.0));
        state.concat(&Ctm::translation(5.0, 5.0));
        // translation happens in the scaled space
        assert_eq!(state.ctm().transform(0.0, 0.0), (10.0, 10.0));
    }
}
