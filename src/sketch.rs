use egui::Pos2;

/// One straight stroke segment in frame coordinates.
pub type Segment = [Pos2; 2];

/// Freehand drawing layer accumulating pointer-drag samples. Retained as
/// vector segments and redrawn each frame, so the frozen layer can be
/// rendered at any translation offset.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SketchLayer {
    segments: Vec<Segment>,
    frozen: bool,
}

impl SketchLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one drag sample. Ignored once the layer is frozen.
    pub fn append(&mut self, from: Pos2, to: Pos2) {
        if self.frozen {
            return;
        }
        self.segments.push([from, to]);
    }

    pub fn clear(&mut self) {
        self.segments.clear();
        self.frozen = false;
    }

    /// Makes the layer read-only; content is preserved.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}
