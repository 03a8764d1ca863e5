use crate::compositor::cache::MaskShape;
use crate::foundation::core::{FlashColor, Rect};

/// Drawing surface handed to a compositor for one paint pass.
///
/// Colors are straight (non-premultiplied) RGBA.
pub trait FlashPainter {
    /// Reset `bounds` to fully transparent.
    fn clear(&mut self, bounds: Rect);

    /// Fill a sharp-cornered rect.
    fn fill_rect(&mut self, rect: Rect, color: FlashColor);

    /// Fill a rounded rect.
    fn fill_rounded_rect(&mut self, rect: Rect, radius: f64, color: FlashColor);

    /// Fill a container mask with the even-odd rule.
    fn fill_mask(&mut self, mask: &MaskShape, color: FlashColor);
}

/// One recorded paint operation.
#[derive(Clone, Debug, PartialEq)]
pub enum PaintOp {
    /// Surface cleared.
    Clear(Rect),
    /// Sharp rect filled.
    Rect(Rect, FlashColor),
    /// Rounded rect filled.
    RoundedRect(Rect, f64, FlashColor),
    /// Mask filled.
    Mask(MaskShape, FlashColor),
}

/// Painter that records operations for a host to replay with its own toolkit.
#[derive(Clone, Debug, Default)]
pub struct DisplayList {
    ops: Vec<PaintOp>,
}

impl DisplayList {
    /// Empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded operations, in paint order.
    pub fn ops(&self) -> &[PaintOp] {
        &self.ops
    }

    /// Number of fills (everything except clears).
    pub fn fill_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| !matches!(op, PaintOp::Clear(_)))
            .count()
    }

    /// Take the recorded operations, leaving the list empty.
    pub fn take(&mut self) -> Vec<PaintOp> {
        std::mem::take(&mut self.ops)
    }
}

impl FlashPainter for DisplayList {
    fn clear(&mut self, bounds: Rect) {
        self.ops.push(PaintOp::Clear(bounds));
    }

    fn fill_rect(&mut self, rect: Rect, color: FlashColor) {
        self.ops.push(PaintOp::Rect(rect, color));
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f64, color: FlashColor) {
        self.ops.push(PaintOp::RoundedRect(rect, radius, color));
    }

    fn fill_mask(&mut self, mask: &MaskShape, color: FlashColor) {
        self.ops.push(PaintOp::Mask(mask.clone(), color));
    }
}
