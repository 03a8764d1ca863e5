use kurbo::Shape;

use crate::compositor::cache::MaskShape;
use crate::compositor::painter::FlashPainter;
use crate::foundation::core::{BezPath, FlashColor, Rect, RoundedRect};
use crate::foundation::error::{FlashError, FlashResult};

const PATH_TOLERANCE: f64 = 0.1;

/// A rendered overlay frame as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Software overlay surface backed by `vello_cpu`.
///
/// Optional backdrop fills are replayed after every clear, so a preview can show flashes over a
/// mock of the window contents.
pub struct RasterPainter {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    backdrop: Vec<(Rect, FlashColor)>,
}

impl RasterPainter {
    /// Transparent surface of the given size.
    pub fn new(width: u32, height: u32) -> FlashResult<Self> {
        let w: u16 = width
            .try_into()
            .map_err(|_| FlashError::render("surface width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| FlashError::render("surface height exceeds u16"))?;
        if w == 0 || h == 0 {
            return Err(FlashError::render("surface must be non-empty"));
        }
        Ok(Self {
            width: w,
            height: h,
            ctx: vello_cpu::RenderContext::new(w, h),
            backdrop: Vec::new(),
        })
    }

    /// Add a fill drawn underneath the flashes after each clear.
    pub fn with_backdrop(mut self, rect: Rect, color: FlashColor) -> Self {
        self.backdrop.push((rect, color));
        self.paint_backdrop();
        self
    }

    /// Rasterize everything drawn since the last clear.
    pub fn finish(&mut self) -> FrameRGBA {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }

    fn paint_backdrop(&mut self) {
        for i in 0..self.backdrop.len() {
            let (rect, color) = self.backdrop[i];
            self.fill_rect(rect, color);
        }
    }

    fn set_color(&mut self, c: FlashColor) {
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
    }
}

impl FlashPainter for RasterPainter {
    fn clear(&mut self, _bounds: Rect) {
        self.ctx = vello_cpu::RenderContext::new(self.width, self.height);
        self.paint_backdrop();
    }

    fn fill_rect(&mut self, rect: Rect, color: FlashColor) {
        self.set_color(color);
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(rect.x0, rect.y0, rect.x1, rect.y1));
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f64, color: FlashColor) {
        if radius <= 0.0 {
            self.fill_rect(rect, color);
            return;
        }
        let path = RoundedRect::from_rect(rect, radius).to_path(PATH_TOLERANCE);
        self.set_color(color);
        self.ctx.fill_path(&bezpath_to_cpu(&path));
    }

    fn fill_mask(&mut self, mask: &MaskShape, color: FlashColor) {
        self.set_color(color);
        self.ctx.set_fill_rule(vello_cpu::peniko::Fill::EvenOdd);
        self.ctx.fill_path(&bezpath_to_cpu(&mask.to_path()));
        self.ctx.set_fill_rule(vello_cpu::peniko::Fill::NonZero);
    }
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/raster.rs"]
mod tests;
