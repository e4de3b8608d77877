//! Page-coordinate geometry

/// An axis-aligned rectangle in page coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Shift vertically (used to convert page to viewport coordinates).
    pub fn offset_y(&self, dy: f32) -> Self {
        Self {
            y: self.y + dy,
            ..*self
        }
    }

    /// Height of the overlap between this rect and a vertical band.
    pub fn vertical_overlap(&self, band_top: f32, band_bottom: f32) -> f32 {
        (self.bottom().min(band_bottom) - self.top().max(band_top)).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.bottom(), 70.0);
        assert_eq!(r.right(), 110.0);
    }

    #[test]
    fn overlap_clamps_to_zero() {
        let r = Rect::new(0.0, 100.0, 50.0, 50.0);
        assert_eq!(r.vertical_overlap(0.0, 90.0), 0.0);
        assert_eq!(r.vertical_overlap(120.0, 200.0), 30.0);
        assert_eq!(r.vertical_overlap(0.0, 1000.0), 50.0);
    }
}
