/// Drawable surface size in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Converts a CSS-pixel size into device pixels, truncating like
    /// assigning to `canvas.width`.
    pub fn from_css(width: f64, height: f64, pixel_ratio: f64) -> Self {
        let ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            pixel_ratio
        } else {
            1.0
        };
        Self {
            width: (width * ratio).max(0.0) as u32,
            height: (height * ratio).max(0.0) as u32,
        }
    }

    /// Value pushed into `u_resolution`.
    pub fn resolution(&self) -> [f32; 2] {
        [self.width as f32, self.height as f32]
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_size_scales_by_pixel_ratio() {
        assert_eq!(Viewport::from_css(800.0, 600.0, 2.0), Viewport::new(1600, 1200));
        assert_eq!(Viewport::from_css(1366.5, 768.9, 1.0), Viewport::new(1366, 768));
    }

    #[test]
    fn bogus_pixel_ratio_falls_back_to_one() {
        assert_eq!(Viewport::from_css(640.0, 480.0, 0.0), Viewport::new(640, 480));
        assert_eq!(Viewport::from_css(640.0, 480.0, f64::NAN), Viewport::new(640, 480));
    }

    #[test]
    fn zero_size_is_empty() {
        assert!(Viewport::new(0, 10).is_empty());
        assert!(!Viewport::new(1, 1).is_empty());
        assert_eq!(Viewport::new(0, 0).resolution(), [0.0, 0.0]);
    }
}
