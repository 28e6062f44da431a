#![forbid(unsafe_code)]

//! Geometric primitives for the video surface.
//!
//! Touch coordinates are in physical pixels with the origin at the top-left
//! of the video surface. Distances that must feel identical across devices
//! (seek drags, fling thresholds) are converted to centimetres through the
//! horizontal DPI reported by the host.

/// Centimetres per inch.
pub const CM_PER_INCH: f32 = 2.54;

/// A touch position in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal offset from the left edge.
    pub x: f32,
    /// Vertical offset from the top edge.
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Signed displacement `(dx, dy)` from `origin` to `self`.
    #[inline]
    pub fn delta_from(self, origin: Point) -> (f32, f32) {
        (self.x - origin.x, self.y - origin.y)
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(self, other: Point) -> f32 {
        let (dx, dy) = self.delta_from(other);
        (dx * dx + dy * dy).sqrt()
    }
}

/// Physical orientation of the device screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenOrientation {
    #[default]
    Portrait,
    Landscape,
    ReversePortrait,
    ReverseLandscape,
}

impl ScreenOrientation {
    /// Whether the long edge is horizontal.
    #[must_use]
    pub const fn is_landscape(self) -> bool {
        matches!(self, Self::Landscape | Self::ReverseLandscape)
    }
}

/// Horizontal third of the surface a touch originated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HorizontalThird {
    Left,
    Middle,
    Right,
}

/// Horizontal quarter bucket used by double-tap zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TapZone {
    /// Leftmost quarter.
    Rewind,
    /// Middle half.
    Center,
    /// Rightmost quarter.
    Forward,
}

/// Dimensions and density of the video surface.
///
/// `x_range` and `y_range` are the spans used to normalise drags. They
/// default to the surface size but hosts may shrink them (for example to
/// exclude a cutout) without moving the coordinate origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenMetrics {
    /// Surface width in pixels.
    pub width: f32,
    /// Surface height in pixels.
    pub height: f32,
    /// Horizontal pixels per inch.
    pub xdpi: f32,
    /// Horizontal normalisation span in pixels.
    pub x_range: f32,
    /// Vertical normalisation span in pixels.
    pub y_range: f32,
    /// Current physical orientation.
    pub orientation: ScreenOrientation,
}

impl Default for ScreenMetrics {
    fn default() -> Self {
        Self::new(1920.0, 1080.0, 400.0)
    }
}

impl ScreenMetrics {
    /// Metrics for a `width` x `height` surface at `xdpi`.
    ///
    /// Orientation is inferred from the aspect ratio.
    #[must_use]
    pub fn new(width: f32, height: f32, xdpi: f32) -> Self {
        let orientation = if width > height {
            ScreenOrientation::Landscape
        } else {
            ScreenOrientation::Portrait
        };
        Self {
            width,
            height,
            xdpi,
            x_range: width,
            y_range: height,
            orientation,
        }
    }

    /// Override the normalisation spans.
    #[must_use]
    pub fn with_ranges(mut self, x_range: f32, y_range: f32) -> Self {
        self.x_range = x_range;
        self.y_range = y_range;
        self
    }

    /// Override the reported orientation.
    #[must_use]
    pub fn with_orientation(mut self, orientation: ScreenOrientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Convert a horizontal pixel distance to centimetres.
    ///
    /// Returns 0 when the host reported no usable density.
    #[must_use]
    pub fn px_to_cm(&self, px: f32) -> f32 {
        if self.xdpi <= 0.0 || !self.xdpi.is_finite() {
            return 0.0;
        }
        px / self.xdpi * CM_PER_INCH
    }

    /// Which horizontal third `x` falls in.
    #[must_use]
    pub fn third_of(&self, x: f32) -> HorizontalThird {
        if x >= self.width * 2.0 / 3.0 {
            HorizontalThird::Right
        } else if x >= self.width / 3.0 {
            HorizontalThird::Middle
        } else {
            HorizontalThird::Left
        }
    }

    /// Double-tap bucket for `x`.
    #[must_use]
    pub fn tap_zone(&self, x: f32) -> TapZone {
        if x < self.width * 0.25 {
            TapZone::Rewind
        } else if x > self.width * 0.75 {
            TapZone::Forward
        } else {
            TapZone::Center
        }
    }

    /// True when `x` lies in the rightmost `ratio` of the surface.
    #[must_use]
    pub fn in_right_edge(&self, x: f32, ratio: f32) -> bool {
        x >= self.width * (1.0 - ratio)
    }

    /// True when `y` lies within `ratio` of the top or bottom edge.
    #[must_use]
    pub fn in_vertical_edge(&self, y: f32, ratio: f32) -> bool {
        let band = self.height * ratio;
        y < band || y > self.height - band
    }
}
