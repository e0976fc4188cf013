use serde::{Deserialize, Serialize};

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Linear interpolation between two points.
    pub fn lerp(&self, other: &Point2D, t: f64) -> Point2D {
        Point2D {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

impl Default for Point2D {
    fn default() -> Self {
        Self::zero()
    }
}

/// A 2D size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size2D {
    pub width: f64,
    pub height: f64,
}

impl Size2D {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Compute the aspect ratio (width / height).
    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0.0 {
            return 0.0;
        }
        self.width / self.height
    }
}

/// The per-frame visual state of a layer or a whole scene.
///
/// Translation is expressed in fractions of the canvas size so styles stay
/// resolution independent; scale is applied about the layer's center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerStyle {
    /// Opacity (0.0–1.0).
    pub opacity: f64,
    /// Translation in canvas fractions (1.0 = one full canvas width/height).
    pub translate: Point2D,
    /// Uniform scale factor.
    pub scale: f64,
    /// Gaussian-ish blur radius in pixels.
    pub blur: f64,
}

impl LayerStyle {
    /// Fully opaque, untransformed.
    pub fn identity() -> Self {
        Self {
            opacity: 1.0,
            translate: Point2D::zero(),
            scale: 1.0,
            blur: 0.0,
        }
    }

    /// Fully transparent, otherwise untransformed.
    pub fn hidden() -> Self {
        Self {
            opacity: 0.0,
            ..Self::identity()
        }
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_translate(mut self, x: f64, y: f64) -> Self {
        self.translate = Point2D::new(x, y);
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_blur(mut self, blur: f64) -> Self {
        self.blur = blur;
        self
    }

    /// Stack `other` on top of `self`: opacity and scale multiply, translate and blur add.
    pub fn compose(&self, other: &LayerStyle) -> LayerStyle {
        LayerStyle {
            opacity: (self.opacity * other.opacity).clamp(0.0, 1.0),
            translate: Point2D::new(
                self.translate.x + other.translate.x,
                self.translate.y + other.translate.y,
            ),
            scale: self.scale * other.scale,
            blur: self.blur + other.blur,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0 && self.scale > 0.0
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self::identity()
    }
}
