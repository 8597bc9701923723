// File: crates/vizbind-core/src/zoom.rs
// Summary: Vertical zoom/pan transform applied to a chart's value axis, with a bounded scale factor.

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, Result};
use crate::scale::{LinearScale, ScaleTransform};

/// Allowed zoom factors; 1.0 must be inside.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoomExtent {
    pub min: f64,
    pub max: f64,
}

impl ZoomExtent {
    pub fn validate(&self) -> Result<()> {
        if !(self.min > 0.0 && self.min <= 1.0 && self.max >= 1.0 && self.max.is_finite()) {
            return Err(ChartError::InvalidConfig(format!(
                "zoom extent [{}, {}] must be positive and contain 1",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

impl Default for ZoomExtent {
    fn default() -> Self {
        Self { min: 0.5, max: 15.0 }
    }
}

/// Pixel-space transform `y' = k * y + ty`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomTransform {
    pub k: f64,
    pub ty: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ZoomTransform {
    pub const IDENTITY: ZoomTransform = ZoomTransform { k: 1.0, ty: 0.0 };

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Multiply the zoom by `factor`, keeping pixel `focus` fixed. `k` stays inside `extent`.
    pub fn scale_by(self, factor: f64, focus: f32, extent: ZoomExtent) -> Self {
        if !(factor.is_finite() && factor > 0.0) {
            return self;
        }
        let k = (self.k * factor).clamp(extent.min, extent.max);
        let focus = focus as f64;
        // point under the cursor before the change, in untransformed pixels
        let anchor = (focus - self.ty) / self.k;
        Self { k, ty: focus - anchor * k }
    }

    /// Shift by `dy` pixels.
    pub fn pan_by(self, dy: f32) -> Self {
        Self { ty: self.ty + dy as f64, ..self }
    }

    fn invert_y(&self, y: f32) -> f32 {
        ((y as f64 - self.ty) / self.k) as f32
    }

    /// Scale whose domain is what `y` shows through this transform. Never clamped.
    pub fn rescale_y(&self, y: &LinearScale) -> LinearScale {
        let (r0, r1) = y.range();
        let base = y.clamped(false);
        if self.is_identity() {
            return base;
        }
        let d0 = base.invert(self.invert_y(r0));
        let d1 = base.invert(self.invert_y(r1));
        LinearScale::new((d0, d1), (r0, r1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_about_center_halves_domain() {
        let y = LinearScale::new((-10.0, 10.0), (500.0, 50.0));
        let z = ZoomTransform::IDENTITY.scale_by(2.0, 275.0, ZoomExtent::default());
        let zoomed = z.rescale_y(&y);
        let (d0, d1) = zoomed.domain();
        assert!((d0 + 5.0).abs() < 1e-6 && (d1 - 5.0).abs() < 1e-6, "{d0} {d1}");
        assert!((zoomed.map(0.0) - 275.0).abs() < 1e-3);
    }

    #[test]
    fn zoom_factor_is_bounded() {
        let ext = ZoomExtent::default();
        let z = ZoomTransform::IDENTITY.scale_by(100.0, 0.0, ext);
        assert_eq!(z.k, 15.0);
        let z = z.scale_by(1e-6, 0.0, ext);
        assert_eq!(z.k, 0.5);
        assert_eq!(z.scale_by(f64::NAN, 0.0, ext), z);
    }

    #[test]
    fn pan_moves_domain() {
        let y = LinearScale::new((0.0, 100.0), (100.0, 0.0));
        let moved = ZoomTransform::IDENTITY.pan_by(10.0).rescale_y(&y);
        let (d0, d1) = moved.domain();
        // content moved down, so the bottom edge now shows a higher value
        assert!((d0 - 10.0).abs() < 1e-4 && (d1 - 110.0).abs() < 1e-4, "{d0} {d1}");
    }

    #[test]
    fn extent_must_contain_one() {
        assert!(ZoomExtent { min: 2.0, max: 4.0 }.validate().is_err());
        assert!(ZoomExtent { min: 0.0, max: 4.0 }.validate().is_err());
        assert!(ZoomExtent::default().validate().is_ok());
    }
}
