//! Pick requests: the screen region a selection pass tests against.

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::{Mat4, Result, Vec3};

/// A rectangular region of the camera frame.
///
/// All values are fractions of the frame, not pixels. `(x, y)` is the
/// **top-left** corner of the region and `y` grows downward, matching window
/// coordinates divided by the frame size.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PickFields")]
pub struct Pick {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

/// Unchecked wire form of [`Pick`]; deserialization goes through [`Pick::new`].
#[derive(Deserialize)]
struct PickFields {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl TryFrom<PickFields> for Pick {
    type Error = Error;

    fn try_from(fields: PickFields) -> Result<Self> {
        Pick::new(fields.x, fields.y, fields.width, fields.height)
    }
}

impl Pick {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Result<Self> {
        let finite = [x, y, width, height].iter().all(|v| v.is_finite());
        if !finite || width <= 0.0 || height <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "pick region ({x}, {y}, {width}, {height}) must be finite with positive extent"
            )));
        }
        Ok(Self { x, y, width, height })
    }

    /// The whole frame.
    pub fn full_frame() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
        }
    }

    /// Region of the given size centred on `(center_x, center_y)`.
    pub fn around(center_x: f32, center_y: f32, width: f32, height: f32) -> Result<Self> {
        Self::new(center_x - width * 0.5, center_y - height * 0.5, width, height)
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Whether frame point `(u, v)` lies inside the region, edges included.
    pub fn contains(&self, u: f32, v: f32) -> bool {
        u >= self.x && u <= self.x + self.width && v >= self.y && v <= self.y + self.height
    }

    /// Post-projection matrix that stretches this region over the whole clip
    /// volume. Multiply it onto the left of a projection to narrow the
    /// frustum to the region.
    pub fn pick_matrix(&self) -> Mat4 {
        let (cx, cy) = self.center();
        let ndc_x = 2.0 * cx - 1.0;
        let ndc_y = 1.0 - 2.0 * cy;
        Mat4::from_scale(Vec3::new(1.0 / self.width, 1.0 / self.height, 1.0))
            * Mat4::from_translation(Vec3::new(-ndc_x, -ndc_y, 0.0))
    }
}
