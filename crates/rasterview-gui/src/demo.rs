//! Content pushed into the viewer every tick.

use anyhow::Result;
use ndarray::Array2;
use rasterview_core::colorize::{dist_u16, gray, gray_u16, hconcat, hconcat_numeric, jet, vconcat, vconcat_numeric};
use rasterview_core::consts::{DEFAULT_DIST_U16_RANGE, DEFAULT_GRAY_U16_BALANCE};
use rasterview_core::{Annotation, NumericBuffer, Size, ViewerSession, WindowBackend};

pub const DEMO_1: &str = "Demo 1";
pub const DEMO_2: &str = "Demo 2";
pub const DISTANCE: &str = "Distance";

const RAMP_SIZE: Size = Size::new(160, 120);
const DISTANCE_SIZE: Size = Size::new(128, 96);

pub struct DemoScene {
    ramp: NumericBuffer,
}

impl DemoScene {
    pub fn new() -> Self {
        Self {
            ramp: NumericBuffer::ramp::<i32>(RAMP_SIZE, 0.0, 1.0),
        }
    }

    /// Push all demo windows for time `t` (seconds since start).
    pub fn push<B: WindowBackend>(&self, session: &ViewerSession<B>, t: f32) -> Result<()> {
        let ramp = &self.ramp;

        session.update(
            DEMO_1,
            Size::new(320, 480),
            vconcat(&[gray(ramp)?, jet(ramp)?]),
            Some(vconcat_numeric(&[ramp.clone(), ramp.clone()])?),
            vec![Annotation::new(DEMO_1)],
        )?;

        session.update(
            DEMO_2,
            Size::new(320, 240),
            jet(ramp)?,
            Some(ramp.clone()),
            vec![Annotation::new(DEMO_2)],
        )?;

        let field = distance_field(DISTANCE_SIZE, t);
        let (lo, hi) = DEFAULT_DIST_U16_RANGE;
        session.update_scaled(
            DISTANCE,
            2.0,
            hconcat(&[dist_u16(&field, lo, hi)?, gray_u16(&field, DEFAULT_GRAY_U16_BALANCE)?]),
            Some(hconcat_numeric(&[field.clone(), field])?),
            vec![Annotation::new(format!("t = {t:.1}s")).at(4, 4).with_color([255, 255, 0])],
        )?;
        Ok(())
    }

    /// The demo ends once the user closes either of the main windows.
    pub fn finished<B: WindowBackend>(&self, session: &ViewerSession<B>) -> bool {
        session.is_closed(DEMO_1) || session.is_closed(DEMO_2)
    }
}

/// Distance in millimetres from a virtual sensor to a tilted plane with a
/// bump that drifts over time.
fn distance_field(size: Size, t: f32) -> NumericBuffer {
    let (cx, cy) = (
        size.width as f32 * (0.5 + 0.3 * t.sin()),
        size.height as f32 * (0.5 + 0.3 * (0.7 * t).cos()),
    );
    let data = Array2::from_shape_fn((size.height, size.width), |(y, x)| {
        let plane = 800.0 + 20.0 * x as f32 + 5.0 * y as f32;
        let d2 = (x as f32 - cx).powi(2) + (y as f32 - cy).powi(2);
        let bump = 1200.0 * (-d2 / 300.0).exp();
        (plane - bump).clamp(0.0, u16::MAX as f32) as u16
    });
    NumericBuffer::from_plane(data)
}
