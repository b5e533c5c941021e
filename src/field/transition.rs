use nalgebra::{UnitQuaternion, Vector3};

use crate::utils::ease_cubic;

/// An in-flight change of a glyph's translation and rotation.
///
/// Translation is interpolated linearly and rotation by slerp, both on a
/// cubic in-out easing of elapsed time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    pub from_translation: Vector3<f64>,
    pub to_translation: Vector3<f64>,
    pub from_rotation: UnitQuaternion<f64>,
    pub to_rotation: UnitQuaternion<f64>,
    pub duration: f64,
    pub elapsed: f64,
}

impl Transition {
    pub fn new(
        from: (Vector3<f64>, UnitQuaternion<f64>),
        to: (Vector3<f64>, UnitQuaternion<f64>),
        duration: f64,
    ) -> Transition {
        Transition {
            from_translation: from.0,
            to_translation: to.0,
            from_rotation: from.1,
            to_rotation: to.1,
            duration,
            elapsed: 0.0,
        }
    }

    /// Linear progress in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    pub fn sample(&self) -> (Vector3<f64>, UnitQuaternion<f64>) {
        let t = ease_cubic(self.progress());
        let translation = self.from_translation.lerp(&self.to_translation, t);
        let rotation = self
            .from_rotation
            .try_slerp(&self.to_rotation, t, 1e-12)
            .unwrap_or(if t < 1.0 {
                self.from_rotation
            } else {
                self.to_rotation
            });
        (translation, rotation)
    }

    /// Step forward by `dt` seconds; returns whether the transition has ended.
    pub fn advance(&mut self, dt: f64) -> bool {
        self.elapsed += dt.max(0.0);
        self.is_finished()
    }
}
