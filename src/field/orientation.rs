//! Glyph orientation: the shortest-arc rotation carrying the reference
//! direction `(0, 1, 0)` onto each resolved vector.

use std::f64::consts::PI;
use std::fmt;

use nalgebra::{Quaternion, Unit, UnitQuaternion, Vector3};

use crate::data::DataPoint;
use crate::error;

use super::glyph::GlyphKey;
use super::scale::ResolvedScales;

/// Dot products within this distance of ±1 count as (anti-)parallel.
const PARALLEL_EPSILON: f64 = 1e-9;

/// Direction of an unrotated glyph.
pub fn reference() -> Unit<Vector3<f64>> {
    Vector3::y_axis()
}

/// A rotation as a unit axis and an angle in radians, in `[0, π]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisAngle {
    pub axis: Unit<Vector3<f64>>,
    pub angle: f64,
}

impl AxisAngle {
    pub fn identity() -> AxisAngle {
        AxisAngle {
            axis: Vector3::x_axis(),
            angle: 0.0,
        }
    }

    pub fn from_quaternion(rotation: &UnitQuaternion<f64>) -> AxisAngle {
        match rotation.axis_angle() {
            Some((axis, angle)) => AxisAngle { axis, angle },
            None => AxisAngle::identity(),
        }
    }

    pub fn to_quaternion(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::from_axis_angle(&self.axis, self.angle)
    }

    pub fn apply(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        self.to_quaternion() * vector
    }
}

/// X3D `SFRotation`: `"ax ay az angle"`.
impl fmt::Display for AxisAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.axis[0], self.axis[1], self.axis[2], self.angle
        )
    }
}

/// Minimal rotation taking `from` onto `to`.
///
/// Parallel inputs give the identity. Anti-parallel inputs give a half
/// turn about an axis orthogonal to `from`.
pub fn shortest_arc(from: &Unit<Vector3<f64>>, to: &Unit<Vector3<f64>>) -> AxisAngle {
    let (from, to) = (from.into_inner(), to.into_inner());
    let dot = from.dot(&to);
    if dot >= 1.0 - PARALLEL_EPSILON {
        return AxisAngle::identity();
    }
    if dot <= -1.0 + PARALLEL_EPSILON {
        let mut axis = Vector3::x().cross(&from);
        if axis.norm() < 1e-6 {
            axis = Vector3::y().cross(&from);
        }
        return AxisAngle {
            axis: Unit::new_normalize(axis),
            angle: PI,
        };
    }
    let cross = from.cross(&to);
    let rotation =
        UnitQuaternion::new_normalize(Quaternion::new(1.0 + dot, cross.x, cross.y, cross.z));
    AxisAngle::from_quaternion(&rotation)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Orientation {
    pub length: f64,
    pub direction: Unit<Vector3<f64>>,
    pub rotation: AxisAngle,
}

/// Euclidean length of `vector`, scaled by its largest component so
/// that large finite components do not overflow.
pub fn magnitude(vector: &Vector3<f64>) -> f64 {
    let largest = vector.amax();
    if largest == 0.0 || !largest.is_finite() {
        return largest;
    }
    largest * (vector / largest).norm()
}

/// Length, direction and rotation of `vector`; `None` for a zero vector
/// or one with a non-finite component, which is never drawn.
pub fn orient(vector: &Vector3<f64>) -> Option<Orientation> {
    if !vector.iter().all(|v| v.is_finite()) {
        return None;
    }
    let largest = vector.amax();
    if largest == 0.0 {
        return None;
    }
    let length = magnitude(vector);
    let direction = Unit::new_normalize(vector / largest);
    Some(Orientation {
        length,
        direction,
        rotation: shortest_arc(&reference(), &direction),
    })
}

/// A data point with the attributes needed to draw its glyph.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotatedPoint {
    pub key: GlyphKey,
    pub point: DataPoint,
    pub vector: Vector3<f64>,
    pub translation: Vector3<f64>,
    pub rotation: AxisAngle,
    pub length: f64,
}

impl AnnotatedPoint {
    /// Annotate `point`, or `None` if its vector has no length.
    ///
    /// Fails only when a spatial scale maps the point's position to a
    /// non-finite coordinate.
    pub fn new(
        key: GlyphKey,
        point: &DataPoint,
        vector: Vector3<f64>,
        scales: &ResolvedScales,
    ) -> Result<Option<AnnotatedPoint>, error::Error> {
        let orientation = match orient(&vector) {
            Some(orientation) => orientation,
            None => return Ok(None),
        };
        let translation = Vector3::new(
            scales.x.try_apply(point.x)?,
            scales.y.try_apply(point.y)?,
            scales.z.try_apply(point.z)?,
        );
        Ok(Some(AnnotatedPoint {
            key,
            point: point.clone(),
            vector,
            translation,
            rotation: orientation.rotation,
            length: orientation.length,
        }))
    }

    /// X3D `SFVec3f` translation string.
    pub fn translation_attr(&self) -> String {
        format!(
            "{} {} {}",
            self.translation.x, self.translation.y, self.translation.z
        )
    }
}
