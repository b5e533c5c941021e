use std::fmt;

use clap::ValueEnum;
use nalgebra::Vector3;

use crate::data::DataPoint;

/// A vector field sampled at a position, with the point's optional scalar value.
pub trait VectorFunction {
    fn eval(&self, x: f64, y: f64, z: f64, value: Option<f64>) -> Vector3<f64>;
}

impl<F> VectorFunction for F
where
    F: Fn(f64, f64, f64, Option<f64>) -> Vector3<f64>,
{
    fn eval(&self, x: f64, y: f64, z: f64, value: Option<f64>) -> Vector3<f64> {
        self(x, y, z, value)
    }
}

impl fmt::Debug for dyn VectorFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VectorFunction")
    }
}

/// `(x, y, z) -> (x, y, z)`
#[derive(Clone, Copy, Debug, Default)]
pub struct Identity;

impl VectorFunction for Identity {
    fn eval(&self, x: f64, y: f64, z: f64, _value: Option<f64>) -> Vector3<f64> {
        Vector3::new(x, y, z)
    }
}

/// Fields selectable from the command line.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BuiltinField {
    #[default]
    Identity,
    /// Rotation about the z axis: `(-y, x, 0)`.
    Swirl,
    /// Unit vectors pointing away from the origin.
    Radial,
}

impl VectorFunction for BuiltinField {
    fn eval(&self, x: f64, y: f64, z: f64, value: Option<f64>) -> Vector3<f64> {
        match self {
            BuiltinField::Identity => Identity.eval(x, y, z, value),
            BuiltinField::Swirl => Vector3::new(-y, x, 0.0),
            BuiltinField::Radial => {
                let position = Vector3::new(x, y, z);
                let length = position.norm();
                if length == 0.0 {
                    Vector3::zeros()
                } else {
                    position / length
                }
            }
        }
    }
}

/// The vector for one point: its explicit components if present,
/// otherwise the field evaluated at its position.
pub fn resolve(point: &DataPoint, function: &dyn VectorFunction) -> Vector3<f64> {
    match point.explicit_vector() {
        Some(vector) => vector,
        None => function.eval(point.x, point.y, point.z, point.value),
    }
}

pub fn resolve_all(values: &[DataPoint], function: &dyn VectorFunction) -> Vec<Vector3<f64>> {
    values.iter().map(|point| resolve(point, function)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_default() {
        let point = DataPoint::new(1.0, 2.0, 3.0);
        assert_eq!(resolve(&point, &Identity), Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_explicit_vector_wins() {
        let point = DataPoint::new(1.0, 2.0, 3.0).with_vector(0.0, 0.0, 1.0);
        let doubled = |x: f64, y: f64, z: f64, _v: Option<f64>| Vector3::new(2.0 * x, 2.0 * y, 2.0 * z);
        assert_eq!(resolve(&point, &doubled), Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_closure_receives_value() {
        let scaled = |x: f64, y: f64, z: f64, v: Option<f64>| Vector3::new(x, y, z) * v.unwrap_or(1.0);
        let values = vec![
            DataPoint::new(1.0, 0.0, 0.0).with_value(3.0),
            DataPoint::new(0.0, 1.0, 0.0),
        ];
        assert_eq!(
            resolve_all(&values, &scaled),
            vec![Vector3::new(3.0, 0.0, 0.0), Vector3::new(0.0, 1.0, 0.0)]
        );
    }

    #[test]
    fn test_builtin_fields() {
        let swirl = BuiltinField::Swirl;
        assert_eq!(swirl.eval(1.0, 2.0, 3.0, None), Vector3::new(-2.0, 1.0, 0.0));
        let radial: Box<dyn VectorFunction> = Box::new(BuiltinField::Radial);
        assert_eq!(radial.eval(0.0, 0.0, 0.0, None), Vector3::zeros());
        assert_eq!(radial.eval(0.0, 0.0, 4.0, None), Vector3::new(0.0, 0.0, 1.0));
    }
}
