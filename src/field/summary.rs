use nalgebra::Vector3;

use crate::data::DataPoint;

use super::orientation::magnitude;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Extent {
    /// Minimum and maximum of the finite values, or `None` if there are none.
    pub fn of<I: IntoIterator<Item = f64>>(values: I) -> Option<Extent> {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |extent, v| match extent {
                None => Some(Extent { min: v, max: v }),
                Some(e) => Some(Extent {
                    min: e.min.min(v),
                    max: e.max.max(v),
                }),
            })
    }

    pub fn as_array(&self) -> [f64; 2] {
        [self.min, self.max]
    }

    pub fn reversed(&self) -> [f64; 2] {
        [self.max, self.min]
    }
}

/// Per-axis coordinate extents and the extent of resolved vector magnitudes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Summary {
    pub x: Option<Extent>,
    pub y: Option<Extent>,
    pub z: Option<Extent>,
    pub magnitude: Option<Extent>,
}

/// Summarise a dataset given the vector resolved for each of its points.
pub fn summarise(values: &[DataPoint], vectors: &[Vector3<f64>]) -> Summary {
    Summary {
        x: Extent::of(values.iter().map(|p| p.x)),
        y: Extent::of(values.iter().map(|p| p.y)),
        z: Extent::of(values.iter().map(|p| p.z)),
        magnitude: Extent::of(vectors.iter().map(magnitude)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extent() {
        assert_eq!(Extent::of(vec![]), None);
        assert_eq!(
            Extent::of(vec![3.0, f64::NAN, -1.0, 2.0]),
            Some(Extent { min: -1.0, max: 3.0 })
        );
        assert_eq!(Extent::of(vec![f64::NAN, f64::INFINITY]), None);
    }

    #[test]
    fn test_summarise() {
        let values = vec![
            DataPoint::new(0.0, 5.0, -2.0),
            DataPoint::new(1.0, -5.0, 2.0),
        ];
        let vectors = vec![Vector3::new(0.0, 0.0, 0.0), Vector3::new(3.0, 4.0, 0.0)];
        let summary = summarise(&values, &vectors);
        assert_eq!(summary.x, Some(Extent { min: 0.0, max: 1.0 }));
        assert_eq!(summary.y, Some(Extent { min: -5.0, max: 5.0 }));
        assert_eq!(summary.z.unwrap().as_array(), [-2.0, 2.0]);
        assert_eq!(summary.magnitude.unwrap().reversed(), [5.0, 0.0]);
    }

    #[test]
    fn test_summarise_large_vectors() {
        let values = vec![DataPoint::new(0.0, 0.0, 0.0), DataPoint::new(1.0, 0.0, 0.0)];
        let vectors = vec![Vector3::new(0.0, 1.0, 0.0), Vector3::new(3e200, 4e200, 0.0)];
        let magnitude = summarise(&values, &vectors).magnitude.unwrap();
        assert_eq!(magnitude.min, 1.0);
        assert!((magnitude.max / 5e200 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_summarise_empty() {
        assert_eq!(summarise(&[], &[]), Summary::default());
    }
}
