//! Mappings from data space to render space, colour and glyph size.
//!
//! Each of the five scale roles is either supplied by the caller or built
//! lazily from the first dataset summary that can support it. A scale,
//! once set, is kept until [`Scales::reset`] is called.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::config::Dimensions;
use crate::error;

use super::color::{Colors, Rgb};
use super::summary::{Extent, Summary};

#[derive(ValueEnum, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScaleKind {
    #[default]
    #[serde(alias = "scaleLinear")]
    Linear,
    #[serde(alias = "scaleSqrt")]
    Sqrt,
    #[serde(alias = "scaleLog")]
    Log,
}

impl ScaleKind {
    fn transform(&self, value: f64) -> f64 {
        match self {
            ScaleKind::Linear => value,
            ScaleKind::Sqrt => value.signum() * value.abs().sqrt(),
            ScaleKind::Log => value.ln(),
        }
    }
}

/// Proportion of `value` along `domain`; a zero-width domain maps to 0.5.
fn normalize(value: f64, domain: &[f64; 2]) -> f64 {
    let width = domain[1] - domain[0];
    if width == 0.0 {
        0.5
    } else {
        (value - domain[0]) / width
    }
}

/// A continuous numeric scale: linear, sqrt or log.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ContinuousScale {
    #[serde(default)]
    pub kind: ScaleKind,
    pub domain: [f64; 2],
    pub range: [f64; 2],
    #[serde(default)]
    pub clamp: bool,
}

impl ContinuousScale {
    pub fn linear(domain: [f64; 2], range: [f64; 2]) -> ContinuousScale {
        ContinuousScale {
            kind: ScaleKind::Linear,
            domain,
            range,
            clamp: false,
        }
    }

    pub fn with_kind(self, kind: ScaleKind) -> ContinuousScale {
        ContinuousScale { kind, ..self }
    }

    pub fn with_clamp(self, clamp: bool) -> ContinuousScale {
        ContinuousScale { clamp, ..self }
    }

    /// Map `value` into the range. The result may be NaN or infinite.
    pub fn apply(&self, value: f64) -> f64 {
        let domain = [
            self.kind.transform(self.domain[0]),
            self.kind.transform(self.domain[1]),
        ];
        let mut proportion = normalize(self.kind.transform(value), &domain);
        if self.clamp {
            proportion = proportion.clamp(0.0, 1.0);
        }
        (self.range[1] - self.range[0]) * proportion + self.range[0]
    }

    /// Map `value` into the range, failing on a non-finite result.
    pub fn try_apply(&self, value: f64) -> Result<f64, error::Error> {
        let scaled = self.apply(value);
        if scaled.is_finite() {
            Ok(scaled)
        } else {
            Err(error::Error::InvalidScale(format!(
                "{:?} scale {:?} -> {:?} maps {} to {}",
                self.kind, self.domain, self.range, value, scaled
            )))
        }
    }

    /// Signed length of the range.
    pub fn span(&self) -> f64 {
        self.range[1] - self.range[0]
    }
}

/// A sequential colour scale over a numeric domain.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorScale {
    pub domain: [f64; 2],
    pub colors: Colors,
}

impl ColorScale {
    pub fn new(domain: [f64; 2], colors: Colors) -> ColorScale {
        ColorScale { domain, colors }
    }

    pub fn apply(&self, value: f64) -> Rgb {
        self.colors.interpolate(normalize(value, &self.domain))
    }

    pub fn try_apply(&self, value: f64) -> Result<Rgb, error::Error> {
        let t = normalize(value, &self.domain);
        if t.is_finite() {
            Ok(self.colors.interpolate(t))
        } else {
            Err(error::Error::InvalidScale(format!(
                "colour scale {:?} maps {} to {}",
                self.domain, value, t
            )))
        }
    }
}

/// The scales held by a component between render passes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scales {
    pub x: Option<ContinuousScale>,
    pub y: Option<ContinuousScale>,
    pub z: Option<ContinuousScale>,
    pub color: Option<ColorScale>,
    pub size: Option<ContinuousScale>,
}

/// Borrowed view of a fully resolved set of scales.
#[derive(Clone, Copy, Debug)]
pub struct ResolvedScales<'a> {
    pub x: &'a ContinuousScale,
    pub y: &'a ContinuousScale,
    pub z: &'a ContinuousScale,
    pub color: &'a ColorScale,
    pub size: &'a ContinuousScale,
}

fn spatial_default(extent: Option<Extent>, dimension: f64) -> Option<ContinuousScale> {
    extent.map(|e| ContinuousScale::linear(e.as_array(), [0.0, dimension]))
}

impl Scales {
    /// Fill in every unset scale that the summary can support.
    ///
    /// The colour scale runs over the reversed magnitude extent, so the
    /// largest magnitude takes the low end of the palette.
    pub fn resolve(
        &mut self,
        summary: &Summary,
        dimensions: &Dimensions,
        colors: &Colors,
        size_domain: [f64; 2],
    ) {
        if self.x.is_none() {
            self.x = spatial_default(summary.x, dimensions.x);
        }
        if self.y.is_none() {
            self.y = spatial_default(summary.y, dimensions.y);
        }
        if self.z.is_none() {
            self.z = spatial_default(summary.z, dimensions.z);
        }
        if self.color.is_none() {
            self.color = summary
                .magnitude
                .map(|e| ColorScale::new(e.reversed(), colors.clone()));
        }
        if self.size.is_none() {
            self.size = summary
                .magnitude
                .map(|e| ContinuousScale::linear(e.as_array(), size_domain));
        }
    }

    /// Go back to the scales in `supplied`, dropping every derived one.
    pub fn reset(&mut self, supplied: &Scales) {
        *self = supplied.clone();
    }

    pub fn resolved(&self) -> Option<ResolvedScales<'_>> {
        match (&self.x, &self.y, &self.z, &self.color, &self.size) {
            (Some(x), Some(y), Some(z), Some(color), Some(size)) => Some(ResolvedScales {
                x,
                y,
                z,
                color,
                size,
            }),
            _ => None,
        }
    }
}
