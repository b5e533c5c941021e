//! Component configuration, read from YAML and overridden from the command line.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error;
use crate::field::color::{Colors, Palette};
use crate::field::scale::ContinuousScale;

/// Render-space extent of each spatial axis.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Dimensions {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for Dimensions {
    fn default() -> Dimensions {
        Dimensions {
            x: 40.0,
            y: 40.0,
            z: 40.0,
        }
    }
}

fn default_size_domain() -> [f64; 2] {
    [2.0, 5.0]
}

fn default_duration() -> f64 {
    0.25
}

fn default_classed() -> String {
    "vectorFields".to_string()
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FieldConfig {
    #[serde(default)]
    pub dimensions: Dimensions,
    /// Output interval of the default size scale.
    #[serde(default = "default_size_domain")]
    pub size_domain: [f64; 2],
    #[serde(default)]
    pub palette: Palette,
    /// Custom palette as hex colours; takes precedence over `palette`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
    /// Transition length in seconds.
    #[serde(default = "default_duration")]
    pub duration: f64,
    #[serde(default = "default_classed")]
    pub classed: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_scale: Option<ContinuousScale>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_scale: Option<ContinuousScale>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_scale: Option<ContinuousScale>,
}

impl Default for FieldConfig {
    fn default() -> FieldConfig {
        FieldConfig {
            dimensions: Dimensions::default(),
            size_domain: default_size_domain(),
            palette: Palette::default(),
            colors: None,
            duration: default_duration(),
            classed: default_classed(),
            x_scale: None,
            y_scale: None,
            z_scale: None,
        }
    }
}

impl FieldConfig {
    pub fn from_file(path: &Path) -> Result<FieldConfig, error::Error> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(_) => {
                return Err(error::Error::FileNotFound(format!(
                    "{}",
                    path.to_string_lossy()
                )))
            }
        };
        let config: FieldConfig = serde_yaml::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    /// Colour scheme described by this config.
    pub fn colors(&self) -> Result<Colors, error::Error> {
        match &self.colors {
            Some(list) => Colors::from_hex_list(list),
            None => Ok(Colors::Interpolator(self.palette)),
        }
    }
}
