//! Input records for a vector field: positioned points, optionally
//! carrying an explicit vector and a scalar value.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use flate2::read::GzDecoder;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vx: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vz: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Explicit identity; points without one are keyed by position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl DataPoint {
    pub fn new(x: f64, y: f64, z: f64) -> DataPoint {
        DataPoint {
            x,
            y,
            z,
            ..Default::default()
        }
    }

    pub fn with_vector(self, vx: f64, vy: f64, vz: f64) -> DataPoint {
        DataPoint {
            vx: Some(vx),
            vy: Some(vy),
            vz: Some(vz),
            ..self
        }
    }

    pub fn with_value(self, value: f64) -> DataPoint {
        DataPoint {
            value: Some(value),
            ..self
        }
    }

    pub fn with_key(self, key: &str) -> DataPoint {
        DataPoint {
            key: Some(key.to_string()),
            ..self
        }
    }

    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// The vector carried on the record, if all three components are present.
    pub fn explicit_vector(&self) -> Option<Vector3<f64>> {
        match (self.vx, self.vy, self.vz) {
            (Some(vx), Some(vy), Some(vz)) => Some(Vector3::new(vx, vy, vz)),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct DataSet {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub values: Vec<DataPoint>,
}

impl DataSet {
    pub fn new(key: &str, values: Vec<DataPoint>) -> DataSet {
        DataSet {
            key: key.to_string(),
            values,
        }
    }
}

pub enum Suffix {
    JSON,
    YAML,
    CSV,
}

impl FromStr for Suffix {
    type Err = ();
    fn from_str(input: &str) -> Result<Suffix, Self::Err> {
        match input {
            "json" => Ok(Suffix::JSON),
            "yaml" | "yml" => Ok(Suffix::YAML),
            "csv" => Ok(Suffix::CSV),
            _ => Err(()),
        }
    }
}

fn file_reader(path: &Path) -> Result<Box<dyn BufRead>, error::Error> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(_) => {
            return Err(error::Error::FileNotFound(format!(
                "{}",
                path.to_string_lossy()
            )))
        }
    };
    if path.to_string_lossy().ends_with(".gz") {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Format suffix and stem of a path, looking through a trailing `.gz`.
fn split_name(path: &Path) -> (String, String) {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let name = name.strip_suffix(".gz").unwrap_or(&name).to_string();
    match name.rsplit_once('.') {
        Some((stem, suffix)) => (stem.to_string(), suffix.to_lowercase()),
        None => (name, String::new()),
    }
}

pub fn parse_csv<R: std::io::Read>(reader: R, key: &str) -> Result<DataSet, error::Error> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut values = vec![];
    for record in csv_reader.deserialize() {
        let point: DataPoint = record?;
        values.push(point);
    }
    Ok(DataSet::new(key, values))
}

/// Load a dataset from `.json`, `.yaml`/`.yml` or `.csv`, optionally gzipped.
///
/// A dataset read from CSV, or a JSON/YAML dataset without a key, takes
/// the file stem as its key.
pub fn load(path: &Path) -> Result<DataSet, error::Error> {
    let (stem, suffix_str) = split_name(path);
    let reader = file_reader(path)?;
    let mut data_set = match Suffix::from_str(&suffix_str) {
        Ok(Suffix::JSON) => serde_json::from_reader(reader)?,
        Ok(Suffix::YAML) => serde_yaml::from_reader(reader)?,
        Ok(Suffix::CSV) => parse_csv(reader, &stem)?,
        Err(_) => return Err(error::Error::InvalidFileSuffix(suffix_str)),
    };
    if data_set.key.is_empty() {
        data_set.key = stem;
    }
    Ok(data_set)
}
