use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::config::Dimensions;
use crate::field::color::Palette;
use crate::field::vector::BuiltinField;

fn parse_numbers(s: &str, count: usize) -> Result<Vec<f64>, String> {
    let values = s
        .split(',')
        .map(|v| v.trim().parse::<f64>().map_err(|e| format!("{}: {}", v, e)))
        .collect::<Result<Vec<f64>, String>>()?;
    if values.len() != count {
        return Err(format!("expected {} comma separated numbers", count));
    }
    Ok(values)
}

fn size_domain_parser(s: &str) -> Result<[f64; 2], String> {
    let values = parse_numbers(s, 2)?;
    Ok([values[0], values[1]])
}

fn dimensions_parser(s: &str) -> Result<Dimensions, String> {
    let values = parse_numbers(s, 3)?;
    Ok(Dimensions {
        x: values[0],
        y: values[1],
        z: values[2],
    })
}

fn duration_parser(s: &str) -> Result<f64, String> {
    match s.parse::<f64>() {
        Ok(v) if v >= 0.0 && v.is_finite() => Ok(v),
        Ok(v) => Err(format!("{} is not a valid duration", v)),
        Err(e) => Err(e.to_string()),
    }
}

/// Top level arguments to `glyphfield`
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[clap(subcommand)]
    pub cmd: SubCommand,
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// `glyphfield` subcommands
#[derive(Subcommand, Debug)]
pub enum SubCommand {
    /// Render one or more datasets as vector field glyphs.
    /// Called as `glyphfield render`
    Render(RenderOptions),
    /// Print the effective configuration as YAML.
    /// Called as `glyphfield config`
    Config(ConfigOptions),
}

/// Options to pass to `glyphfield render`
#[derive(Parser, Debug, Default)]
pub struct RenderOptions {
    /// Dataset file (.json, .json.gz, .yaml, .csv); each one is a render pass
    #[arg(long = "data", short = 'd', required = true, num_args(1..))]
    pub data: Vec<PathBuf>,
    /// YAML configuration file
    #[arg(long = "config", short = 'c')]
    pub config_file: Option<PathBuf>,
    /// Output filename
    #[arg(long, short = 'o', default_value = "scene.x3d")]
    pub output: PathBuf,
    /// Draw the three plane axes
    #[arg(long)]
    pub axes: bool,
    /// Vector field for points without explicit vectors
    #[arg(long, value_enum, default_value_t = BuiltinField::Identity)]
    pub field: BuiltinField,
    /// Transition duration in seconds
    #[arg(long, value_parser = duration_parser)]
    pub duration: Option<f64>,
    /// Colour palette
    #[arg(long, value_enum)]
    pub palette: Option<Palette>,
    /// Glyph size range (<min>,<max>)
    #[arg(long = "size-domain", value_parser = size_domain_parser)]
    pub size_domain: Option<[f64; 2]>,
    /// Render space extent (<x>,<y>,<z>)
    #[arg(long, value_parser = dimensions_parser)]
    pub dimensions: Option<Dimensions>,
    /// Seconds between passes used to advance transitions
    #[arg(long, default_value_t = 0.0, value_parser = duration_parser)]
    pub step: f64,
}

/// Options to pass to `glyphfield config`
#[derive(Parser, Debug, Default)]
pub struct ConfigOptions {
    /// YAML configuration file
    #[arg(long = "config", short = 'c')]
    pub config_file: Option<PathBuf>,
}

/// Command line argument parser
pub fn parse() -> Arguments {
    Arguments::parse()
}
