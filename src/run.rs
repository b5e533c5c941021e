use std::path::PathBuf;

use anyhow;
use tracing::info;

use crate::cli;
use crate::config::FieldConfig;
use crate::data;
use crate::field::axis::TickAxis;
use crate::field::VectorFields;
use crate::scene;

fn load_config(config_file: &Option<PathBuf>) -> Result<FieldConfig, anyhow::Error> {
    let config = match config_file {
        Some(path) => FieldConfig::from_file(path)?,
        None => FieldConfig::default(),
    };
    Ok(config)
}

/// Apply command line overrides on top of the configuration file.
fn render_config(options: &cli::RenderOptions) -> Result<FieldConfig, anyhow::Error> {
    let mut config = load_config(&options.config_file)?;
    if let Some(duration) = options.duration {
        config.duration = duration;
    }
    if let Some(palette) = options.palette {
        config.palette = palette;
        config.colors = None;
    }
    if let Some(size_domain) = options.size_domain {
        config.size_domain = size_domain;
    }
    if let Some(dimensions) = options.dimensions {
        config.dimensions = dimensions;
    }
    Ok(config)
}

/// Execute the `render` subcommand from `glyphfield`.
pub fn render(options: &cli::RenderOptions) -> Result<(), anyhow::Error> {
    let config = render_config(options)?;
    let mut fields = VectorFields::builder()
        .config(config)
        .vector_function(options.field)
        .build()?;
    for path in options.data.iter() {
        let data_set = data::load(path)?;
        let summary = fields.render(&data_set)?;
        info!(
            file = %path.display(),
            dataset = %data_set.key,
            entered = summary.entered,
            updated = summary.updated,
            exited = summary.exited,
            dropped = summary.dropped,
            "rendered"
        );
        fields.advance(options.step);
    }
    fields.finish_transitions();

    let mut content = vec![];
    if options.axes {
        if let Some(axes) = fields.axes(&TickAxis::default())? {
            content.push(axes);
        }
    }
    if let Some(glyphs) = fields.scene() {
        content.push(glyphs);
    }
    scene::save_x3d(&options.output, &scene::document(content))?;
    info!(output = %options.output.display(), glyphs = fields.glyphs().len(), "scene written");
    Ok(())
}

/// Execute the `config` subcommand from `glyphfield`.
pub fn config(options: &cli::ConfigOptions) -> Result<(), anyhow::Error> {
    let config = load_config(&options.config_file)?;
    print!("{}", serde_yaml::to_string(&config)?);
    Ok(())
}

pub fn cmd(args: cli::Arguments) -> Result<(), anyhow::Error> {
    match args.cmd {
        cli::SubCommand::Render(options) => render(&options),
        cli::SubCommand::Config(options) => config(&options),
    }
}
