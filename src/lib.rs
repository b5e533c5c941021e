//! `glyphfield` renders 3D vector fields as arrow glyphs in an X3D scene
//! tree, reconciling the glyph set against each new dataset.

/// The glyphfield Command Line Interface.
pub mod cli;

/// Component configuration.
pub mod config;

/// Input datasets and file readers.
pub mod data;

/// Error types.
pub mod error;

/// The vector field component and its pipeline stages.
pub mod field;

/// Console logging setup.
pub mod logging;

/// Subcommand entry points.
pub mod run;

/// Scene tree and X3D output.
pub mod scene;

/// Utility functions.
pub mod utils;
