//! JSON runtime configuration for the command-line tools.

pub mod lane;

pub use lane::{
    load_config, ControlConfig, ControllerKind, OutputConfig, OutputFormat, RuntimeConfig,
};
