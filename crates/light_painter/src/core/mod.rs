//! Core settings shared by the commands and the interactive session

pub mod config;

pub use config::{
    Config, ConfigError, FlagSettings, LampSettings, LoggingConfig, MeshSettings, PainterConfig,
    SessionSettings, SkySettings, SunSettings, TubeSettings,
};
