//! Optional CLI configuration, read from `quadratura.toml` when present.
//!
//! Everything has a sensible default; command-line flags override whatever
//! the file sets.
use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Rounds {
    pub firms: Option<usize>,
    pub scale_min: Option<i64>,
    pub scale_max: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Log filter level for the CLI and the engine.
    pub level: Option<String>,
    #[serde(default)]
    pub rounds: Rounds,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("quadratura").required(false))
            .build()?;

        settings.try_deserialize()
    }
}
