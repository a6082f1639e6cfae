use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::AppError;
use crate::pipeline::analyzers::config::{
    AnemiaConfig, DehydrationConfig, RespiratoryConfig, SkinConfig,
};

const ENV_PREFIX: &str = "KAVACH";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub log_level: String,
    /// Upper bound on a single analysis; unset means no bound.
    pub analysis_timeout_ms: Option<u64>,
    pub anemia: AnemiaConfig,
    pub skin: SkinConfig,
    pub respiratory: RespiratoryConfig,
    pub dehydration: DehydrationConfig,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            analysis_timeout_ms: None,
            anemia: AnemiaConfig::default(),
            skin: SkinConfig::default(),
            respiratory: RespiratoryConfig::default(),
            dehydration: DehydrationConfig::default(),
        }
    }
}

impl Configuration {
    /// Defaults, then the optional file, then `KAVACH_*` environment variables
    /// (nested keys separated by `__`, e.g. `KAVACH_SKIN__INPUT_SIZE`).
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let configuration: Configuration = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        configuration.validate().map_err(AppError::InvalidConfig)?;
        Ok(configuration)
    }

    /// Same tuning with every simulated latency removed.
    pub fn without_delays() -> Self {
        let mut configuration = Self::default();
        configuration.skin.model_load_delay_ms = 0;
        configuration.respiratory.processing_delay_ms = 0;
        configuration
    }

    pub fn analysis_timeout(&self) -> Option<Duration> {
        self.analysis_timeout_ms.map(Duration::from_millis)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.log_level.parse::<tracing::Level>().is_err() {
            return Err(format!("Unknown log level '{}'", self.log_level));
        }
        if self.analysis_timeout_ms == Some(0) {
            return Err("Analysis timeout must be greater than 0".to_string());
        }
        self.anemia.validate()?;
        self.skin.validate()?;
        self.respiratory.validate()?;
        self.dehydration.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_file_over_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
log_level = "debug"
analysis_timeout_ms = 5000

[skin]
model_load_delay_ms = 0

[dehydration.thresholds]
lower = 0.25
upper = 0.5
"#
        )
        .unwrap();

        let configuration = Configuration::load(Some(file.path())).unwrap();
        assert_eq!(configuration.log_level, "debug");
        assert_eq!(
            configuration.analysis_timeout(),
            Some(Duration::from_millis(5000))
        );
        assert_eq!(configuration.skin.model_load_delay_ms, 0);
        assert_eq!(configuration.skin.input_size, 224);
        assert_eq!(configuration.dehydration.thresholds.lower, 0.25);
        assert_eq!(configuration.anemia, AnemiaConfig::default());
    }

    #[test]
    fn rejects_invalid_file_values() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[anemia.thresholds]
lower = 0.8
upper = 0.2
"#
        )
        .unwrap();

        let err = Configuration::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, AppError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_nan_skin_confidence_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[skin]
confidence_min = nan
"#
        )
        .unwrap();

        let err = Configuration::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, AppError::InvalidConfig(_)));
    }

    #[test]
    fn without_delays_keeps_other_tuning() {
        let configuration = Configuration::without_delays();
        assert_eq!(configuration.skin.model_load_delay_ms, 0);
        assert_eq!(configuration.respiratory.processing_delay_ms, 0);
        assert_eq!(configuration.anemia, AnemiaConfig::default());
        assert!(configuration.validate().is_ok());
    }
}
