use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Data, Env, Format, Json, Yaml};
use serde::{Deserialize, Serialize};
use thiserror::Error;


const ENV_PREFIX: &str = "TICKETING_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unsupported file or missing file extension: {0:?}")]
    UnsupportedFile(PathBuf),
    #[error("Config parsing error: `{0}`")]
    Parsing(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub app: MigrationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationConfig {
    pub database_url: String,
    pub trace_level: Option<String>,
    pub trace_json: Option<bool>,
}

pub enum InputFormat {
    Yaml(Data<Yaml>),
    Json(Data<Json>),
}

impl AppConfig {
    /// Merges `files` in order, then `TICKETING_`-prefixed environment
    /// variables (`TICKETING_app__databaseUrl`). Missing files are skipped.
    pub fn from_files(files: &[impl AsRef<Path>]) -> Result<Self, ConfigError> {
        let mut inputs: Vec<InputFormat> = Vec::with_capacity(files.len());

        for path in files {
            let path = path.as_ref();
            match path.extension().and_then(|ext| ext.to_str()) {
                Some("yml" | "yaml") => inputs.push(InputFormat::Yaml(Yaml::file(path))),
                Some("json") => inputs.push(InputFormat::Json(Json::file(path))),
                _ => return Err(ConfigError::UnsupportedFile(path.to_path_buf())),
            }
        }

        Self::extract(
            Self::merge(inputs).merge(Env::prefixed(ENV_PREFIX).split("__").lowercase(false)),
        )
    }

    pub fn from_yaml(
        configs: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Result<Self, ConfigError> {
        let inputs = configs
            .into_iter()
            .map(|s| Yaml::string(s.as_ref()))
            .map(InputFormat::Yaml);

        Self::extract(Self::merge(inputs))
    }

    fn merge(inputs: impl IntoIterator<Item = InputFormat>) -> Figment {
        inputs
            .into_iter()
            .fold(Figment::new(), |figment, input| match input {
                InputFormat::Yaml(content) => figment.merge(content),
                InputFormat::Json(content) => figment.merge(content),
            })
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        figment
            .extract()
            .map_err(|e| ConfigError::Parsing(e.to_string()))
    }
}
