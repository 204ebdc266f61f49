use std::fs;
use std::path::{Path, PathBuf};
use serde::Deserialize;
use thiserror::Error;

use crate::alignment::TopicSource;
use crate::interpolation::InterpolationMethod;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path}")]
    Read { path: PathBuf, #[source] source: std::io::Error },
    #[error("invalid config {path}")]
    Parse { path: PathBuf, #[source] source: serde_yaml::Error },
    #[error("topic {file} lists its time key `{key}` among the keys to interpolate")]
    TimeKeyListed { file: String, key: String }
}

/**
 * Settings of the frame data tool. Every field is optional in the YAML file.
 */
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RuntimeConf {
    pub frames_file: String,
    pub ts_key: String,
    pub outfile: String,
    pub topics: Vec<TopicConf>
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TopicConf {
    pub file: String,
    /// Falls back to `RuntimeConf::ts_key`
    #[serde(default)]
    pub time_key: Option<String>,
    pub keys: Vec<String>,
    #[serde(default)]
    pub method: InterpolationMethod,
    #[serde(default = "extrapolate_default")]
    pub extrapolate: bool
}

fn extrapolate_default() -> bool {
    true
}

impl Default for RuntimeConf {
    fn default() -> RuntimeConf {
        RuntimeConf {
            frames_file: "frames.txt".to_string(),
            ts_key: "timeNS".to_string(),
            outfile: "frames_data.txt".to_string(),
            topics: vec![
                TopicConf {
                    file: "LocalPoseTopic.txt".to_string(),
                    time_key: None,
                    keys: vec!["pos".to_string(), "vel".to_string(), "att".to_string()],
                    method: InterpolationMethod::Nearest,
                    extrapolate: true
                },
                TopicConf {
                    file: "SensorGPSTopic.txt".to_string(),
                    time_key: None,
                    keys: vec!["pos".to_string()],
                    method: InterpolationMethod::Linear,
                    extrapolate: true
                }
            ]
        }
    }
}

impl RuntimeConf {
    pub fn from_yaml(text: &str) -> Result<RuntimeConf, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /**
     * Topic sources with file names resolved against `dir`.
     */
    pub fn topic_sources(&self, dir: &Path) -> Result<Vec<TopicSource>, ConfigError> {
        self.topics.iter().map(|topic| {
            let time_key = topic.time_key.clone().unwrap_or_else(|| self.ts_key.clone());
            if topic.keys.contains(&time_key) {
                return Err(ConfigError::TimeKeyListed { file: topic.file.clone(), key: time_key });
            }
            Ok(TopicSource {
                file: dir.join(&topic.file),
                time_key,
                keys: topic.keys.clone(),
                method: topic.method,
                extrapolate: topic.extrapolate
            })
        }).collect()
    }
}

pub fn load_runtime_conf(file_path: &Path) -> Result<RuntimeConf, ConfigError> {
    let text = fs::read_to_string(file_path).map_err(|source| ConfigError::Read { path: file_path.to_path_buf(), source })?;
    RuntimeConf::from_yaml(&text).map_err(|source| ConfigError::Parse { path: file_path.to_path_buf(), source })
}
