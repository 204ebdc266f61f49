use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use indexmap::IndexMap;
use log::info;
use serde_yaml::{Mapping, Value};
use thiserror::Error;

use crate::progress::Progress;
use crate::sensors::{FieldMap, FieldShape, FieldValue, topic_sample::{TopicSample, TopicSamples}};

pub const DOCUMENT_START: &str = "topic:";
pub const DOCUMENT_END: &str = "===";

#[derive(Debug, Error)]
pub enum TopicError {
    #[error("could not open topic log {path}")]
    Open { path: PathBuf, #[source] source: std::io::Error },
    #[error("could not read topic log")]
    Read(#[from] std::io::Error),
    #[error("document {document}: invalid YAML")]
    Yaml { document: usize, #[source] source: serde_yaml::Error },
    #[error("document {document}: not a mapping")]
    NotAMapping { document: usize },
    #[error("document {document}: `{key}` is neither a number nor a mapping of numbers")]
    UnsupportedValue { document: usize, key: String },
    #[error("document {document}: missing timestamp `{key}`")]
    MissingTimestamp { document: usize, key: String },
    #[error("document {document}: timestamp `{key}` is not an integer")]
    InvalidTimestamp { document: usize, key: String },
    #[error("sample {sample}: field `{key}` has shape {found}, expected {expected}")]
    ShapeMismatch { key: String, sample: usize, expected: FieldShape, found: FieldShape }
}

pub fn load(file_path: &Path, time_key: &str, keys: &[String]) -> Result<TopicSamples, TopicError> {
    let file = File::open(file_path).map_err(|source| TopicError::Open { path: file_path.to_path_buf(), source })?;
    decode(BufReader::new(file), time_key, keys)
}

/**
 * Decodes a topic log into samples holding only `keys` (plus the timestamp taken from `time_key`).
 * Each document sits between a `topic:` line and a `===` line. Lines are filtered by their key before
 * the YAML parse, so only the requested keys are ever decoded. Lines outside a document are ignored.
 */
pub fn decode<R: BufRead>(reader: R, time_key: &str, keys: &[String]) -> Result<TopicSamples, TopicError> {
    let progress = Progress::new("Parsing line", 1000);
    let mut wanted = Vec::<&str>::with_capacity(keys.len() + 1);
    wanted.push(time_key);
    wanted.extend(keys.iter().map(|k| k.as_str()).filter(|k| *k != time_key));

    let mut samples = Vec::<TopicSample>::new();
    let mut document: Option<String> = None;

    for (line_index, line) in reader.lines().enumerate() {
        progress.tick(line_index, None);
        let line = line?;
        let line = line.trim_end_matches('\r');

        if line == DOCUMENT_START {
            document = Some(String::new());
            continue;
        }

        if line == DOCUMENT_END {
            if let Some(text) = document.take() {
                samples.push(decode_document(&text, samples.len(), time_key, &wanted[1..])?);
            }
            continue;
        }

        if let Some(text) = document.as_mut() {
            let line = line.trim_start();
            if let Some(delim_pos) = line.find(':') {
                if wanted.contains(&&line[..delim_pos]) {
                    text.push_str(line);
                    text.push('\n');
                }
            }
        }
    }

    info!("Parse time (s): {:.1}", progress.finish());
    TopicSamples::new(time_key, keys, samples)
}

fn decode_document(text: &str, document: usize, time_key: &str, keys: &[&str]) -> Result<TopicSample, TopicError> {
    let value = match text.is_empty() {
        true => Value::Null,
        false => serde_yaml::from_str::<Value>(text).map_err(|source| TopicError::Yaml { document, source })?
    };
    let mapping = match value {
        Value::Mapping(mapping) => mapping,
        Value::Null => Mapping::new(),
        _ => return Err(TopicError::NotAMapping { document })
    };

    let timestamp = mapping.get(time_key)
        .ok_or_else(|| TopicError::MissingTimestamp { document, key: time_key.to_string() })?;
    let timestamp = to_timestamp(timestamp)
        .ok_or_else(|| TopicError::InvalidTimestamp { document, key: time_key.to_string() })?;

    let mut fields = FieldMap::with_capacity(keys.len());
    for &key in keys {
        if let Some(value) = mapping.get(key) {
            let field = to_field_value(value).ok_or_else(|| TopicError::UnsupportedValue { document, key: key.to_string() })?;
            fields.insert(key.to_string(), field);
        }
    }

    Ok(TopicSample::new(timestamp, fields))
}

// Integral floats such as `1000.0` are accepted as well.
fn to_timestamp(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| value.as_f64()
        .filter(|t| t.is_finite() && t.fract() == 0.0)
        .map(|t| t as i64))
}

fn to_field_value(value: &Value) -> Option<FieldValue> {
    match value {
        Value::Number(number) => number.as_f64().map(FieldValue::Scalar),
        Value::Mapping(mapping) => mapping.iter()
            .map(|(sub_key, sub_value)| Some((sub_key.as_str()?.to_string(), sub_value.as_f64()?)))
            .collect::<Option<IndexMap<String, f64>>>()
            .map(FieldValue::Vector),
        _ => None
    }
}
