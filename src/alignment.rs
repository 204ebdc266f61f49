use std::path::PathBuf;
use log::{info, warn};

use crate::interpolation::{interpolate, InterpolationError, InterpolationMethod, InterpolationSummary};
use crate::io::topic_loader::{self, TopicError};
use crate::sensors::frame::Frame;

/**
 * One topic log to merge into the frames.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct TopicSource {
    pub file: PathBuf,
    pub time_key: String,
    pub keys: Vec<String>,
    pub method: InterpolationMethod,
    pub extrapolate: bool
}

#[derive(Debug)]
pub enum TopicOutcome {
    Applied(InterpolationSummary),
    /// The log decoded to zero samples.
    Empty,
    /// The log could not be decoded; frames are left unchanged.
    DecodeFailed(TopicError)
}

impl TopicOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, TopicOutcome::Applied(_))
    }
}

/**
 * Suffix that keeps field names from different sources apart: none for the first applied source,
 * the source index for every later one (`pos`, `pos1`, `pos2`, ...).
 */
pub fn suffix_for_index(topic_index: usize) -> String {
    match topic_index {
        0 => String::new(),
        i => i.to_string()
    }
}

/**
 * Decodes `source` and merges it into `frames` under the suffix for `topic_index`.
 * A log that fails to decode or has no samples leaves the frames as they were.
 */
pub fn add_topic_data(frames: &mut [Frame], source: &TopicSource, topic_index: usize) -> Result<TopicOutcome, InterpolationError> {
    info!("----------Processing {}", source.file.display());
    let samples = match topic_loader::load(&source.file, &source.time_key, &source.keys) {
        Ok(samples) => samples,
        Err(e) => {
            warn!("Error attempting to load topic file {}: {}", source.file.display(), error_chain(&e));
            return Ok(TopicOutcome::DecodeFailed(e));
        }
    };
    if samples.is_empty() {
        warn!("No samples in {}", source.file.display());
        return Ok(TopicOutcome::Empty);
    }

    let suffix = suffix_for_index(topic_index);
    info!("{} samples keyed by {}, {} interpolation", samples.len(), samples.time_key(), source.method);
    let summary = interpolate(frames, &samples, &source.keys, &suffix, source.method, source.extrapolate)?;
    info!("{} interpolated, {} extrapolated, {} untouched frames (suffix '{}')",
        summary.interpolated, summary.extrapolated, summary.skipped, suffix);
    Ok(TopicOutcome::Applied(summary))
}

/**
 * Merges every source in order. The suffix index only advances past sources that were applied.
 */
pub fn align_topics(frames: &mut [Frame], sources: &[TopicSource]) -> Result<Vec<TopicOutcome>, InterpolationError> {
    let mut topic_index = 0;
    let mut outcomes = Vec::<TopicOutcome>::with_capacity(sources.len());
    for source in sources {
        let outcome = add_topic_data(frames, source, topic_index)?;
        if outcome.is_applied() {
            topic_index += 1;
        }
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

/**
 * The error message followed by every cause, joined with ": ".
 */
pub fn error_chain(e: &dyn std::error::Error) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
