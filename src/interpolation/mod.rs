use std::fmt;
use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;

use crate::Float;
use crate::progress::Progress;
use crate::sensors::{FieldValue, frame::Frame, topic_sample::{TopicSample, TopicSamples}};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationMethod {
    Linear,
    #[default]
    Nearest
}

impl fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InterpolationMethod::Linear => write!(f, "linear"),
            InterpolationMethod::Nearest => write!(f, "nearest")
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum InterpolationError {
    #[error("no samples to interpolate from")]
    NoSamples,
    #[error("{sequence} are not sorted by timestamp at index {index}")]
    UnsortedInput { sequence: &'static str, index: usize },
    #[error("field `{key}` is not present in the topic samples")]
    MissingField { key: String },
    #[error("field `{key}` is missing from sample {sample}")]
    IncompleteField { key: String, sample: usize },
    #[error("field `{key}` is the time key of the topic")]
    TimeKeyAsField { key: String },
    #[error("field `{key}` changes shape between samples {index} and {}", .index + 1)]
    ShapeMismatch { key: String, index: usize },
    #[error("degenerate interval between samples {index} and {} ({t_prev} us)", .index + 1)]
    DegenerateInterval { index: usize, t_prev: Float }
}

/**
 * How the frames of one pass were annotated.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InterpolationSummary {
    pub interpolated: usize,
    pub extrapolated: usize,
    pub skipped: usize
}

/**
 * Annotates `frames` with the `field_keys` of `topic`, stored as `key + suffix`.
 *
 * Single forward pass: the sample cursor only ever advances, so both sequences must be sorted
 * ascending (checked before any frame is touched). Frames before the first sample or after the
 * last one get the boundary sample's values when `extrapolate` is set. Without it, early frames are
 * left alone and the pass stops at the first frame past the last sample.
 */
pub fn interpolate(frames: &mut [Frame], topic: &TopicSamples, field_keys: &[String], suffix: &str,
                   method: InterpolationMethod, extrapolate: bool) -> Result<InterpolationSummary, InterpolationError> {
    let samples = topic.samples();
    if samples.is_empty() {
        return Err(InterpolationError::NoSamples);
    }
    check_sorted(frames, samples)?;
    for key in field_keys {
        if key == topic.time_key() {
            return Err(InterpolationError::TimeKeyAsField { key: key.clone() });
        }
        if topic.shape(key).is_none() {
            return Err(InterpolationError::MissingField { key: key.clone() });
        }
        if let Some(sample) = topic.first_missing(key) {
            return Err(InterpolationError::IncompleteField { key: key.clone(), sample });
        }
    }

    let n_data = samples.len();
    let n_frames = frames.len();
    let progress = Progress::new("Interpolating frame", 10);
    let mut summary = InterpolationSummary::default();
    let mut i = 0;

    for (iframe, frame) in frames.iter_mut().enumerate() {
        progress.tick(iframe, Some(n_frames));

        let ts_frame = frame.timestamp_us();
        while i < n_data && samples[i].timestamp_us() <= ts_frame {
            i += 1;
        }

        if i == 0 {
            if extrapolate {
                hold(frame, &samples[0], field_keys, suffix)?;
                summary.extrapolated += 1;
            } else {
                summary.skipped += 1;
            }
        } else if i == n_data {
            if extrapolate {
                hold(frame, &samples[n_data-1], field_keys, suffix)?;
                summary.extrapolated += 1;
            } else {
                // Every later frame is past the last sample as well
                summary.skipped += n_frames - iframe;
                break;
            }
        } else {
            blend(frame, &samples[i-1], &samples[i], i-1, field_keys, suffix, method)?;
            summary.interpolated += 1;
        }
    }

    info!("Interpolate time (s): {:.1}", progress.finish());
    debug!("{:?}", summary);
    Ok(summary)
}

fn check_sorted(frames: &[Frame], samples: &[TopicSample]) -> Result<(), InterpolationError> {
    if let Some(index) = frames.windows(2).position(|w| w[0].timestamp >= w[1].timestamp) {
        return Err(InterpolationError::UnsortedInput { sequence: "frames", index: index + 1 });
    }
    if let Some(index) = samples.windows(2).position(|w| w[0].timestamp > w[1].timestamp) {
        return Err(InterpolationError::UnsortedInput { sequence: "samples", index: index + 1 });
    }
    Ok(())
}

fn sample_field<'a>(sample: &'a TopicSample, key: &str) -> Result<&'a FieldValue, InterpolationError> {
    sample.field(key).ok_or_else(|| InterpolationError::MissingField { key: key.to_string() })
}

fn hold(frame: &mut Frame, sample: &TopicSample, field_keys: &[String], suffix: &str) -> Result<(), InterpolationError> {
    for key in field_keys {
        let value = sample_field(sample, key)?.clone();
        frame.fields.insert(format!("{}{}", key, suffix), value);
    }
    Ok(())
}

fn blend(frame: &mut Frame, prev: &TopicSample, cur: &TopicSample, prev_index: usize, field_keys: &[String], suffix: &str,
         method: InterpolationMethod) -> Result<(), InterpolationError> {
    let ts_frame = frame.timestamp_us();
    let ts_prev = prev.timestamp_us();
    let ts_cur = cur.timestamp_us();

    match method {
        InterpolationMethod::Nearest => {
            // Ties go to the earlier sample
            let nearest = match ts_frame - ts_prev > ts_cur - ts_frame {
                true => cur,
                false => prev
            };
            hold(frame, nearest, field_keys, suffix)
        },
        InterpolationMethod::Linear => {
            let span = ts_cur - ts_prev;
            if !(span > 0.0) {
                return Err(InterpolationError::DegenerateInterval { index: prev_index, t_prev: ts_prev });
            }
            let w = (ts_frame - ts_prev) / span;
            for key in field_keys {
                let value = sample_field(prev, key)?
                    .blend(sample_field(cur, key)?, w)
                    .ok_or_else(|| InterpolationError::ShapeMismatch { key: key.clone(), index: prev_index })?;
                frame.fields.insert(format!("{}{}", key, suffix), value);
            }
            Ok(())
        }
    }
}
