use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use log::info;
use thiserror::Error;

use crate::sensors::frame::Frame;

#[derive(Debug, Error)]
pub enum FrameLogError {
    #[error("could not open frame log {path}")]
    Open { path: PathBuf, #[source] source: std::io::Error },
    #[error("malformed frame log")]
    Csv(#[from] csv::Error),
    #[error("line {line}: expected `timestamp,image_reference`")]
    MissingColumn { line: u64 },
    #[error("line {line}: invalid timestamp `{value}`")]
    InvalidTimestamp { line: u64, value: String }
}

pub fn load_frames(file_path: &Path) -> Result<Vec<Frame>, FrameLogError> {
    let file = File::open(file_path).map_err(|source| FrameLogError::Open { path: file_path.to_path_buf(), source })?;
    let frames = parse_frames(file)?;
    info!("Loaded {} frames from {}", frames.len(), file_path.display());
    Ok(frames)
}

/**
 * Parses `timestamp,image_reference` lines, kept in file order.
 */
pub fn parse_frames<R: Read>(reader: R) -> Result<Vec<Frame>, FrameLogError> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut frames = Vec::<Frame>::new();
    for record in csv.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let (ts, image) = match (record.get(0), record.get(1)) {
            (Some(ts), Some(image)) => (ts, image),
            _ => return Err(FrameLogError::MissingColumn { line })
        };
        let timestamp = ts.parse::<i64>().map_err(|_| FrameLogError::InvalidTimestamp { line, value: ts.to_string() })?;
        frames.push(Frame::new(timestamp, image));
    }

    Ok(frames)
}
