use std::path::{Path, PathBuf};

pub mod frame_loader;
pub mod topic_loader;
pub mod table_writer;

/**
 * Output path used when none is given: the input path with its extension replaced by `csv`.
 */
pub fn default_table_path(input: &Path) -> PathBuf {
    input.with_extension("csv")
}
