extern crate frame_sync;

use std::path::{Path, PathBuf};
use argh::FromArgs;
use color_eyre::eyre::Result;
use log::{info, warn};

use frame_sync::alignment::error_chain;
use frame_sync::io::{default_table_path, topic_loader, table_writer::write_table};

/// Convert a topic data file to csv.
/// Without keys only the timestamps are extracted, e.g. `topic2csv LocalPoseTopic.txt -k attRate -k acc`
/// extracts gyro and accelerometer data.
#[derive(FromArgs)]
struct Args {
    /// input topic file to process
    #[argh(positional)]
    infile: String,

    /// time stamp key in topic file (default: timeNS)
    #[argh(option, default = "String::from(\"timeNS\")")]
    ts_key: String,

    /// key to convert, may be repeated
    #[argh(option, short = 'k')]
    keys: Vec<String>,

    /// output file (default: <infile>.csv)
    #[argh(option, short = 'o')]
    outfile: Option<String>
}

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args: Args = argh::from_env();

    let infile = Path::new(&args.infile);
    info!("----------Parsing {}", infile.display());
    let topic = match topic_loader::load(infile, &args.ts_key, &args.keys) {
        Ok(topic) => topic,
        Err(e) => {
            warn!("Error attempting to load topic file {}: {}", infile.display(), error_chain(&e));
            return Ok(());
        }
    };
    if topic.is_empty() {
        warn!("No samples in {}", infile.display());
        return Ok(());
    }

    let outfile = args.outfile.map(PathBuf::from).unwrap_or_else(|| default_table_path(infile));
    write_table(&topic.rows(), &outfile)?;

    Ok(())
}
