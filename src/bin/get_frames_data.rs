extern crate frame_sync;

use std::path::Path;
use argh::FromArgs;
use color_eyre::eyre::Result;
use log::info;

use frame_sync::{load_runtime_conf, runtime_conf::RuntimeConf};
use frame_sync::alignment::align_topics;
use frame_sync::io::{frame_loader::load_frames, table_writer::write_table};

/// Get frames data from topic files.
/// For every frame in frames.txt, interpolate data from LocalPoseTopic.txt (pos, vel, att; nearest)
/// and SensorGPSTopic.txt (pos, written as pos1; linear), with constant extrapolation for both.
/// Nested values are flattened into dotted columns.
#[derive(FromArgs)]
struct Args {
    /// folder to process (default: .)
    #[argh(positional, default = "String::from(\".\")")]
    dir: String,

    /// time stamp key in topic files (default: timeNS)
    #[argh(option)]
    ts_key: Option<String>,

    /// output file inside the folder (default: frames_data.txt)
    #[argh(option, short = 'o')]
    outfile: Option<String>,

    /// YAML file replacing the default frames file, output file and topic list
    #[argh(option, short = 'c')]
    config: Option<String>
}

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args: Args = argh::from_env();

    let mut runtime_conf = match &args.config {
        Some(path) => load_runtime_conf(Path::new(path))?,
        None => RuntimeConf::default()
    };
    if let Some(ts_key) = args.ts_key {
        runtime_conf.ts_key = ts_key;
    }
    if let Some(outfile) = args.outfile {
        runtime_conf.outfile = outfile;
    }

    let dir = Path::new(&args.dir);
    let mut frames = load_frames(&dir.join(&runtime_conf.frames_file))?;

    let outcomes = align_topics(&mut frames, &runtime_conf.topic_sources(dir)?)?;
    info!("Applied {} of {} topic files", outcomes.iter().filter(|o| o.is_applied()).count(), outcomes.len());

    write_table(&frames, &dir.join(&runtime_conf.outfile))?;

    Ok(())
}
