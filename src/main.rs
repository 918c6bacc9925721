use nbody_playback::{run, DisplayMode, PlaybackConfig};

use anyhow::{Context, Result};
use clap::Parser;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
struct Args {
    /// Playback configuration (YAML)
    #[arg(short, default_value = "configs/playback.yaml")]
    file_name: PathBuf,

    /// Skip the window and only write the animation
    #[arg(long)]
    headless: bool,
}

// load here to keep main clean
fn load_config(path: &Path) -> Result<PlaybackConfig> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);
    let cfg: PlaybackConfig = serde_yaml::from_reader(reader)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(cfg)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let cfg = load_config(&args.file_name)?;

    let mode = if args.headless {
        DisplayMode::Headless
    } else {
        DisplayMode::Interactive
    };

    run(&cfg, mode).context("playback failed")?;

    Ok(())
}
