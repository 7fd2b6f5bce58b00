use std::error::Error;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::{debug, error, info};
use swindow::config::{default_config_path, load_config, validate_capacity, Config, OutputFormat};
use swindow::CircularBuffer;

const CHUNK_SIZE: usize = 8192;

/// Streams bytes through a sliding window and prints the most recent ones.
#[derive(Parser, Debug)]
#[command(name = "swindow", version)]
struct Args {
    /// Config file (defaults to ~/.config/swindow/config.toml if present)
    #[arg(short, long)]
    config: Option<String>,

    /// Window capacity in bytes, overrides the config
    #[arg(long)]
    capacity: Option<usize>,

    /// Number of trailing bytes to print (defaults to the capacity)
    #[arg(short, long)]
    tail: Option<usize>,

    /// Print as hex instead of raw bytes
    #[arg(long)]
    hex: bool,

    /// Input file, stdin when omitted
    input: Option<PathBuf>,
}

/// An explicit path must exist; a missing default path falls back to defaults.
fn resolve_config(explicit: Option<&str>, default_path: &str) -> Result<Config, Box<dyn Error>> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    if Path::new(default_path).exists() {
        load_config(default_path)
    } else {
        debug!("No config at {}, using defaults", default_path);
        Ok(Config::default())
    }
}

/// Feeds `reader` through `window`, returning the number of bytes seen.
fn fill_window<R: Read>(mut reader: R, window: &mut CircularBuffer) -> io::Result<u64> {
    let mut chunk = [0u8; CHUNK_SIZE];
    let mut total = 0u64;
    loop {
        match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                window.write_slice(&chunk[..n]);
                total += n as u64;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}

fn write_hex<W: Write>(out: &mut W, bytes: &[u8]) -> io::Result<()> {
    for line in bytes.chunks(16) {
        let hex: Vec<String> = line.iter().map(|b| format!("{:02x}", b)).collect();
        writeln!(out, "{}", hex.join(" "))?;
    }
    Ok(())
}

/// Streams `input` through a window sized by `args`/`cfg` and writes the tail to `out`.
fn run<R: Read, W: Write>(args: &Args, cfg: &Config, input: R, out: &mut W) -> Result<(), Box<dyn Error>> {
    let capacity = args.capacity.unwrap_or(cfg.window.capacity);
    validate_capacity(capacity)?;
    let format = if args.hex { OutputFormat::Hex } else { cfg.output.format };
    let mut window = CircularBuffer::new(capacity)?;

    let seen = fill_window(input, &mut window)?;
    info!("Read {} bytes through a {} byte window", seen, capacity);

    // Never print the zero fill of a window the input did not cover.
    let tail = args.tail.unwrap_or(capacity);
    let len = usize::try_from(seen).map_or(tail, |seen| seen.min(tail));
    let recent = window.recent(len);

    match format {
        OutputFormat::Raw => out.write_all(&recent)?,
        OutputFormat::Hex => write_hex(out, &recent)?,
    }
    out.flush()?;

    Ok(())
}

fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();
    let result = resolve_config(args.config.as_deref(), &default_config_path()).and_then(|cfg| {
        let mut out = io::stdout().lock();
        match &args.input {
            Some(path) => {
                let file = File::open(path)
                    .map_err(|e| format!("Failed to open {}: {}", path.display(), e))?;
                run(&args, &cfg, file, &mut out)
            }
            None => run(&args, &cfg, io::stdin().lock(), &mut out),
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
