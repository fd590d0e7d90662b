use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use survival_core::action::Action;
use survival_core::io::frame::make_frame;
use survival_core::io::seed::{build_engine, Seed};
use survival_core::schedule::Schedule;

#[derive(Parser, Debug)]
#[command(
    name = "survivalstep",
    about = "Batch runner for deterministic NDJSON frames"
)]
struct Args {
    /// Path to the seed JSON document. The standard opening is used when omitted.
    #[arg(long = "seed-file", value_name = "PATH")]
    seed_file: Option<PathBuf>,

    /// Override the RNG seed from the seed document.
    #[arg(long = "rng-seed", value_name = "NUMBER")]
    rng_seed: Option<u64>,

    /// Virtual time to simulate, in milliseconds.
    #[arg(long = "duration-ms")]
    duration_ms: u64,

    /// Granularity of the virtual clock, in milliseconds.
    #[arg(long = "step-ms", default_value_t = 1_000, value_parser = clap::value_parser!(u64).range(1..))]
    step_ms: u64,

    /// NDJSON script of `{"at_ms": .., "action": ".."}` lines.
    #[arg(long, value_name = "PATH")]
    script: Option<PathBuf>,

    /// Output NDJSON file path.
    #[arg(long)]
    out: PathBuf,
}

/// One scripted command, applied once the virtual clock reaches `at_ms`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
struct ScriptLine {
    at_ms: u64,
    action: Action,
}

fn parse_script<R: BufRead>(reader: R) -> Result<Vec<ScriptLine>> {
    let mut script = Vec::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line.context("failed to read script")?;
        if line.trim().is_empty() {
            continue;
        }
        let entry: ScriptLine = serde_json::from_str(&line)
            .with_context(|| format!("invalid script line {}", number + 1))?;
        script.push(entry);
    }
    // Stable: commands sharing an instant keep their file order.
    script.sort_by_key(|entry| entry.at_ms);
    Ok(script)
}

fn load_script(path: &Path) -> Result<Vec<ScriptLine>> {
    let file = File::open(path).with_context(|| format!("failed to open script {:?}", path))?;
    parse_script(BufReader::new(file))
}

/// Drive one game on a virtual clock and write a frame for every timer batch
/// and every scripted command.
fn run<W: Write>(
    seed: &Seed,
    rng_seed: Option<u64>,
    script: &[ScriptLine],
    duration: Duration,
    step: Duration,
    out: &mut W,
) -> Result<()> {
    let mut engine = build_engine(seed, rng_seed);
    let mut schedule = Schedule::new(&seed.periods);
    schedule.start_all();

    let opening = make_frame(Duration::ZERO, &[], None, &engine);
    out.write_all(opening.to_ndjson()?.as_bytes())?;

    let mut pending = script.iter().peekable();
    let mut now = Duration::ZERO;
    loop {
        while let Some(entry) = pending.next_if(|entry| Duration::from_millis(entry.at_ms) <= now) {
            let outcome = engine.apply(&entry.action);
            let frame = make_frame(now, &[], Some((&entry.action, &outcome)), &engine);
            out.write_all(frame.to_ndjson()?.as_bytes())?;
        }
        if now >= duration {
            break;
        }

        let elapsed = step.min(duration - now);
        let firings = engine.advance(&mut schedule, elapsed);
        now += elapsed;
        if !firings.is_empty() {
            let frame = make_frame(now, &firings, None, &engine);
            out.write_all(frame.to_ndjson()?.as_bytes())?;
        }
    }

    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let seed = match &args.seed_file {
        Some(path) => Seed::load_from_path(path)
            .with_context(|| format!("failed to read seed {:?}", path))?,
        None => Seed::default(),
    };
    let script = match &args.script {
        Some(path) => load_script(path)?,
        None => Vec::new(),
    };

    let frame_file =
        File::create(&args.out).with_context(|| format!("failed to create {:?}", args.out))?;
    let mut frame_writer = BufWriter::new(frame_file);

    run(
        &seed,
        args.rng_seed,
        &script,
        Duration::from_millis(args.duration_ms),
        Duration::from_millis(args.step_ms),
        &mut frame_writer,
    )
}
