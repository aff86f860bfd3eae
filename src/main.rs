// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jazzgen::generators::{BassLineGenerator, CompingGenerator, DrumGenerator, Generator};
use jazzgen::render::Score;
use jazzgen::{Composer, EngineConfig, Progression};

fn print_usage() {
    println!("jazzgen - Jazz accompaniment generator");
    println!();
    println!("Usage: jazzgen <COMMAND> [ARGS] [OPTIONS]");
    println!();
    println!("Commands:");
    println!("  compose <progression> <output.wav>  Render bass, comping and drums to a WAV file");
    println!("  expand <progression>                Print the progression with sections expanded");
    println!("  bass <progression>                  Print a walking bass line");
    println!("  comping <progression>               Print comping voicings");
    println!("  drums <bars>                        Print a drum pattern");
    println!("  help                                Show this help message");
    println!();
    println!("A progression argument of '-' reads from stdin.");
    println!();
    println!("Options:");
    println!("  --config <file>   Engine configuration (.yaml or .toml)");
    println!("  --seed <n>        Seed the random generator for a reproducible result");
}

/// Positional arguments and options after the command
struct Options {
    positional: Vec<String>,
    config: Option<PathBuf>,
    seed: Option<u64>,
}

impl Options {
    fn parse(args: &[String]) -> Result<Self> {
        let mut options = Options {
            positional: Vec::new(),
            config: None,
            seed: None,
        };

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--config" => {
                    let path = iter.next().context("--config requires a file")?;
                    options.config = Some(PathBuf::from(path));
                }
                "--seed" => {
                    let value = iter.next().context("--seed requires a number")?;
                    let seed = value
                        .parse()
                        .map_err(|_| anyhow::anyhow!("Invalid seed: {}", value))?;
                    options.seed = Some(seed);
                }
                _ => options.positional.push(arg.clone()),
            }
        }

        Ok(options)
    }

    fn config(&self) -> Result<EngineConfig> {
        match &self.config {
            Some(path) => EngineConfig::load(path),
            None => Ok(EngineConfig::default()),
        }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn arg(&self, index: usize, what: &str) -> Result<&str> {
        match self.positional.get(index) {
            Some(value) => Ok(value),
            None => bail!("missing {} argument (see 'jazzgen help')", what),
        }
    }
}

fn read_progression(source: &str) -> Result<String> {
    if source == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read progression from stdin")?;
        return Ok(text);
    }
    fs::read_to_string(source).with_context(|| format!("Failed to read progression file: {:?}", source))
}

fn compose(options: &Options) -> Result<()> {
    let text = read_progression(options.arg(0, "progression")?)?;
    let output = Path::new(options.arg(1, "output")?);
    let composer = Composer::from_config(options.config()?);

    let summary = composer
        .compose(&text, output, &mut options.rng())
        .with_context(|| format!("Failed to compose {:?}", output))?;

    println!(
        "Wrote {} ({} bars, {:.1} s): {} bass notes, {} voicings, {} drum hits",
        output.display(),
        summary.bars,
        summary.duration_ms as f64 / 1000.0,
        summary.bass_notes,
        summary.voicings,
        summary.drum_hits
    );
    Ok(())
}

fn expand(options: &Options) -> Result<()> {
    let config = options.config()?;
    let text = read_progression(options.arg(0, "progression")?)?;
    let progression = Progression::parse_with_bar_length(&text, config.quarters_per_bar);

    for warning in progression.warnings() {
        eprintln!("warning: {}", warning);
    }
    for item in progression.expand()? {
        println!("{}", item);
    }
    Ok(())
}

fn bass(options: &Options) -> Result<()> {
    let config = options.config()?;
    let text = read_progression(options.arg(0, "progression")?)?;
    let items = Progression::parse_with_bar_length(&text, config.quarters_per_bar).expand()?;

    let generator = BassLineGenerator::with_config(config.bass.to_bass_config())?;
    let line = generator.generate(&items, &config.generator_context(), &mut options.rng())?;
    for note in &line {
        println!("{:<4} {}", note.to_string(), note.to_midi());
    }
    Ok(())
}

fn comping(options: &Options) -> Result<()> {
    let config = options.config()?;
    let text = read_progression(options.arg(0, "progression")?)?;
    let items = Progression::parse_with_bar_length(&text, config.quarters_per_bar).expand()?;
    let context = config.generator_context();

    let generator = CompingGenerator::with_base_octave(config.comping.base_octave);
    let voicings = generator.generate(&items, &context, &mut options.rng())?;
    let score = Score::from_voicings(&voicings, &context);

    for (voicing, event) in voicings.iter().zip(score.events()) {
        let notes: Vec<String> = voicing.notes.iter().map(|n| n.to_string()).collect();
        let notes = if notes.is_empty() {
            "rest".to_string()
        } else {
            notes.join(" ")
        };
        println!("{:>6.2} {:>4.2}  {}", event.start, event.duration, notes);
    }
    Ok(())
}

fn drums(options: &Options) -> Result<()> {
    let config = options.config()?;
    let bars_arg = options.arg(0, "bars")?;
    let bars: u32 = bars_arg
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid bar count: {}", bars_arg))?;

    let generator = DrumGenerator::new().with_default_bars(config.drums.default_bars);
    let hits = generator.pattern(bars, &config.generator_context(), &mut options.rng());
    for hit in &hits {
        println!("{:>3} {:>5.2}  {}", hit.measure + 1, hit.quarter, hit.sound);
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jazzgen=info")))
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("jazzgen - Jazz accompaniment generator");
        println!("Run with help for usage information");
        return Ok(());
    }

    let options = Options::parse(&args[2..])?;

    match args[1].as_str() {
        "compose" => compose(&options)?,
        "expand" => expand(&options)?,
        "bass" => bass(&options)?,
        "comping" => comping(&options)?,
        "drums" => drums(&options)?,
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            print_usage();
            std::process::exit(1);
        }
    }

    Ok(())
}
