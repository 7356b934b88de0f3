//! Headless Orrery Simulator
//!
//! Drives the simulated clock for a number of frames and prints the date panel
//! and the position of every body in scene units.
//!
//! Usage:
//!   cargo run --bin orrery_sim -- [--config orrery.json] [--ticks 365] [--rate 1.0]
//!
//! Set `RUST_LOG=debug` to see wrap and solver messages.

use clap::{ArgAction, Parser};
use orrery::{Orrery, OrreryConfig, StartInstant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Type alias for the error type used throughout this module
type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Headless Orrery Simulator
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Steps the simulated solar system clock and prints body positions",
    long_about = None
)]
struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 365)]
    ticks: u32,

    /// Rate exponent; each frame advances 10^rate days
    #[arg(short, long, allow_negative_numbers = true)]
    rate: Option<f64>,

    /// Run simulated time backwards
    #[arg(long, action = ArgAction::SetTrue)]
    reverse: bool,

    /// Start instant: "j2000", "now", a YYYY-MM-DD date or an RFC 3339 timestamp
    #[arg(short, long)]
    start: Option<StartInstant>,

    /// Print positions every N frames (0 prints only the final frame)
    #[arg(short, long, default_value_t = 0)]
    every: u32,

    /// Only print this body, plus its orbit summary
    #[arg(short, long)]
    body: Option<String>,
}

/// Prints a section header with a title and separator line
fn print_section_header(title: &str) {
    println!("\n{}:", title);
    println!("-------------------------------------------------------");
}

fn print_frame(orrery: &Orrery, frame: u32, body: Option<&str>) -> Result<()> {
    let strings = orrery.clock().current_display_strings();
    print_section_header(&format!(
        "Frame {} | {} | {} | {}",
        frame, strings.calendar_date, strings.julian_date, strings.speed
    ));

    match body {
        Some(name) => {
            let position = orrery.position_of(name)?;
            println!(
                "{:<10} {:>12.5} {:>12.5} {:>12.5}",
                name, position.x, position.y, position.z
            );
        }
        None => {
            for (body, position) in orrery.positions() {
                println!(
                    "{:<10} {:>12.5} {:>12.5} {:>12.5}",
                    body.name, position.x, position.y, position.z
                );
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => OrreryConfig::from_file(path)?,
        None => OrreryConfig::default(),
    };
    if let Some(rate) = args.rate {
        config.rate_exponent = rate;
    }
    if let Some(start) = args.start {
        config.start = start;
    }
    if args.reverse {
        config.reversed = !config.reversed;
    }
    config.validate()?;

    let mut orrery = Orrery::new(&config)?;

    if let Some(name) = args.body.as_deref() {
        print_section_header("Body");
        println!("{}", orrery.body(name)?.summary());
    }

    let mut wraps = 0;
    for frame in 1..=args.ticks {
        let outcome = orrery.tick(true);
        if outcome.wrapped {
            wraps += 1;
        }
        if args.every > 0 && frame % args.every == 0 {
            print_frame(&orrery, frame, args.body.as_deref())?;
        }
    }

    if args.every == 0 || args.ticks % args.every != 0 {
        print_frame(&orrery, args.ticks, args.body.as_deref())?;
    }

    print_section_header("Summary");
    println!("Frames simulated: {}", args.ticks);
    println!("Date range wraps: {}", wraps);
    println!("Clock: {}", orrery.clock());

    Ok(())
}
