use clap::{Parser, Subcommand};
use lesson_planner::{build, config, output};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "lesson-planner")]
#[command(about = "Convert curriculum planner text into lesson JSON")]
#[command(long_about = "\
Convert curriculum planner text into lesson JSON

The planner is plain text exported from a word processor. Structure comes
from three kinds of header line:

  Detailed Daily Planner: Week 2      # sets the week for following days
  Day 1: Monday                       # opens a day (key = (week-1)*5 + 1)
  I. Circle Time: Fine Motor Rhyme    # opens a lesson section

Lines inside a section become its content. Bullets (•) become ^label:^
lines, numbered items and ◦ items become * and ** list lines. A rule of 80
or more dashes closes the current day.

--source may be a single file or a directory of .txt planners. Output:

  src/
  ├── lessons.json          # every parsed day, grade → month → day
  └── week2_lessons.json    # one file per detected week

Run 'lesson-planner gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Planner text file, or a directory of planner files
    #[arg(long, default_value = "planner.txt", global = true)]
    source: PathBuf,

    /// Output directory for the JSON documents
    #[arg(long, default_value = "src", global = true)]
    output: PathBuf,

    /// Directory holding config.toml (defaults to the source's directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse the planner and write lessons.json plus per-week files
    Build,
    /// Parse the planner and report its structure without writing
    Check,
    /// Print the lessons of one day, e.g. `show 6`
    Show {
        /// Day key as written in lessons.json
        day: String,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Build => {
            let config = build::load_config_for(&cli.source, cli.config.as_deref())?;
            println!("==> Parsing {}", cli.source.display());
            let result = build::build(&cli.source, &config)?;
            output::print_build_output(&result);
            let written = build::write_outputs(&result, &cli.output, &config)?;
            output::print_written(&written);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            let config = build::load_config_for(&cli.source, cli.config.as_deref())?;
            println!("==> Checking {}", cli.source.display());
            let result = build::build(&cli.source, &config)?;
            output::print_build_output(&result);
            println!("==> Planner is valid");
        }
        Command::Show { day } => {
            let config = build::load_config_for(&cli.source, cli.config.as_deref())?;
            let result = build::build(&cli.source, &config)?;
            let grade = &config.document.grade;
            let month = config.document.month;
            match result.document.lessons(grade, month, &day) {
                Some(lessons) => output::print_day(&day, lessons),
                None => {
                    let available = result.document.day_keys(grade, month);
                    return Err(format!(
                        "day {day} not found in {grade}, month {month}. Available: {}",
                        available.join(", ")
                    )
                    .into());
                }
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Logs go to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
