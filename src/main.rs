use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use wyverndb::{config, output, pipeline};

#[derive(Parser)]
#[command(name = "wyverndb")]
#[command(about = "Static site generator for the WyvernDB card database")]
#[command(long_about = "\
Static site generator for the WyvernDB card database

Each card and each set is one JSON document. Templates render a page per
card, a page per set, and the top-level pages; the raw data and id manifests
are published alongside for the client-side search.

Source layout:

  ./
  ├── wyverndb.toml        # Optional config overrides
  ├── wyverndb.js          # Client-side search script → copied to output root
  ├── index.jinja          # Top-level pages (index, search, random, syntax)
  ├── card.jinja           # Rendered once per card → <card id>.html
  ├── set.jinja            # Rendered once per set  → <set id>.html
  └── data/
      ├── cards/*.json     # {\"id\": \"a1\", \"name\": \"...\", \"set\": \"core\", ...}
      └── sets/*.json      # {\"id\": \"core\", \"name\": \"...\", ...}

Output (docs/ by default) also gets data/cards.json and data/sets.json, the
id lists the search page fetches.

Run 'wyverndb gen-config' to generate a documented wyverndb.toml.")]
#[command(version)]
struct Cli {
    /// Source root containing templates, data, and wyverndb.toml
    #[arg(long, default_value = ".", global = true)]
    source: PathBuf,

    /// Output directory (overrides `output_dir` from the config)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Load the data and render the full site (default)
    Build,
    /// Validate records and set references without writing anything
    Check,
    /// Print a stock wyverndb.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command.unwrap_or(Command::Build) {
        Command::Build => {
            let site_config = config::load_config(&cli.source)?;
            let output_dir = cli
                .output
                .unwrap_or_else(|| site_config.output_dir(&cli.source));

            println!("==> Building {} → {}", cli.source.display(), output_dir.display());
            let report = pipeline::build(&cli.source, &site_config, &output_dir)?;
            output::print_build_output(&report);
            println!("==> Build complete: {}", output_dir.display());
        }
        Command::Check => {
            let site_config = config::load_config(&cli.source)?;
            println!("==> Checking {}", cli.source.display());
            let (catalog, index) = pipeline::check(&cli.source, &site_config)?;
            output::print_catalog_output(&catalog, &index, &cli.source);
            println!("==> Data is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr so stdout stays the command's output. `RUST_LOG` wins over
/// the `-v` count.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .ok();
}
