use std::path::PathBuf;

use clap::{Parser, Subcommand};

use pigsty::options::GroomArgs;
use pigsty::{Action, PigstyOptions, run_main};

#[derive(Parser, Debug)]
#[command(
    name = "pigsty",
    about = "pigsty: parse, groom and inspect execution traces",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Output file path (writes to file instead of stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE", global = true)]
    output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split a trace into its message and call sites, printed as JSON
    Parse {
        /// Trace file (stdin when omitted)
        #[arg(value_name = "FILE")]
        input: Option<String>,
    },
    /// Print the call-site lines of a trace after dropping and truncating
    Groom {
        /// Trace file (stdin when omitted)
        #[arg(value_name = "FILE")]
        input: Option<String>,

        #[command(flatten)]
        groom: GroomArgs,
    },
    /// Parse a single call-site line, printed as JSON
    Line {
        #[arg(value_name = "LINE")]
        line: String,
    },
}

pub fn run(args: Cli) -> anyhow::Result<()> {
    // Initialize tracing subscriber for logging
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let opts = match args.command {
        Command::Parse { input } => PigstyOptions {
            input,
            action: Action::Parse,
        },
        Command::Groom { input, groom } => PigstyOptions {
            input,
            action: Action::Groom(groom.into()),
        },
        Command::Line { line } => PigstyOptions {
            input: None,
            action: Action::Line(line),
        },
    };

    let output = run_main(&opts)?;
    if let Some(ref path) = args.output {
        std::fs::write(path, &output)?;
        tracing::info!(path = %path.display(), "output written");
    } else {
        println!("{output}");
    }
    Ok(())
}

pub fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    run(args)
}
