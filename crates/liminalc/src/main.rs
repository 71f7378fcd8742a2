//! The Liminal CLI.
//!
//! Three modes: no arguments or `-h`/`--help` print usage to stdout (exit
//! 0); `-v`/`--version` prints `liminal VERSION` (exit 0); `run PATH` runs
//! the pipeline on a source file and exits with its status. Anything else
//! goes to stderr with exit 1.

use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "liminal",
    about = "The Liminal programming language",
    disable_version_flag = true
)]
struct Cli {
    /// Print version information
    #[arg(short = 'v', long = "version")]
    version: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a Liminal program
    Run {
        /// Path to the source file
        path: PathBuf,
    },
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = err.print();
                process::exit(0);
            }
            _ => {
                eprintln!("{err}");
                process::exit(1);
            }
        },
    };

    if cli.version {
        println!("liminal {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    match cli.command {
        Some(Commands::Run { path }) => {
            let stdin = std::io::stdin();
            let mut input = stdin.lock();
            let mut out = std::io::stdout();
            let code = liminalc::run_file(&path, None, &mut input, &mut out);
            process::exit(code);
        }
        None => {
            let _ = Cli::command().print_help();
            println!();
        }
    }
}
