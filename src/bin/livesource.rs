use std::{fs, path::PathBuf};

use clap::{Parser, Subcommand};

use livesource::{LiveSourceError, Normalizer, Repl, Session};

#[derive(Parser)]
#[command(author, version, about = "Value-to-source and eval rewriting tools")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Rewrite a snippet so it evaluates as intended
    Normalize {
        source: String,
        /// Reject anything other than a single expression
        #[arg(short, long)]
        expression: bool,
    },
    /// Rewrite the contents of a file
    Check {
        file: PathBuf,
        #[arg(short, long)]
        expression: bool,
    },
    /// Evaluate a literal snippet and print its source form
    Inspect { source: String },
    /// Start an interactive console
    Repl,
}

fn main() -> Result<(), LiveSourceError> {
    env_logger::init();
    let args = Args::parse();
    match args.command.unwrap_or(Command::Repl) {
        Command::Normalize { source, expression } => {
            println!("{}", Normalizer::new().normalize(&source, expression)?);
        }
        Command::Check { file, expression } => {
            let source = fs::read_to_string(&file)?;
            log::debug!("read {} bytes from {}", source.len(), file.display());
            println!("{}", Normalizer::new().normalize(&source, expression)?);
        }
        Command::Inspect { source } => {
            let mut session = Session::new();
            println!("{}", session.inspect(&source)?);
        }
        Command::Repl => Repl::new().run()?,
    }
    Ok(())
}
