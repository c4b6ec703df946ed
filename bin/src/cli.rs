use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "epistle", about = "Plays epistle lines in the terminal")]
pub struct Cli {
    /// Log file path, or a directory to put the per-process log file in.
    #[arg(long, env = "EPISTLE_LOG_FILE", global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Reveal a line fragment by fragment.
    Play(PlayArgs),
    /// Print the execution queue of a line.
    Compile(CompileArgs),
    /// Validate a file and report every problem in it.
    Check(CheckArgs),
}

impl Command {
    /// Whether the command draws on the terminal while it runs.
    pub fn owns_terminal(&self) -> bool {
        matches!(self, Command::Play(_))
    }
}

#[derive(Debug, Args)]
pub struct PlayArgs {
    /// A `.json` line (or array of lines) or a script file.
    pub file: PathBuf,
    /// Line to play. Defaults to `play.line` or the first line.
    #[arg(long)]
    pub line: Option<String>,
}

#[derive(Debug, Args)]
pub struct CompileArgs {
    pub file: PathBuf,
    #[arg(long)]
    pub line: Option<String>,
    /// Print the queue as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    pub file: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_play_with_line() {
        let cli = Cli::parse_from(["epistle", "play", "letter.epi", "--line", "greeting"]);
        match cli.command {
            Command::Play(args) => {
                assert_eq!(args.file, PathBuf::from("letter.epi"));
                assert_eq!(args.line.as_deref(), Some("greeting"));
            },
            other => panic!("expected play, got {other:?}"),
        }
    }

    #[test]
    fn log_file_is_global() {
        let cli = Cli::parse_from(["epistle", "compile", "l.json", "--json", "--log-file", "x.log"]);
        assert_eq!(cli.log_file, Some(PathBuf::from("x.log")));
        assert!(!cli.command.owns_terminal());
        match cli.command {
            Command::Compile(args) => assert!(args.json),
            other => panic!("expected compile, got {other:?}"),
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
