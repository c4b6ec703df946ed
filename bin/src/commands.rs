pub mod check;
pub mod compile;
pub mod play;

use crate::cli::Command;
use anyhow::Result;

pub async fn run(command: Command) -> Result<()> {
    match command {
        Command::Play(args) => play::run(args).await,
        Command::Compile(args) => compile::run(args),
        Command::Check(args) => check::run(args),
    }
}
