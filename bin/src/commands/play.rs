use crate::{cli::PlayArgs, loader, render::Renderer, scheduler::TokioScheduler};
use anyhow::{Context, Result};
use epistle_core::{compile, PlaybackDriver, Scheduler, Wake};
use std::io::{self, Write};
use tokio::sync::mpsc::UnboundedReceiver;

pub async fn run(args: PlayArgs) -> Result<()> {
    let document = loader::read(&args.file)?;
    let line = loader::select_line(&document, args.line.as_deref())?;
    let queue =
        compile(&line.line).with_context(|| format!("line '{}' can't be played", line.line_id))?;
    tracing::info!(line_id = %line.line_id, operations = queue.len(), "playing");

    let (scheduler, mut wakes) = TokioScheduler::new();
    let mut driver = PlaybackDriver::new(scheduler);
    let mut renderer = Renderer::new(io::stdout(), document.settings.clone());

    driver.start(queue);
    play(&mut driver, &mut wakes, &mut renderer).await
}

/// Feeds wakes to `driver` and redraws after every step until the line is fully revealed.
pub async fn play<S: Scheduler, W: Write>(
    driver: &mut PlaybackDriver<S>,
    wakes: &mut UnboundedReceiver<Wake>,
    renderer: &mut Renderer<W>,
) -> Result<()> {
    renderer.draw(&driver.snapshot(), !driver.is_complete())?;

    while !driver.is_complete() {
        let Some(wake) = wakes.recv().await else {
            tracing::warn!("wake channel closed before the line completed");
            break;
        };
        if driver.wake(wake) {
            renderer.draw(&driver.snapshot(), !driver.is_complete())?;
        }
    }

    renderer.finish()?;
    Ok(())
}
