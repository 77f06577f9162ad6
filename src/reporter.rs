//! Live single-line progress output.
//!
//! The reporter redraws one line on a fixed tick until it is told to stop,
//! then draws once more so the last line shows the final state.
use crate::transfer::{Registry, Snapshot};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Formats one progress line: a carriage return, then `"{:.2} % "` per entry.
pub fn render_line(snapshots: &[Snapshot]) -> String {
    let mut line = String::from("\r");
    for snap in snapshots {
        line.push_str(&format!("{:.2} % ", snap.percentage()));
    }
    line
}

pub struct ProgressReporter<W> {
    registry: Arc<Registry>,
    out: W,
    tick: Duration,
    renders: usize,
}

impl<W> ProgressReporter<W>
where
    W: Write + Send + 'static,
{
    pub fn new(registry: Arc<Registry>, out: W, tick: Duration) -> Self {
        Self {
            registry,
            out,
            tick,
            renders: 0,
        }
    }

    /// Runs the reporter on its own task. Awaiting the handle waits for the
    /// final render and hands the writer back.
    pub fn spawn(self, stop: CancellationToken) -> JoinHandle<W> {
        tokio::spawn(self.run(stop))
    }

    pub async fn run(mut self, stop: CancellationToken) -> W {
        loop {
            self.render().await;

            tokio::select! {
                _ = stop.cancelled() => break,
                _ = sleep(self.tick) => {}
            }
        }

        // the last tick can be up to one interval stale
        self.render().await;
        debug!(renders = self.renders, "reporter stopped");
        self.out
    }

    async fn render(&mut self) {
        let snapshots = self.registry.snapshots().await;
        let line = render_line(&snapshots);
        self.renders += 1;

        // stdout trouble must not stop the downloads
        if let Err(e) = self
            .out
            .write_all(line.as_bytes())
            .and_then(|_| self.out.flush())
        {
            trace!(error = %e, "progress render failed");
        }
    }
}
