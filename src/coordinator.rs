//! Runs one batch: validate inputs, spawn a worker per accepted URL, keep the
//! progress line alive until every worker is done.
use crate::config::Settings;
use crate::error::PROGRAM;
use crate::reporter::ProgressReporter;
use crate::transfer::{FileTransfer, Registry, TransferStatus};
use crate::validate::validate;
use crate::worker;
use futures_util::future::join_all;
use reqwest::Client;
use std::io::Write;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// What happened to each input of a batch.
#[derive(Debug)]
pub struct Outcome {
    /// Accepted transfers, in input order.
    pub transfers: Vec<Arc<FileTransfer>>,
    /// Inputs dropped during validation, in input order.
    pub rejected: Vec<String>,
}

impl Outcome {
    pub async fn succeeded(&self) -> usize {
        let mut count = 0;
        for t in &self.transfers {
            if t.status().await == TransferStatus::Succeeded {
                count += 1;
            }
        }
        count
    }

    pub async fn failed(&self) -> usize {
        self.transfers.len() - self.succeeded().await
    }
}

pub struct Coordinator {
    client: Client,
    settings: Arc<Settings>,
}

impl Coordinator {
    pub fn new(settings: Settings) -> reqwest::Result<Self> {
        let client = settings.build_client()?;
        Ok(Self::with_client(settings, client))
    }

    pub fn with_client(settings: Settings, client: Client) -> Self {
        Self {
            client,
            settings: Arc::new(settings),
        }
    }

    /// Downloads every valid link in `links`, drawing progress to `out`.
    ///
    /// Invalid or failing links are reported on stderr and never stop the
    /// others. Returns once the final progress line and its trailing newline
    /// are written, handing `out` back.
    pub async fn run<W>(&self, links: &[String], out: W) -> (Outcome, W)
    where
        W: Write + Send + 'static,
    {
        let registry = Arc::new(Registry::new());
        let stop = CancellationToken::new();
        let reporter =
            ProgressReporter::new(registry.clone(), out, self.settings.tick).spawn(stop.clone());

        let mut rejected = Vec::new();
        let mut workers = Vec::new();

        for link in links {
            let accepted = match validate(link, &self.client).await {
                Ok(accepted) => accepted,
                Err(e) => {
                    eprintln!("{}", e.diagnostic(link));
                    rejected.push(link.clone());
                    continue;
                }
            };

            let transfer = registry.register(&accepted.link).await;
            let client = self.client.clone();
            let settings = self.settings.clone();
            workers.push(tokio::spawn(worker::execute(
                transfer,
                registry.clone(),
                client,
                settings,
            )));
        }
        info!(
            accepted = workers.len(),
            rejected = rejected.len(),
            "all workers launched"
        );

        for result in join_all(workers).await {
            if let Err(e) = result {
                error!(error = %e, "worker task did not finish cleanly");
            }
        }
        // a panicked worker still counts as finished
        for transfer in registry.transfers().await {
            if !transfer.status().await.is_terminal() {
                eprintln!(
                    "{}: error downloading: {}: worker stopped unexpectedly",
                    PROGRAM,
                    transfer.source_url()
                );
                transfer
                    .set_status(TransferStatus::Failed("worker stopped unexpectedly".into()))
                    .await;
            }
        }
        debug!("all workers finished; stopping reporter");

        stop.cancel();
        let mut out = match reporter.await {
            Ok(out) => out,
            // the reporter is never aborted, so this is a panic
            Err(e) => std::panic::resume_unwind(e.into_panic()),
        };
        if let Err(e) = writeln!(out).and_then(|_| out.flush()) {
            warn!(error = %e, "could not finish the progress line");
        }

        let outcome = Outcome {
            transfers: registry.transfers().await,
            rejected,
        };
        (outcome, out)
    }
}
