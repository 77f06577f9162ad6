use crate::config::Settings;
use crate::error::FetchError;
use crate::tracker::ProgressTracker;
use crate::transfer::{FileTransfer, Registry, TransferStatus};
use crate::utils;
use crate::validate::{content_length, parse_link, send};
use futures_util::TryStreamExt;
use reqwest::Client;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt, BufWriter};
use tokio_util::io::StreamReader;
use tracing::{debug, warn};

/// Downloads one accepted URL into `settings.output_dir`.
///
/// Never fails from the caller's point of view: any error is printed once to
/// stderr and recorded on the transfer as `Failed`.
pub async fn execute(
    transfer: Arc<FileTransfer>,
    registry: Arc<Registry>,
    client: Client,
    settings: Arc<Settings>,
) {
    transfer.set_status(TransferStatus::InProgress).await;
    debug!(url = transfer.source_url(), "download started");

    match download(&transfer, &registry, &client, &settings).await {
        Ok(path) => {
            debug!(
                url = transfer.source_url(),
                path = %path.display(),
                bytes = transfer.transferred(),
                "download finished"
            );
            transfer.set_status(TransferStatus::Succeeded).await;
        }
        Err(e) => {
            eprintln!("{}", e.diagnostic(transfer.source_url()));
            warn!(url = transfer.source_url(), phase = %e.phase(), "download failed");
            transfer
                .set_status(TransferStatus::Failed(e.to_string()))
                .await;
        }
    }
}

async fn download(
    transfer: &Arc<FileTransfer>,
    registry: &Registry,
    client: &Client,
    settings: &Settings,
) -> Result<PathBuf, FetchError> {
    let url = parse_link(transfer.source_url())?;
    let response = send(client, url).await?;

    // validation saw a different response; sizes are re-read here
    let size = content_length(response.headers())?;

    // the final URL after redirects decides the name
    let wanted = utils::get_filename_from_url(response.url());
    let filename = registry.claim_name(&wanted).await;
    let path = utils::output_path(&settings.output_dir, &filename);

    let file = File::create(&path)
        .await
        .map_err(|source| FetchError::FileCreate {
            path: path.clone(),
            source,
        })?;

    transfer.begin(size, filename);

    let body = StreamReader::new(Box::pin(
        response.bytes_stream().map_err(io::Error::other),
    ));
    stream_to_file(body, file, &path, transfer.clone(), settings.chunk_size).await?;

    Ok(path)
}

/// Copies `body` into `file` in `chunk_size` reads, counting each read on
/// `transfer` before the bytes are written.
///
/// A failed read leaves what was already written on disk.
pub async fn stream_to_file<R>(
    body: R,
    file: File,
    path: &Path,
    transfer: Arc<FileTransfer>,
    chunk_size: usize,
) -> Result<(), FetchError>
where
    R: AsyncRead + Unpin,
{
    let mut reader = ProgressTracker::new(body, transfer);
    let mut writer = BufWriter::new(file);
    let mut buf = vec![0u8; chunk_size.max(1)];

    loop {
        let n = match reader.read(&mut buf).await {
            Ok(n) => n,
            Err(e) => {
                // keep the partial file
                if let Err(flush_err) = writer.flush().await {
                    warn!(
                        path = %path.display(),
                        error = %flush_err,
                        "could not flush partial file"
                    );
                }
                return Err(FetchError::Stream(e));
            }
        };
        if n == 0 {
            break;
        }

        writer
            .write_all(&buf[..n])
            .await
            .map_err(|source| FetchError::FileWrite {
                path: path.to_path_buf(),
                source,
            })?;
    }

    writer
        .shutdown()
        .await
        .map_err(|source| FetchError::FileClose {
            path: path.to_path_buf(),
            source,
        })
}
