//! Per-URL progress records and the ordered registry that holds them.
//!
//! A [`FileTransfer`] is written by exactly one worker and read by the
//! reporter. The total size is published before the first byte is counted,
//! so a reader never pairs a non-zero `transferred` with a stale total.
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferStatus {
    Pending,
    InProgress,
    Succeeded,
    Failed(String),
}

impl TransferStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransferStatus::Succeeded | TransferStatus::Failed(_))
    }
}

/// Progress record for one accepted URL.
#[derive(Debug)]
pub struct FileTransfer {
    source_url: String,
    total_size: AtomicU64,
    transferred: AtomicU64,
    local_name: OnceLock<String>,
    status: Mutex<TransferStatus>,
}

/// A consistent `(transferred, total_size)` pair taken for one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub transferred: u64,
    pub total_size: u64,
}

impl Snapshot {
    /// Completion in percent; `0.0` while the total is unknown.
    pub fn percentage(&self) -> f64 {
        if self.total_size == 0 {
            return 0.0;
        }
        self.transferred as f64 / self.total_size as f64 * 100.0
    }
}

impl FileTransfer {
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            total_size: AtomicU64::new(0),
            transferred: AtomicU64::new(0),
            local_name: OnceLock::new(),
            status: Mutex::new(TransferStatus::Pending),
        }
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn total_size(&self) -> u64 {
        self.total_size.load(Ordering::SeqCst)
    }

    pub fn transferred(&self) -> u64 {
        self.transferred.load(Ordering::SeqCst)
    }

    pub fn local_name(&self) -> Option<&str> {
        self.local_name.get().map(String::as_str)
    }

    pub async fn status(&self) -> TransferStatus {
        self.status.lock().await.clone()
    }

    pub(crate) async fn set_status(&self, status: TransferStatus) {
        *self.status.lock().await = status;
    }

    /// Records the size and local name once the download response is in.
    ///
    /// Both fields are write-once; a second call leaves them untouched and
    /// returns `false`. Must run before any call to [`Self::add_transferred`].
    pub(crate) fn begin(&self, total_size: u64, local_name: String) -> bool {
        if self.local_name.set(local_name).is_err() {
            return false;
        }
        self.total_size.store(total_size, Ordering::SeqCst);
        true
    }

    pub(crate) fn add_transferred(&self, n: u64) {
        self.transferred.fetch_add(n, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> Snapshot {
        // transferred first: any count we see was added after the total was stored
        let transferred = self.transferred.load(Ordering::SeqCst);
        let total_size = self.total_size.load(Ordering::SeqCst);
        Snapshot {
            transferred,
            total_size,
        }
    }

    pub fn percentage(&self) -> f64 {
        self.snapshot().percentage()
    }
}

/// Accepted transfers in input-argument order, plus the local names already
/// handed out to them.
#[derive(Debug, Default)]
pub struct Registry {
    inner: Mutex<RegistryInner>,
}

#[derive(Debug, Default)]
struct RegistryInner {
    entries: Vec<Arc<FileTransfer>>,
    claimed_names: HashSet<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a fresh pending record and returns a handle to it.
    pub async fn register(&self, source_url: &str) -> Arc<FileTransfer> {
        let transfer = Arc::new(FileTransfer::new(source_url));
        self.inner.lock().await.entries.push(transfer.clone());
        transfer
    }

    /// Reserves a local file name no other transfer in this batch uses.
    ///
    /// The first claimant gets `wanted`; later ones get `wanted.1`,
    /// `wanted.2`, ... so two workers never write the same file.
    pub async fn claim_name(&self, wanted: &str) -> String {
        let mut inner = self.inner.lock().await;
        let mut name = wanted.to_string();
        let mut n = 0;
        while inner.claimed_names.contains(&name) {
            n += 1;
            name = format!("{}.{}", wanted, n);
        }
        inner.claimed_names.insert(name.clone());
        name
    }

    pub async fn snapshots(&self) -> Vec<Snapshot> {
        let inner = self.inner.lock().await;
        inner.entries.iter().map(|t| t.snapshot()).collect()
    }

    pub async fn transfers(&self) -> Vec<Arc<FileTransfer>> {
        self.inner.lock().await.entries.clone()
    }
}
