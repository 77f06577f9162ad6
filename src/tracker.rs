use crate::transfer::FileTransfer;
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, ReadBuf};

/// Counts the bytes read through `inner` into a [`FileTransfer`].
///
/// Content is passed through untouched. Only successful reads are counted;
/// a read that fails adds nothing.
pub struct ProgressTracker<R> {
    inner: R,
    transfer: Arc<FileTransfer>,
}

impl<R> ProgressTracker<R> {
    pub fn new(inner: R, transfer: Arc<FileTransfer>) -> Self {
        Self { inner, transfer }
    }
}

impl<R: AsyncRead + Unpin> AsyncRead for ProgressTracker<R> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let before = buf.filled().len();

        let poll = Pin::new(&mut this.inner).poll_read(cx, buf);
        if let Poll::Ready(Ok(())) = &poll {
            let n = buf.filled().len() - before;
            if n > 0 {
                this.transfer.add_transferred(n as u64);
            }
        }
        poll
    }
}
