//! Error taxonomy for a single URL's validation or download.
//!
//! Every variant is terminal for the URL that produced it and never for its
//! siblings. The coordinator and workers turn these into one stderr line via
//! [`FetchError::diagnostic`].
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Name printed at the start of every diagnostic line.
pub const PROGRAM: &str = "pwget";

#[derive(Debug, Error)]
pub enum FetchError {
    /// The input is not an absolute URL with a scheme and a host.
    #[error("{0}")]
    MalformedUrl(String),

    /// The request could not be sent, or the server refused it.
    #[error("{0}")]
    Connection(String),

    /// The response carried no usable `Content-Length`.
    #[error(
        "content length = {}: {}",
        .header.as_deref().unwrap_or("missing"),
        .reason
    )]
    SizeUnknown {
        header: Option<String>,
        reason: String,
    },

    #[error("{source}")]
    FileCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The body stream broke after the transfer had started.
    #[error("{0}")]
    Stream(#[source] io::Error),

    #[error("{source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{source}")]
    FileClose {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The step in which an error happened, as shown in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    ParsingUrl,
    ConnectingUrl,
    GettingContentLength,
    CreatingFile,
    ReadingFrom,
    WritingTo,
    ClosingFile,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Phase::ParsingUrl => "parsing url",
            Phase::ConnectingUrl => "connecting url",
            Phase::GettingContentLength => "getting content length",
            Phase::CreatingFile => "creating file",
            Phase::ReadingFrom => "reading from",
            Phase::WritingTo => "writing to",
            Phase::ClosingFile => "closing file",
        };
        f.write_str(text)
    }
}

impl FetchError {
    pub fn phase(&self) -> Phase {
        match self {
            FetchError::MalformedUrl(_) => Phase::ParsingUrl,
            FetchError::Connection(_) => Phase::ConnectingUrl,
            FetchError::SizeUnknown { .. } => Phase::GettingContentLength,
            FetchError::FileCreate { .. } => Phase::CreatingFile,
            FetchError::Stream(_) => Phase::ReadingFrom,
            FetchError::FileWrite { .. } => Phase::WritingTo,
            FetchError::FileClose { .. } => Phase::ClosingFile,
        }
    }

    /// Builds the stderr line for this error.
    ///
    /// File errors name the local path; everything else names `subject`,
    /// which is the raw input during validation and the URL in a worker.
    pub fn diagnostic(&self, subject: &str) -> String {
        let subject = match self {
            FetchError::FileCreate { path, .. }
            | FetchError::FileWrite { path, .. }
            | FetchError::FileClose { path, .. } => path.display().to_string(),
            _ => subject.to_string(),
        };
        format!("{}: error {}: {}: {}", PROGRAM, self.phase(), subject, self)
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Connection(err.to_string())
    }
}
