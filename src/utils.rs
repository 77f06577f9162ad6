//! Helpers for turning URLs into local file names.
use percent_encoding::percent_decode_str;
use sanitize_filename::sanitize;
use std::path::{Path, PathBuf};
use url::Url;

const FALLBACK_NAME: &str = "output.bin";

/// Extracts a clean filename from a URL.
///
/// Takes the last path segment, URL-decodes it, and strips characters the
/// OS does not allow. Falls back to "output.bin" when nothing usable is left.
pub fn get_filename_from_url(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut s| s.next_back())
        .map(|s| percent_decode_str(s).decode_utf8_lossy().to_string())
        .map(sanitize)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| FALLBACK_NAME.to_string())
}

pub fn output_path(dir: &Path, filename: &str) -> PathBuf {
    dir.join(filename)
}
