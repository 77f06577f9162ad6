use std::path::PathBuf;
use std::time::Duration;

/// Runtime settings for a batch.
///
/// There is no config file; the binary always uses the defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory the downloaded files are created in.
    pub output_dir: PathBuf,
    /// Interval between two progress renders.
    pub tick: Duration,
    /// Size of the buffer each worker reads the body into.
    pub chunk_size: usize,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            tick: Duration::from_millis(100),
            chunk_size: 16 * 1024,
            user_agent: format!("pwget/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Settings {
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn build_client(&self) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder()
            .user_agent(self.user_agent.clone())
            .build()
    }
}
