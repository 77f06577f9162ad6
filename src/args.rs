use clap::{ArgAction, Parser};

/// Download several files at once over HTTP(S).
///
/// Each URL gets its own concurrent download. A single progress line shows
/// the completion percentage of every accepted URL, in the order given.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Absolute URLs to download. Each file is saved in the current
    /// directory under the last segment of its (redirected) URL path.
    #[arg(value_name = "URL")]
    pub urls: Vec<String>,

    /// Log more to stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
