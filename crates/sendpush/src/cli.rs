use std::path::PathBuf;

use clap::Parser;
use pushover::{Priority, Sound};

/// Values of `--plaintext` that switch the message to HTML.
const HTML_SELECTORS: [&str; 4] = ["false", "no", "0", "html"];

#[derive(Parser, Debug)]
#[command(name = "sendpush")]
#[command(about = "Send a Pushover notification")]
#[command(version)]
pub struct Args {
    /// The message title
    #[arg(short, long)]
    pub title: Option<String>,

    /// The message
    #[arg(short, long)]
    pub message: Option<String>,

    /// The Pushover api key to send the message from (overrides appKey)
    #[arg(short, long, env = "PUSHOVER_APP_KEY")]
    pub from: Option<String>,

    /// The Pushover user or group key to send the message to (overrides userGroupKey)
    #[arg(short, long, env = "PUSHOVER_USER_KEY")]
    pub user: Option<String>,

    /// Send message as plaintext, the default; false, no, 0 or html send HTML
    #[arg(short, long)]
    pub plaintext: Option<String>,

    /// Supplementary URL shown with the message
    #[arg(long)]
    pub url: Option<String>,

    /// Title for --url
    #[arg(long)]
    pub url_title: Option<String>,

    /// Message priority (lowest, low, normal, high, emergency)
    #[arg(long)]
    pub priority: Option<Priority>,

    /// Notification sound (e.g. pushover, siren, none)
    #[arg(long)]
    pub sound: Option<Sound>,

    /// Settings file holding appKey and userGroupKey defaults
    #[arg(long, default_value = "appsettings.json")]
    pub config: PathBuf,
}

impl Args {
    /// Whether the message body is HTML, as selected by `--plaintext`.
    pub fn html(&self) -> bool {
        self.plaintext
            .as_deref()
            .is_some_and(|v| HTML_SELECTORS.contains(&v))
    }
}
