use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Fixed messages endpoint of the Pushover API.
pub const API_URL: &str = "https://api.pushover.net/1/messages.json";

/// Status value the service returns when a message was accepted.
pub const STATUS_ACCEPTED: i32 = 1;

/// Maximum number of comma-separated recipient keys per message.
pub const MAX_RECIPIENTS: usize = 50;
pub const MAX_TITLE_LEN: usize = 250;
pub const MAX_MESSAGE_LEN: usize = 1024;
pub const MAX_URL_LEN: usize = 512;
pub const MAX_URL_TITLE_LEN: usize = 100;

pub(crate) const HEADER_LIMIT: &str = "X-Limit-App-Limit";
pub(crate) const HEADER_REMAINING: &str = "X-Limit-App-Remaining";
pub(crate) const HEADER_RESET: &str = "X-Limit-App-Reset";

// ── Options ──

/// Message priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Lowest,
    Low,
    #[default]
    Normal,
    High,
    Emergency,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Lowest => "Lowest",
            Priority::Low => "Low",
            Priority::Normal => "Normal",
            Priority::High => "High",
            Priority::Emergency => "Emergency",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lowest" => Ok(Priority::Lowest),
            "low" => Ok(Priority::Low),
            "normal" => Ok(Priority::Normal),
            "high" => Ok(Priority::High),
            "emergency" => Ok(Priority::Emergency),
            other => Err(format!("unknown priority \"{}\"", other)),
        }
    }
}

/// Notification tone played on the receiving device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sound {
    #[default]
    Pushover,
    Bike,
    Bugle,
    CashRegister,
    Classical,
    Cosmic,
    Falling,
    Gamelan,
    Incoming,
    Intermission,
    Magic,
    Mechanical,
    PianoBar,
    Siren,
    SpaceAlarm,
    Tugboat,
    Alien,
    Climb,
    Persistent,
    Echo,
    UpDown,
    Vibrate,
    None,
}

impl Sound {
    const ALL: [Sound; 23] = [
        Sound::Pushover,
        Sound::Bike,
        Sound::Bugle,
        Sound::CashRegister,
        Sound::Classical,
        Sound::Cosmic,
        Sound::Falling,
        Sound::Gamelan,
        Sound::Incoming,
        Sound::Intermission,
        Sound::Magic,
        Sound::Mechanical,
        Sound::PianoBar,
        Sound::Siren,
        Sound::SpaceAlarm,
        Sound::Tugboat,
        Sound::Alien,
        Sound::Climb,
        Sound::Persistent,
        Sound::Echo,
        Sound::UpDown,
        Sound::Vibrate,
        Sound::None,
    ];

    /// Name the service uses for this tone.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sound::Pushover => "pushover",
            Sound::Bike => "bike",
            Sound::Bugle => "bugle",
            Sound::CashRegister => "cashregister",
            Sound::Classical => "classical",
            Sound::Cosmic => "cosmic",
            Sound::Falling => "falling",
            Sound::Gamelan => "gamelan",
            Sound::Incoming => "incoming",
            Sound::Intermission => "intermission",
            Sound::Magic => "magic",
            Sound::Mechanical => "mechanical",
            Sound::PianoBar => "pianobar",
            Sound::Siren => "siren",
            Sound::SpaceAlarm => "spacealarm",
            Sound::Tugboat => "tugboat",
            Sound::Alien => "alien",
            Sound::Climb => "climb",
            Sound::Persistent => "persistent",
            Sound::Echo => "echo",
            Sound::UpDown => "updown",
            Sound::Vibrate => "vibrate",
            Sound::None => "none",
        }
    }
}

impl fmt::Display for Sound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sound {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Sound::ALL
            .iter()
            .copied()
            .find(|sound| sound.as_str() == wanted)
            .ok_or_else(|| format!("unknown sound \"{}\"", wanted))
    }
}

/// Sending options for the non-deprecated push path.
///
/// `recipients` holds one user/group key or a comma-separated list of them.
/// `priority` and `sound` fall back to [`Priority::Normal`] and
/// [`Sound::Pushover`] when left unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushOptions {
    pub recipients: String,
    pub html: bool,
    pub url: String,
    pub url_title: String,
    pub priority: Option<Priority>,
    pub sound: Option<Sound>,
}

impl PushOptions {
    /// Options addressed to `recipients`, everything else default.
    pub fn to(recipients: impl Into<String>) -> Self {
        PushOptions {
            recipients: recipients.into(),
            ..Default::default()
        }
    }

    pub fn html(mut self, html: bool) -> Self {
        self.html = html;
        self
    }

    /// Attach a supplementary link. `title` may be empty.
    pub fn link(mut self, url: impl Into<String>, title: impl Into<String>) -> Self {
        self.url = url.into();
        self.url_title = title.into();
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn sound(mut self, sound: Sound) -> Self {
        self.sound = Some(sound);
        self
    }
}

// ── Wire request ──

/// Validated, form-encodable message payload.
///
/// Only produced by the request builder; empty optional fields are left out
/// of the encoded body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushRequest {
    pub(crate) token: String,
    pub(crate) user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) device: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) title: Option<String>,
    pub(crate) message: String,
    pub(crate) html: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) url_title: Option<String>,
    pub(crate) priority: Priority,
    pub(crate) sound: Sound,
}

impl PushRequest {
    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn device(&self) -> Option<&str> {
        self.device.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_html(&self) -> bool {
        self.html == "1"
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn url_title(&self) -> Option<&str> {
        self.url_title.as_deref()
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn sound(&self) -> Sound {
        self.sound
    }

    /// Number of recipient keys in `user`.
    pub fn recipient_count(&self) -> usize {
        self.user.split(',').count()
    }
}

// ── Response ──

/// Rate-limit quota reported in the response headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimit {
    pub limit: u32,
    pub remaining: u32,
    /// Reset marker exactly as the server sent it (a Unix timestamp today).
    pub reset: String,
}

/// Reply from the messages endpoint, accepted or rejected.
///
/// A rejection is a normal value: check [`is_accepted()`](Self::is_accepted)
/// and read `errors`. `rate_limit` is filled from the response headers on
/// both paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushResponse {
    pub status: i32,
    #[serde(default)]
    pub request: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(skip)]
    pub rate_limit: RateLimit,
}

impl PushResponse {
    pub fn is_accepted(&self) -> bool {
        self.status == STATUS_ACCEPTED
    }
}

// ── Errors ──

/// Error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error("invalid argument \"{field}\": {reason}")]
    InvalidArgument {
        field: &'static str,
        reason: &'static str,
    },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response (HTTP {status}): {source}")]
    UnexpectedResponse {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
    #[error("blocking push called from inside an async runtime; use the async variant")]
    BlockingInRuntime,
    #[error("runtime error: {0}")]
    Runtime(#[from] std::io::Error),
}

impl PushError {
    pub(crate) fn invalid(field: &'static str, reason: &'static str) -> Self {
        PushError::InvalidArgument { field, reason }
    }

    /// Offending field for validation errors.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            PushError::InvalidArgument { field, .. } => Some(*field),
            _ => None,
        }
    }
}

pub type PushResult<T> = Result<T, PushError>;
