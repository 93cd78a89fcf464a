//! Auto-tiling over the window manager's IPC socket
//!
//! The window manager streams JSON messages; whenever a managed window's
//! tiling size drops to the threshold the controller sends a
//! `toggle-tiling-direction` command back over the same socket.

mod controller;

pub use controller::{AutoTilingController, WmCommandSender};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_ENDPOINT: &str = "ws://localhost:6123";
pub const SUBSCRIBE_FRAME: &str = "sub -e window_managed";
pub const TOGGLE_TILING_DIRECTION: &str = "toggle-tiling-direction";
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Text frame that runs `command` in the window manager
pub fn command_frame(command: &str) -> String {
    format!("c {}", command)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Subscribed,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::Connecting => write!(f, "connecting"),
            Self::Subscribed => write!(f, "subscribed"),
        }
    }
}

/// When a small window triggers a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerMode {
    /// Every qualifying event
    #[default]
    Level,
    /// Only when the size crosses from above the threshold to at or below it
    Edge,
}

impl FromStr for TriggerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "level" => Ok(Self::Level),
            "edge" => Ok(Self::Edge),
            _ => Err(format!("Unknown trigger mode: {}", s)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AutoTilingOptions {
    pub url: String,
    pub threshold: f64,
    pub trigger: TriggerMode,
}

impl Default for AutoTilingOptions {
    fn default() -> Self {
        Self {
            url: DEFAULT_ENDPOINT.to_string(),
            threshold: DEFAULT_THRESHOLD,
            trigger: TriggerMode::default(),
        }
    }
}

/// Inbound message from the window manager
#[derive(Debug, Clone, PartialEq)]
pub enum WmMessage {
    ClientResponse { success: Option<bool> },
    EventSubscription { tiling_size: Option<f64> },
    Other(Option<String>),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    #[serde(default)]
    message_type: Option<String>,
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    data: Value,
}

pub fn parse_message(text: &str) -> Result<WmMessage, serde_json::Error> {
    let envelope: Envelope = serde_json::from_str(text)?;
    Ok(match envelope.message_type.as_deref() {
        Some("client_response") => WmMessage::ClientResponse {
            success: envelope.success,
        },
        Some("event_subscription") => WmMessage::EventSubscription {
            tiling_size: envelope
                .data
                .pointer("/managedWindow/tilingSize")
                .and_then(Value::as_f64),
        },
        other => WmMessage::Other(other.map(str::to_string)),
    })
}

/// Decides whether an observed tiling size calls for a toggle
#[derive(Debug, Clone)]
pub struct TilingPolicy {
    threshold: f64,
    trigger: TriggerMode,
    was_small: bool,
}

impl TilingPolicy {
    pub fn new(threshold: f64, trigger: TriggerMode) -> Self {
        Self {
            threshold,
            trigger,
            was_small: false,
        }
    }

    /// Feed one observation; true means send a toggle.
    ///
    /// A frame without a size never fires and leaves the edge state as it
    /// was, so `0.4, null, 0.4` toggles once in edge mode.
    pub fn observe(&mut self, tiling_size: Option<f64>) -> bool {
        let Some(size) = tiling_size else {
            return false;
        };
        let small = size <= self.threshold;
        let fire = match self.trigger {
            TriggerMode::Level => small,
            TriggerMode::Edge => small && !self.was_small,
        };
        self.was_small = small;
        fire
    }
}
