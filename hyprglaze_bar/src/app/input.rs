//! Line protocol read from stdin
//!
//! Plain lines are actions (as emitted by lemonbar click areas), lines that
//! start with `{` carry provider state as JSON.

use super::events::{AppEvent, ProviderUpdate};
use crate::utils::{AppError, Result};
use hyprglaze_core::providers::MouseButton;
use log::{debug, info, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Parse one input line; blank lines and `#` comments yield `None`
pub fn parse_line(line: &str) -> Result<Option<AppEvent>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    if line.starts_with('{') {
        let update: ProviderUpdate = serde_json::from_str(line)
            .map_err(|e| AppError::input(format!("Invalid provider update: {}", e)))?;
        return Ok(Some(AppEvent::ProviderUpdate(update)));
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let event = match verb {
        "workspace" => AppEvent::FocusWorkspace(required(verb, rest)?.to_string()),
        "wm" => AppEvent::RunCommand(required(verb, rest)?.to_string()),
        "tiling-toggle" => AppEvent::ToggleTilingDirection,
        "volume" => parse_volume(required(verb, rest)?)?,
        "mute" => AppEvent::ToggleMute,
        "tray" => parse_tray_click(rest)?,
        "tray-toggle" => AppEvent::TrayToggle,
        "task-manager" => AppEvent::OpenTaskManager,
        "theme-menu" => AppEvent::ThemeMenuToggle,
        "theme" => AppEvent::ThemeChanged(required(verb, rest)?.parse().map_err(AppError::input)?),
        "theme-mode" => {
            AppEvent::ThemeModeChanged(required(verb, rest)?.parse().map_err(AppError::input)?)
        }
        "theme-toggle" => AppEvent::ThemeToggle,
        "appearance" => match required(verb, rest)? {
            "dark" => AppEvent::SystemAppearance { dark: true },
            "light" => AppEvent::SystemAppearance { dark: false },
            other => return Err(AppError::input(format!("Unknown appearance: {}", other))),
        },
        "seconds" => AppEvent::TimeFormatToggle,
        "weather-refresh" => AppEvent::WeatherRefresh,
        "weather-clear" => AppEvent::WeatherClearCache,
        "quit" => AppEvent::Shutdown,
        other => return Err(AppError::input(format!("Unknown action: {}", other))),
    };
    Ok(Some(event))
}

fn required<'a>(verb: &str, rest: &'a str) -> Result<&'a str> {
    if rest.is_empty() {
        Err(AppError::input(format!("Action '{}' needs an argument", verb)))
    } else {
        Ok(rest)
    }
}

/// `volume 40`, `volume +5` or `volume -5`
fn parse_volume(arg: &str) -> Result<AppEvent> {
    let value: f32 = arg
        .parse()
        .map_err(|_| AppError::input(format!("Invalid volume: {}", arg)))?;
    if !value.is_finite() {
        return Err(AppError::input(format!("Invalid volume: {}", arg)));
    }
    if arg.starts_with('+') || arg.starts_with('-') {
        Ok(AppEvent::VolumeAdjust(value))
    } else {
        Ok(AppEvent::SetVolume(value))
    }
}

/// `tray <icon id> [left|middle|right]`
fn parse_tray_click(rest: &str) -> Result<AppEvent> {
    let mut parts = rest.split_whitespace();
    let icon_id = parts
        .next()
        .ok_or_else(|| AppError::input("Action 'tray' needs an icon id"))?;
    let button = match parts.next().unwrap_or("left") {
        "left" => MouseButton::Left,
        "middle" => MouseButton::Middle,
        "right" => MouseButton::Right,
        other => return Err(AppError::input(format!("Unknown mouse button: {}", other))),
    };
    Ok(AppEvent::TrayClick {
        icon_id: icon_id.to_string(),
        button,
    })
}

/// Forward parsed lines from `reader` until EOF or cancellation
pub fn spawn_input_reader<R>(
    reader: R,
    events: mpsc::UnboundedSender<AppEvent>,
    token: CancellationToken,
) -> JoinHandle<()>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = reader.lines();
        loop {
            let line = tokio::select! {
                _ = token.cancelled() => break,
                line = lines.next_line() => line,
            };
            match line {
                Ok(Some(line)) => match parse_line(&line) {
                    Ok(Some(event)) => {
                        debug!("Input event: {:?}", event);
                        if events.send(event).is_err() {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => warn!("Ignoring input line: {}", e),
                },
                Ok(None) => {
                    info!("Input closed");
                    break;
                }
                Err(e) => {
                    warn!("Failed to read input: {}", e);
                    break;
                }
            }
        }
    })
}
