use crate::error::{CoreError, Result};
use crate::tiling::WmCommandSender;
use log::{debug, warn};
use serde::Serialize;
use tokio::sync::mpsc;

/// Window manager command that opens the task manager
pub const TASK_MANAGER_COMMAND: &str = "shell-exec taskmgr";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// Request from a widget to one of the providers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum ProviderCommand {
    /// Window manager command, e.g. `focus --workspace 2`
    RunCommand(String),
    SetVolume(f32),
    ToggleMute,
    TrayClick {
        #[serde(rename = "iconId")]
        icon_id: String,
        button: MouseButton,
    },
}

/// Routes widget commands: window manager commands go over the live
/// connection, everything else to the external metrics agent.
#[derive(Debug, Clone, Default)]
pub struct CommandDispatcher {
    window_manager: Option<WmCommandSender>,
    agent: Option<mpsc::UnboundedSender<ProviderCommand>>,
}

impl CommandDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_window_manager(mut self, sender: WmCommandSender) -> Self {
        self.window_manager = Some(sender);
        self
    }

    pub fn with_agent(mut self, agent: mpsc::UnboundedSender<ProviderCommand>) -> Self {
        self.agent = Some(agent);
        self
    }

    pub fn dispatch(&self, command: ProviderCommand) -> Result<()> {
        debug!("Dispatching {:?}", command);
        match command {
            ProviderCommand::RunCommand(cmd) => match &self.window_manager {
                Some(wm) => wm.run_command(&cmd),
                None => Err(CoreError::websocket("No window manager connection")),
            },
            ProviderCommand::SetVolume(volume) => {
                self.to_agent(ProviderCommand::SetVolume(volume.clamp(0.0, 100.0)))
            }
            other => self.to_agent(other),
        }
    }

    pub fn run_command(&self, command: &str) -> Result<()> {
        self.dispatch(ProviderCommand::RunCommand(command.to_string()))
    }

    pub fn set_volume(&self, volume: f32) -> Result<()> {
        self.dispatch(ProviderCommand::SetVolume(volume))
    }

    fn to_agent(&self, command: ProviderCommand) -> Result<()> {
        let agent = self.agent.as_ref().ok_or_else(|| {
            warn!("No metrics agent attached, dropping {:?}", command);
            CoreError::unknown("No metrics agent attached")
        })?;
        agent
            .send(command)
            .map_err(|_| CoreError::unknown("Metrics agent channel closed"))
    }
}
