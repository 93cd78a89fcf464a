use super::{
    command_frame, parse_message, AutoTilingOptions, ConnectionState, TilingPolicy, WmMessage,
    SUBSCRIBE_FRAME, TOGGLE_TILING_DIRECTION,
};
use crate::error::{CoreError, Result};
use futures_util::{SinkExt, StreamExt};
use log::{debug, info, warn};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

const LOG_CONTEXT: &str = "auto-tiling";

/// Dispatches window manager commands over the live connection
#[derive(Debug, Clone)]
pub struct WmCommandSender {
    tx: mpsc::UnboundedSender<String>,
}

impl WmCommandSender {
    /// Queue `command`; it is sent once the connection is subscribed
    pub fn run_command(&self, command: &str) -> Result<()> {
        self.tx
            .send(command_frame(command))
            .map_err(|_| CoreError::websocket("Auto-tiling connection is closed"))
    }
}

/// Handle to the background connection task.
///
/// Dropping the handle closes the connection.
pub struct AutoTilingController {
    token: CancellationToken,
    state: watch::Receiver<ConnectionState>,
    tiling_size: watch::Receiver<Option<f64>>,
    commands: WmCommandSender,
    task: Option<JoinHandle<()>>,
}

impl AutoTilingController {
    /// Open the connection in a background task
    pub fn activate(options: AutoTilingOptions) -> Self {
        let token = CancellationToken::new();
        let (state_tx, state) = watch::channel(ConnectionState::Disconnected);
        let (tiling_tx, tiling_size) = watch::channel(None);
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        info!(
            "Activating auto-tiling on {} (threshold {}, {:?})",
            options.url, options.threshold, options.trigger
        );
        let task = tokio::spawn(run(
            options,
            state_tx,
            tiling_tx,
            command_rx,
            token.clone(),
        ));

        Self {
            token,
            state,
            tiling_size,
            commands: WmCommandSender { tx: command_tx },
            task: Some(task),
        }
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }

    /// Last tiling size reported by the window manager
    pub fn tiling_size(&self) -> Option<f64> {
        *self.tiling_size.borrow()
    }

    pub fn subscribe_tiling_size(&self) -> watch::Receiver<Option<f64>> {
        self.tiling_size.clone()
    }

    pub fn command_sender(&self) -> WmCommandSender {
        self.commands.clone()
    }

    /// Close the connection and wait for the task to finish
    pub async fn deactivate(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for AutoTilingController {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

async fn run(
    options: AutoTilingOptions,
    state: watch::Sender<ConnectionState>,
    tiling_size: watch::Sender<Option<f64>>,
    mut commands: mpsc::UnboundedReceiver<String>,
    token: CancellationToken,
) {
    state.send_replace(ConnectionState::Connecting);

    let connect = tokio::select! {
        _ = token.cancelled() => {
            commands.close();
            state.send_replace(ConnectionState::Disconnected);
            return;
        }
        result = connect_async(options.url.as_str()) => result,
    };
    let (mut ws, _) = match connect {
        Ok(value) => value,
        Err(e) => {
            CoreError::from(e).report(Some(LOG_CONTEXT)).log();
            commands.close();
            state.send_replace(ConnectionState::Disconnected);
            return;
        }
    };
    info!("Auto-tiling connected to {}", options.url);

    if let Err(e) = ws.send(Message::Text(SUBSCRIBE_FRAME.into())).await {
        CoreError::from(e).report(Some(LOG_CONTEXT)).log();
        let _ = ws.close(None).await;
        commands.close();
        state.send_replace(ConnectionState::Disconnected);
        return;
    }
    state.send_replace(ConnectionState::Subscribed);

    let mut policy = TilingPolicy::new(options.threshold, options.trigger);
    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            Some(frame) = commands.recv() => {
                debug!("Sending command frame: {}", frame);
                if let Err(e) = ws.send(Message::Text(frame.into())).await {
                    CoreError::from(e).report(Some(LOG_CONTEXT)).log();
                    break;
                }
            }
            message = ws.next() => match message {
                Some(Ok(Message::Text(text))) => {
                    if let Some(frame) = react(&text, &mut policy, &tiling_size) {
                        if let Err(e) = ws.send(Message::Text(frame.into())).await {
                            CoreError::from(e).report(Some(LOG_CONTEXT)).log();
                            break;
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    info!("Auto-tiling connection closed by the window manager");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    CoreError::from(e).report(Some(LOG_CONTEXT)).log();
                    break;
                }
            }
        }
    }

    // senders fail from here on
    commands.close();
    let _ = ws.close(None).await;
    state.send_replace(ConnectionState::Disconnected);
    info!("Auto-tiling disconnected");
}

/// Handle one inbound text frame, returning a frame to send back
fn react(
    text: &str,
    policy: &mut TilingPolicy,
    tiling_size: &watch::Sender<Option<f64>>,
) -> Option<String> {
    match parse_message(text) {
        Ok(WmMessage::ClientResponse { success }) => {
            info!("Window manager response, success: {:?}", success);
            None
        }
        Ok(WmMessage::EventSubscription { tiling_size: size }) => {
            tiling_size.send_replace(size);
            if policy.observe(size) {
                info!(
                    "Tiling size {:?} at or below threshold, toggling tiling direction",
                    size
                );
                Some(command_frame(TOGGLE_TILING_DIRECTION))
            } else {
                None
            }
        }
        Ok(WmMessage::Other(kind)) => {
            debug!("Ignoring message of type {:?}", kind);
            None
        }
        Err(e) => {
            warn!("Ignoring malformed window manager message: {}", e);
            None
        }
    }
}
