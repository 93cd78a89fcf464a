//! Application core module

pub mod events;
pub mod input;
pub mod state;

use crate::config::BarConfig;
use crate::constants::intervals;
use crate::ui::{format_line, Bar, RenderContext};
use crate::utils::Result;
use chrono::Local;
use events::{AppEvent, EventBus, ProviderUpdate};
use hyprglaze_core::preferences::{
    KeyValueStore, PreferenceStore, Preferences, PreferencesPatch, SubscriptionId, UiPatch,
};
use hyprglaze_core::providers::{
    provider_channels, spawn_system_monitor, AudioState, CommandDispatcher, ProviderAggregator,
    ProviderCommand, ProviderSources, SystemTray, WindowManagerState,
};
use hyprglaze_core::theme::{StyleTarget, ThemeController};
use hyprglaze_core::tiling::{AutoTilingController, TOGGLE_TILING_DIRECTION};
use hyprglaze_core::weather::{WeatherRefresher, WeatherService};
use log::{debug, info, warn};
use state::AppState;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

pub use state::{UiState, VolumeState};

/// Services owned by the bar for its whole lifetime
pub struct Services {
    pub preferences: Arc<PreferenceStore>,
    pub theme: ThemeController,
    pub weather: Option<WeatherRefresher>,
    pub tiling: Option<AutoTilingController>,
    pub aggregator: ProviderAggregator,
    pub dispatcher: CommandDispatcher,
    window_manager: watch::Sender<Option<WindowManagerState>>,
    audio: watch::Sender<Option<AudioState>>,
    system_tray: watch::Sender<Option<SystemTray>>,
    monitor_token: CancellationToken,
    monitor: JoinHandle<()>,
}

impl Services {
    /// Construct and start every service described by `config`.
    ///
    /// Must run inside a tokio runtime. The returned receiver yields the
    /// commands meant for the external metrics agent.
    pub fn start(
        config: &BarConfig,
        storage: Box<dyn KeyValueStore>,
        style: Box<dyn StyleTarget>,
    ) -> Result<(Self, mpsc::UnboundedReceiver<ProviderCommand>)> {
        let preferences = Arc::new(PreferenceStore::new(storage));
        let prefs = preferences.get();

        let mut theme = ThemeController::new(preferences.clone(), style);
        if let Err(e) = theme.apply_current() {
            e.report(Some("theme")).log();
        }

        let weather = if config.weather.enabled {
            let service = WeatherService::from_config(
                &config.weather_service_config(&prefs),
                Some(preferences.clone()),
            )?;
            Some(WeatherRefresher::spawn(
                Arc::new(service),
                Duration::from_millis(prefs.weather.update_interval_ms),
            ))
        } else {
            info!("Weather widget disabled");
            None
        };

        let tiling = if config.tiling.enabled {
            Some(AutoTilingController::activate(config.auto_tiling_options()))
        } else {
            info!("Auto-tiling disabled");
            None
        };

        let (sources, feeds) = provider_channels();
        let ProviderSources {
            window_manager,
            cpu,
            memory,
            audio,
            system_tray,
        } = sources;

        let monitor_token = CancellationToken::new();
        let monitor = spawn_system_monitor(
            cpu,
            memory,
            config.system_update_interval(),
            monitor_token.clone(),
        );
        let aggregator = ProviderAggregator::spawn(feeds);

        let (agent_tx, agent_rx) = mpsc::unbounded_channel();
        let mut dispatcher = CommandDispatcher::new().with_agent(agent_tx);
        if let Some(tiling) = tiling.as_ref() {
            dispatcher = dispatcher.with_window_manager(tiling.command_sender());
        }

        Ok((
            Self {
                preferences,
                theme,
                weather,
                tiling,
                aggregator,
                dispatcher,
                window_manager,
                audio,
                system_tray,
                monitor_token,
                monitor,
            },
            agent_rx,
        ))
    }

    /// Publish provider state received from outside
    pub fn publish(&self, update: ProviderUpdate) {
        if let Some(wm) = update.window_manager {
            self.window_manager.send_replace(Some(wm));
        }
        if let Some(audio) = update.audio {
            self.audio.send_replace(Some(audio));
        }
        if let Some(tray) = update.system_tray {
            self.system_tray.send_replace(Some(tray));
        }
    }

    /// Stop every task and close the window manager connection
    pub async fn shutdown(self) {
        self.monitor_token.cancel();
        let _ = self.monitor.await;
        self.aggregator.stop().await;
        if let Some(weather) = self.weather {
            weather.stop().await;
        }
        if let Some(tiling) = self.tiling {
            tiling.deactivate().await;
        }
        info!("Services stopped");
    }
}

/// Owns the state, the widgets and the output stream
pub struct BarApp<W> {
    state: AppState,
    bar: Bar,
    services: Services,
    event_bus: EventBus,
    output: W,
    last_line: Option<String>,
    preferences_rx: watch::Receiver<Preferences>,
    subscription: SubscriptionId,
}

impl<W> BarApp<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(config: BarConfig, services: Services, output: W) -> Self {
        let preferences = services.preferences.get();
        let (preferences_tx, preferences_rx) = watch::channel(preferences.clone());
        let subscription = services.preferences.subscribe(move |p| {
            preferences_tx.send_replace(p.clone());
        });

        let mut state = AppState::new(config, preferences);
        state.tiling = services.tiling.as_ref().map(|t| t.state());

        Self {
            state,
            bar: Bar::with_default_widgets(),
            services,
            event_bus: EventBus::new(),
            output,
            last_line: None,
            preferences_rx,
            subscription,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn event_sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.event_bus.sender()
    }

    pub fn last_line(&self) -> Option<&str> {
        self.last_line.as_deref()
    }

    /// Apply one event; returns false when the bar should exit
    pub fn handle_event(&mut self, event: AppEvent) -> bool {
        debug!("Handling {:?}", event);
        let result = match event {
            AppEvent::Shutdown => return false,
            AppEvent::FocusWorkspace(name) => self
                .services
                .dispatcher
                .run_command(&format!("focus --workspace {}", name)),
            AppEvent::RunCommand(command) => self.services.dispatcher.run_command(&command),
            AppEvent::ToggleTilingDirection => {
                self.services.dispatcher.run_command(TOGGLE_TILING_DIRECTION)
            }
            AppEvent::SetVolume(volume) => self.request_volume(volume),
            AppEvent::VolumeAdjust(delta) => match self.state.effective_volume() {
                Some(current) => self.request_volume(current + delta),
                None => {
                    warn!("No playback device to adjust");
                    Ok(())
                }
            },
            AppEvent::ToggleMute => self.services.dispatcher.dispatch(ProviderCommand::ToggleMute),
            AppEvent::TrayClick { icon_id, button } => self
                .services
                .dispatcher
                .dispatch(ProviderCommand::TrayClick { icon_id, button }),
            AppEvent::TrayToggle => {
                self.state.ui_state.toggle_tray();
                Ok(())
            }
            AppEvent::OpenTaskManager => self
                .services
                .dispatcher
                .run_command(&self.state.config.system.task_manager_command),
            AppEvent::ThemeMenuToggle => {
                self.state.ui_state.toggle_theme_menu();
                Ok(())
            }
            AppEvent::ThemeChanged(id) => {
                self.state.ui_state.theme_menu_expanded = false;
                self.services.theme.set_preset(id)
            }
            AppEvent::ThemeModeChanged(mode) => self.services.theme.set_mode(mode),
            AppEvent::ThemeToggle => self.services.theme.toggle(),
            AppEvent::SystemAppearance { dark } => {
                self.services.theme.set_system_appearance(dark)
            }
            AppEvent::TimeFormatToggle => {
                self.services.preferences.update(&PreferencesPatch::ui(UiPatch {
                    show_seconds: Some(!self.state.show_seconds()),
                    ..Default::default()
                }));
                Ok(())
            }
            AppEvent::WeatherRefresh => {
                if let Some(weather) = self.services.weather.as_ref() {
                    weather.refresh();
                }
                Ok(())
            }
            AppEvent::WeatherClearCache => {
                if let Some(weather) = self.services.weather.as_ref() {
                    weather.clear_cache();
                }
                Ok(())
            }
            AppEvent::ProviderUpdate(update) => {
                self.services.publish(update);
                Ok(())
            }
        };

        if let Err(e) = result {
            e.report(Some("action")).log();
        }
        // Reads after an update see it immediately
        self.state.set_preferences(self.services.preferences.get());
        true
    }

    fn request_volume(&mut self, volume: f32) -> hyprglaze_core::Result<()> {
        match self.state.ui_state.volume.request(volume, Instant::now()) {
            Some(volume) => self.services.dispatcher.set_volume(volume),
            None => Ok(()),
        }
    }

    fn flush_volume(&mut self) {
        if let Some(volume) = self.state.ui_state.volume.flush(Instant::now()) {
            if let Err(e) = self.services.dispatcher.set_volume(volume) {
                e.report(Some("volume")).log();
            }
        }
    }

    /// Render the current state into one line
    pub fn render_line(&mut self) -> String {
        let ctx = RenderContext::new(&self.state, Local::now());
        let segments = self.bar.render(&ctx);
        format_line(&segments, self.state.config.ui.format)
    }

    /// Write the line if it differs from the last one written
    async fn emit(&mut self) -> Result<()> {
        let line = self.render_line();
        if self.last_line.as_deref() == Some(line.as_str()) {
            return Ok(());
        }
        self.output.write_all(line.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        self.output.flush().await?;
        self.last_line = Some(line);
        Ok(())
    }

    /// Render a single line once the first system sample is in, or after `settle`
    pub async fn run_once(&mut self, settle: Duration) -> Result<String> {
        let mut snapshot = self.services.aggregator.subscribe();
        let mut weather = self.services.weather.as_ref().map(|w| w.subscribe());

        let _ = tokio::time::timeout(settle, async {
            let _ = snapshot.wait_for(|s| s.cpu.is_some()).await;
            if let Some(weather) = weather.as_mut() {
                let _ = weather.wait_for(|w| w.data.is_some() || w.error.is_some()).await;
            }
        })
        .await;

        self.state.providers = snapshot.borrow().clone();
        if let Some(weather) = weather {
            self.state.weather = weather.borrow().clone();
        }
        self.emit().await?;
        Ok(self.last_line.clone().unwrap_or_default())
    }

    /// Event loop; returns on `Shutdown`, when `token` is cancelled or when
    /// the output cannot be written
    pub async fn run(&mut self, token: CancellationToken) -> Result<()> {
        let mut snapshot_rx = self.services.aggregator.subscribe();
        let mut weather_rx = self.services.weather.as_ref().map(|w| w.subscribe());
        let mut tiling_rx = self.services.tiling.as_ref().map(|t| t.subscribe_state());
        let mut tiling_size_rx = self
            .services
            .tiling
            .as_ref()
            .map(|t| t.subscribe_tiling_size());

        let mut clock = tokio::time::interval(Duration::from_millis(intervals::CLOCK_TICK));
        clock.set_missed_tick_behavior(MissedTickBehavior::Skip);

        self.emit().await?;
        info!("Bar running");

        loop {
            let volume_deadline = self.state.ui_state.volume.deadline();

            tokio::select! {
                biased;

                _ = token.cancelled() => break,

                event = self.event_bus.next() => match event {
                    Some(event) => {
                        if !self.handle_event(event) {
                            break;
                        }
                    }
                    None => break,
                },

                changed = snapshot_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    self.state.providers = snapshot_rx.borrow_and_update().clone();
                }

                changed = self.preferences_rx.changed() => {
                    if changed.is_ok() {
                        let prefs = self.preferences_rx.borrow_and_update().clone();
                        self.state.set_preferences(prefs);
                    }
                }

                status = next_value(&mut weather_rx) => match status {
                    Some(status) => self.state.weather = status,
                    None => weather_rx = None,
                },

                state = next_value(&mut tiling_rx) => match state {
                    Some(state) => {
                        info!("Auto-tiling connection {}", state);
                        self.state.tiling = Some(state);
                    }
                    None => tiling_rx = None,
                },

                size = next_value(&mut tiling_size_rx) => match size {
                    Some(size) => self.state.tiling_size = size,
                    None => tiling_size_rx = None,
                },

                _ = sleep_until_some(volume_deadline), if volume_deadline.is_some() => {
                    self.flush_volume();
                }

                _ = clock.tick() => {}
            }

            self.emit().await?;
        }

        info!("Bar loop finished");
        Ok(())
    }

    /// Drop the preference listener and stop every service
    pub async fn shutdown(self) {
        self.services.preferences.unsubscribe(self.subscription);
        self.services.shutdown().await;
    }
}

/// Next value of an optional watch channel; pending forever when absent,
/// `None` once the sender is gone
async fn next_value<T: Clone>(rx: &mut Option<watch::Receiver<T>>) -> Option<T> {
    match rx {
        Some(rx) => match rx.changed().await {
            Ok(()) => Some(rx.borrow_and_update().clone()),
            Err(_) => None,
        },
        None => std::future::pending().await,
    }
}

async fn sleep_until_some(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Forward agent commands as JSON lines to `path`, or log them when no path
/// is configured
pub fn spawn_agent_writer(
    mut commands: mpsc::UnboundedReceiver<ProviderCommand>,
    path: Option<PathBuf>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let Some(path) = path else {
            while let Some(command) = commands.recv().await {
                info!("No agent command path configured, dropping {:?}", command);
            }
            return;
        };

        let mut file = match tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) => {
                warn!("Failed to open agent command path {:?}: {}", path, e);
                return;
            }
        };
        info!("Forwarding agent commands to {:?}", path);

        while let Some(command) = commands.recv().await {
            let mut line = match serde_json::to_string(&command) {
                Ok(line) => line,
                Err(e) => {
                    warn!("Failed to encode {:?}: {}", command, e);
                    continue;
                }
            };
            line.push('\n');
            if let Err(e) = file.write_all(line.as_bytes()).await {
                warn!("Failed to write agent command: {}", e);
                break;
            }
            let _ = file.flush().await;
        }
    })
}
