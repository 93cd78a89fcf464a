use super::{AudioState, CpuStats, MemoryStats, ProviderSnapshot, SystemTray, WindowManagerState};
use log::{debug, info};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Publishing ends of the provider channels
#[derive(Debug)]
pub struct ProviderSources {
    pub window_manager: watch::Sender<Option<WindowManagerState>>,
    pub cpu: watch::Sender<Option<CpuStats>>,
    pub memory: watch::Sender<Option<MemoryStats>>,
    pub audio: watch::Sender<Option<AudioState>>,
    pub system_tray: watch::Sender<Option<SystemTray>>,
}

/// Receiving ends consumed by [`ProviderAggregator`]
#[derive(Debug, Clone)]
pub struct ProviderFeeds {
    pub window_manager: watch::Receiver<Option<WindowManagerState>>,
    pub cpu: watch::Receiver<Option<CpuStats>>,
    pub memory: watch::Receiver<Option<MemoryStats>>,
    pub audio: watch::Receiver<Option<AudioState>>,
    pub system_tray: watch::Receiver<Option<SystemTray>>,
}

pub fn provider_channels() -> (ProviderSources, ProviderFeeds) {
    let (window_manager_tx, window_manager_rx) = watch::channel(None);
    let (cpu_tx, cpu_rx) = watch::channel(None);
    let (memory_tx, memory_rx) = watch::channel(None);
    let (audio_tx, audio_rx) = watch::channel(None);
    let (tray_tx, tray_rx) = watch::channel(None);
    (
        ProviderSources {
            window_manager: window_manager_tx,
            cpu: cpu_tx,
            memory: memory_tx,
            audio: audio_tx,
            system_tray: tray_tx,
        },
        ProviderFeeds {
            window_manager: window_manager_rx,
            cpu: cpu_rx,
            memory: memory_rx,
            audio: audio_rx,
            system_tray: tray_rx,
        },
    )
}

impl ProviderFeeds {
    fn snapshot(&self) -> ProviderSnapshot {
        ProviderSnapshot {
            window_manager: self.window_manager.borrow().clone(),
            cpu: *self.cpu.borrow(),
            memory: *self.memory.borrow(),
            audio: self.audio.borrow().clone(),
            system_tray: self.system_tray.borrow().clone(),
        }
    }
}

/// Rebuilds the snapshot whenever any provider emits
pub struct ProviderAggregator {
    snapshot: watch::Receiver<ProviderSnapshot>,
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl ProviderAggregator {
    pub fn spawn(feeds: ProviderFeeds) -> Self {
        let (tx, snapshot) = watch::channel(feeds.snapshot());
        let token = CancellationToken::new();
        let task = tokio::spawn(run(feeds, tx, token.clone()));
        Self {
            snapshot,
            token,
            task: Some(task),
        }
    }

    pub fn snapshot(&self) -> ProviderSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ProviderSnapshot> {
        self.snapshot.clone()
    }

    pub async fn stop(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for ProviderAggregator {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

async fn run(
    mut feeds: ProviderFeeds,
    tx: watch::Sender<ProviderSnapshot>,
    token: CancellationToken,
) {
    // A provider whose sender is gone keeps its last value
    let mut open = [true; 5];

    while open.iter().any(|o| *o) {
        let source = tokio::select! {
            _ = token.cancelled() => break,
            r = feeds.window_manager.changed(), if open[0] => (0, r),
            r = feeds.cpu.changed(), if open[1] => (1, r),
            r = feeds.memory.changed(), if open[2] => (2, r),
            r = feeds.audio.changed(), if open[3] => (3, r),
            r = feeds.system_tray.changed(), if open[4] => (4, r),
        };

        match source {
            (i, Ok(())) => {
                debug!("Provider {} emitted", i);
                tx.send_replace(feeds.snapshot());
            }
            (i, Err(_)) => {
                debug!("Provider {} closed", i);
                open[i] = false;
            }
        }
    }
    info!("Provider aggregator stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{AudioDevice, Workspace};
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn fields_stay_empty_until_their_provider_emits() {
        let (sources, feeds) = provider_channels();
        let aggregator = ProviderAggregator::spawn(feeds);
        let mut rx = aggregator.subscribe();
        assert_eq!(aggregator.snapshot(), ProviderSnapshot::default());

        sources.cpu.send_replace(Some(CpuStats { usage: 12.5 }));
        let snapshot = timeout(Duration::from_secs(1), rx.wait_for(|s| s.cpu.is_some()))
            .await
            .unwrap()
            .unwrap()
            .clone();
        assert_eq!(snapshot.cpu.map(|c| c.usage), Some(12.5));
        assert!(snapshot.memory.is_none());
        assert!(snapshot.window_manager.is_none());

        sources.window_manager.send_replace(Some(WindowManagerState {
            workspaces: vec![Workspace {
                name: "1".into(),
                display_name: None,
                has_focus: true,
                is_displayed: true,
            }],
            ..Default::default()
        }));
        sources.audio.send_replace(Some(AudioState {
            default_playback_device: Some(AudioDevice {
                name: "Speakers".into(),
                volume: 40.0,
                is_muted: false,
            }),
        }));

        let snapshot = timeout(
            Duration::from_secs(1),
            rx.wait_for(|s| s.window_manager.is_some() && s.audio.is_some()),
        )
        .await
        .unwrap()
        .unwrap()
        .clone();
        assert_eq!(snapshot.focused_workspace().unwrap().name, "1");
        assert_eq!(snapshot.cpu.map(|c| c.usage), Some(12.5));

        aggregator.stop().await;
    }

    #[tokio::test]
    async fn closed_provider_keeps_last_value() {
        let (sources, feeds) = provider_channels();
        let aggregator = ProviderAggregator::spawn(feeds);
        let mut rx = aggregator.subscribe();

        sources.memory.send_replace(Some(MemoryStats {
            usage: 50.0,
            total: 16,
            used: 8,
        }));
        let ProviderSources { cpu, memory, .. } = sources;
        drop(memory);
        cpu.send_replace(Some(CpuStats { usage: 3.0 }));

        let snapshot = timeout(
            Duration::from_secs(1),
            rx.wait_for(|s| s.cpu.is_some() && s.memory.is_some()),
        )
        .await
        .unwrap()
        .unwrap()
        .clone();
        assert_eq!(snapshot.memory.map(|m| m.used), Some(8));
    }
}
