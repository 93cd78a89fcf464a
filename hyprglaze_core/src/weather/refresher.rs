use super::{WeatherService, WeatherSnapshot};
use chrono::{DateTime, Local};
use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// What the weather widget shows
#[derive(Debug, Clone, Default)]
pub struct WeatherStatus {
    pub state: FetchState,
    /// Last successful snapshot, kept while later fetches fail
    pub data: Option<WeatherSnapshot>,
    pub error: Option<String>,
    pub last_updated: Option<DateTime<Local>>,
}

/// Periodic weather fetches published on a watch channel
pub struct WeatherRefresher {
    service: Arc<WeatherService>,
    status: watch::Receiver<WeatherStatus>,
    refresh: Arc<Notify>,
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl WeatherRefresher {
    /// Fetch immediately, then every `interval`
    pub fn spawn(service: Arc<WeatherService>, interval: Duration) -> Self {
        let (tx, status) = watch::channel(WeatherStatus::default());
        let refresh = Arc::new(Notify::new());
        let token = CancellationToken::new();

        let task = tokio::spawn(run(
            service.clone(),
            interval.max(Duration::from_secs(1)),
            tx,
            refresh.clone(),
            token.clone(),
        ));
        info!("Weather refresher started, interval {:?}", interval);

        Self {
            service,
            status,
            refresh,
            token,
            task: Some(task),
        }
    }

    pub fn status(&self) -> WeatherStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<WeatherStatus> {
        self.status.clone()
    }

    /// Fetch now without waiting for the next tick
    pub fn refresh(&self) {
        self.refresh.notify_one();
    }

    pub fn clear_cache(&self) {
        self.service.clear_cache();
    }

    /// Cancel the timer; a fetch still in flight finishes but is discarded
    pub async fn stop(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for WeatherRefresher {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

async fn run(
    service: Arc<WeatherService>,
    interval: Duration,
    tx: watch::Sender<WeatherStatus>,
    refresh: Arc<Notify>,
    token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
            _ = refresh.notified() => {
                debug!("Manual weather refresh");
                ticker.reset();
            }
        }

        tx.send_modify(|status| {
            status.state = FetchState::Loading;
            status.error = None;
        });

        // The request runs detached so cancellation only drops its result
        let fetch = {
            let service = service.clone();
            tokio::spawn(async move { service.current_weather().await })
        };

        let result = tokio::select! {
            _ = token.cancelled() => {
                debug!("Weather refresher stopped, discarding in-flight fetch");
                break;
            }
            joined = fetch => joined,
        };

        match result {
            Ok(Ok(snapshot)) => tx.send_modify(|status| {
                status.state = FetchState::Success;
                status.data = Some(snapshot);
                status.error = None;
                status.last_updated = Some(Local::now());
            }),
            Ok(Err(e)) => {
                let report = e.report(Some("weather"));
                report.log();
                tx.send_modify(|status| {
                    status.state = FetchState::Error;
                    status.error = Some(report.message);
                });
            }
            Err(e) => {
                let report = crate::error::ErrorReport::unknown(e.to_string(), Some("weather"));
                report.log();
                tx.send_modify(|status| {
                    status.state = FetchState::Error;
                    status.error = Some(report.message);
                });
            }
        }
    }
    info!("Weather refresher stopped");
}
