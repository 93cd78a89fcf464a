//! Local CPU and memory provider backed by sysinfo

use super::{CpuStats, MemoryStats};
use log::{debug, info};
use std::collections::VecDeque;
use std::time::Duration;
use sysinfo::System;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Rolling average over the last `capacity` samples
#[derive(Debug, Clone)]
pub struct RollingAverage {
    values: VecDeque<f64>,
    capacity: usize,
    sum: f64,
}

impl RollingAverage {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
            sum: 0.0,
        }
    }

    pub fn add(&mut self, value: f64) {
        if self.values.len() >= self.capacity {
            if let Some(old) = self.values.pop_front() {
                self.sum -= old;
            }
        }
        self.values.push_back(value);
        self.sum += value;
    }

    pub fn average(&self) -> f64 {
        if self.values.is_empty() {
            0.0
        } else {
            self.sum / self.values.len() as f64
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Samples CPU and memory usage, smoothing CPU over a short window
#[derive(Debug)]
pub struct SystemMonitor {
    system: System,
    cpu_history: RollingAverage,
}

impl SystemMonitor {
    pub fn new(smoothing: usize) -> Self {
        let mut system = System::new();
        // the first CPU reading needs a baseline
        system.refresh_cpu_usage();
        system.refresh_memory();
        Self {
            system,
            cpu_history: RollingAverage::new(smoothing),
        }
    }

    pub fn sample(&mut self) -> (CpuStats, MemoryStats) {
        self.system.refresh_cpu_usage();
        self.system.refresh_memory();

        let cpus = self.system.cpus();
        let cpu_now = if cpus.is_empty() {
            0.0
        } else {
            cpus.iter().map(|c| c.cpu_usage()).sum::<f32>() / cpus.len() as f32
        };
        self.cpu_history.add(cpu_now as f64);

        let total = self.system.total_memory();
        let used = total.saturating_sub(self.system.available_memory());

        (
            CpuStats {
                usage: self.cpu_history.average() as f32,
            },
            MemoryStats {
                usage: memory_percent(used, total),
                total,
                used,
            },
        )
    }
}

impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new(3)
    }
}

fn memory_percent(used: u64, total: u64) -> f32 {
    if total > 0 {
        (used as f32 / total as f32) * 100.0
    } else {
        0.0
    }
}

/// Publish samples every `interval` until `token` is cancelled
pub fn spawn_system_monitor(
    cpu: watch::Sender<Option<CpuStats>>,
    memory: watch::Sender<Option<MemoryStats>>,
    interval: Duration,
    token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut monitor = SystemMonitor::default();
        let mut ticker = tokio::time::interval(interval.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!("System monitor started, interval {:?}", interval);

        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => {
                    let (cpu_stats, memory_stats) = monitor.sample();
                    debug!(
                        "CPU {:.1}%, memory {:.1}%",
                        cpu_stats.usage, memory_stats.usage
                    );
                    cpu.send_replace(Some(cpu_stats));
                    memory.send_replace(Some(memory_stats));
                }
            }
        }
        info!("System monitor stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rolling_average_drops_old_samples() {
        let mut avg = RollingAverage::new(3);
        for v in [10.0, 20.0, 30.0, 40.0] {
            avg.add(v);
        }
        assert_eq!(avg.len(), 3);
        assert!((avg.average() - 30.0).abs() < f64::EPSILON);
        assert!(RollingAverage::new(0).is_empty());
    }

    #[test]
    fn memory_percent_handles_zero_total() {
        assert_eq!(memory_percent(0, 0), 0.0);
        assert!((memory_percent(4, 16) - 25.0).abs() < f32::EPSILON);
    }

    #[test]
    fn sample_reports_plausible_values() {
        let mut monitor = SystemMonitor::new(1);
        let (cpu, memory) = monitor.sample();
        assert!((0.0..=100.0).contains(&cpu.usage));
        assert!(memory.used <= memory.total);
    }

    #[tokio::test]
    async fn monitor_task_publishes_and_stops() {
        let (cpu_tx, mut cpu_rx) = watch::channel(None);
        let (memory_tx, memory_rx) = watch::channel(None);
        let token = CancellationToken::new();

        let task = spawn_system_monitor(
            cpu_tx,
            memory_tx,
            Duration::from_millis(250),
            token.clone(),
        );
        cpu_rx.wait_for(|c| c.is_some()).await.unwrap();
        assert!(memory_rx.borrow().is_some());

        token.cancel();
        task.await.unwrap();
    }
}
