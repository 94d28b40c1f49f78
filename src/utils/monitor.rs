#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, RefreshKind, System};

#[cfg(feature = "cli")]
#[derive(Debug, Clone)]
pub struct ResourceSample {
    pub cpu_usage: f32,
    pub memory_mb: u64,
    pub peak_memory_mb: u64,
    pub elapsed: Duration,
}

/// 長時間 brute 測試時追蹤資源使用狀況
#[cfg(feature = "cli")]
pub struct SystemMonitor {
    system: Mutex<System>,
    pid: Option<Pid>,
    started: Instant,
    peak_memory: Mutex<u64>,
    enabled: bool,
}

#[cfg(feature = "cli")]
impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        let mut system = System::new_with_specifics(RefreshKind::everything());
        system.refresh_all();

        Self {
            system: Mutex::new(system),
            pid: sysinfo::get_current_pid().ok(),
            started: Instant::now(),
            peak_memory: Mutex::new(0),
            enabled,
        }
    }

    pub fn sample(&self) -> Option<ResourceSample> {
        if !self.enabled {
            return None;
        }

        let mut system = self.system.lock().ok()?;
        system.refresh_all();

        let process = system.process(self.pid?)?;
        let memory_mb = process.memory() / 1024 / 1024;

        let mut peak = self.peak_memory.lock().ok()?;
        if memory_mb > *peak {
            *peak = memory_mb;
        }

        Some(ResourceSample {
            cpu_usage: process.cpu_usage(),
            memory_mb,
            peak_memory_mb: *peak,
            elapsed: self.started.elapsed(),
        })
    }

    /// 定期輸出進度與資源統計
    pub fn log_progress(&self, executed: usize) {
        if let Some(sample) = self.sample() {
            let rate = if sample.elapsed.as_secs_f64() > 0.0 {
                executed as f64 / sample.elapsed.as_secs_f64()
            } else {
                0.0
            };
            tracing::info!(
                "📊 {} tasks executed ({:.1}/s) - CPU: {:.1}%, Memory: {}MB, Peak: {}MB",
                executed,
                rate,
                sample.cpu_usage,
                sample.memory_mb,
                sample.peak_memory_mb
            );
        }
    }

    pub fn log_final_stats(&self) {
        if let Some(sample) = self.sample() {
            tracing::info!(
                "📊 Final Stats - Total Time: {:?}, Peak Memory: {}MB",
                sample.elapsed,
                sample.peak_memory_mb
            );
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(feature = "cli")]
impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

// 非 CLI 環境的空實現
#[cfg(not(feature = "cli"))]
#[derive(Default)]
pub struct SystemMonitor;

#[cfg(not(feature = "cli"))]
impl SystemMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn log_progress(&self, _executed: usize) {}

    pub fn log_final_stats(&self) {}

    pub fn is_enabled(&self) -> bool {
        false
    }
}
