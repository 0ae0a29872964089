//! Host resource snapshots via sysinfo
//!
//! Best-effort collaborator for the health report: CPU, memory and
//! disk usage of the process host. Collection problems degrade to an
//! all-zero snapshot, which never breaches a health threshold.

use parking_lot::Mutex;
use serde::Serialize;
use sysinfo::{Disks, System};

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Point-in-time host resource usage
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SystemStats {
    /// Global CPU usage, 0-100
    pub cpu_percent: f32,
    /// Used physical memory, 0-100
    pub memory_percent: f32,
    /// Free-for-allocation memory in GiB
    pub memory_available_gb: f64,
    /// Used disk space across mounted disks, 0-100
    pub disk_percent: f32,
    /// Free disk space across mounted disks in GiB
    pub disk_free_gb: f64,
}

/// Snapshot source wrapping a `sysinfo::System`
///
/// CPU usage is computed between consecutive refreshes, so the first
/// snapshot after construction may read 0 for it.
pub struct SystemMonitor {
    system: Mutex<System>,
}

impl SystemMonitor {
    /// Create a monitor with an initial full refresh
    pub fn new() -> Self {
        let mut system = System::new_all();
        system.refresh_all();
        Self {
            system: Mutex::new(system),
        }
    }

    /// Refresh CPU and memory readings and take a snapshot
    pub fn snapshot(&self) -> SystemStats {
        let (cpu_percent, memory_percent, memory_available_gb) = {
            let mut system = self.system.lock();
            system.refresh_cpu_usage();
            system.refresh_memory();

            let total = system.total_memory();
            let memory_percent = if total > 0 {
                (system.used_memory() as f64 / total as f64 * 100.0) as f32
            } else {
                0.0
            };

            (
                system.global_cpu_usage(),
                memory_percent,
                system.available_memory() as f64 / BYTES_PER_GB,
            )
        };

        let (disk_percent, disk_free_gb) = disk_usage();

        SystemStats {
            cpu_percent,
            memory_percent,
            memory_available_gb,
            disk_percent,
            disk_free_gb,
        }
    }
}

impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregate used-space percentage and free space over all disks
fn disk_usage() -> (f32, f64) {
    let disks = Disks::new_with_refreshed_list();

    let mut total: u64 = 0;
    let mut available: u64 = 0;
    for disk in disks.list() {
        total += disk.total_space();
        available += disk.available_space();
    }

    if total == 0 {
        return (0.0, 0.0);
    }

    let used = total - available;
    (
        (used as f64 / total as f64 * 100.0) as f32,
        available as f64 / BYTES_PER_GB,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stats_are_zero() {
        let stats = SystemStats::default();
        assert_eq!(stats.cpu_percent, 0.0);
        assert_eq!(stats.memory_percent, 0.0);
        assert_eq!(stats.disk_percent, 0.0);
    }

    #[test]
    fn test_snapshot_within_bounds() {
        let monitor = SystemMonitor::new();
        let stats = monitor.snapshot();

        assert!((0.0..=100.0).contains(&stats.memory_percent));
        assert!((0.0..=100.0).contains(&stats.disk_percent));
        assert!(stats.cpu_percent >= 0.0);
        assert!(stats.memory_available_gb >= 0.0);
        assert!(stats.disk_free_gb >= 0.0);
    }

    #[test]
    fn test_stats_serialize() {
        let stats = SystemStats::default();
        let json = serde_json::to_value(&stats).unwrap();
        assert!(json.get("cpu_percent").is_some());
        assert!(json.get("memory_percent").is_some());
        assert!(json.get("disk_free_gb").is_some());
    }
}
