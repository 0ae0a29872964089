//! Request latency monitoring and health verdicts
//!
//! Records per-call duration and outcome from request handlers.
//! Aggregates over the most recent 1000 samples and produces the
//! health report served by the /api/performance endpoint.

use crate::system::SystemStats;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Number of samples retained for rolling aggregates
const MAX_SAMPLES: usize = 1000;

/// Average latency threshold for the health verdict
const MAX_AVG_LATENCY: Duration = Duration::from_secs(2);

/// Error rate threshold (fraction of total calls)
const MAX_ERROR_RATE: f64 = 0.05;

/// CPU usage threshold (percent)
const MAX_CPU_PERCENT: f32 = 80.0;

/// Memory usage threshold (percent)
const MAX_MEMORY_PERCENT: f32 = 85.0;

/// Mutable monitor state, guarded by a single lock
struct MonitorState {
    /// Most recent call durations, oldest first
    samples: VecDeque<Duration>,
    /// Rolling sum of `samples` for O(1) average
    sample_sum: Duration,
    /// All calls ever recorded, including evicted ones
    total_calls: u64,
    /// Calls recorded with succeeded == false
    error_count: u64,
}

/// Performance monitor shared across request handlers
///
/// One instance per process, created at startup and passed by `Arc`
/// into the request-handling layer. Every operation is a short
/// critical section; `record_call` is O(1) push-and-possibly-pop.
pub struct PerformanceMonitor {
    state: Mutex<MonitorState>,
    started_at: Instant,
}

impl PerformanceMonitor {
    /// Create a new monitor with empty history
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MonitorState {
                samples: VecDeque::with_capacity(MAX_SAMPLES),
                sample_sum: Duration::ZERO,
                total_calls: 0,
                error_count: 0,
            }),
            started_at: Instant::now(),
        }
    }

    /// Record a completed call
    ///
    /// Appends `duration` to the sample window, evicting the oldest
    /// sample once 1000 are held. Failed calls count toward the error
    /// rate but are sampled like any other.
    pub fn record_call(&self, duration: Duration, succeeded: bool) {
        let mut state = self.state.lock();

        if state.samples.len() == MAX_SAMPLES {
            if let Some(oldest) = state.samples.pop_front() {
                state.sample_sum = state.sample_sum.saturating_sub(oldest);
            }
        }
        state.samples.push_back(duration);
        state.sample_sum += duration;
        state.total_calls += 1;
        if !succeeded {
            state.error_count += 1;
        }
    }

    /// Start timing a call; finish the returned timer to record it
    pub fn start_call(&self) -> CallTimer<'_> {
        CallTimer {
            monitor: self,
            started: Instant::now(),
        }
    }

    /// Arithmetic mean over the current sample window
    ///
    /// Returns zero when no calls have been recorded yet.
    pub fn average_latency(&self) -> Duration {
        let state = self.state.lock();
        if state.samples.is_empty() {
            return Duration::ZERO;
        }
        state.sample_sum / state.samples.len() as u32
    }

    /// Fraction of recorded calls that failed, in [0, 1]
    ///
    /// Returns 0.0 before the first call.
    pub fn error_rate(&self) -> f64 {
        let state = self.state.lock();
        if state.total_calls == 0 {
            return 0.0;
        }
        state.error_count as f64 / state.total_calls as f64
    }

    /// Total calls recorded since construction (or last clear)
    pub fn total_calls(&self) -> u64 {
        self.state.lock().total_calls
    }

    /// Number of samples currently in the rolling window
    pub fn sample_count(&self) -> usize {
        self.state.lock().samples.len()
    }

    /// Time since the monitor was constructed
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Evaluate health thresholds against current aggregates
    ///
    /// Four independent checks, reported in fixed order: average
    /// latency, error rate, CPU, memory. The system snapshot comes
    /// from the caller; an all-zero snapshot (collection unavailable)
    /// never breaches the CPU or memory thresholds.
    pub fn health_report(&self, system: SystemStats) -> HealthReport {
        let (avg, error_rate, total_calls) = {
            let state = self.state.lock();
            let avg = if state.samples.is_empty() {
                Duration::ZERO
            } else {
                state.sample_sum / state.samples.len() as u32
            };
            let rate = if state.total_calls == 0 {
                0.0
            } else {
                state.error_count as f64 / state.total_calls as f64
            };
            (avg, rate, state.total_calls)
        };

        let mut issues = Vec::new();

        if avg > MAX_AVG_LATENCY {
            issues.push(format!("High response time: {:.2}s", avg.as_secs_f64()));
        }
        if error_rate > MAX_ERROR_RATE {
            issues.push(format!("High error rate: {:.2}%", error_rate * 100.0));
        }
        if system.cpu_percent > MAX_CPU_PERCENT {
            issues.push(format!("High CPU usage: {:.1}%", system.cpu_percent));
        }
        if system.memory_percent > MAX_MEMORY_PERCENT {
            issues.push(format!("High memory usage: {:.1}%", system.memory_percent));
        }

        let healthy = issues.is_empty();
        if !healthy {
            tracing::warn!("Performance degraded: {}", issues.join("; "));
        }

        HealthReport {
            healthy,
            issues,
            metrics: HealthMetrics {
                avg_response_time: avg.as_secs_f64(),
                error_rate,
                uptime: self.started_at.elapsed().as_secs_f64(),
                total_requests: total_calls,
                system,
            },
        }
    }

    /// Reset samples and counters; `started_at` is preserved
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.samples.clear();
        state.sample_sum = Duration::ZERO;
        state.total_calls = 0;
        state.error_count = 0;
    }
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new()
    }
}

/// In-flight call measurement
///
/// Created by [`PerformanceMonitor::start_call`]. Dropping the timer
/// without calling `finish` records nothing.
pub struct CallTimer<'a> {
    monitor: &'a PerformanceMonitor,
    started: Instant,
}

impl CallTimer<'_> {
    /// Record the elapsed time and consume the timer
    pub fn finish(self, succeeded: bool) {
        self.monitor.record_call(self.started.elapsed(), succeeded);
    }
}

/// Health verdict with per-breach messages and current aggregates
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub healthy: bool,
    pub issues: Vec<String>,
    pub metrics: HealthMetrics,
}

/// Aggregate metrics embedded in the health report
#[derive(Debug, Clone, Serialize)]
pub struct HealthMetrics {
    /// Mean latency over the sample window, in seconds
    pub avg_response_time: f64,
    /// Errors / total calls, in [0, 1]
    pub error_rate: f64,
    /// Seconds since monitor construction
    pub uptime: f64,
    /// All calls recorded, including samples already evicted
    pub total_requests: u64,
    /// Host resource snapshot
    pub system: SystemStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_monitor() {
        let monitor = PerformanceMonitor::new();
        assert_eq!(monitor.average_latency(), Duration::ZERO);
        assert_eq!(monitor.error_rate(), 0.0);
        assert_eq!(monitor.total_calls(), 0);
    }

    #[test]
    fn test_average_latency() {
        let monitor = PerformanceMonitor::new();
        monitor.record_call(Duration::from_millis(100), true);
        monitor.record_call(Duration::from_millis(300), true);

        assert_eq!(monitor.average_latency(), Duration::from_millis(200));
    }

    #[test]
    fn test_error_rate_arithmetic() {
        let monitor = PerformanceMonitor::new();
        for _ in 0..10 {
            monitor.record_call(Duration::from_millis(10), true);
        }
        for _ in 0..2 {
            monitor.record_call(Duration::from_millis(10), false);
        }

        assert_eq!(monitor.error_rate(), 2.0 / 12.0);
        assert_eq!(monitor.total_calls(), 12);
    }

    #[test]
    fn test_sample_window_bounded() {
        let monitor = PerformanceMonitor::new();
        for _ in 0..1100 {
            monitor.record_call(Duration::from_millis(1), true);
        }

        assert_eq!(monitor.sample_count(), 1000);
        // Counters keep counting past the window
        assert_eq!(monitor.total_calls(), 1100);
    }

    #[test]
    fn test_eviction_updates_average() {
        let monitor = PerformanceMonitor::new();
        // Fill the window with slow calls, then push them all out
        for _ in 0..1000 {
            monitor.record_call(Duration::from_secs(5), true);
        }
        for _ in 0..1000 {
            monitor.record_call(Duration::from_millis(10), true);
        }

        assert_eq!(monitor.average_latency(), Duration::from_millis(10));
    }

    #[test]
    fn test_healthy_report() {
        let monitor = PerformanceMonitor::new();
        monitor.record_call(Duration::from_millis(50), true);

        let report = monitor.health_report(SystemStats::default());
        assert!(report.healthy);
        assert!(report.issues.is_empty());
        assert_eq!(report.metrics.total_requests, 1);
    }

    #[test]
    fn test_latency_threshold_breach() {
        let monitor = PerformanceMonitor::new();
        monitor.record_call(Duration::from_secs(3), true);

        let report = monitor.health_report(SystemStats::default());
        assert!(!report.healthy);
        assert_eq!(report.issues.len(), 1);
        assert!(report.issues[0].contains("High response time"));
    }

    #[test]
    fn test_issue_ordering() {
        let monitor = PerformanceMonitor::new();
        // Breach latency and error rate together with failing slow calls
        for _ in 0..10 {
            monitor.record_call(Duration::from_secs(3), false);
        }

        let system = SystemStats {
            cpu_percent: 95.0,
            memory_percent: 90.0,
            ..SystemStats::default()
        };
        let report = monitor.health_report(system);

        assert!(!report.healthy);
        assert_eq!(report.issues.len(), 4);
        assert!(report.issues[0].contains("response time"));
        assert!(report.issues[1].contains("error rate"));
        assert!(report.issues[2].contains("CPU"));
        assert!(report.issues[3].contains("memory"));
    }

    #[test]
    fn test_zero_system_stats_never_breach() {
        let monitor = PerformanceMonitor::new();
        let report = monitor.health_report(SystemStats::default());
        assert!(report.healthy);
    }

    #[test]
    fn test_call_timer() {
        let monitor = PerformanceMonitor::new();
        let timer = monitor.start_call();
        timer.finish(false);

        assert_eq!(monitor.total_calls(), 1);
        assert_eq!(monitor.error_rate(), 1.0);
    }

    #[test]
    fn test_clear() {
        let monitor = PerformanceMonitor::new();
        monitor.record_call(Duration::from_millis(100), false);
        monitor.clear();

        assert_eq!(monitor.total_calls(), 0);
        assert_eq!(monitor.sample_count(), 0);
        assert_eq!(monitor.average_latency(), Duration::ZERO);
    }

    #[test]
    fn test_concurrent_recording() {
        use std::sync::Arc;
        use std::thread;

        let monitor = Arc::new(PerformanceMonitor::new());

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let monitor = Arc::clone(&monitor);
                thread::spawn(move || {
                    for _ in 0..200 {
                        monitor.record_call(Duration::from_millis(1), i % 2 == 0);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(monitor.total_calls(), 2000);
        assert_eq!(monitor.sample_count(), 1000);
        assert_eq!(monitor.error_rate(), 0.5);
    }
}
