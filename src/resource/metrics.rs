//! Sample monitoring series for the detail page.
//!
//! The values are fixed; nothing is collected from the resource.

use crate::lifecycle::{Category, Status};

const TIMES: [&str; 6] = ["10:00", "10:05", "10:10", "10:15", "10:20", "10:25"];
const CPU: [u64; 6] = [20, 25, 22, 30, 28, 35];
const MEMORY: [u64; 6] = [40, 42, 38, 45, 43, 50];
// Tenths of MB/s
const RECEIVED: [u64; 6] = [12, 15, 11, 18, 16, 20];
const SENT: [u64; 6] = [5, 7, 4, 9, 8, 10];

/// One percentage series
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageSeries {
    pub label: &'static str,
    pub values: Vec<u64>,
}

impl UsageSeries {
    pub fn latest(&self) -> u64 {
        self.values.last().copied().unwrap_or(0)
    }

    pub fn peak(&self) -> u64 {
        self.values.iter().copied().max().unwrap_or(0)
    }
}

/// Network throughput at one sample time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkPoint {
    pub time: &'static str,
    /// Tenths of MB/s
    pub received: u64,
    pub sent: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metrics {
    pub cpu: UsageSeries,
    pub memory: UsageSeries,
    pub network: Vec<NetworkPoint>,
}

impl Metrics {
    pub fn sample() -> Self {
        Self {
            cpu: UsageSeries {
                label: "CPU Usage (%)",
                values: CPU.to_vec(),
            },
            memory: UsageSeries {
                label: "Memory Usage (%)",
                values: MEMORY.to_vec(),
            },
            network: TIMES
                .iter()
                .zip(RECEIVED.iter().zip(SENT.iter()))
                .map(|(time, (received, sent))| NetworkPoint {
                    time: *time,
                    received: *received,
                    sent: *sent,
                })
                .collect(),
        }
    }

    /// Metrics exist only while the resource is up
    pub fn for_status(status: &Status) -> Option<Self> {
        (status.category() == Category::Healthy).then(Self::sample)
    }

    pub fn time_range(&self) -> String {
        match (self.network.first(), self.network.last()) {
            (Some(first), Some(last)) => format!("{} - {}", first.time, last.time),
            _ => String::new(),
        }
    }
}

/// Render tenths of MB/s as `1.5`
pub fn format_rate(tenths: u64) -> String {
    format!("{}.{}", tenths / 10, tenths % 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_series() {
        let metrics = Metrics::sample();
        assert_eq!(metrics.cpu.latest(), 35);
        assert_eq!(metrics.memory.peak(), 50);
        assert_eq!(metrics.network.len(), 6);
        assert_eq!(metrics.network[3].received, 18);
        assert_eq!(metrics.time_range(), "10:00 - 10:25");
    }

    #[test]
    fn test_metrics_only_for_running_resources() {
        assert!(Metrics::for_status(&Status::Running).is_some());
        assert!(Metrics::for_status(&Status::Stopped).is_none());
        assert!(Metrics::for_status(&Status::Provisioning).is_none());
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(12), "1.2");
        assert_eq!(format_rate(5), "0.5");
        assert_eq!(format_rate(20), "2.0");
    }
}
