//! Rough download-time estimate from a size label

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;

use crate::core::config::EstimatorSettings;

static SIZE_LABEL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d+(?:\.\d+)?)\s*([A-Za-z]+)\s*$").expect("Failed to compile size label regex"));

/// Estimated transfer time at the nominal rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DownloadEstimate {
    /// Under a minute, rounded to whole seconds
    Seconds(u64),
    /// A minute or more
    Minutes(f64),
    /// Label did not parse as `<number><unit>`
    NotAvailable,
}

impl DownloadEstimate {
    pub fn is_available(&self) -> bool {
        !matches!(self, DownloadEstimate::NotAvailable)
    }
}

impl fmt::Display for DownloadEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadEstimate::Seconds(1) => write!(f, "1 second"),
            DownloadEstimate::Seconds(s) => write!(f, "{} seconds", s),
            DownloadEstimate::Minutes(m) => write!(f, "{:.1} minutes", m),
            DownloadEstimate::NotAvailable => write!(f, "N/A"),
        }
    }
}

/// Converts size labels such as `12.4 MB` into a time estimate
#[derive(Debug, Clone)]
pub struct SizeEstimator {
    /// Uppercased unit -> bytes
    units: HashMap<String, u64>,
    rate_bits_per_sec: f64,
}

impl SizeEstimator {
    pub fn new(settings: &EstimatorSettings) -> Self {
        let units = settings
            .units
            .iter()
            .map(|(unit, bytes)| (unit.to_ascii_uppercase(), *bytes))
            .collect();

        Self {
            units,
            rate_bits_per_sec: settings.rate_bits_per_sec,
        }
    }

    /// Size in bytes, or `None` if the label is not `<number><unit>` with a known unit.
    pub fn parse_bytes(&self, label: &str) -> Option<f64> {
        let caps = SIZE_LABEL_REGEX.captures(label)?;
        let value: f64 = caps[1].parse().ok()?;
        let multiplier = self.units.get(&caps[2].to_ascii_uppercase())?;
        Some(value * *multiplier as f64)
    }

    /// Transfer time in seconds at the nominal rate.
    pub fn seconds(&self, label: &str) -> Option<f64> {
        self.parse_bytes(label)
            .map(|bytes| bytes * 8.0 / self.rate_bits_per_sec)
    }

    pub fn estimate(&self, label: &str) -> DownloadEstimate {
        match self.seconds(label) {
            Some(secs) if secs.round() < 60.0 => DownloadEstimate::Seconds(secs.round() as u64),
            Some(secs) => DownloadEstimate::Minutes(secs / 60.0),
            None => DownloadEstimate::NotAvailable,
        }
    }
}

impl Default for SizeEstimator {
    fn default() -> Self {
        Self::new(&EstimatorSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_megabytes_under_a_minute() {
        let estimator = SizeEstimator::default();
        let expected = (12.4 * 1024.0 * 1024.0 * 8.0) / (10.0 * 1024.0 * 1024.0);

        let secs = estimator.seconds("12.4 MB").unwrap();
        assert!((secs - expected).abs() < 1e-9);
        assert_eq!(estimator.estimate("12.4 MB"), DownloadEstimate::Seconds(10));
        assert_eq!(estimator.estimate("12.4 MB").to_string(), "10 seconds");
    }

    #[test]
    fn test_gigabytes_in_minutes() {
        let estimator = SizeEstimator::default();
        // 1 GB = 8192 Mbit -> 819.2 s -> 13.65 min
        match estimator.estimate("1 GB") {
            DownloadEstimate::Minutes(m) => assert!((m - 819.2 / 60.0).abs() < 1e-9),
            other => panic!("expected minutes, got {:?}", other),
        }
        assert_eq!(estimator.estimate("1 GB").to_string(), "13.7 minutes");
    }

    #[test]
    fn test_exactly_sixty_seconds_is_minutes() {
        // 75 MB * 8 / 10 Mbit = 60 s
        assert_eq!(SizeEstimator::default().estimate("75MB").to_string(), "1.0 minutes");
    }

    #[test]
    fn test_just_under_a_minute_rounds_up_to_minutes() {
        let estimator = SizeEstimator::default();
        // 74.5 MB -> 59.6 s, which would round to "60 seconds"
        assert!(matches!(estimator.estimate("74.5 MB"), DownloadEstimate::Minutes(_)));
        assert_eq!(estimator.estimate("74.5 MB").to_string(), "1.0 minutes");
        // 74 MB -> 59.2 s
        assert_eq!(estimator.estimate("74 MB"), DownloadEstimate::Seconds(59));
    }

    #[test]
    fn test_unit_is_case_insensitive_and_spacing_optional() {
        let estimator = SizeEstimator::default();
        assert_eq!(estimator.parse_bytes("512kb"), Some(512.0 * 1024.0));
        assert_eq!(estimator.parse_bytes("3B"), Some(3.0));
    }

    #[test]
    fn test_garbage_is_not_available() {
        let estimator = SizeEstimator::default();
        assert_eq!(estimator.estimate("garbage"), DownloadEstimate::NotAvailable);
        assert_eq!(estimator.estimate("garbage").to_string(), "N/A");
        assert_eq!(estimator.estimate("12.4"), DownloadEstimate::NotAvailable);
        assert_eq!(estimator.estimate("12.4 TB"), DownloadEstimate::NotAvailable);
        assert_eq!(estimator.estimate("MB 12"), DownloadEstimate::NotAvailable);
        assert!(!estimator.estimate("").is_available());
    }

    #[test]
    fn test_custom_unit_table_and_rate() {
        let mut settings = EstimatorSettings::default();
        settings.units.insert("TB".to_string(), 1 << 40);
        settings.rate_bits_per_sec = 8.0;

        let estimator = SizeEstimator::new(&settings);
        assert_eq!(estimator.estimate("30 B"), DownloadEstimate::Seconds(30));
        assert!(estimator.parse_bytes("1 TB").is_some());
    }
}
