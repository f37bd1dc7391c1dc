//! Statistics for batch conversions

use crate::conversion::engine::ConversionMetadata;
use serde::Serialize;

/// Aggregate statistics over a batch of conversions
#[derive(Debug, Clone, Serialize)]
pub struct BatchStatistics {
    /// Total input size in bytes
    pub input_size_bytes: u64,
    /// Total output size in bytes
    pub output_size_bytes: u64,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
    /// Files converted successfully
    pub converted: usize,
    /// Files that failed to convert
    pub failed: usize,
    /// Average time per conversion
    pub avg_time_per_operation_ms: f32,
    /// Throughput (bytes processed per second)
    pub throughput_bytes_per_sec: f32,
    /// Timestamp of when statistics were collected
    pub collected_at: chrono::DateTime<chrono::Utc>,
}

impl Default for BatchStatistics {
    fn default() -> Self {
        Self {
            input_size_bytes: 0,
            output_size_bytes: 0,
            processing_time_ms: 0,
            converted: 0,
            failed: 0,
            avg_time_per_operation_ms: 0.0,
            throughput_bytes_per_sec: 0.0,
            collected_at: chrono::Utc::now(),
        }
    }
}

impl BatchStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one successful conversion
    pub fn record(&mut self, metadata: &ConversionMetadata) {
        self.input_size_bytes += metadata.input_size;
        self.output_size_bytes += metadata.output_size;
        self.processing_time_ms += metadata.processing_time_ms;
        self.converted += 1;
        self.recalculate();
    }

    /// Record one failed conversion
    pub fn record_failure(&mut self) {
        self.failed += 1;
        self.collected_at = chrono::Utc::now();
    }

    fn recalculate(&mut self) {
        self.avg_time_per_operation_ms = if self.converted > 0 {
            self.processing_time_ms as f32 / self.converted as f32
        } else {
            0.0
        };

        self.throughput_bytes_per_sec = if self.processing_time_ms > 0 {
            self.input_size_bytes as f32 / (self.processing_time_ms as f32 / 1000.0)
        } else {
            0.0
        };

        self.collected_at = chrono::Utc::now();
    }

    pub fn total(&self) -> usize {
        self.converted + self.failed
    }

    /// Output size relative to input, as a percentage
    pub fn size_ratio_percent(&self) -> f32 {
        if self.input_size_bytes == 0 {
            0.0
        } else {
            self.output_size_bytes as f32 / self.input_size_bytes as f32 * 100.0
        }
    }

    /// Get a formatted summary
    pub fn summary(&self) -> String {
        format!(
            "Converted {} of {} files in {:.1}s - {} bytes in, {} bytes out ({:.1}%)",
            self.converted,
            self.total(),
            self.processing_time_ms as f32 / 1000.0,
            self.input_size_bytes,
            self.output_size_bytes,
            self.size_ratio_percent()
        )
    }

    /// Export to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
