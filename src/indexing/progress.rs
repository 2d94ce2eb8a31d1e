//! Progress reporting for documentation runs

use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Statistics collected while parsing
#[derive(Debug, Default, Clone)]
pub struct GenerateStats {
    /// Number of files successfully parsed
    pub files_parsed: usize,

    /// Number of files that could not be read
    pub files_failed: usize,

    /// Total number of documentation blocks found, headers included
    pub blocks_found: usize,

    /// Number of warnings raised while parsing and sorting
    pub warnings: usize,

    pub elapsed: Duration,

    /// Errors encountered (limited to first N errors)
    pub errors: Vec<(PathBuf, String)>,

    start_time: Option<Instant>,
}

impl GenerateStats {
    /// Create new stats and start timing
    pub fn new() -> Self {
        Self {
            start_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    /// Stop timing and record elapsed time
    pub fn stop_timing(&mut self) {
        if let Some(start) = self.start_time {
            self.elapsed = start.elapsed();
            self.start_time = None;
        }
    }

    /// Add an error (limited to first 100 errors)
    pub fn add_error(&mut self, path: PathBuf, error: String) {
        if self.errors.len() < 100 {
            self.errors.push((path, error));
        }
        self.files_failed += 1;
    }

    /// Display the statistics in a human-readable format
    pub fn display(&self) {
        eprintln!("\nParsing Complete:");
        eprintln!("  Files parsed: {}", self.files_parsed);
        eprintln!("  Files failed: {}", self.files_failed);
        eprintln!("  Blocks found: {}", self.blocks_found);
        eprintln!("  Warnings: {}", self.warnings);
        eprintln!("  Time elapsed: {:.2}s", self.elapsed.as_secs_f64());

        if self.files_parsed > 0 && !self.elapsed.is_zero() {
            let files_per_sec = self.files_parsed as f64 / self.elapsed.as_secs_f64();
            eprintln!("  Performance: {files_per_sec:.0} files/second");
        }

        if !self.errors.is_empty() {
            eprintln!("\nErrors (showing first {}):", self.errors.len().min(5));
            for (path, error) in &self.errors[..5.min(self.errors.len())] {
                eprintln!("  {}: {}", path.display(), error);
            }
            if self.errors.len() > 5 {
                eprintln!("  ... and {} more errors", self.errors.len() - 5);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_display() {
        let mut stats = GenerateStats::new();
        stats.files_parsed = 12;
        stats.blocks_found = 40;
        stats.elapsed = Duration::from_millis(250);
        stats.add_error(PathBuf::from("broken.js"), "invalid UTF-8".into());

        // Should not panic
        stats.display();
    }

    #[test]
    fn test_error_limiting() {
        let mut stats = GenerateStats::new();
        for i in 0..150 {
            stats.add_error(PathBuf::from(format!("file{i}.js")), format!("Error {i}"));
        }
        assert_eq!(stats.errors.len(), 100);
        assert_eq!(stats.files_failed, 150);
    }

    #[test]
    fn test_stop_timing_once() {
        let mut stats = GenerateStats::new();
        stats.stop_timing();
        let first = stats.elapsed;
        std::thread::sleep(Duration::from_millis(2));
        stats.stop_timing();
        assert_eq!(stats.elapsed, first);
    }
}
