use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classifier::ScanResult;
use crate::store::ScanStatistics;

/// Versioned envelope for machine-readable scan output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub items: Vec<ScanResult>,
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub scan_duration_ms: u64,
}

impl ScanReport {
    pub fn new(items: Vec<ScanResult>, stats: ScanStatistics, duration_ms: u64) -> Self {
        Self {
            version: "1.0".to_string(),
            timestamp: Utc::now(),
            items,
            total: stats.total,
            valid: stats.valid,
            invalid: stats.invalid,
            scan_duration_ms: duration_ms,
        }
    }
}

/// Render results as CSV rows `#,File Name,Serial Number,Status,Check Time`.
/// `#` is the 1-based position in the (possibly filtered) sequence.
pub fn to_csv(results: &[ScanResult]) -> String {
    let mut csv = String::from("#,File Name,Serial Number,Status,Check Time\n");

    for (idx, result) in results.iter().enumerate() {
        csv.push_str(&format!(
            "{},{},{},{},{}\n",
            idx + 1,
            csv_field(&result.file_name),
            csv_field(&result.serial_number),
            result.status(),
            result.checked_at.format("%Y-%m-%d %H:%M:%S"),
        ));
    }

    csv
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn result(name: &str, serial: &str, is_invalid: bool) -> ScanResult {
        ScanResult {
            file_name: name.to_string(),
            serial_number: serial.to_string(),
            is_invalid,
            checked_at: Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn csv_rows_are_one_based() {
        let csv = to_csv(&[
            result("a.log", "ABC123", true),
            result("c.log", "DEF456", false),
        ]);

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "#,File Name,Serial Number,Status,Check Time");
        assert_eq!(lines[1], "1,a.log,ABC123,Invalid,2026-08-30 12:00:00");
        assert_eq!(lines[2], "2,c.log,DEF456,Valid,2026-08-30 12:00:00");
    }

    #[test]
    fn csv_quotes_awkward_fields() {
        let csv = to_csv(&[result("weird, \"name\".log", "N/A", true)]);
        assert!(csv.contains("\"weird, \"\"name\"\".log\""));
    }

    #[test]
    fn empty_result_set_is_just_the_header() {
        assert_eq!(to_csv(&[]), "#,File Name,Serial Number,Status,Check Time\n");
    }

    #[test]
    fn report_carries_statistics() {
        let items = vec![result("a.log", "ABC123", true)];
        let stats = ScanStatistics::from_results(&items);
        let report = ScanReport::new(items, stats, 42);

        assert_eq!(report.version, "1.0");
        assert_eq!((report.total, report.valid, report.invalid), (1, 0, 1));
        assert_eq!(report.scan_duration_ms, 42);

        let json = serde_json::to_string(&report).unwrap();
        let back: ScanReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.items[0].serial_number, "ABC123");
    }
}
