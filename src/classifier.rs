use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rule::{value_after_last_colon, ScanRule};
use crate::source::FileRecord;

/// One qualifying log file. Created by [`classify`], immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanResult {
    pub file_name: String,
    pub serial_number: String,
    pub is_invalid: bool,
    pub checked_at: DateTime<Utc>,
}

impl ScanResult {
    pub fn status(&self) -> &'static str {
        if self.is_invalid {
            "Invalid"
        } else {
            "Valid"
        }
    }
}

/// Classify one file against the rule. Returns `None` when the file is not
/// part of the target population or is filtered out by the invalid-only
/// policy. Pure except for the `checked_at` timestamp.
pub fn classify(rule: &ScanRule, record: &FileRecord) -> Option<ScanResult> {
    // First line carrying the program field decides qualification, even if
    // its value is malformed.
    let program_line = record
        .content
        .lines()
        .find(|line| line.contains(&rule.program_field))?;
    let field_value = value_after_last_colon(program_line)?;
    if !rule.qualifies(field_value) {
        return None;
    }

    let is_invalid = record
        .content
        .lines()
        .any(|line| line.contains(&rule.mfg_field) && line.contains(&rule.invalid_marker));
    if !is_invalid && !rule.include_valid {
        return None;
    }

    let serial_number = record
        .content
        .lines()
        .find(|line| line.contains(&rule.serial_field))
        .and_then(value_after_last_colon)
        .filter(|sn| !sn.is_empty())
        .unwrap_or("N/A")
        .to_string();

    Some(ScanResult {
        file_name: record.name.clone(),
        serial_number,
        is_invalid,
        checked_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(content: &str) -> FileRecord {
        FileRecord {
            name: "unit.log".to_string(),
            content: content.to_string(),
        }
    }

    fn invalid_only_rule() -> ScanRule {
        ScanRule::default()
    }

    #[test]
    fn invalid_qualifying_file_is_reported() {
        let rec = record(
            "Test Program        : X_Y_MP_1\n\
             mfg_data: 0xFFFFFFFF\n\
             PCBA SN No          : ABC123\n",
        );

        let result = classify(&invalid_only_rule(), &rec).unwrap();
        assert_eq!(result.file_name, "unit.log");
        assert_eq!(result.serial_number, "ABC123");
        assert!(result.is_invalid);
    }

    #[test]
    fn file_without_program_field_is_skipped() {
        // Qualification is independent of the other markers being present.
        let rec = record("mfg_data: 0xFFFFFFFF\nPCBA SN No : ABC123\n");
        assert!(classify(&invalid_only_rule(), &rec).is_none());
    }

    #[test]
    fn wrong_prefix_on_third_segment_is_skipped() {
        let rec = record("Test Program : X_Y_QT_1\nmfg_data: 0xFFFFFFFF\n");
        assert!(classify(&invalid_only_rule(), &rec).is_none());
    }

    #[test]
    fn malformed_program_field_is_skipped() {
        let rec = record("Test Program : X_MP\nmfg_data: 0xFFFFFFFF\n");
        assert!(classify(&invalid_only_rule(), &rec).is_none());

        let no_colon = record("Test Program X_Y_MP_1\nmfg_data: 0xFFFFFFFF\n");
        assert!(classify(&invalid_only_rule(), &no_colon).is_none());
    }

    #[test]
    fn first_program_line_wins() {
        // A later well-formed line does not rescue the malformed first one.
        let rec = record(
            "Test Program : X_Y\n\
             Test Program : X_Y_MP_1\n\
             mfg_data: 0xFFFFFFFF\n",
        );
        assert!(classify(&invalid_only_rule(), &rec).is_none());
    }

    #[test]
    fn valid_file_is_skipped_under_invalid_only_policy() {
        let rec = record("Test Program : X_Y_MP_1\nmfg_data: 0x0A050000\n");
        assert!(classify(&invalid_only_rule(), &rec).is_none());
    }

    #[test]
    fn include_valid_reports_valid_files() {
        let rule = ScanRule {
            include_valid: true,
            ..ScanRule::default()
        };
        let rec = record(
            "Test Program : X_Y_MP_1\n\
             mfg_data: 0x0A050000\n\
             PCBA SN No : XYZ789\n",
        );

        let result = classify(&rule, &rec).unwrap();
        assert!(!result.is_invalid);
        assert_eq!(result.serial_number, "XYZ789");
    }

    #[test]
    fn invalid_marker_off_the_mfg_line_does_not_count() {
        let rec = record(
            "Test Program : X_Y_MP_1\n\
             note: 0xFFFFFFFF seen earlier\n\
             mfg_data: 0x0A050000\n",
        );
        assert!(classify(&invalid_only_rule(), &rec).is_none());
    }

    #[test]
    fn serial_defaults_to_na() {
        let rec = record("Test Program : X_Y_MP_1\nmfg_data: 0xFFFFFFFF\n");
        let result = classify(&invalid_only_rule(), &rec).unwrap();
        assert_eq!(result.serial_number, "N/A");
    }

    #[test]
    fn first_serial_line_wins() {
        let rec = record(
            "Test Program : X_Y_MP_1\n\
             mfg_data: 0xFFFFFFFF\n\
             PCBA SN No : FIRST\n\
             PCBA SN No : SECOND\n",
        );
        let result = classify(&invalid_only_rule(), &rec).unwrap();
        assert_eq!(result.serial_number, "FIRST");
    }

    #[test]
    fn serial_takes_text_after_last_colon() {
        let rec = record(
            "Test Program : X_Y_MP_1\n\
             mfg_data: 0xFFFFFFFF\n\
             PCBA SN No : rework: ABC123  \n",
        );
        let result = classify(&invalid_only_rule(), &rec).unwrap();
        assert_eq!(result.serial_number, "ABC123");
    }
}
