use serde::{Deserialize, Serialize};

/// Keyword rule a log file is classified against.
///
/// Loaded from the `[rule]` config table and treated as read-only for the
/// lifetime of a scan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanRule {
    /// Substring locating the line that carries the test-program field.
    #[serde(default = "default_program_field")]
    pub program_field: String,
    /// The third underscore segment of the field value must start with this.
    #[serde(default = "default_program_prefix")]
    pub program_prefix: String,
    /// Substring locating the mfg data line.
    #[serde(default = "default_mfg_field")]
    pub mfg_field: String,
    /// Marks the unit invalid when it appears on the mfg data line.
    #[serde(default = "default_invalid_marker")]
    pub invalid_marker: String,
    /// Line prefix locating the unit serial number.
    #[serde(default = "default_serial_field")]
    pub serial_field: String,
    /// Also report qualifying files that lack the invalidity marker.
    #[serde(default)]
    pub include_valid: bool,
}

fn default_program_field() -> String {
    "Test Program".to_string()
}

fn default_program_prefix() -> String {
    "MP".to_string()
}

fn default_mfg_field() -> String {
    "mfg_data".to_string()
}

fn default_invalid_marker() -> String {
    "0xFFFFFFFF".to_string()
}

fn default_serial_field() -> String {
    "PCBA SN No".to_string()
}

impl Default for ScanRule {
    fn default() -> Self {
        Self {
            program_field: default_program_field(),
            program_prefix: default_program_prefix(),
            mfg_field: default_mfg_field(),
            invalid_marker: default_invalid_marker(),
            serial_field: default_serial_field(),
            include_valid: false,
        }
    }
}

impl ScanRule {
    /// Whether a program-field value like `SURF_A_MP01_V2` qualifies: at
    /// least three underscore segments and the third starts with the prefix.
    pub fn qualifies(&self, field_value: &str) -> bool {
        third_segment(field_value)
            .map(|seg| seg.starts_with(&self.program_prefix))
            .unwrap_or(false)
    }
}

/// Text after the last `:` on a line, trimmed. `None` when the line has no
/// colon; an empty value after the colon yields `Some("")`.
pub fn value_after_last_colon(line: &str) -> Option<&str> {
    line.rfind(':').map(|idx| line[idx + 1..].trim())
}

/// Third `_`-delimited segment of a field value, or `None` when the value
/// has fewer than three segments.
pub fn third_segment(value: &str) -> Option<&str> {
    value.split('_').nth(2)
}
