use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::orbit::OrbitError;

const TLE_LINE_LEN: usize = 69;

/// One satellite's two-line element data at its capture epoch.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OrbitalElementSet {
    pub catalog_id: u32,
    pub name: String,
    pub line1: String,
    pub line2: String,
    pub epoch: DateTime<Utc>,
}

/// Structural checks that run before the lines are handed to SGP4.
/// Returns the catalog number shared by both lines.
pub fn validate_lines(line1: &str, line2: &str) -> Result<u32, OrbitError> {
    let malformed = |msg: String| Err(OrbitError::MalformedElements(msg));

    if line1.is_empty() || line2.is_empty() {
        return malformed("empty element line".into());
    }
    if !line1.starts_with("1 ") {
        return malformed(format!("line 1 must start with '1 ': {:?}", line1));
    }
    if !line2.starts_with("2 ") {
        return malformed(format!("line 2 must start with '2 ': {:?}", line2));
    }
    for (number, line) in [(1, line1), (2, line2)] {
        if line.len() != TLE_LINE_LEN || !line.is_ascii() {
            return malformed(format!(
                "line {} must be {} ASCII characters, got {}",
                number,
                TLE_LINE_LEN,
                line.len()
            ));
        }
    }

    let catalog_id = catalog_number(line2)
        .ok_or_else(|| OrbitError::MalformedElements("line 2 has no catalog number".into()))?;
    match catalog_number(line1) {
        Some(id) if id == catalog_id => {}
        _ => {
            return malformed(format!(
                "catalog number mismatch between lines (line 2 says {})",
                catalog_id
            ))
        }
    }

    for (number, line) in [(1, line1), (2, line2)] {
        let expected = checksum(line);
        let found = line.as_bytes()[TLE_LINE_LEN - 1];
        if found != b'0' + expected {
            return malformed(format!(
                "line {} checksum mismatch: expected {}, found {}",
                number, expected, found as char
            ));
        }
    }

    Ok(catalog_id)
}

/// Catalog number from columns 3-7.
fn catalog_number(line: &str) -> Option<u32> {
    line.get(2..7)?.trim().parse().ok()
}

/// Modulo-10 checksum over the first 68 columns: digits count their value,
/// a minus sign counts one, everything else counts zero.
pub fn checksum(line: &str) -> u8 {
    let sum: u32 = line
        .bytes()
        .take(TLE_LINE_LEN - 1)
        .map(|b| match b {
            b'0'..=b'9' => (b - b'0') as u32,
            b'-' => 1,
            _ => 0,
        })
        .sum();
    (sum % 10) as u8
}
