//! Per-row validation and normalization.

use crate::{RawRow, TaskDraft, COL_FIRST_NAME, COL_NOTES, COL_PHONE};

/// Check that a phone value is exactly 10 decimal digits.
///
/// No country code, spaces, or punctuation is tolerated.
pub fn is_valid_phone(phone: &str) -> bool {
    phone.len() == 10 && phone.bytes().all(|b| b.is_ascii_digit())
}

/// Validate a raw row and normalize it into a [`TaskDraft`].
///
/// A row is admissible iff `FirstName` is present and non-empty after
/// trimming AND `Phone` is exactly 10 decimal digits. Returns `None` on
/// rejection; callers count rejections, they are never surfaced as errors.
///
/// Pure and total over any row shape: missing columns reject the row, they
/// do not panic or error.
pub fn validate_row(row: &RawRow) -> Option<TaskDraft> {
    let first_name = row.get(COL_FIRST_NAME).map(|s| s.trim())?;
    if first_name.is_empty() {
        return None;
    }

    let phone = row.get(COL_PHONE)?;
    if !is_valid_phone(phone) {
        return None;
    }

    let notes = row
        .get(COL_NOTES)
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    Some(TaskDraft {
        first_name: first_name.to_string(),
        // Already validated as 10 digits, copied verbatim.
        phone: phone.clone(),
        notes,
    })
}
