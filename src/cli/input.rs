//! Text parsing for numeric command-line arguments.
//!
//! Cells that are blank or do not parse as a finite number are read as 0,
//! the same way an editable numeric field treats an empty box. The engine
//! still validates the result, so a row with a missing cell fails its
//! row-sum check instead of being patched up.

/// Parse one cell, falling back to 0.
pub fn parse_cell(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Parse a comma-separated vector, e.g. `"1, 0, 0"`.
pub fn parse_vector(text: &str) -> Vec<f64> {
    text.split(',').map(parse_cell).collect()
}

/// Parse a matrix written as `;`-separated rows of `,`-separated cells,
/// e.g. `"0.5,0.5; 0.2,0.8"`. Blank rows (such as a trailing `;`) are skipped.
pub fn parse_matrix(text: &str) -> Vec<Vec<f64>> {
    text.split(';')
        .filter(|row| !row.trim().is_empty())
        .map(parse_vector)
        .collect()
}
