/// Lines dropped from the transcript when they match exactly
/// (after trimming and lowercasing).
pub const FILLER_LINES: &[&str] = &["amen", "thanks guys", "thank you"];

/// Marker token of an SRT timing range line.
const TIMING_MARKER: &str = "-->";

/// Reduce raw SRT text to a single line of spoken content: numeric index
/// lines, timing lines, blanks, and filler lines are dropped; the rest are
/// trimmed and space-joined in original order.
pub fn clean_srt(raw: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        if trimmed.contains(TIMING_MARKER) {
            continue;
        }
        if FILLER_LINES.contains(&trimmed.to_lowercase().as_str()) {
            continue;
        }
        lines.push(trimmed);
    }
    lines.join(" ")
}
