//! Offset remapping
//!
//! Annotation files express span offsets in the raw annotation document's
//! character coordinates. Stripping the window removes the whole prefix up
//! to the start marker plus the line separator that follows it, so every
//! offset shifts left by `prefix_chars + window_gap`.

/// Re-express a raw character offset relative to the stripped text
///
/// Returns a signed offset; a negative result means the raw offset lies
/// before the stripped region and the caller must reject the span.
pub fn remap(raw_offset: usize, prefix_chars: usize, window_gap: usize) -> i64 {
    raw_offset as i64 - prefix_chars as i64 - window_gap as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remap_inside_window() {
        // Prefix of 65 chars, one separator char: raw 72 -> stripped 6.
        assert_eq!(remap(72, 65, 1), 6);
    }

    #[test]
    fn test_remap_before_window_goes_negative() {
        assert_eq!(remap(10, 65, 1), -56);
    }
}
