//! Byte-range request parsing.
//!
//! Translates a client `Range` header plus the resolved object size into an
//! inclusive byte window. Only the first range expression of a multi-range
//! header is honored; the rest are ignored (known limitation, not an
//! error). An `end` past the object is clamped to the last byte; a `start`
//! past the object is unsatisfiable.

use mediastamp_core::AppError;

/// A resolved byte window: `start`/`end` are inclusive offsets, `total` is
/// the object size. Invariant: `0 <= start <= end <= total - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeRequest {
    pub start: u64,
    pub end: u64,
    pub total: u64,
}

impl RangeRequest {
    /// The whole object as one window.
    pub fn full(total: u64) -> Self {
        RangeRequest {
            start: 0,
            end: total.saturating_sub(1),
            total,
        }
    }

    /// Number of bytes in the window.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// `Content-Range` header value for a 206 response.
    pub fn content_range(&self) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, self.total)
    }
}

/// Parse a `Range` header value against an object of `total` bytes.
///
/// Returns `InvalidInput` for anything that is not a parseable
/// `bytes=<start>-[<end>]` expression (including suffix ranges, which this
/// service does not support), and `RangeNotSatisfiable` when `start` lies
/// past the last byte.
pub fn parse_range_header(header: &str, total: u64) -> Result<RangeRequest, AppError> {
    let spec = header
        .trim()
        .strip_prefix("bytes=")
        .ok_or_else(|| AppError::InvalidInput(format!("Unsupported range unit: {}", header)))?;

    // Multi-range: honor the first expression only.
    let first = spec.split(',').next().unwrap_or("").trim();

    let (start_str, end_str) = first
        .split_once('-')
        .ok_or_else(|| AppError::InvalidInput(format!("Malformed range: {}", first)))?;

    let start: u64 = start_str
        .trim()
        .parse()
        .map_err(|_| AppError::InvalidInput(format!("Malformed range start: {}", first)))?;

    let end = match end_str.trim() {
        "" => total.saturating_sub(1),
        s => {
            let parsed: u64 = s
                .parse()
                .map_err(|_| AppError::InvalidInput(format!("Malformed range end: {}", first)))?;
            // An over-long window is a benign over-ask; clamp to the object.
            parsed.min(total.saturating_sub(1))
        }
    };

    if total == 0 || start >= total || start > end {
        return Err(AppError::RangeNotSatisfiable(format!(
            "Range {} not satisfiable for object of {} bytes",
            first, total
        )));
    }

    Ok(RangeRequest { start, end, total })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_range() {
        let r = parse_range_header("bytes=1000000-1999999", 10_000_000).unwrap();
        assert_eq!(r.start, 1_000_000);
        assert_eq!(r.end, 1_999_999);
        assert_eq!(r.len(), 1_000_000);
        assert_eq!(r.content_range(), "bytes 1000000-1999999/10000000");
    }

    #[test]
    fn test_open_ended_range_defaults_to_last_byte() {
        let r = parse_range_header("bytes=500-", 1000).unwrap();
        assert_eq!(r.start, 500);
        assert_eq!(r.end, 999);
    }

    #[test]
    fn test_end_is_clamped_to_object() {
        let r = parse_range_header("bytes=0-999999", 1000).unwrap();
        assert_eq!(r.end, 999);
        assert_eq!(r.content_range(), "bytes 0-999/1000");
    }

    #[test]
    fn test_start_past_object_is_unsatisfiable() {
        let err = parse_range_header("bytes=1000-", 1000).unwrap_err();
        assert!(matches!(err, AppError::RangeNotSatisfiable(_)));
    }

    #[test]
    fn test_inverted_range_is_unsatisfiable() {
        let err = parse_range_header("bytes=900-100", 1000).unwrap_err();
        assert!(matches!(err, AppError::RangeNotSatisfiable(_)));
    }

    #[test]
    fn test_multi_range_honors_first_expression_only() {
        let r = parse_range_header("bytes=0-99, 200-299", 1000).unwrap();
        assert_eq!((r.start, r.end), (0, 99));
    }

    #[test]
    fn test_suffix_range_is_invalid_input() {
        let err = parse_range_header("bytes=-500", 1000).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_non_bytes_unit_is_invalid_input() {
        let err = parse_range_header("items=0-10", 1000).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_empty_object_with_range_is_unsatisfiable() {
        let err = parse_range_header("bytes=0-", 0).unwrap_err();
        assert!(matches!(err, AppError::RangeNotSatisfiable(_)));
    }

    #[test]
    fn test_full_window_covers_object() {
        let r = RangeRequest::full(1000);
        assert_eq!((r.start, r.end, r.total), (0, 999, 1000));
        assert_eq!(r.len(), 1000);
    }
}
