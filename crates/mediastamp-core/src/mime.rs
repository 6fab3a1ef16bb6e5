//! MIME classification for store paths.
//!
//! The service never trusts stored metadata for delivery; content types are
//! derived from the path's file extension through this fixed table. Unknown
//! extensions map to a generic binary type.

/// Fixed extension → MIME table.
///
/// Kept as a slice rather than a map: it is small, ordered, and the lookup
/// is case-insensitive on the extension.
const MIME_TABLE: &[(&str, &str)] = &[
    // Images
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("jfif", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("svg", "image/svg+xml"),
    ("bmp", "image/bmp"),
    // Video
    ("mp4", "video/mp4"),
    ("m4v", "video/mp4"),
    ("mov", "video/quicktime"),
    ("webm", "video/webm"),
    ("mkv", "video/x-matroska"),
    ("avi", "video/x-msvideo"),
    ("ts", "video/mp2t"),
    ("m3u8", "application/vnd.apple.mpegurl"),
    // Audio
    ("mp3", "audio/mpeg"),
    ("wav", "audio/wav"),
    ("m4a", "audio/mp4"),
    ("ogg", "audio/ogg"),
    ("flac", "audio/flac"),
    // Documents
    ("pdf", "application/pdf"),
    ("json", "application/json"),
    ("txt", "text/plain"),
];

/// Generic binary type for unknown extensions.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Derive the MIME type for a store path from its file extension.
pub fn mime_for_path(path: &str) -> &'static str {
    let ext = path
        .rsplit('/')
        .next()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match ext {
        Some(ext) => MIME_TABLE
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, m)| *m)
            .unwrap_or(OCTET_STREAM),
        None => OCTET_STREAM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_image_types() {
        assert_eq!(mime_for_path("organizations/acme/photos/a.jpg"), "image/jpeg");
        assert_eq!(mime_for_path("a.PNG"), "image/png");
        assert_eq!(mime_for_path("logo.webp"), "image/webp");
    }

    #[test]
    fn test_video_types() {
        assert_eq!(mime_for_path("clips/video.mp4"), "video/mp4");
        assert_eq!(mime_for_path("clips/video.MOV"), "video/quicktime");
    }

    #[test]
    fn test_unknown_extension_is_binary() {
        assert_eq!(mime_for_path("file.xyz"), OCTET_STREAM);
        assert_eq!(mime_for_path("no_extension"), OCTET_STREAM);
        assert_eq!(mime_for_path(""), OCTET_STREAM);
    }

    #[test]
    fn test_dot_in_directory_does_not_confuse_lookup() {
        assert_eq!(mime_for_path("v1.2/readme"), OCTET_STREAM);
        assert_eq!(mime_for_path("v1.2/readme.txt"), "text/plain");
    }
}
