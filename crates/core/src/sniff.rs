//! Magic-byte content-type classification for raw artifact bytes.

/// PNG signature: `\x89PNG`.
const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47];

/// JPEG SOI marker plus the start of the first segment.
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];

/// GIF87a/GIF89a common prefix: `GIF8`.
const GIF_MAGIC: &[u8] = &[0x47, 0x49, 0x46, 0x38];

/// Classify raw bytes by their leading magic numbers.
///
/// Recognizes PNG, JPEG, and GIF. Anything else defaults to `image/png`
/// — providers in this class overwhelmingly return PNG, and a wrong
/// label is recoverable while a rejected artifact is not.
pub fn sniff_content_type(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(PNG_MAGIC) {
        "image/png"
    } else if bytes.starts_with(JPEG_MAGIC) {
        "image/jpeg"
    } else if bytes.starts_with(GIF_MAGIC) {
        "image/gif"
    } else {
        "image/png"
    }
}

/// File extension (without dot) for a sniffed content type.
pub fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" => "jpg",
        "image/gif" => "gif",
        "video/mp4" => "mp4",
        _ => "png",
    }
}

/// Content type guessed from a filename's extension. The inverse of
/// [`extension_for`], for artifacts known only by URL where no bytes
/// are available to sniff.
pub fn content_type_for_name(name: &str) -> &'static str {
    match name.rsplit('.').next() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("mp4") => "video/mp4",
        _ => "image/png",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_magic_detected() {
        let bytes = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert_eq!(sniff_content_type(&bytes), "image/png");
    }

    #[test]
    fn jpeg_magic_detected() {
        let bytes = [0xFF, 0xD8, 0xFF, 0xE0];
        assert_eq!(sniff_content_type(&bytes), "image/jpeg");
    }

    #[test]
    fn gif_magic_detected() {
        assert_eq!(sniff_content_type(b"GIF89a trailing"), "image/gif");
    }

    #[test]
    fn unknown_bytes_default_to_png() {
        assert_eq!(sniff_content_type(b"certainly not an image"), "image/png");
        assert_eq!(sniff_content_type(&[]), "image/png");
    }

    #[test]
    fn extensions_match_types() {
        assert_eq!(extension_for("image/png"), "png");
        assert_eq!(extension_for("image/jpeg"), "jpg");
        assert_eq!(extension_for("video/mp4"), "mp4");
        assert_eq!(extension_for("application/octet-stream"), "png");
    }

    #[test]
    fn content_type_guessed_from_filename() {
        assert_eq!(content_type_for_name("final.mp4"), "video/mp4");
        assert_eq!(content_type_for_name("photo.jpeg"), "image/jpeg");
        assert_eq!(content_type_for_name("photo.jpg"), "image/jpeg");
        assert_eq!(content_type_for_name("anim.gif"), "image/gif");
        assert_eq!(content_type_for_name("artifact"), "image/png");
        assert_eq!(content_type_for_name("output.webp"), "image/png");
    }
}
