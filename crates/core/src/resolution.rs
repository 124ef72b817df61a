//! Aspect-ratio → pixel-dimension lookup.
//!
//! Artifact dimensions are never derived by decoding image bytes; they
//! come from this fixed mapping of the request's aspect ratio.

/// Aspect ratio assumed when a request does not specify one.
pub const DEFAULT_ASPECT_RATIO: &str = "1:1";

/// Fixed table of supported aspect ratios and their output dimensions.
const DIMENSIONS: &[(&str, (u32, u32))] = &[
    ("1:1", (1024, 1024)),
    ("16:9", (1024, 576)),
    ("9:16", (576, 1024)),
    ("4:3", (1024, 768)),
    ("3:4", (768, 1024)),
];

/// Look up output dimensions `(width, height)` for an aspect ratio key.
///
/// Returns `None` for unknown keys; callers reject those at validation.
pub fn dimensions_for(aspect_ratio: &str) -> Option<(u32, u32)> {
    DIMENSIONS
        .iter()
        .find(|(key, _)| *key == aspect_ratio)
        .map(|(_, dims)| *dims)
}

/// Dimensions for an optional aspect ratio, defaulting to
/// [`DEFAULT_ASPECT_RATIO`].
pub fn dimensions_or_default(aspect_ratio: Option<&str>) -> (u32, u32) {
    aspect_ratio
        .and_then(dimensions_for)
        .unwrap_or_else(|| dimensions_for(DEFAULT_ASPECT_RATIO).expect("default ratio in table"))
}
