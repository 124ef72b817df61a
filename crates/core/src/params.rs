//! Request parameter snapshot and per-kind validation.
//!
//! Validation runs synchronously at submission time. A request that
//! fails validation never creates a job record.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::job::JobKind;
use crate::resolution;

/// Maximum accepted prompt length, in characters.
pub const MAX_PROMPT_LEN: usize = 2000;

/// Maximum number of images a single job may request.
pub const MAX_IMAGE_COUNT: u32 = 4;

/// Immutable snapshot of the inputs for one generation request.
///
/// Captured once at job creation. Fields irrelevant to a given kind are
/// simply left `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Positive prompt text. Required for `image` and `avatar`.
    #[serde(default)]
    pub prompt: String,
    pub negative_prompt: Option<String>,
    /// Aspect ratio key into the fixed resolution table, e.g. `"1:1"`.
    pub aspect_ratio: Option<String>,
    /// Free-form style preset name, passed through to the provider.
    pub style: Option<String>,
    /// Explicit provider selection. When absent, the registry's
    /// deterministic default policy picks one.
    pub provider: Option<String>,
    /// Number of images to produce (image/avatar only). Defaults to 1.
    pub count: Option<u32>,
    /// Source avatar reference for talking-head video jobs.
    pub avatar_id: Option<uuid::Uuid>,
    /// Source character reference for avatar jobs.
    pub character_id: Option<uuid::Uuid>,
    /// Script to be spoken in a talking-head video.
    pub script: Option<String>,
    /// Voice preset for talking-head video jobs.
    pub voice: Option<String>,
}

impl GenerationParams {
    /// Shorthand used heavily in tests: a prompt with all else defaulted.
    pub fn prompt_only(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    /// Validate this snapshot for the given job kind.
    pub fn validate(&self, kind: JobKind) -> Result<(), CoreError> {
        match kind {
            JobKind::Image | JobKind::Avatar => {
                if self.prompt.trim().is_empty() {
                    return Err(CoreError::Validation(
                        "prompt must not be empty".to_string(),
                    ));
                }
            }
            JobKind::Video => {
                let script_empty = self
                    .script
                    .as_deref()
                    .map(|s| s.trim().is_empty())
                    .unwrap_or(true);
                if script_empty {
                    return Err(CoreError::Validation(
                        "script must not be empty for video jobs".to_string(),
                    ));
                }
                if self.avatar_id.is_none() {
                    return Err(CoreError::Validation(
                        "avatar_id is required for video jobs".to_string(),
                    ));
                }
            }
        }

        if self.prompt.chars().count() > MAX_PROMPT_LEN {
            return Err(CoreError::Validation(format!(
                "prompt must not exceed {MAX_PROMPT_LEN} characters"
            )));
        }

        if let Some(count) = self.count {
            if count == 0 || count > MAX_IMAGE_COUNT {
                return Err(CoreError::Validation(format!(
                    "count must be between 1 and {MAX_IMAGE_COUNT}"
                )));
            }
        }

        if let Some(ref ratio) = self.aspect_ratio {
            if resolution::dimensions_for(ratio).is_none() {
                return Err(CoreError::Validation(format!(
                    "unknown aspect ratio \"{ratio}\""
                )));
            }
        }

        Ok(())
    }

    /// Requested image count, defaulting to 1.
    pub fn image_count(&self) -> u32 {
        self.count.unwrap_or(1).clamp(1, MAX_IMAGE_COUNT)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
