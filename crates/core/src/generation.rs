//! Generation domain: ids, prompt validation, output paths, and the fixed
//! model options submitted with every prediction.
//!
//! Pure functions and constants used by both the API handlers and the
//! background generation workers.

use std::path::{Path, PathBuf};

use crate::error::CoreError;

/// Generation identifier (UUID v4, stored as text).
pub type GenId = String;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Replicate model every generation is submitted to.
pub const MODEL: &str = "black-forest-labs/flux-schnell";

/// Fixed aspect ratio for generated images.
pub const ASPECT_RATIO: &str = "1:1";

/// Fixed output quality (0-100) requested from the model.
pub const OUTPUT_QUALITY: u8 = 100;

/// Maximum prompt length in characters.
const MAX_PROMPT_LEN: usize = 2000;

/// Subdirectory of the data directory that holds generated images.
pub const GENS_SUBDIR: &str = "gens";

/// URL prefix under which the data directory is served.
pub const DATA_URL_PREFIX: &str = "/data";

// ---------------------------------------------------------------------------
// Ids and paths
// ---------------------------------------------------------------------------

/// Mint a fresh generation id.
pub fn new_gen_id() -> GenId {
    uuid::Uuid::new_v4().to_string()
}

/// File name of the output image for a generation.
pub fn image_filename(id: &str) -> String {
    format!("{id}.png")
}

/// Full on-disk path of the output image: `<folder>/<id>.png`.
pub fn image_path(folder: &str, id: &str) -> PathBuf {
    Path::new(folder).join(image_filename(id))
}

/// Output folder for a given data directory: `<data_dir>/gens`.
pub fn gens_folder(data_dir: &str) -> String {
    format!("{}/{GENS_SUBDIR}", data_dir.trim_end_matches('/'))
}

/// URL path under which the output image is served.
///
/// The static file service mounts the data directory at
/// [`DATA_URL_PREFIX`], so the URL is independent of where the data
/// directory lives on disk.
pub fn image_url(id: &str) -> String {
    format!("{DATA_URL_PREFIX}/{GENS_SUBDIR}/{}", image_filename(id))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a user-submitted prompt.
///
/// Rules:
/// - Must not be empty (after trimming whitespace).
/// - Must not exceed `MAX_PROMPT_LEN` characters.
pub fn validate_prompt(prompt: &str) -> Result<(), CoreError> {
    if prompt.trim().is_empty() {
        return Err(CoreError::Validation(
            "Prompt must not be empty".to_string(),
        ));
    }
    if prompt.chars().count() > MAX_PROMPT_LEN {
        return Err(CoreError::Validation(format!(
            "Prompt must not exceed {MAX_PROMPT_LEN} characters"
        )));
    }
    Ok(())
}

/// Build the model input payload for a prompt.
///
/// Mirrors the fixed options the demo always generates with: square
/// aspect ratio, maximum quality, safety checker off.
pub fn model_input(prompt: &str) -> serde_json::Value {
    serde_json::json!({
        "prompt": prompt,
        "aspect_ratio": ASPECT_RATIO,
        "output_quality": OUTPUT_QUALITY,
        "disable_safety_checker": true,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- new_gen_id -----------------------------------------------------------

    #[test]
    fn gen_ids_are_unique() {
        assert_ne!(new_gen_id(), new_gen_id());
    }

    #[test]
    fn gen_id_is_uuid_shaped() {
        let id = new_gen_id();
        assert_eq!(id.len(), 36);
        assert_eq!(id.matches('-').count(), 4);
    }

    // -- paths ----------------------------------------------------------------

    #[test]
    fn image_path_joins_folder_and_id() {
        let p = image_path("data/gens", "abc");
        assert_eq!(p, PathBuf::from("data/gens/abc.png"));
    }

    #[test]
    fn image_url_is_under_data_prefix() {
        assert_eq!(image_url("abc"), "/data/gens/abc.png");
    }

    #[test]
    fn gens_folder_normalises_trailing_slash() {
        assert_eq!(gens_folder("data"), "data/gens");
        assert_eq!(gens_folder("data/"), "data/gens");
    }

    // -- validate_prompt ------------------------------------------------------

    #[test]
    fn valid_prompt_accepted() {
        assert!(validate_prompt("a red fox").is_ok());
    }

    #[test]
    fn empty_prompt_rejected() {
        assert!(validate_prompt("").is_err());
    }

    #[test]
    fn whitespace_prompt_rejected() {
        assert!(validate_prompt("   \t").is_err());
    }

    #[test]
    fn overlong_prompt_rejected() {
        let prompt = "x".repeat(MAX_PROMPT_LEN + 1);
        assert!(validate_prompt(&prompt).is_err());
    }

    #[test]
    fn max_length_prompt_accepted() {
        let prompt = "x".repeat(MAX_PROMPT_LEN);
        assert!(validate_prompt(&prompt).is_ok());
    }

    // -- model_input ----------------------------------------------------------

    #[test]
    fn model_input_carries_prompt_and_fixed_options() {
        let input = model_input("a red fox");
        assert_eq!(input["prompt"], "a red fox");
        assert_eq!(input["aspect_ratio"], ASPECT_RATIO);
        assert_eq!(input["output_quality"], 100);
        assert_eq!(input["disable_safety_checker"], true);
    }
}
