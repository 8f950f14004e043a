//! DTOs for the Replicate predictions API.

use serde::Deserialize;

/// Lifecycle status reported by Replicate for a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionStatus {
    Starting,
    Processing,
    Succeeded,
    Failed,
    Canceled,
}

impl PredictionStatus {
    /// Whether Replicate will make no further progress on this prediction.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            PredictionStatus::Succeeded | PredictionStatus::Failed | PredictionStatus::Canceled
        )
    }
}

/// A prediction as returned by `POST /v1/models/{model}/predictions` and
/// `GET /v1/predictions/{id}`.
///
/// `output` is model-specific; image models return either a single URL
/// string or a list of URL strings, so it is kept as raw JSON and
/// interpreted by [`Prediction::first_output_url`].
#[derive(Debug, Clone, Deserialize)]
pub struct Prediction {
    pub id: String,
    pub status: PredictionStatus,
    #[serde(default)]
    pub output: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl Prediction {
    /// Extract the first output image URL, if the output carries one.
    pub fn first_output_url(&self) -> Option<&str> {
        match self.output.as_ref()? {
            serde_json::Value::String(url) => Some(url.as_str()),
            serde_json::Value::Array(items) => items.first().and_then(|v| v.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_succeeded_prediction_with_url_list() {
        let json = r#"{
            "id": "pred-1",
            "status": "succeeded",
            "output": ["https://replicate.delivery/out.webp"],
            "error": null
        }"#;
        let p: Prediction = serde_json::from_str(json).unwrap();

        assert_eq!(p.status, PredictionStatus::Succeeded);
        assert!(p.status.is_terminal());
        assert_eq!(
            p.first_output_url(),
            Some("https://replicate.delivery/out.webp")
        );
    }

    #[test]
    fn deserializes_single_string_output() {
        let json = r#"{"id": "pred-2", "status": "succeeded", "output": "https://x/y.png"}"#;
        let p: Prediction = serde_json::from_str(json).unwrap();
        assert_eq!(p.first_output_url(), Some("https://x/y.png"));
    }

    #[test]
    fn deserializes_failed_prediction() {
        let json = r#"{"id": "pred-3", "status": "failed", "error": "NSFW content detected"}"#;
        let p: Prediction = serde_json::from_str(json).unwrap();

        assert_eq!(p.status, PredictionStatus::Failed);
        assert_eq!(p.error.as_deref(), Some("NSFW content detected"));
        assert_eq!(p.first_output_url(), None);
    }

    #[test]
    fn starting_and_processing_are_not_terminal() {
        assert!(!PredictionStatus::Starting.is_terminal());
        assert!(!PredictionStatus::Processing.is_terminal());
    }

    #[test]
    fn empty_output_array_yields_no_url() {
        let json = r#"{"id": "pred-4", "status": "succeeded", "output": []}"#;
        let p: Prediction = serde_json::from_str(json).unwrap();
        assert_eq!(p.first_output_url(), None);
    }
}
