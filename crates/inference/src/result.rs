use serde::{Serialize, Serializer};
use std::fmt;

/// Probability reported when no inference was run.
pub const SENTINEL_PROBABILITY: f32 = -1.0;
/// Latency reported when no inference was run.
pub const SENTINEL_LATENCY_MS: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Hotdog,
    NoHotdog,
    Uninitialized,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Hotdog => "Hotdog",
            Verdict::NoHotdog => "No hotdog",
            Verdict::Uninitialized => "Uninitialized Classifier",
        }
    }

    /// Map a model score to a verdict. Scores equal to the threshold count as hotdog.
    pub fn from_score(score: f32, threshold: f32) -> Self {
        if score < threshold {
            Verdict::NoHotdog
        } else {
            Verdict::Hotdog
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Verdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Outcome of a single classification call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub label: Verdict,
    pub probability: f32,
    pub latency_millis: i64,
}

impl ClassificationResult {
    pub fn new(label: Verdict, probability: f32, latency_millis: i64) -> Self {
        Self {
            label,
            probability,
            latency_millis,
        }
    }

    pub fn uninitialized() -> Self {
        Self::new(
            Verdict::Uninitialized,
            SENTINEL_PROBABILITY,
            SENTINEL_LATENCY_MS,
        )
    }

    pub fn is_sentinel(&self) -> bool {
        self.label == Verdict::Uninitialized
    }

    pub fn latency_text(&self) -> String {
        format!("{} ms", self.latency_millis)
    }

    pub fn probability_text(&self) -> String {
        self.probability.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_match_display_strings() {
        assert_eq!(Verdict::Hotdog.to_string(), "Hotdog");
        assert_eq!(Verdict::NoHotdog.to_string(), "No hotdog");
        assert_eq!(Verdict::Uninitialized.to_string(), "Uninitialized Classifier");
    }

    #[test]
    fn test_threshold_boundary() {
        assert_eq!(Verdict::from_score(0.5, 0.5), Verdict::Hotdog);
        assert_eq!(Verdict::from_score(0.4999, 0.5), Verdict::NoHotdog);
        assert_eq!(Verdict::from_score(0.0, 0.5), Verdict::NoHotdog);
        assert_eq!(Verdict::from_score(1.0, 0.5), Verdict::Hotdog);
    }

    #[test]
    fn test_uninitialized_sentinel() {
        let result = ClassificationResult::uninitialized();
        assert!(result.is_sentinel());
        assert_eq!(result.probability, -1.0);
        assert_eq!(result.latency_millis, -1);
        assert_eq!(result.latency_text(), "-1 ms");
    }

    #[test]
    fn test_serializes_label_text() {
        let result = ClassificationResult::new(Verdict::NoHotdog, 0.25, 12);
        let json = serde_json::to_value(result).unwrap();

        assert_eq!(json["label"], "No hotdog");
        assert_eq!(json["probability"], 0.25);
        assert_eq!(json["latency_millis"], 12);
    }

    #[test]
    fn test_presentation_text() {
        let result = ClassificationResult::new(Verdict::Hotdog, 0.75, 38);
        assert_eq!(result.latency_text(), "38 ms");
        assert_eq!(result.probability_text(), "0.75");
    }
}
