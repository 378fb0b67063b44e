//! Extracted review records.

use serde::{Deserialize, Serialize};

/// One review extracted from a container element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub title: String,
    pub body: String,
    /// Numeric rating, `0.0` when unknown or unparseable.
    pub rating: f64,
    pub reviewer: String,
}

impl ReviewRecord {
    /// Records without a body are decorative or advertisement matches.
    pub fn is_retainable(&self) -> bool {
        !self.body.is_empty()
    }

    /// Whether a rating was recovered for this record.
    pub fn has_rating(&self) -> bool {
        self.rating > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_not_retainable() {
        let record = ReviewRecord {
            title: "Great".to_string(),
            body: String::new(),
            rating: 5.0,
            reviewer: "ann".to_string(),
        };
        assert!(!record.is_retainable());
    }

    #[test]
    fn test_body_only_is_retainable() {
        let record = ReviewRecord {
            body: "Works as described.".to_string(),
            ..Default::default()
        };
        assert!(record.is_retainable());
        assert!(!record.has_rating());
    }

    #[test]
    fn test_serialization_field_names() {
        let record = ReviewRecord {
            title: "t".to_string(),
            body: "b".to_string(),
            rating: 4.5,
            reviewer: "r".to_string(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["rating"], 4.5);
        assert_eq!(json["reviewer"], "r");
    }
}
