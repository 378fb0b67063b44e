//! Aggregate statistics over extracted reviews.

use serde::Serialize;

use revscout_protocols::types::ReviewRecord;

/// Counts and rating distribution of a set of reviews.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewSummary {
    pub total: usize,
    /// Records with a rating above zero.
    pub rated: usize,
    /// Mean over rated records, `None` when nothing is rated.
    pub average_rating: Option<f64>,
    /// Rated records per star, index 0 is one star.
    pub histogram: [usize; 5],
    /// Rated records whose value exceeds five, e.g. percentages.
    pub out_of_scale: usize,
}

impl ReviewSummary {
    pub fn from_records(records: &[ReviewRecord]) -> Self {
        let mut histogram = [0usize; 5];
        let mut out_of_scale = 0;
        let mut rated = 0;
        let mut sum = 0.0;

        for rating in records.iter().filter(|r| r.has_rating()).map(|r| r.rating) {
            rated += 1;
            sum += rating;
            if rating > 5.0 {
                out_of_scale += 1;
            } else {
                let stars = (rating.round() as usize).clamp(1, 5);
                histogram[stars - 1] += 1;
            }
        }

        Self {
            total: records.len(),
            rated,
            average_rating: (rated > 0).then(|| sum / rated as f64),
            histogram,
            out_of_scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rated(rating: f64) -> ReviewRecord {
        ReviewRecord {
            body: "b".to_string(),
            rating,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty() {
        let summary = ReviewSummary::from_records(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.average_rating, None);
        assert_eq!(summary.histogram, [0; 5]);
    }

    #[test]
    fn test_unrated_excluded_from_average() {
        let summary = ReviewSummary::from_records(&[rated(4.0), rated(0.0), rated(5.0)]);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.rated, 2);
        assert_eq!(summary.average_rating, Some(4.5));
    }

    #[test]
    fn test_histogram_rounding() {
        let summary =
            ReviewSummary::from_records(&[rated(0.3), rated(1.4), rated(2.5), rated(4.5), rated(5.0)]);
        assert_eq!(summary.histogram, [2, 0, 1, 0, 2]);
    }

    #[test]
    fn test_out_of_scale_counted_separately() {
        let summary = ReviewSummary::from_records(&[rated(90.0), rated(3.0)]);
        assert_eq!(summary.out_of_scale, 1);
        assert_eq!(summary.histogram, [0, 0, 1, 0, 0]);
        assert_eq!(summary.average_rating, Some(46.5));
    }
}
