use super::*;
use crate::testing::{self, BODY, FakeReview, RATING, REVIEWER, TITLE};

fn extractor() -> FieldExtractor {
    FieldExtractor::new(Duration::from_secs(5))
}

#[tokio::test]
async fn test_extract_full_record() {
    let element = FakeReview::full("  Great  ", "\n Works well. \n", "4.5 out of 5", " ann ").element();
    let record = extractor().extract_record(&element, &testing::schema()).await;

    assert_eq!(record.title, "Great");
    assert_eq!(record.body, "Works well.");
    assert_eq!(record.rating, 4.5);
    assert_eq!(record.reviewer, "ann");
    assert!(record.is_retainable());
}

#[tokio::test]
async fn test_missing_fields_default() {
    let element = FakeReview::new().with(BODY, "Just the body").element();
    let record = extractor().extract_record(&element, &testing::schema()).await;

    assert_eq!(record.title, "");
    assert_eq!(record.body, "Just the body");
    assert_eq!(record.rating, 0.0);
    assert_eq!(record.reviewer, "");
}

#[tokio::test]
async fn test_null_text_is_absent() {
    let element = FakeReview::full("t", "b", "5", "r")
        .with_null_text(TITLE)
        .element();
    let record = extractor().extract_record(&element, &testing::schema()).await;
    assert_eq!(record.title, "");
    assert_eq!(record.body, "b");
}

#[tokio::test]
async fn test_failures_are_contained_per_field() {
    let element = FakeReview::full("t", "b", "3", "r")
        .with_failing_query(TITLE)
        .with_failing_text(REVIEWER)
        .element();
    let record = extractor().extract_record(&element, &testing::schema()).await;

    assert_eq!(record.title, "");
    assert_eq!(record.reviewer, "");
    assert_eq!(record.body, "b");
    assert_eq!(record.rating, 3.0);
}

#[tokio::test]
async fn test_unparseable_rating_is_zero() {
    let element = FakeReview::full("t", "b", "★★★★☆", "r").element();
    let record = extractor().extract_record(&element, &testing::schema()).await;
    assert_eq!(record.rating, 0.0);
    assert!(!record.has_rating());
}

#[tokio::test]
async fn test_failing_rating_is_zero() {
    let element = FakeReview::full("t", "b", "4", "r")
        .with_failing_query(RATING)
        .element();
    let record = extractor().extract_record(&element, &testing::schema()).await;
    assert_eq!(record.rating, 0.0);
}

#[tokio::test(start_paused = true)]
async fn test_hanging_field_times_out_to_default() {
    let element = FakeReview::full("t", "b", "2", "r")
        .with_hanging(BODY)
        .element();
    let record = extractor().extract_record(&element, &testing::schema()).await;

    assert_eq!(record.body, "");
    assert_eq!(record.title, "t");
    assert!(!record.is_retainable());
}

#[tokio::test]
async fn test_lookup_variants() {
    let element = FakeReview::new()
        .with(TITLE, "x")
        .with_failing_query(BODY)
        .element();
    let timeout = Duration::from_secs(1);

    assert!(matches!(
        FieldLookup::text_of(&element, TITLE, timeout).await,
        FieldLookup::Found(ref t) if t == "x"
    ));
    assert!(matches!(
        FieldLookup::text_of(&element, ".nothing", timeout).await,
        FieldLookup::Absent
    ));
    assert!(matches!(
        FieldLookup::text_of(&element, BODY, timeout).await,
        FieldLookup::Failed(FieldLookupError::Query(_))
    ));
}

#[test]
fn test_into_text_and_rating() {
    assert_eq!(
        FieldLookup::Found(" 4.0 stars ".to_string()).into_rating(LocatorKey::Rating),
        4.0
    );
    assert_eq!(FieldLookup::Absent.into_text(LocatorKey::Title), "");
    let failed = FieldLookup::Failed(FieldLookupError::Timeout { timeout_secs: 1 });
    assert_eq!(failed.into_rating(LocatorKey::Rating), 0.0);
}
