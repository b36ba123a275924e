use super::*;

#[test]
fn listing_keeps_insertion_order_and_records_fetches() {
    let mut src = InMemorySource::new();
    src.insert("/anon/gen/radar", "b.png", vec![2]).unwrap();
    src.insert("anon/gen/radar", "a.png", vec![1]).unwrap();
    src.insert("anon/gen/radar", "b.png", vec![3]).unwrap();

    assert_eq!(
        src.list_names("anon/gen/radar").unwrap(),
        vec!["b.png".to_string(), "a.png".to_string()]
    );
    assert_eq!(src.fetch_bytes("/anon/gen/radar", "b.png").unwrap(), vec![3]);
    assert_eq!(src.fetches(), &["b.png".to_string()]);
}

#[test]
fn unknown_entries_fail_with_retrieval() {
    let mut src = InMemorySource::new();
    src.insert("x", "a.png", vec![]).unwrap();
    assert!(matches!(src.list_names("y"), Err(RadarError::Retrieval(_))));
    assert!(matches!(
        src.fetch_bytes("x", "b.png"),
        Err(RadarError::Retrieval(_))
    ));
}

#[test]
fn insert_rejects_unreachable_directories() {
    let mut src = InMemorySource::new();
    let err = src.insert("anon/../../etc", "a.png", vec![1]).unwrap_err();
    assert!(err.to_string().contains(".."));
    assert!(src.list_names("anon/../../etc").is_err());
    assert!(src.fetches().is_empty());
}
