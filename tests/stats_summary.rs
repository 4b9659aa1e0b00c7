use exploralytics::models::Column;
use exploralytics::stats::{self, summarize};

#[test]
fn summary_handles_missing_and_median_even_odd() {
    // [1,2,3,4] -> median = (2+3)/2 = 2.5
    let a = summarize(&[Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);
    assert_eq!(a.count, 4);
    assert_eq!(a.missing, 0);
    assert_eq!(a.min, Some(1.0));
    assert_eq!(a.max, Some(4.0));
    assert!((a.mean.unwrap() - 2.5).abs() < 1e-9);
    assert!((a.median.unwrap() - 2.5).abs() < 1e-9);

    // [10, None, 30, NaN] -> two missing, median = 20
    let b = summarize(&[Some(10.0), None, Some(30.0), Some(f64::NAN)]);
    assert_eq!(b.count, 2);
    assert_eq!(b.missing, 2);
    assert!((b.median.unwrap() - 20.0).abs() < 1e-9);
}

#[test]
fn all_missing_summary_is_empty() {
    let s = summarize(&[None, None]);
    assert_eq!(s.count, 0);
    assert_eq!(s.missing, 2);
    assert_eq!(s.mean, None);
    assert!(stats::mean(&[None]).is_err());
    assert!(stats::median(&[]).is_err());
}

#[test]
fn pearson_uses_pairwise_complete_rows() {
    let a = [Some(1.0), Some(2.0), None, Some(3.0)];
    let b = [Some(2.0), Some(4.0), Some(100.0), Some(6.0)];
    let r = stats::pearson(&a, &b).unwrap();
    assert!((r - 1.0).abs() < 1e-12);

    // one pair is not enough
    assert_eq!(stats::pearson(&[Some(1.0), None], &[Some(1.0), Some(2.0)]), None);
}

#[test]
fn value_counts_ties_keep_first_appearance() {
    let col = Column::text(
        "c",
        ["b", "a", "b", "a", "c"]
            .iter()
            .map(|s| Some(s.to_string()))
            .chain(std::iter::once(None))
            .collect(),
    );
    let counts = stats::value_counts(&col);
    assert_eq!(
        counts,
        vec![("b".to_string(), 2), ("a".to_string(), 2), ("c".to_string(), 1)]
    );
}
