// Unit tests for SizeFit Algo

use sizefit_algo::core::{
    confidence_from_distance, cosine_similarity, measurement_distance, normalize_profile,
    parse_chart, select_size, synthesize_size_variants, ParseError, ProductEmbedding, StyleRanker,
};
use sizefit_algo::models::{MeasurementValue, SizeChart, SizeMeasurements, UserMeasurements};

fn user(entries: &[(&str, f64)]) -> UserMeasurements {
    entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn size_row(entries: &[(&str, f64)]) -> SizeMeasurements {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), MeasurementValue::Number(*v)))
        .collect()
}

#[test]
fn test_parse_nested_json_chart() {
    let parsed = parse_chart(r#"{"S": {"Waist": 68.58}, "M": {"Waist": 73.66}}"#).unwrap();

    assert_eq!(parsed.chart.len(), 2);
    let small = &parsed.chart.sizes["S"];
    assert_eq!(small["waist"].as_number(), Some(68.58));
}

#[test]
fn test_parse_python_literal_chart() {
    // Single quotes, python booleans and None must all decode.
    let parsed =
        parse_chart("{'S': {'waist': 68.58, 'stretch': True, 'note': None}}").unwrap();

    let small = &parsed.chart.sizes["S"];
    assert_eq!(small["waist"].as_number(), Some(68.58));
    // Booleans survive as text metadata; nulls are dropped with an issue.
    assert_eq!(small["stretch"], MeasurementValue::Text("true".to_string()));
    assert!(!small.contains_key("note"));
    assert_eq!(parsed.issues.len(), 1);
}

#[test]
fn test_parse_quoted_numeric_strings() {
    let parsed = parse_chart(r#"{"M": {"waist": "73.66\"", "hip": "'96.52'"}}"#).unwrap();

    let medium = &parsed.chart.sizes["M"];
    assert_eq!(medium["waist"].as_number(), Some(73.66));
    assert_eq!(medium["hip"].as_number(), Some(96.52));
}

#[test]
fn test_parse_list_format_chart() {
    let parsed = parse_chart(
        r#"[{"size": "S", "measurements": {"waist": 68.58}},
            {"size": "M", "measurements": {"waist": 73.66}}]"#,
    )
    .unwrap();

    assert_eq!(parsed.chart.len(), 2);
    assert_eq!(parsed.chart.sizes["M"]["waist"].as_number(), Some(73.66));
}

#[test]
fn test_parse_list_records_need_a_measurements_object() {
    // Top-level measurement fields on a list record are not recognized;
    // every record is skipped and the chart comes out empty.
    let result = parse_chart(
        r#"[{"size": "S", "waist": 68.58}, {"size": "M", "waist": 73.66}]"#,
    );

    assert!(matches!(result, Err(ParseError::NoUsableMeasurements)));
}

#[test]
fn test_parse_flat_format_synthesizes_sizes() {
    let parsed = parse_chart(r#"{"waist": 70, "sizes": ["S", "M", "L"]}"#).unwrap();

    // Base values anchor at M and step by 5 per ladder position.
    assert_eq!(parsed.chart.sizes["S"]["waist"].as_number(), Some(65.0));
    assert_eq!(parsed.chart.sizes["M"]["waist"].as_number(), Some(70.0));
    assert_eq!(parsed.chart.sizes["L"]["waist"].as_number(), Some(75.0));
}

#[test]
fn test_parse_rejects_garbage() {
    assert!(matches!(parse_chart(""), Err(ParseError::EmptyInput)));
    assert!(matches!(
        parse_chart("{'S': {'waist':"),
        Err(ParseError::Decode(_))
    ));
    assert!(matches!(
        parse_chart(r#"{"S": {"fit": "slim"}}"#),
        Err(ParseError::NoUsableMeasurements)
    ));
}

#[test]
fn test_synthesize_anchors_midpoint_without_m() {
    let base = user(&[("waist", 70.0)]);
    let chart = synthesize_size_variants(
        &base,
        &["XS".to_string(), "S".to_string(), "L".to_string(), "XL".to_string()],
    );

    // No M label: the anchor falls on the midpoint index (len/2).
    assert_eq!(chart.sizes["L"]["waist"].as_number(), Some(70.0));
    assert_eq!(chart.sizes["XS"]["waist"].as_number(), Some(60.0));
    assert_eq!(chart.sizes["XL"]["waist"].as_number(), Some(75.0));
}

#[test]
fn test_normalize_profile_lowercases_and_coerces() {
    let raw = serde_json::json!({"Waist": "28\"", "Bust": 34, "note": "curvy"});
    let profile = normalize_profile(raw.as_object().unwrap()).unwrap();

    assert_eq!(profile.get("waist"), Some(&28.0));
    assert_eq!(profile.get("bust"), Some(&34.0));
    assert!(!profile.contains_key("note"));
}

#[test]
fn test_distance_undefined_without_weighted_overlap() {
    // shoulder is not in the weight table, so no overlap exists.
    let result = measurement_distance(
        &user(&[("shoulder", 15.0)]),
        &size_row(&[("shoulder", 38.0)]),
    );
    assert!(result.is_none());
}

#[test]
fn test_distance_weighted_average() {
    // waist off by 1 in (w=3), bust exact (w=2): (3*1 + 2*0) / 5 = 0.6
    let result = measurement_distance(
        &user(&[("waist", 28.0), ("bust", 34.0)]),
        &size_row(&[("waist", 68.58), ("bust", 86.36)]),
    )
    .unwrap();

    assert!((result.distance - 0.6).abs() < 1e-9);
    assert_eq!(result.shared_keys, 2);
}

#[test]
fn test_confidence_boundaries() {
    assert_eq!(confidence_from_distance(0.0), 0.98);
    assert_eq!(confidence_from_distance(-1.0), 0.98);
    assert!((confidence_from_distance(3.0) - 0.5).abs() < 1e-9);
    assert_eq!(confidence_from_distance(6.0), 0.30);
    assert_eq!(confidence_from_distance(100.0), 0.30);
}

#[test]
fn test_confidence_monotonically_non_increasing() {
    let mut previous = confidence_from_distance(0.0);
    for step in 1..=120 {
        let current = confidence_from_distance(step as f64 * 0.1);
        assert!(current <= previous);
        previous = current;
    }
}

#[test]
fn test_select_size_tie_break_is_stable() {
    let mut chart = SizeChart::default();
    chart
        .sizes
        .insert("L".to_string(), size_row(&[("waist", 73.66)]));
    chart
        .sizes
        .insert("S".to_string(), size_row(&[("waist", 68.58)]));

    // 28 in sits exactly between 27 and 29: S wins on ladder order.
    for _ in 0..10 {
        let selected = select_size(&user(&[("waist", 28.0)]), &chart).unwrap();
        assert_eq!(selected.label, "S");
    }
}

#[test]
fn test_cosine_similarity_basics() {
    assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
    assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
    // Mismatched dimensions degrade to zero, not panic.
    assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0]), 0.0);
}

#[test]
fn test_style_ranker_orders_by_similarity() {
    let ranker = StyleRanker::new(vec![
        ProductEmbedding {
            product_id: "orthogonal".to_string(),
            vector: vec![0.0, 1.0],
        },
        ProductEmbedding {
            product_id: "aligned".to_string(),
            vector: vec![1.0, 0.0],
        },
    ]);

    let ranked = ranker.rank(&[vec![1.0, 0.0]], 10).unwrap();
    assert_eq!(ranked[0].product_id, "aligned");
    assert!(ranked[0].similarity > ranked[1].similarity);
}
