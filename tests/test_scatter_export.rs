use advisor_scope::analysis::Filter;
use advisor_scope::export::{ScatterSeries, ScatterSpec, SeriesSource};
use advisor_scope::report::AdvisorReport;

const FIXTURE: &str = "tests/fixtures/picsar_sample.csv";

#[test]
fn test_series_covers_loops_with_data() {
    let report = AdvisorReport::from_file(FIXTURE).unwrap();
    let series = ScatterSeries::from_report(&report, &ScatterSpec::default());
    assert_eq!(series.len(), 4);
    assert_eq!(series.y.len(), 4);
    assert_eq!(series.labels.len(), 4);
    assert!((series.x[0] - 0.3307).abs() < 1e-9);
    assert!((series.y[0] - 5.04195).abs() < 1e-9);
}

#[test]
fn test_filtered_export_matches_reference_points() {
    let report = AdvisorReport::from_file(FIXTURE).unwrap();
    let spec = ScatterSpec {
        filters: vec![
            Filter::equals("file", "current_deposition.F90"),
            Filter::member_of("line", vec![2681, 2730, 9552]),
        ],
        size: SeriesSource::Key("selftime".to_string()),
        ..ScatterSpec::default()
    };
    let series = ScatterSeries::from_report(&report, &spec);
    assert_eq!(series.len(), 3);
    assert!((series.size[0] - 0.3624).abs() < 1e-9);
    assert!((series.size[1] - 0.1479).abs() < 1e-9);
    assert!((series.size[2] - 0.016).abs() < 1e-9);
    assert!(series.labels.iter().all(|l| l.contains("current_deposition.F90")));
}

#[test]
fn test_json_export_has_parallel_arrays() {
    let report = AdvisorReport::from_file(FIXTURE).unwrap();
    let series = ScatterSeries::from_report(&report, &ScatterSpec::default());

    let mut buf = Vec::new();
    series.write_json(&mut buf).unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&buf).unwrap();

    let n = parsed["x"].as_array().unwrap().len();
    for channel in ["y", "size", "color", "labels"] {
        assert_eq!(parsed[channel].as_array().unwrap().len(), n, "channel {channel}");
    }
    assert!(parsed["labels"][0]
        .as_str()
        .unwrap()
        .contains("depose_jxjyjz_esirkepov_n"));
}
