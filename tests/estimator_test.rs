use evo_stream::{Distance, EstimatorConfig, SampleSeries, StreamingEstimator, TriggerMode};

mod common;
use common::test_utils::sine_series;

fn estimator(window: Option<usize>, trigger: TriggerMode) -> StreamingEstimator {
    StreamingEstimator::new(EstimatorConfig {
        sample_rate_hz: 100.0,
        window,
        trigger,
    })
    .unwrap()
}

#[test]
fn test_five_hertz_sine() {
    let mut estimator = estimator(Some(200), TriggerMode::Batch { size: 200 });
    let estimate = sine_series(200, 1.0, 0.1, 5.0, 100.0)
        .into_iter()
        .filter_map(|sample| estimator.append(sample))
        .last()
        .expect("Expected an estimate after 200 samples");

    assert!((estimate.dominant_frequency_hz - 5.0).abs() < 1e-9);
    assert!((estimate.rate_per_minute - 300.0).abs() < 1e-6);
    assert_eq!(estimate.computed_at_sample_count, 200);
}

#[test]
fn test_zero_and_one_samples() {
    let mut estimator = estimator(None, TriggerMode::Continuous);
    assert_eq!(estimator.recompute(), None);
    assert_eq!(estimator.append(Distance::Measured(3.0)), None);
    assert_eq!(estimator.latest(), None);
}

#[test]
fn test_constant_series_has_no_periodicity() {
    let mut estimator = estimator(None, TriggerMode::Continuous);
    for _ in 0..128 {
        assert_eq!(estimator.append(Distance::Measured(1.25)), None);
    }
    assert_eq!(estimator.latest(), None);
}

#[test]
fn test_all_zero_series_has_no_periodicity() {
    let mut estimator = estimator(None, TriggerMode::Batch { size: 64 });
    for _ in 0..64 {
        assert_eq!(estimator.append(Distance::Measured(0.0)), None);
    }
}

#[test]
fn test_recompute_is_idempotent() {
    let mut estimator = estimator(Some(256), TriggerMode::Batch { size: 256 });
    for sample in sine_series(256, 2.0, 0.3, 12.5, 100.0) {
        estimator.append(sample);
    }
    let first = estimator.latest().expect("Expected an estimate");
    assert_eq!(estimator.recompute(), Some(first));
    assert_eq!(estimator.recompute(), Some(first));
}

#[test]
fn test_sentinels_hold_last_value() {
    let mut samples = sine_series(200, 1.0, 0.1, 5.0, 100.0);
    samples[40] = Distance::NoTarget;
    samples[90] = Distance::AboveRange;
    samples[130] = Distance::BelowRange;

    let mut estimator = estimator(Some(200), TriggerMode::Batch { size: 200 });
    let estimate = samples
        .into_iter()
        .filter_map(|sample| estimator.append(sample))
        .last()
        .expect("Sentinels still count towards the batch");
    assert!((estimate.dominant_frequency_hz - 5.0).abs() < 1e-9);
}

#[test]
fn test_leading_sentinels_do_not_count() {
    let mut estimator = estimator(None, TriggerMode::Batch { size: 4 });
    for _ in 0..10 {
        assert_eq!(estimator.append(Distance::NoTarget), None);
    }
    assert!(estimator.series().is_empty());
}

#[test]
fn test_sliding_window_tracks_new_rate() {
    // 128-sample window at 100 Hz: 12.5 Hz is bin 16, 25 Hz is bin 32.
    let mut estimator = estimator(Some(128), TriggerMode::Batch { size: 128 });
    for sample in sine_series(128, 1.0, 0.2, 12.5, 100.0) {
        estimator.append(sample);
    }
    let before = estimator.latest().expect("Expected a first estimate");
    assert!((before.dominant_frequency_hz - 12.5).abs() < 1e-9);

    let mut latest = None;
    for sample in sine_series(128, 1.0, 0.2, 25.0, 100.0) {
        if let Some(estimate) = estimator.append(sample) {
            latest = Some(estimate);
        }
    }
    let after = latest.expect("Expected a second estimate");
    assert!((after.dominant_frequency_hz - 25.0).abs() < 1e-9);
    assert_eq!(after.computed_at_sample_count, 256);
    assert_eq!(estimator.series().len(), 128);
}

#[test]
fn test_continuous_mode_reports_every_sample() {
    let mut estimator = estimator(Some(100), TriggerMode::Continuous);
    let estimates = sine_series(100, 0.5, 0.05, 10.0, 100.0)
        .into_iter()
        .filter_map(|sample| estimator.append(sample))
        .count();
    assert!(estimates > 90, "Only {} estimates", estimates);
}

#[test]
fn test_unbounded_window_keeps_estimating() {
    let mut estimator = estimator(None, TriggerMode::Continuous);
    let mut last = None;
    for sample in sine_series(400, 1.0, 0.1, 5.0, 100.0) {
        if let Some(estimate) = estimator.append(sample) {
            last = Some(estimate);
        }
    }
    let last = last.expect("Expected estimates from an unbounded window");
    assert!((last.dominant_frequency_hz - 5.0).abs() < 1e-9);
    assert_eq!(last.computed_at_sample_count, 400);
    assert_eq!(estimator.series().len(), 400);
    assert_eq!(estimator.series().capacity(), None);
}

#[test]
fn test_zero_capacity_series_still_accepts_samples() {
    let mut series = SampleSeries::new(Some(0));
    for value in [0.5, 0.75, 1.0] {
        assert!(series.push(Distance::Measured(value)));
    }
    assert_eq!(series.len(), 1);
    assert_eq!(series.iter().last(), Some(1.0));
}
