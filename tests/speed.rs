use plate_speed::speed::SpeedOutput;
use plate_speed::{FrameHeightRecord, MeasureError, SpeedEstimator, SpeedParams};

const LENS_FACTOR: f64 = 343.0;
const FRAME_RATE: f64 = 60.0;

fn estimator() -> SpeedEstimator {
    SpeedEstimator::new(SpeedParams::default()).expect("valid calibration")
}

fn records(heights: &[Option<f64>]) -> Vec<FrameHeightRecord> {
    heights
        .iter()
        .enumerate()
        .map(|(i, &h)| FrameHeightRecord::new(i, h))
        .collect()
}

/// Apparent heights of a plate starting `start_m` away and closing in at
/// `speed_mps`.
fn approaching(frames: usize, start_m: f64, speed_mps: f64) -> Vec<Option<f64>> {
    (0..frames)
        .map(|i| Some(LENS_FACTOR / (start_m - speed_mps * i as f64 / FRAME_RATE)))
        .collect()
}

fn assert_close(actual: f64, expected: f64, rel: f64) {
    assert!(
        (actual - expected).abs() <= rel * expected.abs().max(1.0),
        "{actual} != {expected}"
    );
}

#[test]
fn constant_speed_is_recovered() {
    let _ = env_logger::builder().is_test(true).try_init();
    let heights = approaching(20, 12.0, 12.5);
    let e = estimator().estimate(&records(&heights)).expect("measured");
    assert_close(e.velocity_kmh, 45.0, 1e-9);
    assert_eq!(e.samples.len(), 19);
    for s in &e.samples {
        assert_close(s.velocity_kmh, 45.0, 1e-9);
    }
    assert_eq!((e.first_frame, e.last_frame, e.measurements), (0, 19, 20));
}

#[test]
fn gaps_are_bridged_with_the_average_step() {
    let (h0, h3) = (30.0, 33.0);
    let recs = records(&[Some(h0), None, None, Some(h3)]);
    let e = estimator().estimate(&recs).expect("two heights");

    let per_frame = (LENS_FACTOR / h0 - LENS_FACTOR / h3) / 3.0 * FRAME_RATE * 3.6;
    assert_eq!(e.samples.len(), 3);
    let frames: Vec<usize> = e.samples.iter().map(|s| s.frame_index).collect();
    assert_eq!(frames, vec![1, 2, 3]);
    for s in &e.samples {
        assert_close(s.velocity_kmh, per_frame, 1e-12);
    }
    assert_close(e.velocity_kmh, per_frame, 1e-12);
    assert_eq!(e.measurements, 2);
}

#[test]
fn gaps_keep_constant_speed_exact() {
    let mut heights = approaching(12, 10.0, 15.0);
    for i in [2, 5, 6, 9] {
        heights[i] = None;
    }
    let e = estimator().estimate(&records(&heights)).expect("measured");
    assert_close(e.velocity_kmh, 54.0, 1e-9);
    assert_eq!(e.samples.len(), 11);
    assert_eq!(e.measurements, 8);
}

#[test]
fn unmeasured_frames_at_the_ends_are_ignored() {
    let core = [Some(30.0), Some(30.5), None, Some(31.8), Some(32.0)];
    let mut padded = vec![None, None];
    padded.extend_from_slice(&core);
    padded.extend_from_slice(&[None, None, None]);

    let est = estimator();
    let trimmed = est.estimate(&records(&core)).expect("measured");
    let full = est.estimate(&records(&padded)).expect("measured");
    assert_close(full.velocity_kmh, trimmed.velocity_kmh, 1e-12);
    assert_eq!(full.samples.len(), trimmed.samples.len());
    assert_eq!((full.first_frame, full.last_frame), (2, 6));
    assert_eq!(
        est.estimate_speed(&records(&padded)).expect("measured"),
        full.velocity_kmh
    );
}

#[test]
fn fewer_than_two_heights_is_an_error() {
    let est = estimator();
    for (heights, found) in [
        (vec![], 0),
        (vec![None, None], 0),
        (vec![None, Some(30.0), None], 1),
        (vec![Some(f64::INFINITY), Some(31.0)], 1),
    ] {
        assert_eq!(
            est.estimate(&records(&heights)),
            Err(MeasureError::NoValidMeasurements { found }),
            "{heights:?}"
        );
    }
}

#[test]
fn receding_vehicle_reports_magnitude_when_asked() {
    let mut heights = approaching(6, 8.0, 10.0);
    heights.reverse();
    let recs = records(&heights);

    let signed = estimator().estimate_speed(&recs).expect("measured");
    assert_close(signed, -36.0, 1e-9);

    let magnitude = SpeedEstimator::new(SpeedParams {
        output: SpeedOutput::Magnitude,
        ..SpeedParams::default()
    })
    .expect("valid calibration")
    .estimate_speed(&recs)
    .expect("measured");
    assert_close(magnitude, 36.0, 1e-9);
}
