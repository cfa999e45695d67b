use badpix_algorithms::{correct, BadPixelCorrector, CorrectionSummary};
use badpix_core::{BadPixelSet, Frame, SensorConfig, SensorGeometry};

// 5x5 grid whose sample at each pixel equals 100 + index.
fn ramp_frame() -> Frame {
    (0..25).map(|pixel| 100 + pixel).collect()
}

fn grid_5x5() -> SensorGeometry {
    SensorGeometry::new(5, 5, 5).unwrap()
}

#[test]
fn test_known_neighbor_average() {
    // Pixel 12 sits in the middle. Five of its eight neighbors are bad,
    // leaving 11, 13 and 17 with values 10, 20 and 30.
    let mut frame = Frame::zeros(25);
    frame.set(11, 10).unwrap();
    frame.set(13, 20).unwrap();
    frame.set(17, 30).unwrap();
    frame.set(12, 9999).unwrap();

    let bad: BadPixelSet = [12, 6, 7, 8, 16, 18].into_iter().collect();
    let corrector = BadPixelCorrector::new(grid_5x5());
    corrector.correct(&bad, &mut frame).unwrap();

    assert_eq!(frame.get(12), Some(20));
}

#[test]
fn test_integer_truncation() {
    // Neighbors of pixel 0 are 1, 5 and 6.
    let mut frame = Frame::zeros(25);
    frame.set(1, 1).unwrap();
    frame.set(5, 1).unwrap();
    frame.set(6, 2).unwrap();

    let bad: BadPixelSet = [0].into_iter().collect();
    BadPixelCorrector::new(grid_5x5())
        .correct(&bad, &mut frame)
        .unwrap();

    assert_eq!(frame.get(0), Some(1));
}

#[test]
fn test_adjacent_bad_pixels_excluded() {
    let mut frame = ramp_frame();
    frame.set(12, 50_000).unwrap();
    frame.set(13, -50_000).unwrap();

    let bad: BadPixelSet = [12, 13].into_iter().collect();
    BadPixelCorrector::new(grid_5x5())
        .correct(&bad, &mut frame)
        .unwrap();

    // Pixel 12 averages 6, 7, 8, 11, 16, 17, 18 only.
    let expected_12 = (106 + 107 + 108 + 111 + 116 + 117 + 118) / 7;
    // Pixel 13 averages 7, 8, 9, 14, 17, 18, 19 only.
    let expected_13 = (107 + 108 + 109 + 114 + 117 + 118 + 119) / 7;
    assert_eq!(frame.get(12), Some(expected_12));
    assert_eq!(frame.get(13), Some(expected_13));
}

#[test]
fn test_healthy_pixels_untouched() {
    let original = ramp_frame();
    let mut frame = original.clone();
    let bad: BadPixelSet = [3, 20].into_iter().collect();
    BadPixelCorrector::new(grid_5x5())
        .correct(&bad, &mut frame)
        .unwrap();

    for pixel in (0..25).filter(|p| !bad.contains(*p)) {
        assert_eq!(frame.get(pixel), original.get(pixel));
    }
}

#[test]
fn test_surrounded_pixel_defaults_to_zero() {
    let mut frame = ramp_frame();
    // Pixel 0 with all three of its neighbors bad.
    let bad: BadPixelSet = [0, 1, 5, 6].into_iter().collect();
    let summary = BadPixelCorrector::new(grid_5x5())
        .correct(&bad, &mut frame)
        .unwrap();

    assert_eq!(frame.get(0), Some(0));
    assert_eq!(summary.without_neighbors, 1);
    assert_eq!(summary.corrected, 3);
}

#[test]
fn test_single_pixel_grid_defaults_to_zero() {
    let geometry = SensorGeometry::new(1, 1, 1).unwrap();
    let mut frame = Frame::new(vec![42]);
    let bad: BadPixelSet = [0].into_iter().collect();
    let summary = BadPixelCorrector::new(geometry)
        .correct(&bad, &mut frame)
        .unwrap();
    assert_eq!(frame.get(0), Some(0));
    assert_eq!(summary.without_neighbors, 1);
}

#[test]
fn test_out_of_range_bad_pixels_skipped() {
    let mut frame = ramp_frame();
    let bad: BadPixelSet = [12, 25, 1000].into_iter().collect();
    let summary = BadPixelCorrector::new(grid_5x5())
        .correct(&bad, &mut frame)
        .unwrap();

    assert_eq!(
        summary,
        CorrectionSummary {
            corrected: 1,
            without_neighbors: 0,
            skipped: 2
        }
    );
    assert_eq!(frame.get(12), Some(112));
}

#[test]
fn test_result_independent_of_insertion_order() {
    // A diagonal run of bad pixels whose neighborhoods overlap.
    let forward: BadPixelSet = [6, 12, 18, 13].into_iter().collect();
    let backward: BadPixelSet = [13, 18, 12, 6].into_iter().collect();

    let mut a = ramp_frame();
    let mut b = ramp_frame();
    let corrector = BadPixelCorrector::new(grid_5x5());
    corrector.correct(&forward, &mut a).unwrap();
    corrector.correct(&backward, &mut b).unwrap();

    assert_eq!(a, b);
}

#[test]
fn test_frame_size_mismatch() {
    let mut frame = Frame::zeros(24);
    let bad: BadPixelSet = [1].into_iter().collect();
    assert!(BadPixelCorrector::new(grid_5x5())
        .correct(&bad, &mut frame)
        .is_err());
}

#[test]
fn test_correct_frames_matches_single() {
    let corrector = BadPixelCorrector::new(grid_5x5());
    let bad: BadPixelSet = [0, 12, 24].into_iter().collect();

    let mut frames: Vec<Frame> = (0..8)
        .map(|offset| (0..25).map(|pixel| pixel * offset).collect())
        .collect();
    let mut expected = frames.clone();
    for frame in &mut expected {
        corrector.correct(&bad, frame).unwrap();
    }

    let summary = corrector.correct_frames(&bad, &mut frames).unwrap();
    assert_eq!(frames, expected);
    assert_eq!(summary.corrected, 24);
}

#[test]
fn test_correct_with_sensor_config() {
    let sensor = SensorConfig::new(grid_5x5()).with_uniform_threshold(10);
    let mut frame = ramp_frame();
    let bad: BadPixelSet = [12].into_iter().collect();
    let summary = correct(&sensor, &bad, &mut frame).unwrap();
    assert_eq!(summary.corrected, 1);
    assert_eq!(frame.get(12), Some(112));
}
