use badpix_algorithms::{detect, BadPixelDetector, DetectionConfig};
use badpix_core::{
    AcquisitionParams, Error, Frame, FrameSource, Result, SectorThresholds, SensorConfig,
    SensorGeometry,
};
use std::cell::Cell;
use std::collections::HashMap;

/// In-memory frame source that can fail on one frame and counts requests.
struct MockFrames {
    frames: HashMap<u32, Frame>,
    fail_on: Option<u32>,
    requests: Cell<usize>,
}

impl MockFrames {
    fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames: (0u32..).zip(frames).collect(),
            fail_on: None,
            requests: Cell::new(0),
        }
    }

    fn failing_on(mut self, index: u32) -> Self {
        self.fail_on = Some(index);
        self
    }
}

impl FrameSource for MockFrames {
    fn frame(&self, _location: &str, index: u32) -> Result<Frame> {
        self.requests.set(self.requests.get() + 1);
        if self.fail_on == Some(index) {
            return Err(Error::Acquisition {
                frame: index,
                message: "read timeout".to_string(),
            });
        }
        self.frames
            .get(&index)
            .cloned()
            .ok_or_else(|| Error::Acquisition {
                frame: index,
                message: "no such frame".to_string(),
            })
    }
}

// 4 rows x 6 columns, three sectors of two columns.
fn geometry() -> SensorGeometry {
    SensorGeometry::new(4, 6, 2).unwrap()
}

fn thresholds() -> SectorThresholds {
    SectorThresholds::new()
        .with_threshold(0, 10)
        .with_threshold(1, 20)
        .with_threshold(2, 30)
}

fn pedestal() -> Frame {
    Frame::filled(24, 100)
}

#[test]
fn test_threshold_boundary_is_strict() {
    let mut frame = pedestal();
    frame.set(0, 110).unwrap(); // exactly the sector 0 threshold
    frame.set(1, 111).unwrap(); // threshold + 1
    frame.set(2, 80).unwrap(); // exactly the sector 1 threshold, below pedestal
    frame.set(3, 79).unwrap(); // threshold + 1, below pedestal
    frame.set(5, 131).unwrap();

    let source = MockFrames::new(vec![frame]);
    let params = AcquisitionParams::new(0, 0, "dark");
    let detector = BadPixelDetector::new(geometry(), thresholds()).with_parallel(false);
    let frequencies = detector.detect(&source, &params, &pedestal()).unwrap();

    assert_eq!(frequencies.pixels().collect::<Vec<_>>(), vec![1, 3, 5]);
}

#[test]
fn test_frequency_accumulates_over_frames() {
    let frames: Vec<Frame> = (0..5)
        .map(|i| {
            let mut frame = pedestal();
            frame.set(7, 200).unwrap();
            if i % 2 == 0 {
                frame.set(20, 0).unwrap();
            }
            frame
        })
        .collect();

    let source = MockFrames::new(frames);
    let params = AcquisitionParams::new(0, 4, "dark");
    let frequencies = BadPixelDetector::new(geometry(), thresholds())
        .detect(&source, &params, &pedestal())
        .unwrap();

    assert_eq!(frequencies.count(7), 5);
    assert_eq!(frequencies.count(20), 3);
    assert_eq!(frequencies.len(), 2);
    assert_eq!(frequencies.frames_scanned(), 5);
}

#[test]
fn test_frame_failure_aborts_scan() {
    let frames: Vec<Frame> = (0..11).map(|_| pedestal()).collect();
    let source = MockFrames::new(frames).failing_on(5);
    let params = AcquisitionParams::new(0, 10, "dark");

    let detector = BadPixelDetector::new(geometry(), thresholds());
    let result = detector.detect(&source, &params, &pedestal());

    assert!(matches!(result, Err(Error::Acquisition { frame: 5, .. })));
    // Frames after the failure are never requested.
    assert_eq!(source.requests.get(), 6);
}

#[test]
fn test_missing_threshold_fails_before_reading_frames() {
    let source = MockFrames::new(vec![pedestal()]);
    let params = AcquisitionParams::new(0, 0, "dark");
    let partial = SectorThresholds::new()
        .with_threshold(0, 10)
        .with_threshold(1, 20);

    let detector = BadPixelDetector::new(geometry(), partial);
    let result = detector.detect(&source, &params, &pedestal());

    assert!(matches!(result, Err(Error::MissingThreshold { sector: 2 })));
    assert_eq!(source.requests.get(), 0);
}

#[test]
fn test_wrong_sized_frame_is_acquisition_failure() {
    let source = MockFrames::new(vec![Frame::zeros(23)]);
    let params = AcquisitionParams::new(0, 0, "dark");
    let detector = BadPixelDetector::new(geometry(), thresholds());
    let result = detector.detect(&source, &params, &pedestal());
    assert!(matches!(result, Err(Error::Acquisition { frame: 0, .. })));
}

#[test]
fn test_wrong_sized_pedestal() {
    let source = MockFrames::new(vec![pedestal()]);
    let params = AcquisitionParams::new(0, 0, "dark");
    let result =
        BadPixelDetector::new(geometry(), thresholds()).detect(&source, &params, &Frame::zeros(3));
    assert!(matches!(result, Err(Error::FrameSizeMismatch { .. })));
}

#[test]
fn test_empty_range() {
    let source = MockFrames::new(vec![]);
    let params = AcquisitionParams::new(3, 2, "dark");
    let frequencies = BadPixelDetector::new(geometry(), thresholds())
        .detect(&source, &params, &pedestal())
        .unwrap();
    assert!(frequencies.is_empty());
    assert_eq!(source.requests.get(), 0);
}

#[test]
fn test_parallel_matches_sequential() {
    let geometry = SensorGeometry::new(32, 48, 16).unwrap();
    let thresholds = SectorThresholds::uniform(&geometry, 50);
    let pedestal = Frame::filled(geometry.len(), 1000);

    let frames: Vec<Frame> = (0..6i32)
        .map(|f| {
            (0..geometry.len())
                .map(|pixel| {
                    let pixel = i32::try_from(pixel).unwrap();
                    1000 + ((pixel * 37 + f * 11) % 160) - 80
                })
                .collect()
        })
        .collect();
    let source = MockFrames::new(frames);
    let params = AcquisitionParams::new(0, 5, "dark");

    let sequential = BadPixelDetector::new(geometry, thresholds.clone())
        .with_parallel(false)
        .detect(&source, &params, &pedestal)
        .unwrap();
    let parallel = BadPixelDetector::new(geometry, thresholds)
        .with_parallel(true)
        .detect(&source, &params, &pedestal)
        .unwrap();

    assert!(!sequential.is_empty());
    assert_eq!(sequential, parallel);
}

#[test]
fn test_detect_applies_min_frequency() {
    let frames: Vec<Frame> = (0..4)
        .map(|i| {
            let mut frame = pedestal();
            frame.set(9, 500).unwrap();
            if i == 0 {
                frame.set(14, 500).unwrap();
            }
            frame
        })
        .collect();
    let source = MockFrames::new(frames);
    let params = AcquisitionParams::new(0, 3, "dark");
    let sensor = SensorConfig::new(geometry()).with_thresholds(thresholds());
    let detection = DetectionConfig {
        parallel: false,
        min_frequency: 2,
    };

    let outcome = detect(&source, &params, &pedestal(), &sensor, &detection).unwrap();

    assert_eq!(outcome.frequencies.len(), 2);
    assert_eq!(outcome.bad_pixels.iter().collect::<Vec<_>>(), vec![9]);
}

#[test]
fn test_detect_rejects_incomplete_config() {
    let source = MockFrames::new(vec![pedestal()]);
    let params = AcquisitionParams::new(0, 0, "dark");
    let sensor = SensorConfig::new(geometry());
    let detection = DetectionConfig::default();
    let result = detect(&source, &params, &pedestal(), &sensor, &detection);
    assert!(matches!(result, Err(Error::MissingThreshold { sector: 0 })));
}
