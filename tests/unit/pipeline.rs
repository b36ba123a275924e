use std::io::Cursor;

use super::*;
use crate::source::memory::InMemorySource;
use crate::source::staging::NullStaging;

fn png(width: u32, height: u32, straight_rgba: [u8; 4]) -> Vec<u8> {
    let data: Vec<u8> = (0..width * height).flat_map(|_| straight_rgba).collect();
    let img = image::RgbaImage::from_raw(width, height, data).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn source_with(cfg: &BuildConfig, sweeps: &[&str]) -> InMemorySource {
    let mut src = InMemorySource::new();
    for (i, layer) in cfg.layers.iter().enumerate() {
        let color = if i == 0 {
            [20, 40, 60, 255]
        } else {
            [0, 0, 0, 0]
        };
        src.insert(&cfg.overlay_dir, cfg.overlay_file_name(layer), png(4, 4, color))
            .unwrap();
    }
    for name in sweeps {
        src.insert(&cfg.sweep_dir, *name, png(4, 4, [255, 0, 0, 255]))
            .unwrap();
    }
    src
}

#[derive(Default)]
struct RecordingSink {
    labels: Vec<String>,
}

impl StagingSink for RecordingSink {
    fn stage(&mut self, label: &str, _bytes: &[u8]) -> RadarResult<()> {
        self.labels.push(label.to_string());
        Ok(())
    }
}

#[test]
fn builds_frames_in_timestamp_order() {
    let mut cfg = BuildConfig::new("IDR713", "IDR71B");
    cfg.frame_count = 2;
    let mut src = source_with(
        &cfg,
        &[
            "IDR71B.T.300.png",
            "IDR71B.T.100.png",
            "IDR713.T.400.png",
            "IDR71B.T.200.png",
        ],
    );

    let out = build_animation(&cfg, &mut src, &mut NullStaging).unwrap();
    assert_eq!(out.sweeps, vec!["IDR71B.T.200.png", "IDR71B.T.300.png"]);
    assert_eq!(out.bounds, Bounds::new(4, 4));
    assert_eq!(&out.gif[..6], b"GIF89a");

    // overlays first (in layer order), then sweeps oldest first
    assert_eq!(
        src.fetches(),
        &[
            "IDR713.background.png",
            "IDR713.catchments.png",
            "IDR713.waterways.png",
            "IDR713.locations.png",
            "IDR71B.T.200.png",
            "IDR71B.T.300.png",
        ]
    );
}

#[test]
fn no_matching_sweeps_is_a_selection_error() {
    let cfg = BuildConfig::new("IDR713", "IDR71B");
    let mut src = source_with(&cfg, &["IDR023.T.100.png"]);
    let err = build_animation(&cfg, &mut src, &mut NullStaging).unwrap_err();
    assert!(matches!(err, RadarError::Selection(_)));
    assert!(err.to_string().contains("IDR71B"));
}

#[test]
fn missing_overlay_names_the_file() {
    let cfg = BuildConfig::new("IDR713", "IDR71B");
    let mut src = InMemorySource::new();
    src.insert(
        &cfg.overlay_dir,
        "IDR713.background.png",
        png(4, 4, [0, 0, 0, 255]),
    )
    .unwrap();
    let err = build_animation(&cfg, &mut src, &mut NullStaging).unwrap_err();
    assert!(matches!(err, RadarError::Retrieval(_)));
    assert!(err.to_string().contains("IDR713.catchments.png"));
}

#[test]
fn corrupt_sweep_aborts_with_its_name() {
    let cfg = BuildConfig::new("IDR713", "IDR71B");
    let mut src = source_with(&cfg, &["IDR71B.T.100.png"]);
    src.insert(&cfg.sweep_dir, "IDR71B.T.200.png", b"\x89PNG garbage".to_vec())
        .unwrap();

    let err = build_animation(&cfg, &mut src, &mut NullStaging).unwrap_err();
    assert!(matches!(err, RadarError::Decode(_)));
    assert!(err.to_string().contains("IDR71B.T.200.png"));
}

#[test]
fn sweep_with_wrong_bounds_is_rejected() {
    let cfg = BuildConfig::new("IDR713", "IDR71B");
    let mut src = source_with(&cfg, &[]);
    src.insert(&cfg.sweep_dir, "IDR71B.T.100.png", png(5, 4, [0, 0, 255, 255]))
        .unwrap();

    let err = build_animation(&cfg, &mut src, &mut NullStaging).unwrap_err();
    assert!(matches!(err, RadarError::DimensionMismatch(_)));
}

#[test]
fn mismatched_overlay_bounds_are_rejected() {
    let cfg = BuildConfig::new("IDR713", "IDR71B");
    let mut src = source_with(&cfg, &["IDR71B.T.100.png"]);
    src.insert(
        &cfg.overlay_dir,
        cfg.overlay_file_name("waterways"),
        png(3, 4, [0, 0, 0, 0]),
    )
    .unwrap();
    let err = build_animation(&cfg, &mut src, &mut NullStaging).unwrap_err();
    assert!(matches!(err, RadarError::DimensionMismatch(_)));
    assert!(err.to_string().contains("waterways"));
}

#[test]
fn staging_receives_every_intermediate_when_enabled() {
    let mut cfg = BuildConfig::new("IDR713", "IDR71B");
    cfg.stage_intermediates = true;
    cfg.staging_dir = Some(std::env::temp_dir());
    let mut src = source_with(&cfg, &["IDR71B.T.100.png"]);

    let mut sink = RecordingSink::default();
    build_animation(&cfg, &mut src, &mut sink).unwrap();
    assert_eq!(
        sink.labels,
        vec![
            "background_image.png",
            "catchments_image.png",
            "waterways_image.png",
            "locations_image.png",
            BASE_IMAGE_LABEL,
            LOOP_GIF_LABEL,
        ]
    );
}

struct FailingSink {
    attempts: usize,
}

impl StagingSink for FailingSink {
    fn stage(&mut self, label: &str, _bytes: &[u8]) -> RadarResult<()> {
        self.attempts += 1;
        Err(RadarError::retrieval(format!("disk full writing '{label}'")))
    }
}

#[test]
fn failing_staging_never_aborts_the_build() {
    let mut cfg = BuildConfig::new("IDR713", "IDR71B");
    cfg.stage_intermediates = true;
    cfg.staging_dir = Some(std::env::temp_dir());
    cfg.frame_count = 3;
    let mut src = source_with(
        &cfg,
        &["IDR71B.T.100.png", "IDR71B.T.200.png", "IDR71B.T.300.png"],
    );

    let mut sink = FailingSink { attempts: 0 };
    let out = build_animation(&cfg, &mut src, &mut sink).unwrap();
    assert_eq!(out.sweeps.len(), 3);
    assert_eq!(&out.gif[..6], b"GIF89a");
    // four overlays, the base image, and the gif were all attempted
    assert_eq!(sink.attempts, 6);

    let mut decoder = gif::DecodeOptions::new()
        .read_info(out.gif.as_slice())
        .unwrap();
    let mut frames = 0;
    while decoder.read_next_frame().unwrap().is_some() {
        frames += 1;
    }
    assert_eq!(frames, 3);
}

#[test]
fn staging_is_skipped_when_disabled() {
    let cfg = BuildConfig::new("IDR713", "IDR71B");
    let mut src = source_with(&cfg, &["IDR71B.T.100.png"]);
    let mut sink = RecordingSink::default();
    build_animation(&cfg, &mut src, &mut sink).unwrap();
    assert!(sink.labels.is_empty());
}

#[test]
fn invalid_config_fails_before_any_fetch() {
    let mut cfg = BuildConfig::new("IDR713", "IDR71B");
    cfg.frame_count = 0;
    let mut src = source_with(&cfg, &["IDR71B.T.100.png"]);
    assert!(matches!(
        build_animation(&cfg, &mut src, &mut NullStaging),
        Err(RadarError::Validation(_))
    ));
    assert!(src.fetches().is_empty());
}
