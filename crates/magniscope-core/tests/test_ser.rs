mod common;

use approx::assert_abs_diff_eq;
use magniscope_core::consts::DEFAULT_FPS;
use magniscope_core::error::MagniscopeError;
use magniscope_core::io::{load_video, SerReader};
use magniscope_core::video::ColorMode;

use common::{build_ser, make_clip, save_clip, write_ser};

#[test]
fn test_rgb_round_trip() {
    let tmp = tempfile::tempdir().unwrap();
    let clip = make_clip(3, 4, 5, 3);
    let path = save_clip(tmp.path(), "clip.ser", &clip);

    let loaded = load_video(&path).unwrap();
    assert_eq!(loaded.data.shape(), clip.data.shape());
    // 25 fps => 40000 us per frame, derived exactly from the trailer.
    assert_abs_diff_eq!(loaded.fps, 25.0, epsilon = 1e-9);

    for (a, b) in loaded.data.iter().zip(clip.data.iter()) {
        assert_abs_diff_eq!(a, b, epsilon = 1e-6);
    }
}

#[test]
fn test_mono_round_trip() {
    let tmp = tempfile::tempdir().unwrap();
    let clip = make_clip(2, 3, 3, 1);
    let path = save_clip(tmp.path(), "mono.ser", &clip);

    let reader = SerReader::open(&path).unwrap();
    assert_eq!(reader.header.color_mode().unwrap(), ColorMode::Mono);

    let loaded = load_video(&path).unwrap();
    assert_eq!(loaded.channels(), 1);
    for (a, b) in loaded.data.iter().zip(clip.data.iter()) {
        assert_abs_diff_eq!(a, b, epsilon = 1e-6);
    }
}

#[test]
fn test_bgr_container_loads_as_rgb() {
    let tmp = tempfile::tempdir().unwrap();
    // One 1x2 frame, pixels stored B,G,R.
    let frame = vec![
        255, 0, 0, // pure blue pixel
        0, 0, 255, // pure red pixel
    ];
    let data = build_ser(2, 1, 101, &[frame], None);
    let path = write_ser(tmp.path(), "bgr.ser", &data);

    let clip = load_video(&path).unwrap();
    assert_eq!(clip.channels(), 3);
    // First pixel: blue ends up in channel 2.
    assert_abs_diff_eq!(clip.data[[0, 0, 0, 2]], 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(clip.data[[0, 0, 0, 0]], 0.0, epsilon = 1e-6);
    // Second pixel: red ends up in channel 0.
    assert_abs_diff_eq!(clip.data[[0, 0, 1, 0]], 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(clip.data[[0, 0, 1, 2]], 0.0, epsilon = 1e-6);
}

#[test]
fn test_fps_defaults_without_trailer() {
    let tmp = tempfile::tempdir().unwrap();
    let frames = vec![vec![0u8; 4], vec![0u8; 4]];
    let data = build_ser(2, 2, 0, &frames, None);
    let path = write_ser(tmp.path(), "no_ts.ser", &data);

    let clip = load_video(&path).unwrap();
    assert_abs_diff_eq!(clip.fps, DEFAULT_FPS, epsilon = 1e-9);
}

#[test]
fn test_fps_from_trailer() {
    let tmp = tempfile::tempdir().unwrap();
    let frames = vec![vec![0u8; 4], vec![0u8; 4], vec![0u8; 4]];
    // 100000 us per frame => 10 fps.
    let data = build_ser(2, 2, 0, &frames, Some(&[0, 100_000, 200_000]));
    let path = write_ser(tmp.path(), "ts.ser", &data);

    let clip = load_video(&path).unwrap();
    assert_abs_diff_eq!(clip.fps, 10.0, epsilon = 1e-9);
}

#[test]
fn test_bad_magic_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let mut data = build_ser(2, 2, 0, &[vec![0u8; 4]], None);
    data[0] = b'X';
    let path = write_ser(tmp.path(), "bad_magic.ser", &data);

    assert!(matches!(
        SerReader::open(&path),
        Err(MagniscopeError::InvalidSer(_))
    ));
}

#[test]
fn test_truncated_file_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let data = build_ser(4, 4, 0, &[vec![0u8; 16]], None);
    let path = write_ser(tmp.path(), "trunc.ser", &data[..data.len() - 8]);

    assert!(matches!(
        SerReader::open(&path),
        Err(MagniscopeError::InvalidSer(_))
    ));
}

#[test]
fn test_bayer_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let data = build_ser(2, 2, 8, &[vec![0u8; 4]], None);
    let path = write_ser(tmp.path(), "bayer.ser", &data);

    assert!(matches!(
        load_video(&path),
        Err(MagniscopeError::UnsupportedColorMode(_))
    ));
}

#[test]
fn test_empty_video_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let data = build_ser(2, 2, 0, &[], None);
    let path = write_ser(tmp.path(), "empty.ser", &data);

    assert!(matches!(
        load_video(&path),
        Err(MagniscopeError::EmptyVideo)
    ));
}

#[test]
fn test_frame_index_out_of_range() {
    let tmp = tempfile::tempdir().unwrap();
    let data = build_ser(2, 2, 0, &[vec![0u8; 4]], None);
    let path = write_ser(tmp.path(), "one.ser", &data);

    let reader = SerReader::open(&path).unwrap();
    assert!(matches!(
        reader.read_frame(1),
        Err(MagniscopeError::FrameIndexOutOfRange { index: 1, total: 1 })
    ));
}

#[test]
fn test_source_info() {
    let tmp = tempfile::tempdir().unwrap();
    let clip = make_clip(4, 6, 8, 3);
    let path = save_clip(tmp.path(), "info.ser", &clip);

    let reader = SerReader::open(&path).unwrap();
    let info = reader.source_info(&path).unwrap();
    assert_eq!(info.total_frames, 4);
    assert_eq!(info.height, 6);
    assert_eq!(info.width, 8);
    assert_eq!(info.bit_depth, 8);
    assert_eq!(info.color_mode, ColorMode::RGB);
}
