//! End-to-end runs from a text file to a WAV file.

use std::path::Path;

use tartil_core::audio::io::read_wav;
use tartil_core::config::RenderConfig;
use tartil_core::pipeline::sonify_file;
use tartil_core::pitch::scale::ScaleSpec;
use tartil_core::render::entrainment::EntrainmentParams;
use tartil_core::timing::TempoCurve;
use tartil_core::sink::{CollectSink, FileSink};
use tartil_core::types::Event;
use tartil_core::SonifyError;

const BISMILLAH: &str = "1|1|بِسْمِ ٱللَّهِ ٱلرَّحْمَٰنِ ٱلرَّحِيمِ\n";

fn write_input(dir: &Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("input.txt");
    std::fs::write(&path, content).unwrap();
    path
}

fn render(input: &Path, out: &Path, config: &RenderConfig) -> tartil_core::Result<usize> {
    let mut sink = FileSink::new(out, config);
    sonify_file(input, config, &mut sink)?;
    Ok(sink.written_samples())
}

#[test]
fn test_single_unit_writes_wav() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "1|1|بِسْمِ ٱللَّهِ\n");
    let out = dir.path().join("out.wav");

    let written = render(&input, &out, &RenderConfig::default()).unwrap();
    assert!(written > 0);

    let (samples, sr) = read_wav(&out).unwrap();
    assert_eq!(sr, 48000);
    assert_eq!(samples.len(), written);
}

#[test]
fn test_output_peak_bounded() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), BISMILLAH);
    let out = dir.path().join("out.wav");
    let config = RenderConfig::default();

    render(&input, &out, &config).unwrap();
    let (samples, _) = read_wav(&out).unwrap();
    let peak = samples.iter().fold(0.0f64, |m, s| m.max(s.abs()));
    assert!(peak <= config.peak + 1e-3);
    assert!(peak > config.peak - 1e-3);
}

#[test]
fn test_repeated_runs_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), &format!("{BISMILLAH}1|2|ٱلْحَمْدُ لِلَّهِ\n"));
    let config = RenderConfig {
        click_track: true,
        ..RenderConfig::default()
    };

    let a = dir.path().join("a.wav");
    let b = dir.path().join("b.wav");
    render(&input, &a, &config).unwrap();
    render(&input, &b, &config).unwrap();
    assert_eq!(std::fs::read(&a).unwrap(), std::fs::read(&b).unwrap());
}

#[test]
fn test_malformed_line_reports_line_number() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "1 1 text\n");
    let out = dir.path().join("out.wav");

    let err = render(&input, &out, &RenderConfig::default()).unwrap_err();
    assert!(matches!(err, SonifyError::Format { line: 1, .. }));
    assert!(err.is_input_error());
    assert!(!out.exists());
}

#[test]
fn test_unknown_scale_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), BISMILLAH);
    let out = dir.path().join("out.wav");
    let config = RenderConfig {
        scale: ScaleSpec::Preset("foo".into()),
        ..RenderConfig::default()
    };

    let err = render(&input, &out, &config).unwrap_err();
    assert!(matches!(err, SonifyError::Config(_)));
    assert!(!out.exists());
}

#[test]
fn test_empty_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "\n\n");
    let out = dir.path().join("out.wav");

    let err = render(&input, &out, &RenderConfig::default()).unwrap_err();
    assert!(matches!(err, SonifyError::EmptyInput { .. }));
    assert!(!out.exists());
}

#[test]
fn test_missing_input_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.wav");
    let err = render(&dir.path().join("missing.txt"), &out, &RenderConfig::default()).unwrap_err();
    assert!(matches!(err, SonifyError::Io { .. }));
    assert!(!out.exists());
}

#[test]
fn test_collect_sink_sees_units_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "2|1|بَ\n1|7|تَ\n");
    let mut sink = CollectSink::default();

    sonify_file(&input, &RenderConfig::default(), &mut sink).unwrap();
    assert!(sink.finished);
    let order: Vec<(u32, u32)> = sink.units.iter().map(|u| (u.major, u.minor)).collect();
    assert_eq!(order, vec![(2, 1), (1, 7)]);
    assert!(matches!(sink.units[0].events[0], Event::Tone(_)));
}

#[test]
fn test_custom_scale_changes_pitches() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "1|1|ت\n");

    let mut preset = CollectSink::default();
    sonify_file(&input, &RenderConfig::default(), &mut preset).unwrap();

    let config = RenderConfig {
        scale: ScaleSpec::Custom(vec![0.0]),
        ..RenderConfig::default()
    };
    let mut custom = CollectSink::default();
    sonify_file(&input, &config, &mut custom).unwrap();

    let freq = |s: &CollectSink| match &s.units[0].events[0] {
        Event::Tone(t) => t.frequency,
        other => panic!("expected tone, got {other:?}"),
    };
    // A one-step scale is [220, 440, 880] Hz; 'ت' is the ninth letter
    assert!((freq(&custom) - 880.0).abs() < 1e-9);
    assert_ne!(freq(&preset), freq(&custom));
}

#[test]
fn test_unrenderable_parameters_rejected_before_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "114|1|بِسْمِ\n");
    let out = dir.path().join("out.wav");

    let bad = [
        RenderConfig {
            tempo: TempoCurve::with_base(8.0),
            ..RenderConfig::default()
        },
        RenderConfig {
            entrainment: EntrainmentParams {
                carrier_hz: f64::INFINITY,
                ..EntrainmentParams::default()
            },
            ..RenderConfig::default()
        },
        RenderConfig {
            scale: ScaleSpec::Custom(vec![0.0, 20000.0]),
            ..RenderConfig::default()
        },
    ];
    for config in bad {
        let err = render(&input, &out, &config).unwrap_err();
        assert!(matches!(err, SonifyError::Config(_)), "{err}");
        assert!(!out.exists());
    }
}
