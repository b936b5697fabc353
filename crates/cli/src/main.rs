//! Tartil CLI: render diacritic-marked Arabic text to a WAV file, live
//! audio, or MIDI notes.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use tartil_core::config::{MidiConfig, RenderConfig, StreamConfig};
use tartil_core::pipeline::Sonifier;
use tartil_core::pitch::scale::ScaleSpec;
use tartil_core::render::entrainment::EntrainmentParams;
use tartil_core::sink::{list_midi_ports, EventSink, FileSink, MidiSink, StreamSink};
use tartil_core::text::read_units;
use tartil_core::timing::TempoCurve;
use tartil_core::types::Unit;
use tartil_core::SonifyError;

/// Exit status for invocations that are missing a required choice.
const USAGE_EXIT: i32 = 2;

// ─── Arguments ───────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Render everything to a WAV file
    Wav,
    /// Play unit by unit on the default audio device
    Stream,
    /// Send notes to a MIDI output port
    Midi,
}

#[derive(Parser, Debug)]
#[command(
    name = "tartil",
    about = "Sonify diacritic-marked Arabic text as pitched, timed tones",
    version
)]
struct Cli {
    /// Output mode
    #[arg(long, value_enum, default_value_t = Mode::Wav)]
    mode: Mode,

    /// Input file of `<int>|<int>|<text>` records
    #[arg(long = "in", default_value = "quran-uthmani.txt")]
    input: PathBuf,

    /// Output WAV path (wav mode)
    #[arg(long, default_value = "quran_sonified.wav")]
    out: PathBuf,

    /// Sample rate in Hz
    #[arg(long, default_value_t = 48000)]
    sr: u32,

    /// Tempo of the first unit in BPM
    #[arg(long, default_value_t = 84.0)]
    base_bpm: f64,

    /// Scale preset: rast, bayati, hijaz, saba, nahawand
    #[arg(long, default_value = "hijaz")]
    maqam: String,

    /// Custom scale as a JSON list of semitone offsets, e.g. "[0,2,3.5,5]"
    #[arg(long)]
    scale_json: Option<String>,

    // -- Background --
    /// Background pulse rate in Hz
    #[arg(long, default_value_t = 8.0)]
    iso_pulse: f64,

    /// Background carrier frequency in Hz
    #[arg(long, default_value_t = 180.0)]
    iso_carrier: f64,

    /// Background gate depth (0-1)
    #[arg(long, default_value_t = 0.88)]
    iso_depth: f64,

    /// Background gain
    #[arg(long, default_value_t = 0.22)]
    iso_gain: f64,

    /// Add click markers on every background pulse (wav mode)
    #[arg(long, default_value_t = false)]
    click_track: bool,

    // -- MIDI --
    /// MIDI output port name; omit to list available ports
    #[arg(long)]
    midi_port: Option<String>,

    /// MIDI channel (0-15)
    #[arg(long, default_value_t = 0)]
    midi_channel: u8,

    /// Note velocity (1-127)
    #[arg(long, default_value_t = 80)]
    midi_velocity: u8,

    /// Emit MIDI clock (24 ppqn) following the unit tempo
    #[arg(long, default_value_t = false)]
    send_midi_clock: bool,

    /// Show verbose output
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

// ─── Entry point ─────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let result = match cli.mode {
        Mode::Wav => run_wav(&cli).map(|_| 0),
        Mode::Stream => run_stream(&cli).map(|_| 0),
        Mode::Midi => run_midi(&cli),
    };

    match result {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            log::error!("{:#}", e);
            if let Some(hint) = remediation(&e) {
                log::error!("Hint: {}", hint);
            }
            std::process::exit(1);
        }
    }
}

// ─── Helpers ─────────────────────────────────────────────────────

/// Remediation for device failures anywhere in the context chain.
fn remediation(err: &anyhow::Error) -> Option<&str> {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<SonifyError>())
        .find_map(SonifyError::remediation)
}

fn render_config(cli: &Cli) -> Result<RenderConfig> {
    let scale = ScaleSpec::from_cli(&cli.maqam, cli.scale_json.as_deref())?;
    let config = RenderConfig {
        sample_rate: cli.sr,
        tempo: TempoCurve::with_base(cli.base_bpm),
        scale,
        entrainment: EntrainmentParams {
            pulse_hz: cli.iso_pulse,
            carrier_hz: cli.iso_carrier,
            depth: cli.iso_depth,
            gain: cli.iso_gain,
            ..EntrainmentParams::default()
        },
        click_track: cli.click_track,
        ..RenderConfig::default()
    };
    config.validate()?;
    Ok(config)
}

/// Everything that can fail on bad input, done before any sink exists.
fn prepare(cli: &Cli) -> Result<(RenderConfig, Sonifier, Vec<Unit>)> {
    let config = render_config(cli)?;
    let sonifier = Sonifier::new(&config)?;
    let units = read_units(&cli.input)
        .with_context(|| format!("Failed to load input {}", cli.input.display()))?;
    log::debug!(
        "{} units, {} scale, {} BPM base",
        units.len(),
        cli.scale_json.as_deref().map_or(cli.maqam.as_str(), |_| "custom"),
        config.tempo.base_bpm
    );
    Ok((config, sonifier, units))
}

fn drive(sonifier: &Sonifier, units: &[Unit], sink: &mut dyn EventSink) -> Result<()> {
    sonifier.run(units, sink)?;
    Ok(())
}

// ─── Runners ─────────────────────────────────────────────────────

fn run_wav(cli: &Cli) -> Result<()> {
    let (config, sonifier, units) = prepare(cli)?;
    let mut sink = FileSink::new(&cli.out, &config);
    drive(&sonifier, &units, &mut sink)
        .with_context(|| format!("Failed to render {}", cli.out.display()))?;
    println!("Wrote: {}", sink.path().display());
    Ok(())
}

fn run_stream(cli: &Cli) -> Result<()> {
    let (config, sonifier, units) = prepare(cli)?;
    let mut sink = StreamSink::open(&config, &StreamConfig::default())?;
    drive(&sonifier, &units, &mut sink)
}

/// Returns the process exit code; a missing port is a usage error.
fn run_midi(cli: &Cli) -> Result<i32> {
    let Some(port) = cli.midi_port.as_deref() else {
        let ports = list_midi_ports()?;
        if ports.is_empty() {
            eprintln!("No MIDI output ports found.");
        } else {
            eprintln!("No --midi-port given. Available MIDI output ports:");
            for name in &ports {
                eprintln!("  {name}");
            }
        }
        return Ok(USAGE_EXIT);
    };

    let midi = MidiConfig::new(cli.midi_channel, cli.midi_velocity, cli.send_midi_clock)?;
    let (_config, sonifier, units) = prepare(cli)?;
    let mut sink = MidiSink::open(port, &midi)?;
    drive(&sonifier, &units, &mut sink)?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["tartil"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn test_remediation_found_through_context() {
        let err = anyhow::Error::new(SonifyError::device(
            "audio output device",
            "connect a sound device",
        ))
        .context("Failed to open output");
        assert_eq!(remediation(&err), Some("connect a sound device"));

        let err = anyhow::Error::new(SonifyError::config("bad")).context("while parsing");
        assert_eq!(remediation(&err), None);
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.mode, Mode::Wav);
        assert_eq!(cli.input, PathBuf::from("quran-uthmani.txt"));
        assert_eq!(cli.out, PathBuf::from("quran_sonified.wav"));
        assert_eq!(cli.maqam, "hijaz");
        let config = render_config(&cli).unwrap();
        assert_eq!(config.sample_rate, 48000);
        assert_eq!(config.entrainment, EntrainmentParams::default());
    }

    #[test]
    fn test_background_flags() {
        let cli = parse(&["--iso-pulse", "6", "--iso-depth", "0.5", "--click-track"]);
        let config = render_config(&cli).unwrap();
        assert_eq!(config.entrainment.pulse_hz, 6.0);
        assert_eq!(config.entrainment.depth, 0.5);
        assert!(config.click_track);
    }

    #[test]
    fn test_bad_scale_rejected() {
        assert!(render_config(&parse(&["--maqam", "foo"])).is_err());
        assert!(render_config(&parse(&["--scale-json", "not json"])).is_err());
    }

    #[test]
    fn test_custom_scale_overrides_preset() {
        let config = render_config(&parse(&["--scale-json", "[0, 3.5, 7]"])).unwrap();
        assert_eq!(config.scale, ScaleSpec::Custom(vec![0.0, 3.5, 7.0]));
    }

    #[test]
    fn test_out_of_range_depth_rejected() {
        assert!(render_config(&parse(&["--iso-depth", "1.5"])).is_err());
    }

    #[test]
    fn test_midi_mode_flags() {
        let cli = parse(&[
            "--mode",
            "midi",
            "--midi-port",
            "IAC Bus 1",
            "--midi-channel",
            "9",
            "--send-midi-clock",
        ]);
        assert_eq!(cli.mode, Mode::Midi);
        assert_eq!(cli.midi_port.as_deref(), Some("IAC Bus 1"));
        assert_eq!(cli.midi_channel, 9);
        assert!(cli.send_midi_clock);
    }

    #[test]
    fn test_missing_input_fails_before_output() {
        let dir = std::env::temp_dir().join("tartil-cli-missing-input");
        let out = dir.join("never.wav");
        let cli = parse(&[
            "--in",
            "/nonexistent/tartil/input.txt",
            "--out",
            out.to_str().unwrap(),
        ]);
        assert!(run_wav(&cli).is_err());
        assert!(!out.exists());
    }
}
