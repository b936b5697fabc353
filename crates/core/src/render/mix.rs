//! Whole-corpus mixdown: voice, unit gaps, background, click markers,
//! normalization.

use crate::audio::effects::{click, generate_silence, mix_into, normalize_peak, samples_for};
use crate::config::RenderConfig;
use crate::types::UnitEvents;

use super::entrainment::isochronic_track;
use super::voice::Voice;

const MARKER_S: f64 = 0.01;
const MARKER_STRENGTH: f64 = 0.12;
const MIN_MARKER_HZ: f64 = 0.5;

pub fn voice_for(config: &RenderConfig) -> Voice {
    Voice::new(config.sample_rate, config.envelope.clone(), config.voice_gain)
}

/// Voice chunk for one unit followed by the inter-unit gap.
pub fn render_unit_with_gap(unit: &UnitEvents, voice: &Voice, gap_s: f64) -> Vec<f64> {
    let mut chunk = voice.render_events(&unit.events);
    chunk.extend(generate_silence(gap_s, voice.sample_rate));
    chunk
}

/// Add background, optional click markers, then normalize to the peak
/// ceiling.
pub fn finish_mix(mut voice: Vec<f64>, config: &RenderConfig) -> Vec<f64> {
    let sr = config.sample_rate;
    let total_s = voice.len() as f64 / sr as f64;

    let background = isochronic_track(total_s, sr, &config.entrainment);
    mix_into(&mut voice, &background);

    if config.click_track {
        add_click_markers(&mut voice, sr, config.entrainment.pulse_hz);
    }

    normalize_peak(&mut voice, config.peak);
    voice
}

/// Short clicks every pulse period. Markers that would run past the end of
/// the buffer are skipped.
pub fn add_click_markers(mix: &mut [f64], sr: u32, pulse_hz: f64) {
    let interval = 1.0 / pulse_hz.max(MIN_MARKER_HZ);
    let marker = click(MARKER_S, sr, MARKER_STRENGTH);
    let total_s = mix.len() as f64 / sr as f64;
    let count = (total_s / interval) as usize;

    for k in 0..count {
        let idx = samples_for(k as f64 * interval, sr);
        if idx + marker.len() < mix.len() {
            mix_into(&mut mix[idx..], &marker);
        }
    }
}

/// Render a full event stream to a normalized buffer in memory.
pub fn render_corpus(units: &[UnitEvents], config: &RenderConfig) -> Vec<f64> {
    let voice = voice_for(config);
    let mut buffer = Vec::new();
    for unit in units {
        buffer.extend(render_unit_with_gap(unit, &voice, config.unit_gap_s));
    }
    finish_mix(buffer, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Effects, Event, ToneEvent};

    fn unit() -> UnitEvents {
        UnitEvents {
            major: 1,
            minor: 1,
            bpm: 84.0,
            events: vec![
                Event::Tone(ToneEvent {
                    letter: 'ب',
                    frequency: 330.0,
                    sounded: 0.2,
                    tail: 0.0,
                    effects: Effects::default(),
                }),
                Event::Rest(0.1),
            ],
        }
    }

    fn peak(x: &[f64]) -> f64 {
        x.iter().fold(0.0f64, |m, s| m.max(s.abs()))
    }

    #[test]
    fn test_unit_gap_appended() {
        let cfg = RenderConfig::default();
        let v = voice_for(&cfg);
        let chunk = render_unit_with_gap(&unit(), &v, 0.05);
        let voice_len = v.render_events(&unit().events).len();
        assert_eq!(chunk.len(), voice_len + 2400);
        assert!(chunk[voice_len..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_render_corpus_normalized() {
        let cfg = RenderConfig::default();
        let out = render_corpus(&[unit(), unit()], &cfg);
        assert!(!out.is_empty());
        assert!((peak(&out) - cfg.peak).abs() < 1e-9);
    }

    #[test]
    fn test_render_corpus_deterministic() {
        let cfg = RenderConfig {
            click_track: true,
            ..RenderConfig::default()
        };
        assert_eq!(render_corpus(&[unit()], &cfg), render_corpus(&[unit()], &cfg));
    }

    #[test]
    fn test_render_corpus_empty() {
        let out = render_corpus(&[], &RenderConfig::default());
        assert!(out.is_empty());
    }

    #[test]
    fn test_click_markers_spacing() {
        let sr = 1000;
        let mut x = vec![0.0; 1000];
        add_click_markers(&mut x, sr, 4.0);
        // markers at 0, 250, 500, 750 ms
        for idx in [0, 250, 500, 750] {
            assert!((x[idx] - 0.12).abs() < 1e-12, "no marker at {idx}");
        }
        assert_eq!(x[100], 0.0);
    }

    #[test]
    fn test_click_markers_low_pulse_clamped() {
        let sr = 1000;
        let mut x = vec![0.0; 5000];
        add_click_markers(&mut x, sr, 0.0);
        // clamped to 0.5 Hz: one marker every 2 s
        assert!(x[0] > 0.0);
        assert!(x[2000] > 0.0);
        assert_eq!(x[1000], 0.0);
    }
}
