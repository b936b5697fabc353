//! Buffer-level helpers: silence, concatenation, mixing, clicks, peak
//! normalization.

/// Number of samples covering `duration_s`, truncated; negative → 0.
pub fn samples_for(duration_s: f64, sr: u32) -> usize {
    (duration_s.max(0.0) * sr as f64) as usize
}

/// Generate silence of given duration.
pub fn generate_silence(duration_s: f64, sr: u32) -> Vec<f64> {
    vec![0.0; samples_for(duration_s, sr)]
}

/// Concatenate chunks in order with no overlap.
pub fn concatenate(chunks: &[Vec<f64>]) -> Vec<f64> {
    let total: usize = chunks.iter().map(|c| c.len()).sum();
    let mut result = Vec::with_capacity(total);
    for chunk in chunks {
        result.extend_from_slice(chunk);
    }
    result
}

/// Add `secondary` into `primary` sample by sample. Extra secondary samples
/// are ignored; a shorter secondary leaves the tail of primary untouched.
pub fn mix_into(primary: &mut [f64], secondary: &[f64]) {
    for (p, s) in primary.iter_mut().zip(secondary) {
        *p += s;
    }
}

/// Exponentially decaying transient, zero-padded to `duration_s`.
///
/// The body lasts `min(n, max(16, 8 ms))` samples and decays over six time
/// constants.
pub fn click(duration_s: f64, sr: u32, strength: f64) -> Vec<f64> {
    let n = samples_for(duration_s, sr);
    if n == 0 {
        return vec![];
    }
    let m = n.min(16.max((0.008 * sr as f64) as usize));
    let mut x = vec![0.0; n];
    for (i, s) in x.iter_mut().take(m).enumerate() {
        let t = if m > 1 { i as f64 / (m - 1) as f64 } else { 0.0 };
        *s = strength * (-6.0 * t).exp();
    }
    x
}

/// Scale every sample by one factor so the absolute peak equals `peak`.
/// Near-silent buffers are left as they are.
pub fn normalize_peak(samples: &mut [f64], peak: f64) {
    let max = samples.iter().fold(0.0f64, |m, s| m.max(s.abs()));
    if max < 1e-9 {
        return;
    }
    let gain = peak / max;
    for s in samples.iter_mut() {
        *s *= gain;
    }
}

pub fn scale(samples: &mut [f64], gain: f64) {
    for s in samples.iter_mut() {
        *s *= gain;
    }
}
