//! Configuration and per-frame parameter types.

use crate::error::{Result, SynthesizerError};
use crate::glottal::GlottalSourceKind;

/// Number of oral formants the cascade and parallel branches track.
pub const MAX_ORAL_FORMANTS: usize = 6;

/// Converts a decibel value to a linear gain. Values at or below -99 dB, and
/// `NaN`, both map to `0.0` (silence / disabled).
pub fn db_to_lin(db: f64) -> f64 {
    if db.is_nan() || db <= -99.0 {
        0.0
    } else {
        10f64.powf(db / 20.0)
    }
}

/// Returns true if `v` is a usable (non-NaN, non-zero) formant frequency or bandwidth.
pub(crate) fn is_enabled(v: f64) -> bool {
    v.is_finite() && v != 0.0
}

/// Generator-wide configuration, fixed for the generator's lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MainParams {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Which glottal flow model to use.
    pub glottal_source: GlottalSourceKind,
}

impl MainParams {
    /// Creates a new configuration, rejecting a zero sample rate.
    pub fn new(sample_rate: u32, glottal_source: GlottalSourceKind) -> Result<Self> {
        if sample_rate == 0 {
            return Err(SynthesizerError::InvalidSampleRate(sample_rate));
        }
        Ok(Self {
            sample_rate,
            glottal_source,
        })
    }

    /// Sample rate as `f64`, for use in the per-sample math.
    pub fn fs(&self) -> f64 {
        self.sample_rate as f64
    }
}

/// Cascade-branch parameters for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CascadeParams {
    /// Whether the cascade branch contributes to the output this frame.
    pub enabled: bool,
    /// Voicing level in dB.
    pub voicing_db: f64,
    /// Aspiration level in dB.
    pub aspiration_db: f64,
    /// Aspiration modulation depth in the second half of the period, in [0, 1].
    pub aspiration_mod: f64,
    /// Nasal anti-formant frequency (Hz), or NaN to disable.
    pub nasal_antiformant_freq: f64,
    /// Nasal anti-formant bandwidth (Hz), or NaN to disable.
    pub nasal_antiformant_bw: f64,
}

impl Default for CascadeParams {
    fn default() -> Self {
        Self {
            enabled: true,
            voicing_db: 0.0,
            aspiration_db: -99.0,
            aspiration_mod: 0.0,
            nasal_antiformant_freq: f64::NAN,
            nasal_antiformant_bw: f64::NAN,
        }
    }
}

/// Parallel-branch parameters for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallelParams {
    /// Whether the parallel branch contributes to the output this frame.
    pub enabled: bool,
    /// Voicing level in dB.
    pub voicing_db: f64,
    /// Aspiration level in dB.
    pub aspiration_db: f64,
    /// Aspiration modulation depth in the second half of the period, in [0, 1].
    pub aspiration_mod: f64,
    /// Frication level in dB.
    pub frication_db: f64,
    /// Frication modulation depth in the second half of the period, in [0, 1].
    pub frication_mod: f64,
    /// Direct source-to-output bypass level in dB.
    pub bypass_db: f64,
    /// Parallel nasal formant level in dB.
    pub nasal_formant_db: f64,
    /// Parallel oral formant levels in dB, indices 0..6 for F1..F6.
    pub oral_formant_db: [f64; MAX_ORAL_FORMANTS],
}

impl Default for ParallelParams {
    fn default() -> Self {
        Self {
            enabled: false,
            voicing_db: -99.0,
            aspiration_db: -99.0,
            aspiration_mod: 0.0,
            frication_db: -99.0,
            frication_mod: 0.0,
            bypass_db: -99.0,
            nasal_formant_db: -99.0,
            oral_formant_db: [-99.0; MAX_ORAL_FORMANTS],
        }
    }
}

/// One frame's worth of acoustic parameters.
///
/// A `FrameParams` value is transient: the engine copies the derived state out
/// of it once per period boundary and never retains the value itself.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameParams {
    /// Duration in seconds. Ignored by `Generator::generate_frame`, which is
    /// driven by the output buffer length instead; used by `generate_sound`.
    pub duration: f64,
    /// Fundamental frequency in Hz. `0` means unvoiced.
    pub f0: f64,
    /// Flutter depth in [0, 1].
    pub flutter_level: f64,
    /// Open-phase ratio in (0, 1).
    pub open_phase_ratio: f64,
    /// Breathiness level in dB.
    pub breathiness_db: f64,
    /// Spectral tilt in dB.
    pub tilt_db: f64,
    /// Overall output gain in dB.
    pub gain_db: f64,
    /// Nasal formant frequency (Hz), or NaN to disable.
    pub nasal_formant_freq: f64,
    /// Nasal formant bandwidth (Hz), or NaN to disable.
    pub nasal_formant_bw: f64,
    /// Oral formant frequencies (Hz), indices 0..6 for F1..F6. NaN disables an entry.
    pub oral_formant_freq: [f64; MAX_ORAL_FORMANTS],
    /// Oral formant bandwidths (Hz), indices 0..6 for F1..F6. NaN disables an entry.
    pub oral_formant_bw: [f64; MAX_ORAL_FORMANTS],
    /// Cascade-branch parameters.
    pub cascade: CascadeParams,
    /// Parallel-branch parameters.
    pub parallel: ParallelParams,
}

impl Default for FrameParams {
    fn default() -> Self {
        Self {
            duration: 0.0,
            f0: 0.0,
            flutter_level: 0.0,
            open_phase_ratio: 0.7,
            breathiness_db: -99.0,
            tilt_db: 0.0,
            gain_db: 0.0,
            nasal_formant_freq: f64::NAN,
            nasal_formant_bw: f64::NAN,
            oral_formant_freq: [f64::NAN; MAX_ORAL_FORMANTS],
            oral_formant_bw: [f64::NAN; MAX_ORAL_FORMANTS],
            cascade: CascadeParams::default(),
            parallel: ParallelParams::default(),
        }
    }
}

impl FrameParams {
    /// Creates a frame with the given duration (seconds) and fundamental frequency (Hz),
    /// and otherwise-default parameters.
    pub fn new(duration: f64, f0: f64) -> Self {
        Self {
            duration,
            f0,
            ..Default::default()
        }
    }

    /// Sets the breathiness level in dB.
    #[must_use]
    pub fn with_breathiness_db(mut self, db: f64) -> Self {
        self.breathiness_db = db;
        self
    }

    /// Sets the spectral tilt in dB.
    #[must_use]
    pub fn with_tilt_db(mut self, db: f64) -> Self {
        self.tilt_db = db;
        self
    }

    /// Sets the overall output gain in dB.
    #[must_use]
    pub fn with_gain_db(mut self, db: f64) -> Self {
        self.gain_db = db;
        self
    }

    /// Sets the flutter depth in [0, 1].
    #[must_use]
    pub fn with_flutter_level(mut self, level: f64) -> Self {
        self.flutter_level = level;
        self
    }

    /// Sets the open-phase ratio in (0, 1).
    #[must_use]
    pub fn with_open_phase_ratio(mut self, ratio: f64) -> Self {
        self.open_phase_ratio = ratio;
        self
    }

    /// Sets the oral formant frequency/bandwidth pairs for F1..F6 (up to six entries;
    /// unset trailing entries remain NaN/disabled).
    #[must_use]
    pub fn with_oral_formants(mut self, formants: &[(f64, f64)]) -> Self {
        for (i, &(freq, bw)) in formants.iter().take(MAX_ORAL_FORMANTS).enumerate() {
            self.oral_formant_freq[i] = freq;
            self.oral_formant_bw[i] = bw;
        }
        self
    }

    /// Sets the cascade-branch parameters.
    #[must_use]
    pub fn with_cascade(mut self, cascade: CascadeParams) -> Self {
        self.cascade = cascade;
        self
    }

    /// Sets the parallel-branch parameters.
    #[must_use]
    pub fn with_parallel(mut self, parallel: ParallelParams) -> Self {
        self.parallel = parallel;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_to_lin_matches_spec_table() {
        assert_eq!(db_to_lin(0.0), 1.0);
        assert!((db_to_lin(-20.0) - 0.1).abs() < 1e-12);
        assert_eq!(db_to_lin(-99.0), 0.0);
        assert_eq!(db_to_lin(-150.0), 0.0);
        assert_eq!(db_to_lin(f64::NAN), 0.0);
    }

    #[test]
    fn main_params_rejects_zero_sample_rate() {
        assert!(MainParams::new(0, GlottalSourceKind::Impulsive).is_err());
        assert!(MainParams::new(44100, GlottalSourceKind::Impulsive).is_ok());
    }

    #[test]
    fn frame_params_builder_sets_fields() {
        let frame = FrameParams::new(1.0, 120.0)
            .with_breathiness_db(-25.0)
            .with_tilt_db(-6.0)
            .with_oral_formants(&[(500.0, 60.0), (1500.0, 90.0)]);
        assert_eq!(frame.f0, 120.0);
        assert_eq!(frame.breathiness_db, -25.0);
        assert_eq!(frame.tilt_db, -6.0);
        assert_eq!(frame.oral_formant_freq[0], 500.0);
        assert_eq!(frame.oral_formant_freq[1], 1500.0);
        assert!(frame.oral_formant_freq[2].is_nan());
    }

    #[test]
    fn is_enabled_rejects_nan_and_zero() {
        assert!(!is_enabled(f64::NAN));
        assert!(!is_enabled(0.0));
        assert!(is_enabled(500.0));
    }
}
