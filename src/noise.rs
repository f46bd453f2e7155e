//! Uniform white noise and the fixed-cutoff low-pass-filtered noise tap shared
//! by aspiration and frication.

use rand::{rngs::SmallRng, Rng};

use crate::error::Result;
use crate::filters::LpFilter1;

/// Returns a uniform random sample in `[-1, +1)`.
///
/// The asymmetry (the interval excludes `+1`) mirrors the legacy reference
/// generator this engine is modelled on and is tolerated rather than corrected.
pub fn white_noise(rng: &mut SmallRng) -> f64 {
    rng.random::<f64>() * 2.0 - 1.0
}

/// Coefficient `g` of the reference `LpFilter1` at its defining condition:
/// `f = 1000 Hz`, `fs = 10000 Hz`, giving `b = 0.75` ("legacy reference").
/// Solved once offline from `LpFilter1`'s own quadratic and hardcoded here,
/// since the legacy reference fixes `g`, not `b`, across sample rates.
const NOISE_SOURCE_G: f64 = 0.423_242;

/// White noise piped through a fixed-cutoff low-pass filter, with an amplitude
/// compensation that keeps RMS comparable across sample rates.
#[derive(Debug, Clone, Copy)]
pub struct LpNoiseSource {
    filter: LpFilter1,
    amplitude_compensation: f64,
}

impl LpNoiseSource {
    /// Creates a noise source tuned for sample rate `fs` (Hz).
    ///
    /// The noise tap's cutoff is fixed at 1000 Hz, so this requires `fs > 2000`
    /// (the cutoff must sit strictly below Nyquist); lower sample rates return
    /// `Err(SynthesizerError::InvalidFilterParameter)` instead of panicking.
    pub fn new(fs: f64) -> Result<Self> {
        let mut filter = LpFilter1::new();
        // f = 1000 Hz is fixed; re-solving at the target fs keeps the -3dB point
        // pinned to 1 kHz the way the legacy reference does.
        filter.configure(1000.0, NOISE_SOURCE_G, 1.0, fs)?;
        let amplitude_compensation = 2.5 * (fs / 10000.0).powf(1.0 / 3.0);
        Ok(Self {
            filter,
            amplitude_compensation,
        })
    }

    /// Draws the next filtered noise sample.
    pub fn next_sample(&mut self, rng: &mut SmallRng) -> f64 {
        let w = white_noise(rng);
        self.filter.process(w) * self.amplitude_compensation
    }
}
