//! Glottal source generators: impulsive, natural (KLGLOTT88), and raw noise.

use rand::rngs::SmallRng;

use crate::filters::Resonator;
use crate::noise::white_noise;

/// Which glottal flow model a generator uses. Selected once, at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GlottalSourceKind {
    /// Band-limited pulse train, realised via a resonator driven by a doublet.
    #[default]
    Impulsive,
    /// KLGLOTT88 polynomial glottal flow derivative.
    Natural,
    /// Raw white noise as the excitation (useful for purely unvoiced streams).
    Noise,
}

impl GlottalSourceKind {
    /// Parses a glottal source kind from a config-adjacent string
    /// (`"impulsive"`, `"natural"`, `"noise"`, case-insensitive).
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "impulsive" => Some(Self::Impulsive),
            "natural" => Some(Self::Natural),
            "noise" => Some(Self::Noise),
            _ => None,
        }
    }
}

/// Amplification constant for the KLGLOTT88 polynomial model.
const KLGLOTT88_AMPLIFICATION: f64 = 5.0;

/// A glottal source, dispatching on its selected [`GlottalSourceKind`].
#[derive(Debug, Clone, Copy)]
pub enum GlottalSource {
    /// Doublet-driven resonator realising a band-limited impulse train.
    Impulsive {
        resonator: Resonator,
        open_phase_length: u32,
        position: u32,
    },
    /// KLGLOTT88 polynomial flow derivative.
    Natural {
        open_phase_length: u32,
        position: u32,
        b2: f64,
        a1: f64,
        x: f64,
    },
    /// Raw white noise excitation.
    Noise,
}

impl GlottalSource {
    /// Creates a source of the given kind, with no period started yet.
    pub fn new(kind: GlottalSourceKind) -> Self {
        match kind {
            GlottalSourceKind::Impulsive => Self::Impulsive {
                resonator: Resonator::new(),
                open_phase_length: 0,
                position: 0,
            },
            GlottalSourceKind::Natural => Self::Natural {
                open_phase_length: 0,
                position: 0,
                b2: 0.0,
                a1: 0.0,
                x: 0.0,
            },
            GlottalSourceKind::Noise => Self::Noise,
        }
    }

    /// Re-initialises the source for a new period of open-phase length `m` samples,
    /// at sample rate `fs` (Hz).
    pub fn start_period(&mut self, m: u32, fs: f64) {
        match self {
            Self::Impulsive {
                resonator,
                open_phase_length,
                position,
            } => {
                *open_phase_length = m;
                *position = 0;
                if m > 0 {
                    let bw = fs / m as f64;
                    resonator
                        .configure(0.0, bw, 1.0, fs)
                        .expect("bandwidth derived from a positive open-phase length is always valid");
                    resonator.adjust_impulse_gain(1.0);
                }
            }
            Self::Natural {
                open_phase_length,
                position,
                b2,
                a1,
                x,
            } => {
                *open_phase_length = m;
                *position = 0;
                *x = 0.0;
                if m > 0 {
                    let t = m as f64;
                    *b2 = -KLGLOTT88_AMPLIFICATION / (t * t);
                    *a1 = -(*b2) * t / 3.0;
                } else {
                    *b2 = 0.0;
                    *a1 = 0.0;
                }
            }
            Self::Noise => {}
        }
    }

    /// Advances one sample and returns the glottal flow value.
    pub fn next_sample(&mut self, rng: &mut SmallRng) -> f64 {
        match self {
            Self::Impulsive {
                resonator,
                open_phase_length,
                position,
            } => {
                if *open_phase_length == 0 {
                    return 0.0;
                }
                // doublet: (0, +1, -1, 0, 0, ...)
                let input = match *position {
                    0 => 0.0,
                    1 => 1.0,
                    2 => -1.0,
                    _ => 0.0,
                };
                *position += 1;
                resonator.process(input)
            }
            Self::Natural {
                open_phase_length,
                position,
                b2,
                a1,
                x,
            } => {
                if *position < *open_phase_length {
                    *a1 += *b2;
                    *x += *a1;
                    *position += 1;
                    *x
                } else {
                    0.0
                }
            }
            Self::Noise => white_noise(rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn impulsive_emits_silence_with_zero_open_phase() {
        let mut g = GlottalSource::new(GlottalSourceKind::Impulsive);
        g.start_period(0, 44100.0);
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..10 {
            assert_eq!(g.next_sample(&mut rng), 0.0);
        }
    }

    #[test]
    fn impulsive_doublet_shape() {
        let mut g = GlottalSource::new(GlottalSourceKind::Impulsive);
        g.start_period(100, 44100.0);
        let mut rng = SmallRng::seed_from_u64(1);
        // first sample driven by input 0 should be 0 (resonator starts at rest).
        assert_eq!(g.next_sample(&mut rng), 0.0);
        // subsequent samples should not all be zero (the +1/-1 doublet excites the pole).
        let rest: Vec<f64> = (0..10).map(|_| g.next_sample(&mut rng)).collect();
        assert!(rest.iter().any(|&v| v != 0.0));
    }

    #[test]
    fn natural_source_ramps_then_silences() {
        let mut g = GlottalSource::new(GlottalSourceKind::Natural);
        g.start_period(50, 44100.0);
        let mut rng = SmallRng::seed_from_u64(1);
        let during: Vec<f64> = (0..50).map(|_| g.next_sample(&mut rng)).collect();
        assert!(during.iter().any(|&v| v != 0.0));
        // after the open phase the source is silent for the rest of the period.
        for _ in 0..20 {
            assert_eq!(g.next_sample(&mut rng), 0.0);
        }
    }

    #[test]
    fn natural_source_zero_open_phase_is_silent() {
        let mut g = GlottalSource::new(GlottalSourceKind::Natural);
        g.start_period(0, 44100.0);
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..10 {
            assert_eq!(g.next_sample(&mut rng), 0.0);
        }
    }

    #[test]
    fn noise_source_is_not_constant() {
        let mut g = GlottalSource::new(GlottalSourceKind::Noise);
        g.start_period(100, 44100.0);
        let mut rng = SmallRng::seed_from_u64(1);
        let samples: Vec<f64> = (0..50).map(|_| g.next_sample(&mut rng)).collect();
        assert!(samples.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn from_code_roundtrips_known_kinds() {
        assert_eq!(GlottalSourceKind::from_code("impulsive"), Some(GlottalSourceKind::Impulsive));
        assert_eq!(GlottalSourceKind::from_code("NATURAL"), Some(GlottalSourceKind::Natural));
        assert_eq!(GlottalSourceKind::from_code("noise"), Some(GlottalSourceKind::Noise));
        assert_eq!(GlottalSourceKind::from_code("bogus"), None);
    }
}
