//! # klatt-cascade
//!
//! Cascade/parallel formant speech synthesis engine in the tradition of
//! Klatt (1980, 1990).
//!
//! This crate is a low-level acoustic engine: it turns a sequence of
//! explicit acoustic frames (fundamental frequency, formant frequencies and
//! bandwidths, branch gains) into PCM samples. It has no text front end, no
//! grapheme-to-phoneme conversion, and no prosody model; callers supply
//! [`FrameParams`] directly, typically generated by a higher-level voice or
//! phoneme-to-acoustics layer.
//!
//! ## Features
//!
//! - **Cascade and parallel branches**: vowels drive the cascade branch's
//!   series resonator chain; fricatives and nasals drive the parallel
//!   branch's independently gained bank.
//! - **Three glottal source models**: band-limited impulsive, KLGLOTT88
//!   natural, and raw noise.
//! - **Period-synchronous parameter updates**: frame parameters only take
//!   effect at pitch-period boundaries, avoiding within-period discontinuities.
//! - **F0 flutter**: the legacy three-sinusoid jitter model for natural pitch
//!   wobble.
//! - **Deterministic rendering**: [`Generator::with_seed`] makes noise-driven
//!   aspiration and frication reproducible across runs.
//!
//! ## Quick Start
//!
//! ```
//! use klatt_cascade::{FrameParams, GlottalSourceKind, MainParams, generate_sound};
//!
//! let main = MainParams::new(44100, GlottalSourceKind::Impulsive)?;
//! let frame = FrameParams::new(0.3, 120.0)
//!     .with_oral_formants(&[(730.0, 90.0), (1090.0, 110.0), (2440.0, 170.0)]);
//!
//! let samples = generate_sound(main, &[frame])?;
//! println!("generated {} samples", samples.len());
//! # Ok::<(), klatt_cascade::SynthesizerError>(())
//! ```
//!
//! ## Streaming Generation
//!
//! For incremental rendering, drive a [`Generator`] directly instead of
//! calling [`generate_sound`]:
//!
//! ```
//! use klatt_cascade::{FrameParams, GlottalSourceKind, Generator, MainParams};
//!
//! let main = MainParams::new(44100, GlottalSourceKind::Impulsive)?;
//! let mut generator = Generator::with_seed(main, 42)?;
//!
//! let frame = FrameParams::new(0.2, 200.0).with_oral_formants(&[(500.0, 60.0)]);
//! let mut buffer = vec![0.0; 8820];
//! generator.generate_frame(&frame, &mut buffer)?;
//! # Ok::<(), klatt_cascade::SynthesizerError>(())
//! ```

mod cascade;
mod error;
mod filters;
mod frame_state;
mod generator;
mod glottal;
mod noise;
mod parallel;
mod params;
mod period;

pub use error::{Result, SynthesizerError};
pub use filters::{AntiResonator, DifferenceFilter, FilterMode, LpFilter1, Resonator};
pub use frame_state::FrameState;
pub use generator::{generate_sound, Generator};
pub use glottal::{GlottalSource, GlottalSourceKind};
pub use noise::{white_noise, LpNoiseSource};
pub use params::{db_to_lin, CascadeParams, FrameParams, MainParams, ParallelParams, MAX_ORAL_FORMANTS};
pub use period::PeriodState;
