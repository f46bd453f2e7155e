//! Error types for the cascade/parallel formant synthesis engine.

use thiserror::Error;

/// Errors that can occur while configuring or driving the synthesis engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SynthesizerError {
    /// A filter configurator (`LpFilter1`, `Resonator`, `AntiResonator`) was called with an
    /// out-of-range or non-finite frequency, bandwidth, gain, or extra-gain argument.
    #[error("invalid filter parameter: {0}")]
    InvalidFilterParameter(String),

    /// `adjust_peak_gain` was called with a non-positive or non-finite gain.
    #[error("invalid peak gain: {0}")]
    InvalidPeakGain(String),

    /// `generate_frame` was called with the same `FrameParams` reference as the previous call.
    #[error("generate_frame called with the same FrameParams reference as the previous call")]
    ReusedFrameParams,

    /// A glottal source kind string did not match any known variant.
    #[error("unknown glottal source kind: {0}")]
    UnknownGlottalSourceKind(String),

    /// `MainParams` was constructed with an invalid sample rate.
    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(u32),
}

/// Result type for synthesis engine operations.
pub type Result<T> = std::result::Result<T, SynthesizerError>;
