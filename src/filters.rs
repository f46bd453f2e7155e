//! Primitive IIR/FIR filters shared by the glottal, cascade, and parallel stages.
//!
//! Every filter here models one of three modes: [`FilterMode::Active`] runs the
//! configured transfer function, [`FilterMode::Passthrough`] copies input to
//! output, and [`FilterMode::Muted`] emits silence. Switching into passthrough
//! or muted zeroes the delay lines so that switching back to active later
//! doesn't produce a click from stale history.

use std::f64::consts::PI;

use crate::error::{Result, SynthesizerError};

/// Operating mode shared by every primitive filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// Runs the configured transfer function.
    Active,
    /// Output equals input.
    #[default]
    Passthrough,
    /// Output is always zero.
    Muted,
}

fn validate_finite(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(SynthesizerError::InvalidFilterParameter(format!(
            "{name} must be finite, got {value}"
        )));
    }
    Ok(())
}

/// First-order IIR low-pass: `y[n] = a*x[n] + b*y[n-1]`.
///
/// Used both as the spectral tilt filter and, reconfigured per period, as the
/// band-limiting filter behind the impulsive glottal source.
#[derive(Debug, Clone, Copy, Default)]
pub struct LpFilter1 {
    a: f64,
    b: f64,
    y1: f64,
    mode: FilterMode,
}

impl LpFilter1 {
    /// Creates a filter in passthrough mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the filter for frequency `f` (Hz), shape parameter `g` in (0, 1),
    /// and `extra_gain`, at sample rate `fs` (Hz). Switches the filter to active.
    pub fn configure(&mut self, f: f64, g: f64, extra_gain: f64, fs: f64) -> Result<()> {
        validate_finite("f", f)?;
        validate_finite("g", g)?;
        validate_finite("extra_gain", extra_gain)?;
        if !(f > 0.0 && f < fs / 2.0) {
            return Err(SynthesizerError::InvalidFilterParameter(format!(
                "f must be in (0, fs/2), got f={f} fs={fs}"
            )));
        }
        if !(g > 0.0 && g < 1.0) {
            return Err(SynthesizerError::InvalidFilterParameter(format!(
                "g must be in (0, 1), got {g}"
            )));
        }
        let omega = 2.0 * PI * f / fs;
        let g2 = g * g;
        let q = (1.0 - g2 * omega.cos()) / (1.0 - g2);
        let b = q - (q * q - 1.0).sqrt();
        let a = (1.0 - b) * extra_gain;
        self.a = a;
        self.b = b;
        self.mode = FilterMode::Active;
        Ok(())
    }

    /// Switches to passthrough mode and zeroes the delay line.
    pub fn set_passthrough(&mut self) {
        self.mode = FilterMode::Passthrough;
        self.y1 = 0.0;
    }

    /// Switches to muted mode and zeroes the delay line.
    pub fn set_muted(&mut self) {
        self.mode = FilterMode::Muted;
        self.y1 = 0.0;
    }

    /// Returns the current mode.
    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Processes one input sample and returns the output sample.
    pub fn process(&mut self, x: f64) -> f64 {
        match self.mode {
            FilterMode::Active => {
                let y = self.a * x + self.b * self.y1;
                self.y1 = y;
                y
            }
            FilterMode::Passthrough => x,
            FilterMode::Muted => 0.0,
        }
    }
}

/// Two-pole IIR resonator: `y[n] = a*x[n] + b*y[n-1] + c*y[n-2]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Resonator {
    a: f64,
    b: f64,
    c: f64,
    r: f64,
    y1: f64,
    y2: f64,
    mode: FilterMode,
}

impl Resonator {
    /// Creates a resonator in passthrough mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures centre frequency `f` (Hz, `f = 0` degenerates to a one-pole low-pass),
    /// bandwidth `bw` (Hz), and DC gain `dc_gain`, at sample rate `fs` (Hz).
    pub fn configure(&mut self, f: f64, bw: f64, dc_gain: f64, fs: f64) -> Result<()> {
        validate_finite("f", f)?;
        validate_finite("bw", bw)?;
        validate_finite("dc_gain", dc_gain)?;
        if !(f >= 0.0 && f < fs / 2.0) {
            return Err(SynthesizerError::InvalidFilterParameter(format!(
                "f must be in [0, fs/2), got f={f} fs={fs}"
            )));
        }
        if bw <= 0.0 {
            return Err(SynthesizerError::InvalidFilterParameter(format!(
                "bandwidth must be positive, got {bw}"
            )));
        }
        if dc_gain <= 0.0 {
            return Err(SynthesizerError::InvalidFilterParameter(format!(
                "dc_gain must be positive, got {dc_gain}"
            )));
        }
        let omega = 2.0 * PI * f / fs;
        let r = (-PI * bw / fs).exp();
        let b = 2.0 * r * omega.cos();
        let c = -r * r;
        let a = (1.0 - b - c) * dc_gain;
        self.a = a;
        self.b = b;
        self.c = c;
        self.r = r;
        self.mode = FilterMode::Active;
        Ok(())
    }

    /// Overrides the feed-forward gain directly, bypassing the DC-gain derivation.
    /// Used by the impulsive glottal source, which drives the resonator with a
    /// unit-area doublet rather than a steady input.
    pub fn adjust_impulse_gain(&mut self, new_a: f64) {
        self.a = new_a;
    }

    /// Sets the feed-forward gain so that the resonator's peak response equals `p`.
    pub fn adjust_peak_gain(&mut self, p: f64) -> Result<()> {
        if !(p.is_finite() && p > 0.0) {
            return Err(SynthesizerError::InvalidPeakGain(format!(
                "peak gain must be finite and positive, got {p}"
            )));
        }
        self.a = p * (1.0 - self.r);
        Ok(())
    }

    /// Switches to passthrough mode and zeroes the delay line.
    pub fn set_passthrough(&mut self) {
        self.mode = FilterMode::Passthrough;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }

    /// Switches to muted mode and zeroes the delay line.
    pub fn set_muted(&mut self) {
        self.mode = FilterMode::Muted;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }

    /// Returns the current mode.
    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Processes one input sample and returns the output sample.
    pub fn process(&mut self, x: f64) -> f64 {
        match self.mode {
            FilterMode::Active => {
                let y = self.a * x + self.b * self.y1 + self.c * self.y2;
                self.y2 = self.y1;
                self.y1 = y;
                y
            }
            FilterMode::Passthrough => x,
            FilterMode::Muted => 0.0,
        }
    }
}

/// Two-zero FIR anti-resonator: `y[n] = a*x[n] + b*x[n-1] + c*x[n-2]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AntiResonator {
    a: f64,
    b: f64,
    c: f64,
    x1: f64,
    x2: f64,
    mode: FilterMode,
}

impl AntiResonator {
    /// Creates an anti-resonator in passthrough mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures centre frequency `f` (Hz) and bandwidth `bw` (Hz) at sample rate `fs` (Hz).
    ///
    /// If the implied normalization `a0` collapses to zero the filter degenerates to
    /// silence; this is logged since it usually means the caller asked for a notch
    /// that can't be represented at this sample rate.
    pub fn configure(&mut self, f: f64, bw: f64, fs: f64) -> Result<()> {
        validate_finite("f", f)?;
        validate_finite("bw", bw)?;
        if !(f >= 0.0 && f < fs / 2.0) {
            return Err(SynthesizerError::InvalidFilterParameter(format!(
                "f must be in [0, fs/2), got f={f} fs={fs}"
            )));
        }
        if bw <= 0.0 {
            return Err(SynthesizerError::InvalidFilterParameter(format!(
                "bandwidth must be positive, got {bw}"
            )));
        }
        let omega = 2.0 * PI * f / fs;
        let r = (-PI * bw / fs).exp();
        let b0 = 2.0 * r * omega.cos();
        let c0 = -r * r;
        let a0 = 1.0 - b0 - c0;
        if a0 == 0.0 {
            log::warn!("anti-resonator normalization collapsed to zero at f={f} bw={bw} fs={fs}; muting");
            self.set_muted();
            return Ok(());
        }
        self.a = 1.0 / a0;
        self.b = -b0 / a0;
        self.c = -c0 / a0;
        self.mode = FilterMode::Active;
        Ok(())
    }

    /// Switches to passthrough mode and zeroes the delay line.
    pub fn set_passthrough(&mut self) {
        self.mode = FilterMode::Passthrough;
        self.x1 = 0.0;
        self.x2 = 0.0;
    }

    /// Switches to muted mode and zeroes the delay line.
    pub fn set_muted(&mut self) {
        self.mode = FilterMode::Muted;
        self.x1 = 0.0;
        self.x2 = 0.0;
    }

    /// Returns the current mode.
    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Processes one input sample and returns the output sample.
    pub fn process(&mut self, x: f64) -> f64 {
        match self.mode {
            FilterMode::Active => {
                let y = self.a * x + self.b * self.x1 + self.c * self.x2;
                self.x2 = self.x1;
                self.x1 = x;
                y
            }
            FilterMode::Passthrough => x,
            FilterMode::Muted => 0.0,
        }
    }
}

/// First-difference high-pass: `y[n] = x[n] - x[n-1]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DifferenceFilter {
    x1: f64,
    mode: FilterMode,
}

impl DifferenceFilter {
    /// Creates a difference filter in active mode (its default operating mode in practice).
    pub fn new() -> Self {
        Self {
            x1: 0.0,
            mode: FilterMode::Active,
        }
    }

    /// Switches to passthrough mode and zeroes the delay line.
    pub fn set_passthrough(&mut self) {
        self.mode = FilterMode::Passthrough;
        self.x1 = 0.0;
    }

    /// Switches to muted mode and zeroes the delay line.
    pub fn set_muted(&mut self) {
        self.mode = FilterMode::Muted;
        self.x1 = 0.0;
    }

    /// Switches to active mode. The filter has no coefficients to configure.
    pub fn set_active(&mut self) {
        self.mode = FilterMode::Active;
    }

    /// Returns the current mode.
    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Processes one input sample and returns the output sample.
    pub fn process(&mut self, x: f64) -> f64 {
        match self.mode {
            FilterMode::Active => {
                let y = x - self.x1;
                self.x1 = x;
                y
            }
            FilterMode::Passthrough => x,
            FilterMode::Muted => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lp_filter1_passthrough_identity() {
        let mut f = LpFilter1::new();
        f.set_passthrough();
        for x in [0.0, 1.0, -0.5, 3.3] {
            assert_eq!(f.process(x), x);
        }
    }

    #[test]
    fn lp_filter1_muted_is_silent() {
        let mut f = LpFilter1::new();
        f.configure(1000.0, 0.5, 1.0, 44100.0).unwrap();
        f.set_muted();
        assert_eq!(f.process(1.0), 0.0);
        assert_eq!(f.process(-1.0), 0.0);
    }

    #[test]
    fn lp_filter1_rejects_invalid_frequency() {
        let mut f = LpFilter1::new();
        assert!(f.configure(0.0, 0.5, 1.0, 44100.0).is_err());
        assert!(f.configure(30000.0, 0.5, 1.0, 44100.0).is_err());
        assert!(f.configure(f64::NAN, 0.5, 1.0, 44100.0).is_err());
    }

    #[test]
    fn lp_filter1_rejects_invalid_g() {
        let mut f = LpFilter1::new();
        assert!(f.configure(1000.0, 0.0, 1.0, 44100.0).is_err());
        assert!(f.configure(1000.0, 1.0, 1.0, 44100.0).is_err());
    }

    #[test]
    fn resonator_passthrough_identity() {
        let mut r = Resonator::new();
        r.set_passthrough();
        for x in [0.0, 1.0, -0.5, 3.3] {
            assert_eq!(r.process(x), x);
        }
    }

    #[test]
    fn resonator_accepts_zero_frequency() {
        let mut r = Resonator::new();
        assert!(r.configure(0.0, 100.0, 1.0, 44100.0).is_ok());
    }

    #[test]
    fn resonator_rejects_nonpositive_bandwidth() {
        let mut r = Resonator::new();
        assert!(r.configure(500.0, 0.0, 1.0, 44100.0).is_err());
        assert!(r.configure(500.0, -10.0, 1.0, 44100.0).is_err());
    }

    #[test]
    fn resonator_peak_gain_settles_near_target() {
        let fs = 44100.0;
        let f = 500.0;
        let mut r = Resonator::new();
        r.configure(f, 60.0, 1.0, fs).unwrap();
        r.adjust_peak_gain(2.0).unwrap();

        let omega = 2.0 * PI * f / fs;
        let mut y = 0.0;
        for n in 0..20000 {
            let x = (omega * n as f64).sin();
            y = r.process(x);
        }
        // after settling, a unit sine at the resonant frequency should come out within
        // 0.2 of the requested peak gain of 2.0.
        assert!((y.abs() - 2.0).abs() < 0.2, "settled amplitude {y} too far from target 2.0");
    }

    #[test]
    fn adjust_peak_gain_rejects_nonpositive() {
        let mut r = Resonator::new();
        r.configure(500.0, 60.0, 1.0, 44100.0).unwrap();
        assert!(r.adjust_peak_gain(0.0).is_err());
        assert!(r.adjust_peak_gain(-1.0).is_err());
        assert!(r.adjust_peak_gain(f64::NAN).is_err());
    }

    #[test]
    fn anti_resonator_passthrough_identity() {
        let mut a = AntiResonator::new();
        a.set_passthrough();
        for x in [0.0, 1.0, -0.5, 3.3] {
            assert_eq!(a.process(x), x);
        }
    }

    #[test]
    fn anti_resonator_rejects_nonpositive_bandwidth() {
        let mut a = AntiResonator::new();
        assert!(a.configure(500.0, 0.0, 44100.0).is_err());
    }

    #[test]
    fn difference_filter_is_first_difference() {
        let mut d = DifferenceFilter::new();
        assert_eq!(d.process(1.0), 1.0);
        assert_eq!(d.process(1.0), 0.0);
        assert_eq!(d.process(3.0), 2.0);
    }

    #[test]
    fn difference_filter_muted_is_silent() {
        let mut d = DifferenceFilter::new();
        d.set_muted();
        assert_eq!(d.process(5.0), 0.0);
    }
}
