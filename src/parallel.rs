//! Parallel branch: a first-difference pre-emphasis filter and frication feed
//! six independently gained oral resonators (summed with alternating signs)
//! plus a nasal resonator and a direct bypass path. The natural topology for
//! fricatives and nasals.

use std::f64::consts::PI;

use crate::error::Result;
use crate::filters::{DifferenceFilter, Resonator};
use crate::params::{db_to_lin, is_enabled, FrameParams, MAX_ORAL_FORMANTS};

/// The parallel resonator bank driven by the voiced+aspirated source and, for
/// F2..F6 and the bypass, its high-pass-pre-emphasised-plus-frication derivative.
#[derive(Debug, Clone, Copy)]
pub struct ParallelBranch {
    diff: DifferenceFilter,
    nasal_formant: Resonator,
    oral_formants: [Resonator; MAX_ORAL_FORMANTS],
}

impl Default for ParallelBranch {
    fn default() -> Self {
        Self {
            diff: DifferenceFilter::new(),
            nasal_formant: Resonator::default(),
            oral_formants: Default::default(),
        }
    }
}

impl ParallelBranch {
    /// Creates a branch with every resonator muted (the parallel branch's idle state).
    pub fn new() -> Self {
        let mut branch = Self::default();
        branch.nasal_formant.set_muted();
        for r in &mut branch.oral_formants {
            r.set_muted();
        }
        branch
    }

    /// Reconfigures the branch's resonators from a frame's parallel parameters.
    pub fn configure(&mut self, frame: &FrameParams, fs: f64) -> Result<()> {
        let nasal_gain = db_to_lin(frame.parallel.nasal_formant_db);
        if is_enabled(frame.nasal_formant_freq) && is_enabled(frame.nasal_formant_bw) && nasal_gain != 0.0 {
            self.nasal_formant
                .configure(frame.nasal_formant_freq, frame.nasal_formant_bw, 1.0, fs)?;
            self.nasal_formant.adjust_peak_gain(nasal_gain)?;
        } else {
            self.nasal_formant.set_muted();
        }

        for i in 0..MAX_ORAL_FORMANTS {
            let freq = frame.oral_formant_freq[i];
            let bw = frame.oral_formant_bw[i];
            let gain = db_to_lin(frame.parallel.oral_formant_db[i]);
            if is_enabled(freq) && is_enabled(bw) && gain != 0.0 {
                self.oral_formants[i].configure(freq, bw, 1.0, fs)?;
                let peak = if i == 0 {
                    gain
                } else {
                    let omega = 2.0 * PI * freq / fs;
                    let diff_gain = (2.0 - 2.0 * omega.cos()).sqrt();
                    gain / diff_gain
                };
                self.oral_formants[i].adjust_peak_gain(peak)?;
            } else {
                self.oral_formants[i].set_muted();
            }
        }

        Ok(())
    }

    /// Processes one sample: `source` feeds the nasal resonator, F1, and the
    /// first-difference filter; `frication` is summed into the differenced
    /// source before it reaches F2..F6 and `bypass_lin`.
    pub fn process(&mut self, source: f64, frication: f64, bypass_lin: f64) -> f64 {
        let diff = self.diff.process(source);
        let source2 = diff + frication;

        let mut out = self.nasal_formant.process(source) + self.oral_formants[0].process(source);

        let mut sign = 1.0;
        for resonator in &mut self.oral_formants[1..MAX_ORAL_FORMANTS] {
            out += sign * resonator.process(source2);
            sign = -sign;
        }

        out + bypass_lin * source2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{FrameParams, ParallelParams};

    #[test]
    fn idle_branch_emits_only_bypass() {
        let mut branch = ParallelBranch::new();
        let out = branch.process(1.0, 0.0, 0.5);
        assert_eq!(out, 0.5);
    }

    #[test]
    fn idle_branch_emits_silence_with_zero_bypass() {
        let mut branch = ParallelBranch::new();
        let out = branch.process(1.0, 0.3, 0.0);
        // first sample: diff filter has no history so diff = source = 1.0, plus frication 0.3
        assert_eq!(out, 0.0);
    }

    #[test]
    fn nasal_disabled_by_zero_db() {
        let frame = FrameParams::new(1.0, 120.0);
        let mut with_nasal = frame.clone();
        with_nasal.nasal_formant_freq = 300.0;
        with_nasal.nasal_formant_bw = 100.0;
        with_nasal.parallel.nasal_formant_db = -99.0;

        let mut branch = ParallelBranch::new();
        branch.configure(&with_nasal, 44100.0).unwrap();
        // nasal stays muted because its dB is -99 even though freq/bw are set.
        let out = branch.process(1.0, 0.0, 0.0);
        assert_eq!(out, 0.0);
    }

    #[test]
    fn configured_oral_formants_produce_nonzero_output() {
        let mut parallel = ParallelParams::default();
        parallel.enabled = true;
        parallel.oral_formant_db[0] = 0.0;
        let frame = FrameParams::new(1.0, 120.0)
            .with_oral_formants(&[(500.0, 60.0)])
            .with_parallel(parallel);

        let mut branch = ParallelBranch::new();
        branch.configure(&frame, 44100.0).unwrap();

        let out: Vec<f64> = (0..20)
            .map(|n| branch.process(if n == 0 { 1.0 } else { 0.0 }, 0.0, 0.0))
            .collect();
        assert!(out.iter().any(|&v| v != 0.0));
    }
}
