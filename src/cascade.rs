//! Cascade branch: nasal anti-resonator → nasal resonator → up to six oral
//! resonators in series. The natural topology for vowels.

use crate::error::Result;
use crate::filters::{AntiResonator, Resonator};
use crate::params::{is_enabled, FrameParams, MAX_ORAL_FORMANTS};

/// The series resonator chain driven by the voiced+aspirated cascade source.
#[derive(Debug, Clone, Copy, Default)]
pub struct CascadeBranch {
    nasal_antiformant: AntiResonator,
    nasal_formant: Resonator,
    oral_formants: [Resonator; MAX_ORAL_FORMANTS],
}

impl CascadeBranch {
    /// Creates a branch with every stage in passthrough mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconfigures the branch's filters from a frame's cascade and nasal parameters.
    pub fn configure(&mut self, frame: &FrameParams, fs: f64) -> Result<()> {
        if is_enabled(frame.cascade.nasal_antiformant_freq)
            && is_enabled(frame.cascade.nasal_antiformant_bw)
        {
            self.nasal_antiformant.configure(
                frame.cascade.nasal_antiformant_freq,
                frame.cascade.nasal_antiformant_bw,
                fs,
            )?;
        } else {
            self.nasal_antiformant.set_passthrough();
        }

        if is_enabled(frame.nasal_formant_freq) && is_enabled(frame.nasal_formant_bw) {
            self.nasal_formant
                .configure(frame.nasal_formant_freq, frame.nasal_formant_bw, 1.0, fs)?;
        } else {
            self.nasal_formant.set_passthrough();
        }

        for i in 0..MAX_ORAL_FORMANTS {
            let freq = frame.oral_formant_freq[i];
            let bw = frame.oral_formant_bw[i];
            if is_enabled(freq) && is_enabled(bw) {
                self.oral_formants[i].configure(freq, bw, 1.0, fs)?;
            } else {
                self.oral_formants[i].set_passthrough();
            }
        }

        Ok(())
    }

    /// Processes one sample of the voiced+aspirated source through the series chain.
    pub fn process(&mut self, source: f64) -> f64 {
        let y = self.nasal_antiformant.process(source);
        let y = self.nasal_formant.process(y);
        self.oral_formants
            .iter_mut()
            .fold(y, |acc, resonator| resonator.process(acc))
    }
}
