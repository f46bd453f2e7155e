//! The generator orchestrator: owns every filter and source, binds frame
//! parameters at period boundaries, and drives the per-sample synthesis loop.

use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::cascade::CascadeBranch;
use crate::error::Result;
use crate::error::SynthesizerError;
use crate::filters::{LpFilter1, Resonator};
use crate::frame_state::FrameState;
use crate::glottal::GlottalSource;
use crate::noise::{white_noise, LpNoiseSource};
use crate::params::{FrameParams, MainParams};
use crate::parallel::ParallelBranch;
use crate::period::PeriodState;

/// Spectral tilt corner frequency (Hz), per the frame-parameter binder.
const TILT_FREQUENCY_HZ: f64 = 3000.0;

/// The cascade/parallel formant synthesis engine.
///
/// A `Generator` is constructed once from [`MainParams`] and persists across
/// frames, carrying filter state across frame boundaries so consecutive
/// `generate_frame` calls don't click. It is single-threaded and synchronous:
/// one call runs to completion before any other operation on the generator is
/// valid.
pub struct Generator {
    main: MainParams,
    rng: SmallRng,
    flutter_offset: f64,

    glottal: GlottalSource,
    tilt: LpFilter1,
    output_lp: Resonator,
    noise_source: LpNoiseSource,
    cascade: CascadeBranch,
    parallel: ParallelBranch,

    period: PeriodState,
    frame_state: FrameState,
    current_frame: Option<FrameParams>,
    pending_frame: Option<FrameParams>,
    last_frame_ptr: Option<*const FrameParams>,

    abs_position: u64,
}

impl Generator {
    /// Creates a new generator, seeding its PRNG from OS entropy.
    pub fn new(main: MainParams) -> Result<Self> {
        Self::with_rng(main, SmallRng::from_os_rng())
    }

    /// Creates a new generator with a deterministic PRNG seed, for reproducible
    /// renders and tests.
    pub fn with_seed(main: MainParams, seed: u64) -> Result<Self> {
        Self::with_rng(main, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(main: MainParams, mut rng: SmallRng) -> Result<Self> {
        let fs = main.fs();
        let flutter_offset = rng.random::<f64>() * 1000.0;

        let mut output_lp = Resonator::new();
        output_lp.configure(0.0, fs / 2.0, 1.0, fs)?;
        let noise_source = LpNoiseSource::new(fs)?;

        Ok(Self {
            main,
            rng,
            flutter_offset,
            glottal: GlottalSource::new(main.glottal_source),
            tilt: LpFilter1::new(),
            output_lp,
            noise_source,
            cascade: CascadeBranch::new(),
            parallel: ParallelBranch::new(),
            // period_length = 0 forces the very first sample to hit a period
            // boundary, which is what adopts the first frame's parameters.
            period: PeriodState::default(),
            frame_state: FrameState::default(),
            current_frame: None,
            pending_frame: None,
            last_frame_ptr: None,
            abs_position: 0,
        })
    }

    /// Fills `out` with synthesized samples, consuming `frame`'s parameters
    /// starting from the next period boundary.
    ///
    /// `frame.duration` is ignored; the number of samples produced is exactly
    /// `out.len()`. Returns [`SynthesizerError::ReusedFrameParams`] if `frame`
    /// is the same reference as the one passed to the previous call, without
    /// writing any samples.
    pub fn generate_frame(&mut self, frame: &FrameParams, out: &mut [f64]) -> Result<()> {
        let frame_ptr = frame as *const FrameParams;
        if let Some(last) = self.last_frame_ptr {
            if std::ptr::eq(last, frame_ptr) {
                return Err(SynthesizerError::ReusedFrameParams);
            }
        }
        self.last_frame_ptr = Some(frame_ptr);
        self.pending_frame = Some(frame.clone());

        for sample in out.iter_mut() {
            self.maybe_start_period()?;
            *sample = self.step();
        }
        Ok(())
    }

    fn maybe_start_period(&mut self) -> Result<()> {
        if !self.period.at_boundary() {
            return Ok(());
        }

        if let Some(pending) = self.pending_frame.take() {
            self.frame_state = FrameState::from_frame(&pending);
            self.bind_tilt(&pending)?;
            self.cascade.configure(&pending, self.main.fs())?;
            self.parallel.configure(&pending, self.main.fs())?;
            self.current_frame = Some(pending);
        }

        let frame = self
            .current_frame
            .as_ref()
            .expect("a frame must be installed before the first sample is produced");

        self.period = crate::period::start_new_period(
            frame.f0,
            frame.flutter_level,
            self.flutter_offset,
            frame.open_phase_ratio,
            self.abs_position,
            self.main.fs(),
        );
        self.glottal
            .start_period(self.period.open_phase_length, self.main.fs());
        Ok(())
    }

    fn bind_tilt(&mut self, frame: &FrameParams) -> Result<()> {
        if frame.tilt_db == 0.0 || frame.tilt_db.is_nan() {
            self.tilt.set_passthrough();
        } else {
            let g = crate::params::db_to_lin(-frame.tilt_db);
            self.tilt.configure(TILT_FREQUENCY_HZ, g, 1.0, self.main.fs())?;
        }
        Ok(())
    }

    fn step(&mut self) -> f64 {
        let frame = self
            .current_frame
            .as_ref()
            .expect("installed by maybe_start_period before any sample is produced");

        let mut v = self.glottal.next_sample(&mut self.rng);
        v = self.tilt.process(v);
        if self.period.position_in_period < self.period.open_phase_length {
            v += white_noise(&mut self.rng) * self.frame_state.breathiness_lin;
        }

        let in_second_half = self.period.in_second_half();
        let shared_noise = self.noise_source.next_sample(&mut self.rng);

        let cascade_out = if frame.cascade.enabled {
            let mod_depth = if in_second_half {
                frame.cascade.aspiration_mod
            } else {
                0.0
            };
            let aspiration = shared_noise * self.frame_state.cascade_aspiration_lin * (1.0 - mod_depth);
            let voice = v * self.frame_state.cascade_voicing_lin;
            self.cascade.process(voice + aspiration)
        } else {
            0.0
        };

        let parallel_out = if frame.parallel.enabled {
            let asp_mod = if in_second_half {
                frame.parallel.aspiration_mod
            } else {
                0.0
            };
            let fric_mod = if in_second_half {
                frame.parallel.frication_mod
            } else {
                0.0
            };
            let aspiration = shared_noise * self.frame_state.parallel_aspiration_lin * (1.0 - asp_mod);
            let voice = v * self.frame_state.parallel_voicing_lin;
            let source = voice + aspiration;
            let frication = shared_noise * self.frame_state.frication_lin * (1.0 - fric_mod);
            self.parallel
                .process(source, frication, self.frame_state.parallel_bypass_lin)
        } else {
            0.0
        };

        let sum = cascade_out + parallel_out;
        let filtered = self.output_lp.process(sum);
        let sample = filtered * self.frame_state.gain_lin;

        self.period.position_in_period += 1;
        self.abs_position += 1;

        sample
    }
}

/// Synthesizes a full sequence of frames into one buffer.
///
/// Allocates a buffer of `sum(round(frame.duration * sample_rate))` samples
/// and fills it frame-by-frame via [`Generator::generate_frame`].
pub fn generate_sound(main: MainParams, frames: &[FrameParams]) -> Result<Vec<f64>> {
    let fs = main.fs();
    let lengths: Vec<usize> = frames
        .iter()
        .map(|f| (f.duration * fs).round() as usize)
        .collect();
    let total: usize = lengths.iter().sum();

    let mut buffer = vec![0.0; total];
    let mut generator = Generator::new(main)?;

    let mut offset = 0;
    for (frame, len) in frames.iter().zip(lengths.iter()) {
        generator.generate_frame(frame, &mut buffer[offset..offset + len])?;
        offset += len;
    }

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glottal::GlottalSourceKind;
    use crate::params::CascadeParams;

    fn steady_vowel_frame(duration: f64, f0: f64) -> FrameParams {
        FrameParams::new(duration, f0)
            .with_open_phase_ratio(0.7)
            .with_breathiness_db(-25.0)
            .with_oral_formants(&[
                (520.0, 76.0),
                (1006.0, 102.0),
                (2831.0, 72.0),
                (3168.0, 102.0),
                (4135.0, 816.0),
                (5020.0, 596.0),
            ])
            .with_cascade(CascadeParams {
                enabled: true,
                voicing_db: 0.0,
                aspiration_db: -25.0,
                aspiration_mod: 0.5,
                ..Default::default()
            })
    }

    #[test]
    fn silence_when_gain_muted() {
        let main = MainParams::new(44100, GlottalSourceKind::Impulsive).unwrap();
        let mut gen = Generator::with_seed(main, 1).unwrap();
        let frame = steady_vowel_frame(0.1, 247.0).with_gain_db(-99.0);
        let mut out = vec![0.0; 4410];
        gen.generate_frame(&frame, &mut out).unwrap();
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn generate_sound_output_length_matches_durations() {
        let main = MainParams::new(44100, GlottalSourceKind::Impulsive).unwrap();
        let frames = vec![steady_vowel_frame(0.5, 200.0), steady_vowel_frame(0.25, 150.0)];
        let out = generate_sound(main, &frames).unwrap();
        let expected = (0.5_f64 * 44100.0).round() as usize + (0.25_f64 * 44100.0).round() as usize;
        assert_eq!(out.len(), expected);
    }

    #[test]
    fn period_boundaries_land_at_expected_samples_without_flutter() {
        let fs = 44100.0;
        let f0 = 247.0;
        let main = MainParams::new(fs as u32, GlottalSourceKind::Impulsive).unwrap();
        let mut gen = Generator::with_seed(main, 1).unwrap();
        let frame = steady_vowel_frame(1.0, f0).with_flutter_level(0.0);
        let mut out = vec![0.0; fs as usize];
        gen.generate_frame(&frame, &mut out).unwrap();

        let period_len = (fs / f0).round() as u64;
        assert_eq!(gen.period.position_in_period as u64, fs as u64 % period_len.max(1));
    }

    #[test]
    fn reusing_frame_params_reference_is_rejected() {
        let main = MainParams::new(44100, GlottalSourceKind::Impulsive).unwrap();
        let mut gen = Generator::with_seed(main, 1).unwrap();
        let frame = steady_vowel_frame(0.01, 200.0);
        let mut out = vec![0.0; 441];

        gen.generate_frame(&frame, &mut out).unwrap();
        let result = gen.generate_frame(&frame, &mut out);
        assert_eq!(result, Err(SynthesizerError::ReusedFrameParams));
    }

    #[test]
    fn cascade_only_differs_from_parallel_only() {
        let main = MainParams::new(44100, GlottalSourceKind::Impulsive).unwrap();

        let mut cascade_only = steady_vowel_frame(0.05, 200.0);
        cascade_only.cascade.enabled = true;
        cascade_only.parallel.enabled = false;

        let mut parallel_only = cascade_only.clone();
        parallel_only.cascade.enabled = false;
        parallel_only.parallel.enabled = true;
        parallel_only.parallel.oral_formant_db[0] = 0.0;

        let mut gen_a = Generator::with_seed(main, 7).unwrap();
        let mut out_a = vec![0.0; 2205];
        gen_a.generate_frame(&cascade_only, &mut out_a).unwrap();

        let mut gen_b = Generator::with_seed(main, 7).unwrap();
        let mut out_b = vec![0.0; 2205];
        gen_b.generate_frame(&parallel_only, &mut out_b).unwrap();

        assert_ne!(out_a, out_b);
    }

    #[test]
    fn unvoiced_frication_produces_nonzero_broadband_output() {
        let main = MainParams::new(44100, GlottalSourceKind::Impulsive).unwrap();
        let mut gen = Generator::with_seed(main, 3).unwrap();

        let mut parallel = crate::params::ParallelParams {
            enabled: true,
            frication_db: -10.0,
            bypass_db: -20.0,
            ..Default::default()
        };
        parallel.oral_formant_db = [-99.0; 6];

        let frame = FrameParams::new(0.1, 0.0)
            .with_oral_formants(&[(500.0, 60.0)])
            .with_parallel(parallel);

        let mut out = vec![0.0; 4410];
        gen.generate_frame(&frame, &mut out).unwrap();
        assert!(out.iter().any(|&s| s != 0.0));
    }

    #[test]
    fn parameter_changes_apply_only_at_next_period_boundary() {
        let main = MainParams::new(44100, GlottalSourceKind::Impulsive).unwrap();
        let mut gen = Generator::with_seed(main, 11).unwrap();

        let frame_a = steady_vowel_frame(0.05, 150.0);
        let mut out_a = vec![0.0; 2205];
        gen.generate_frame(&frame_a, &mut out_a).unwrap();

        let samples_into_current_period = gen.period.position_in_period;

        // A second, shape-shifted frame is enqueued but must not affect any
        // sample before the next period boundary.
        let mut frame_b = steady_vowel_frame(0.01, 150.0);
        frame_b.oral_formant_freq[0] = 900.0;
        let mut out_b = vec![0.0; 1];
        gen.generate_frame(&frame_b, &mut out_b).unwrap();

        // If the previous period hadn't just ended exactly on the boundary,
        // the first new sample still belongs to the *old* period until
        // position_in_period wraps. This just asserts the call didn't panic
        // and advanced exactly one sample.
        assert_eq!(
            gen.period.position_in_period,
            (samples_into_current_period + 1) % gen.period.period_length.max(1)
        );
    }
}
