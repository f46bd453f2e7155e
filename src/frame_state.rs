//! Linear gains derived from a [`FrameParams`] at each period boundary.
//!
//! This is the scalar half of the frame-parameter binder; the filter-coefficient
//! half lives on [`crate::cascade::CascadeBranch`] and [`crate::parallel::ParallelBranch`].

use crate::params::{db_to_lin, FrameParams};

/// Linear gains refreshed once per period boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameState {
    /// Linear breathiness gain.
    pub breathiness_lin: f64,
    /// Linear overall output gain.
    pub gain_lin: f64,
    /// Linear cascade voicing gain.
    pub cascade_voicing_lin: f64,
    /// Linear cascade aspiration gain.
    pub cascade_aspiration_lin: f64,
    /// Linear parallel voicing gain.
    pub parallel_voicing_lin: f64,
    /// Linear parallel aspiration gain.
    pub parallel_aspiration_lin: f64,
    /// Linear frication gain.
    pub frication_lin: f64,
    /// Linear parallel bypass gain.
    pub parallel_bypass_lin: f64,
}

impl FrameState {
    /// Derives the linear gains from a frame's dB parameters.
    pub fn from_frame(frame: &FrameParams) -> Self {
        Self {
            breathiness_lin: db_to_lin(frame.breathiness_db),
            gain_lin: db_to_lin(frame.gain_db),
            cascade_voicing_lin: db_to_lin(frame.cascade.voicing_db),
            cascade_aspiration_lin: db_to_lin(frame.cascade.aspiration_db),
            parallel_voicing_lin: db_to_lin(frame.parallel.voicing_db),
            parallel_aspiration_lin: db_to_lin(frame.parallel.aspiration_db),
            frication_lin: db_to_lin(frame.parallel.frication_db),
            parallel_bypass_lin: db_to_lin(frame.parallel.bypass_db),
        }
    }
}
