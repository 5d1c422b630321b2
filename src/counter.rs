//! Repetition counting
//!
//! A two-state hysteresis machine over the contraction percent. Reaching the
//! contracted band from the extended phase, or the extended band from the
//! contracted phase, completes a half-cycle worth 0.5 reps. Frames in the mid
//! band never count, and reaching an extreme while already waiting for the
//! opposite one is a no-op, so holding a pose at the top or bottom of a curl
//! counts once.
//!
//! With `require_midband_rearm` set, a crossing only counts after a mid-band
//! frame has been seen since the previous crossing.

use crate::error::CounterError;
use crate::types::{CounterState, Phase, Transition};
use serde::{Deserialize, Serialize};

/// Trigger bands for the counting state machine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriggerThresholds {
    /// Percent at or above which the limb is fully contracted
    pub contracted: f64,
    /// Percent at or below which the limb is fully extended
    pub extended: f64,
    /// Require a mid-band frame between two crossings
    #[serde(default = "default_rearm")]
    pub require_midband_rearm: bool,
}

fn default_rearm() -> bool {
    true
}

impl Default for TriggerThresholds {
    fn default() -> Self {
        Self {
            contracted: 99.0,
            extended: 1.0,
            require_midband_rearm: true,
        }
    }
}

impl TriggerThresholds {
    /// Exact 0/100 triggers with no re-arm latch
    pub fn exact() -> Self {
        Self {
            contracted: 100.0,
            extended: 0.0,
            require_midband_rearm: false,
        }
    }

    pub fn validate(&self) -> Result<(), CounterError> {
        if !self.contracted.is_finite() || !self.extended.is_finite() {
            return Err(CounterError::InvalidThresholds(
                "thresholds must be finite".to_string(),
            ));
        }
        if self.extended < 0.0 || self.contracted > 100.0 {
            return Err(CounterError::InvalidThresholds(format!(
                "thresholds must lie within 0-100 (extended {}, contracted {})",
                self.extended, self.contracted
            )));
        }
        if self.extended >= self.contracted {
            return Err(CounterError::InvalidThresholds(format!(
                "extended threshold {} must be below contracted threshold {}",
                self.extended, self.contracted
            )));
        }
        Ok(())
    }

    pub fn is_contracted(&self, percent: f64) -> bool {
        percent >= self.contracted
    }

    pub fn is_extended(&self, percent: f64) -> bool {
        percent <= self.extended
    }

    /// Percent lies at either extreme
    pub fn at_extreme(&self, percent: f64) -> bool {
        self.is_contracted(percent) || self.is_extended(percent)
    }
}

/// Outcome of one state machine step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub state: CounterState,
    pub transition: Option<Transition>,
}

impl Step {
    /// Change in rep count caused by this step
    pub fn delta(&self) -> f64 {
        if self.transition.is_some() {
            0.5
        } else {
            0.0
        }
    }
}

/// Pure transition function of the counting state machine
pub fn step(state: CounterState, percent: f64, thresholds: &TriggerThresholds) -> Step {
    if !percent.is_finite() {
        return Step {
            state,
            transition: None,
        };
    }

    let mut next = state;
    let transition = match state.phase {
        Phase::ExtendedWait if state.armed && thresholds.is_contracted(percent) => {
            next.phase = Phase::ContractedWait;
            Some(Transition::Contracted)
        }
        Phase::ContractedWait if state.armed && thresholds.is_extended(percent) => {
            next.phase = Phase::ExtendedWait;
            Some(Transition::Extended)
        }
        _ => None,
    };

    if transition.is_some() {
        next.half_reps = state.half_reps.saturating_add(1);
        next.armed = !thresholds.require_midband_rearm;
    } else if !thresholds.at_extreme(percent) {
        next.armed = true;
    }

    Step {
        state: next,
        transition,
    }
}

/// Stateful repetition counter for one session
#[derive(Debug, Clone)]
pub struct RepCounter {
    state: CounterState,
    thresholds: TriggerThresholds,
}

impl Default for RepCounter {
    fn default() -> Self {
        Self {
            state: CounterState::default(),
            thresholds: TriggerThresholds::default(),
        }
    }
}

impl RepCounter {
    /// Create a counter in the extended phase with a zero count
    pub fn new(thresholds: TriggerThresholds) -> Result<Self, CounterError> {
        thresholds.validate()?;
        Ok(Self {
            state: CounterState::default(),
            thresholds,
        })
    }

    /// Counter for thresholds that already passed `validate`
    pub(crate) fn from_validated(thresholds: TriggerThresholds) -> Self {
        Self {
            state: CounterState::default(),
            thresholds,
        }
    }

    /// Feed one contraction percent
    pub fn update(&mut self, percent: f64) -> Option<Transition> {
        let result = step(self.state, percent, &self.thresholds);
        self.state = result.state;
        result.transition
    }

    pub fn state(&self) -> CounterState {
        self.state
    }

    pub fn thresholds(&self) -> &TriggerThresholds {
        &self.thresholds
    }

    pub fn rep_count(&self) -> f64 {
        self.state.rep_count()
    }

    pub fn display_count(&self) -> u32 {
        self.state.display_count()
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }
}
