//! Spiral Drawer
//!
//! Draws an inward spiral by moving forward a shrinking step and turning by a
//! fixed angle, inside one fill path.
//!
//! # Termination
//!
//! With [`Termination::ExactZero`] (the default) the loop stops only when the
//! step counter is exactly zero. The initial step must therefore be an exact
//! non-negative multiple of the decrement; `n0 = 405, decrement = 10` never
//! terminates. The hazard is logged, never corrected.

use crate::color::Color;
use crate::constants::{FILL_COLOR, INITIAL_STEP, PEN_COLOR, STEP_DECREMENT, TURN_ANGLE};
use crate::error::{Result, SpiralError};
use crate::surface::DrawingSurface;

/// When the step counter stops the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Termination {
    /// Stop only on `counter == 0`
    #[default]
    ExactZero,
    /// Stop on `counter <= 0`. Opt-in only: it changes the drawing for
    /// non-multiple initial steps.
    AtOrBelowZero,
}

impl Termination {
    fn is_finished(self, counter: i64) -> bool {
        match self {
            Termination::ExactZero => counter == 0,
            Termination::AtOrBelowZero => counter <= 0,
        }
    }
}

/// Spiral constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpiralParams {
    /// Initial step counter (`n0`); the start position is `(-n0, -n0)`
    pub initial_step: i64,
    /// Subtracted from the counter after each iteration
    pub decrement: i64,
    /// Left turn per iteration, in degrees
    pub turn_angle: f64,
    pub pen_color: Color,
    pub fill_color: Color,
    pub termination: Termination,
}

impl SpiralParams {
    /// Reject values no surface can draw. Non-terminating counters are allowed.
    pub fn validate(&self) -> Result<()> {
        if !self.turn_angle.is_finite() {
            return Err(SpiralError::InvalidParams(format!(
                "turn angle must be finite, got {}",
                self.turn_angle
            )));
        }
        Ok(())
    }

    /// Number of iterations before the loop ends, or `None` if it never does.
    ///
    /// Computed in `i128` so every `i64` pair is defined; a count that only
    /// exists through counter wrap-around is reported as `None`.
    pub fn iteration_count(&self) -> Option<u64> {
        let (n0, d) = (i128::from(self.initial_step), i128::from(self.decrement));
        let count = match self.termination {
            Termination::ExactZero => {
                if n0 == 0 {
                    0
                } else if d != 0 && n0 % d == 0 && n0 / d > 0 {
                    n0 / d
                } else {
                    return None;
                }
            }
            Termination::AtOrBelowZero => {
                if n0 <= 0 {
                    0
                } else if d > 0 {
                    (n0 + d - 1) / d
                } else {
                    return None;
                }
            }
        };
        u64::try_from(count).ok()
    }

    /// Whether the loop ends under the configured termination policy
    pub fn terminates(&self) -> bool {
        self.iteration_count().is_some()
    }
}

impl Default for SpiralParams {
    fn default() -> Self {
        Self {
            initial_step: INITIAL_STEP,
            decrement: STEP_DECREMENT,
            turn_angle: TURN_ANGLE,
            pen_color: PEN_COLOR,
            fill_color: FILL_COLOR,
            termination: Termination::default(),
        }
    }
}

/// Shrinking step counter
///
/// Yields the current value, then decrements, until the termination policy
/// says stop. Under [`Termination::ExactZero`] a value that skips past zero
/// keeps yielding forever.
#[derive(Debug, Clone)]
pub struct StepCounter {
    value: i64,
    decrement: i64,
    termination: Termination,
}

impl StepCounter {
    pub fn new(initial: i64, decrement: i64, termination: Termination) -> Self {
        Self {
            value: initial,
            decrement,
            termination,
        }
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn is_finished(&self) -> bool {
        self.termination.is_finished(self.value)
    }
}

impl Iterator for StepCounter {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        if self.is_finished() {
            return None;
        }
        let current = self.value;
        self.value = self.value.wrapping_sub(self.decrement);
        Some(current)
    }
}

/// Drawer lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpiralPhase {
    Start,
    Drawing,
    Filled,
    WaitingForClose,
    Terminated,
}

/// Result of a bounded run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The counter reached its end
    Completed { iterations: u64 },
    /// The iteration cap was hit first
    StillRunning { iterations: u64, counter: i64 },
}

/// Issues the spiral's commands against a surface
#[derive(Debug, Clone)]
pub struct SpiralDrawer {
    params: SpiralParams,
    phase: SpiralPhase,
    counter: StepCounter,
    iterations: u64,
    total_turn: f64,
}

impl SpiralDrawer {
    pub fn new(params: SpiralParams) -> Self {
        Self {
            params,
            phase: SpiralPhase::Start,
            counter: StepCounter::new(params.initial_step, params.decrement, params.termination),
            iterations: 0,
            total_turn: 0.0,
        }
    }

    pub fn params(&self) -> &SpiralParams {
        &self.params
    }

    pub fn phase(&self) -> SpiralPhase {
        self.phase
    }

    /// Iterations completed so far
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Degrees turned so far, without wrapping
    pub fn total_turn(&self) -> f64 {
        self.total_turn
    }

    pub fn counter(&self) -> i64 {
        self.counter.value()
    }

    /// Lift the pen, move to `(-n0, -n0)`, set colors, open the fill and lower the pen.
    pub fn initialize<S: DrawingSurface>(&mut self, surface: &mut S) -> Result<()> {
        self.expect_phase("initialize", SpiralPhase::Start)?;
        self.params.validate()?;

        match self.params.iteration_count() {
            Some(n) => log::info!(
                "Spiral: n0={}, decrement={}, angle={}°, {} iterations",
                self.params.initial_step,
                self.params.decrement,
                self.params.turn_angle,
                n
            ),
            None => log::warn!(
                "Spiral: n0={} never reaches the end with decrement={} under {:?}; the loop will not terminate",
                self.params.initial_step,
                self.params.decrement,
                self.params.termination
            ),
        }

        let start = -(self.params.initial_step as f64);
        surface.pen_up();
        surface.goto(start, start);
        surface.color(self.params.pen_color, self.params.fill_color);
        surface.begin_fill();
        surface.pen_down();

        self.phase = SpiralPhase::Drawing;
        Ok(())
    }

    /// Run the loop until the counter ends. Never returns for a
    /// non-terminating counter.
    pub fn run<S: DrawingSurface>(&mut self, surface: &mut S) -> Result<u64> {
        self.expect_phase("run", SpiralPhase::Drawing)?;
        while let Some(step) = self.counter.next() {
            self.step(surface, step);
        }
        log::debug!("Spiral loop done after {} iterations", self.iterations);
        Ok(self.iterations)
    }

    /// Run at most `max_iterations` more iterations. Can be called again to continue.
    pub fn run_bounded<S: DrawingSurface>(
        &mut self,
        surface: &mut S,
        max_iterations: u64,
    ) -> Result<RunOutcome> {
        self.expect_phase("run", SpiralPhase::Drawing)?;
        for _ in 0..max_iterations {
            match self.counter.next() {
                Some(step) => self.step(surface, step),
                None => break,
            }
        }

        if self.counter.is_finished() {
            Ok(RunOutcome::Completed {
                iterations: self.iterations,
            })
        } else {
            Ok(RunOutcome::StillRunning {
                iterations: self.iterations,
                counter: self.counter.value(),
            })
        }
    }

    /// Close the fill, then block until the surface is dismissed.
    pub fn finalize<S: DrawingSurface>(&mut self, surface: &mut S) -> Result<()> {
        self.expect_phase("finalize", SpiralPhase::Drawing)?;
        if !self.counter.is_finished() {
            return Err(SpiralError::LoopStillRunning {
                counter: self.counter.value(),
            });
        }

        surface.end_fill();
        self.phase = SpiralPhase::Filled;
        log::debug!("Fill closed after {} iterations", self.iterations);

        self.phase = SpiralPhase::WaitingForClose;
        surface.done()?;
        self.phase = SpiralPhase::Terminated;
        log::info!("Surface closed");
        Ok(())
    }

    /// Full lifecycle: initialize, run, finalize
    pub fn draw<S: DrawingSurface>(&mut self, surface: &mut S) -> Result<()> {
        self.initialize(surface)?;
        self.run(surface)?;
        self.finalize(surface)
    }

    fn step<S: DrawingSurface>(&mut self, surface: &mut S, step: i64) {
        surface.forward(step as f64);
        surface.left(self.params.turn_angle);
        self.iterations += 1;
        self.total_turn += self.params.turn_angle;
    }

    fn expect_phase(&self, operation: &'static str, expected: SpiralPhase) -> Result<()> {
        if self.phase != expected {
            return Err(SpiralError::InvalidPhase {
                operation,
                phase: self.phase,
            });
        }
        Ok(())
    }
}
