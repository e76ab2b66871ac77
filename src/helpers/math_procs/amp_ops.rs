//! Amplification coefficient and its linear ramp.
use crate::helpers::errors::StableSwapError;
use crate::helpers::math_procs::numerical_ops::A_PRECISION;

/// Exclusive upper bound on A, before precision scaling.
pub const MAX_A: u64 = 1_000_000;
/// A single ramp may at most double or halve A.
pub const MAX_A_CHANGE: u128 = 2;
pub const MIN_RAMP_TIME: i64 = 14 * 24 * 60 * 60;
pub const MAX_RAMP_TIME: i64 = 365 * 24 * 60 * 60;
/// Minimum gap between two ramp starts (or a stop and the next start).
pub const MIN_RAMP_DELAY: i64 = 24 * 60 * 60;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AmplificationRamp {
    initial_a: u128, // Precise A at the start of the window.
    future_a: u128, // Precise A at the end of the window.
    initial_a_time: i64,
    future_a_time: i64,
}

impl AmplificationRamp {
    /// A fixed amplification with no ramp scheduled.
    pub fn new(a: u64) -> Result<Self, StableSwapError> {
        if a == 0 || a >= MAX_A {
            return Err(StableSwapError::InvalidAmplification);
        }
        let precise = a as u128 * A_PRECISION;
        Ok(Self {
            initial_a: precise,
            future_a: precise,
            initial_a_time: 0,
            future_a_time: 0,
        })
    }

    #[inline(always)]
    pub fn initial_a(&self) -> u128 { self.initial_a }
    #[inline(always)]
    pub fn future_a(&self) -> u128 { self.future_a }
    #[inline(always)]
    pub fn initial_a_time(&self) -> i64 { self.initial_a_time }
    #[inline(always)]
    pub fn future_a_time(&self) -> i64 { self.future_a_time }

    #[inline(always)]
    pub fn is_ramping(&self, now: i64) -> bool {
        now < self.future_a_time
    }

    /// A scaled by [`A_PRECISION`] as of `now`. Initial A up to the window
    /// start, future A from the window end on, linear in between.
    pub fn current_a_precise(&self, now: i64) -> u128 {
        if now >= self.future_a_time {
            return self.future_a;
        }
        if now <= self.initial_a_time {
            return self.initial_a;
        }
        let elapsed = (now - self.initial_a_time) as u128;
        let window = (self.future_a_time - self.initial_a_time) as u128;
        if self.future_a > self.initial_a {
            self.initial_a + (self.future_a - self.initial_a) * elapsed / window
        } else {
            self.initial_a - (self.initial_a - self.future_a) * elapsed / window
        }
    }

    pub fn current_a(&self, now: i64) -> u128 {
        self.current_a_precise(now) / A_PRECISION
    }

    /// Schedules a linear move from the current A to `future_a` ending at
    /// `future_time`.
    pub fn ramp_to(&mut self, future_a: u64, future_time: i64, now: i64) -> Result<(), StableSwapError> {
        if self.is_ramping(now) {
            return Err(StableSwapError::RampInProgress);
        }
        if now < self.initial_a_time.saturating_add(MIN_RAMP_DELAY) {
            return Err(StableSwapError::RampTooSoon);
        }
        let duration = future_time.checked_sub(now).ok_or(StableSwapError::InvalidDuration)?;
        if duration < MIN_RAMP_TIME || duration > MAX_RAMP_TIME {
            return Err(StableSwapError::InvalidDuration);
        }
        if future_a == 0 || future_a >= MAX_A {
            return Err(StableSwapError::InvalidAmplification);
        }

        let initial_precise = self.current_a_precise(now);
        let future_precise = future_a as u128 * A_PRECISION;
        let within_bounds = if future_precise < initial_precise {
            future_precise * MAX_A_CHANGE >= initial_precise
        } else {
            future_precise <= initial_precise * MAX_A_CHANGE
        };
        if !within_bounds {
            return Err(StableSwapError::ExcessiveChange);
        }

        self.initial_a = initial_precise;
        self.future_a = future_precise;
        self.initial_a_time = now;
        self.future_a_time = future_time;
        Ok(())
    }

    /// Freezes A at its interpolated value.
    pub fn stop_ramp(&mut self, now: i64) -> Result<(), StableSwapError> {
        if !self.is_ramping(now) {
            return Err(StableSwapError::RampNotActive);
        }
        let current = self.current_a_precise(now);
        self.initial_a = current;
        self.future_a = current;
        self.initial_a_time = now;
        self.future_a_time = now;
        Ok(())
    }
}
