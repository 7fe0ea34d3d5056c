//=========================================================================
// Timer
//=========================================================================
//
// Stopwatch with pause/resume and fixed-step counting.
//
// `steps()` reports how many whole `step_time` intervals elapsed since the
// previous call. The leftover fraction carries over, and time spent paused
// never counts.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::{Duration, Instant};

//=== Timer ===============================================================

#[derive(Debug, Clone, Default)]
pub struct Timer {
    started_at: Option<Instant>,
    paused_elapsed: Option<Duration>,
    step_time: Duration,
    step_checked: Duration,
    accumulated: Duration,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timer that counts steps of `step_time`.
    pub fn with_step(step_time: Duration) -> Self {
        Self {
            step_time,
            ..Self::default()
        }
    }

    //--- Control ----------------------------------------------------------

    /// Starts the timer. Does nothing if already running.
    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    /// Starts from zero, whether or not the timer was running.
    pub fn restart(&mut self) {
        self.restart_at(Instant::now());
    }

    /// Stops and resets. Returns the elapsed time at the moment of stopping.
    pub fn stop(&mut self) -> Duration {
        self.stop_at(Instant::now())
    }

    /// Freezes the elapsed time. Returns it.
    pub fn pause(&mut self) -> Duration {
        self.pause_at(Instant::now())
    }

    pub fn resume(&mut self) {
        self.resume_at(Instant::now());
    }

    //--- Queries ----------------------------------------------------------

    /// Running time excluding pauses; zero when stopped.
    pub fn elapsed(&self) -> Duration {
        self.elapsed_at(Instant::now())
    }

    /// Whole steps elapsed since the previous call.
    pub fn steps(&mut self) -> u32 {
        self.steps_at(Instant::now())
    }

    pub fn step_time(&self) -> Duration {
        self.step_time
    }

    pub fn set_step_time(&mut self, step_time: Duration) {
        self.step_time = step_time;
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.paused_elapsed.is_some()
    }

    //--- Clock-Injected Internals -----------------------------------------

    fn start_at(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.restart_at(now);
        }
    }

    fn restart_at(&mut self, now: Instant) {
        self.started_at = Some(now);
        self.paused_elapsed = None;
        self.step_checked = Duration::ZERO;
        self.accumulated = Duration::ZERO;
    }

    fn stop_at(&mut self, now: Instant) -> Duration {
        let elapsed = self.elapsed_at(now);
        self.started_at = None;
        self.paused_elapsed = None;
        self.step_checked = Duration::ZERO;
        self.accumulated = Duration::ZERO;
        elapsed
    }

    fn pause_at(&mut self, now: Instant) -> Duration {
        if self.started_at.is_some() && self.paused_elapsed.is_none() {
            self.paused_elapsed = Some(self.elapsed_at(now));
        }
        self.elapsed_at(now)
    }

    fn resume_at(&mut self, now: Instant) {
        if let Some(frozen) = self.paused_elapsed.take() {
            self.started_at = Some(now.checked_sub(frozen).unwrap_or(now));
        }
    }

    fn elapsed_at(&self, now: Instant) -> Duration {
        match (self.started_at, self.paused_elapsed) {
            (Some(_), Some(frozen)) => frozen,
            (Some(start), None) => now.saturating_duration_since(start),
            (None, _) => Duration::ZERO,
        }
    }

    fn steps_at(&mut self, now: Instant) -> u32 {
        if self.step_time.is_zero() || self.started_at.is_none() {
            return 0;
        }

        let elapsed = self.elapsed_at(now);
        self.accumulated += elapsed.saturating_sub(self.step_checked);
        self.step_checked = elapsed;

        let step = self.step_time.as_nanos();
        let count = self.accumulated.as_nanos() / step;
        let consumed = Duration::from_nanos((count * step) as u64);
        self.accumulated -= consumed;
        count as u32
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
