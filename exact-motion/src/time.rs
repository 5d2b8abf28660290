//! The interface to whatever decides which moment of a generated simulation is shown.
//!
//! Playing back trajectories in real time (starting, pausing, changing speed) is the
//! business of the application; this crate only reads the clock through
//! [`PlaybackClock`].

#[doc(no_inline)]
pub use core::time::Duration;

/// Whether a [`PlaybackClock`] is advancing.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum RunState {
    /// Time is advancing at [`PlaybackClock::speed()`].
    Running,
    /// Time is not advancing, but playback can continue from where it is.
    Paused,
    /// Playback has not started, or has been reset.
    #[default]
    Stopped,
}

/// A source of the current playback time of a simulation.
///
/// Implementations are expected to use interior mutability if they are shared with
/// whatever is controlling playback.
pub trait PlaybackClock {
    /// Simulated time elapsed since the start of the [`SimulationWindow`].
    ///
    /// [`SimulationWindow`]: crate::simulate::SimulationWindow
    fn current_time(&self) -> Duration;

    /// Rate of simulated time relative to real time; 1.0 is real time.
    fn speed(&self) -> f64;

    /// Whether the clock is running, paused or stopped.
    fn run_state(&self) -> RunState;
}

/// A [`PlaybackClock`] whose state is set directly, for rendering particular moments
/// without real-time playback.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ManualClock {
    /// Value returned by [`PlaybackClock::current_time()`].
    pub time: Duration,
    /// Value returned by [`PlaybackClock::speed()`].
    pub speed: f64,
    /// Value returned by [`PlaybackClock::run_state()`].
    pub run_state: RunState,
}

impl ManualClock {
    /// A stopped clock showing the given time.
    pub fn at(time: Duration) -> Self {
        Self {
            time,
            speed: 1.0,
            run_state: RunState::Stopped,
        }
    }
}

impl PlaybackClock for ManualClock {
    fn current_time(&self) -> Duration {
        self.time
    }
    fn speed(&self) -> f64 {
        self.speed
    }
    fn run_state(&self) -> RunState {
        self.run_state
    }
}
