//! Scheduler & worker pool: dispatches one lane worker per segment within
//! an epoch, and barriers all of them before the next epoch starts.

#[cfg(feature = "threaded")]
pub use self::threadpool::Workers;

#[cfg(feature = "threaded")]
mod threadpool;

#[cfg(not(feature = "threaded"))]
pub use self::no_threadpool::Workers;

#[cfg(not(feature = "threaded"))]
mod no_threadpool;
