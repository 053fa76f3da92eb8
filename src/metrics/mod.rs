pub mod run_clock;

pub use run_clock::RunClock;
