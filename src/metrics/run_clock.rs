use std::time::{Duration, Instant};

/// Wall-clock time of the current run, excluding pauses, plus a session run counter
pub struct RunClock {
    started_at: Option<Instant>,
    banked: Duration,
    pub elapsed_time: Duration,
    pub games_played: u32,
}

impl RunClock {
    pub fn new() -> Self {
        Self {
            started_at: None,
            banked: Duration::ZERO,
            elapsed_time: Duration::ZERO,
            games_played: 0,
        }
    }

    /// Refresh `elapsed_time`; call once per frame
    pub fn update(&mut self) {
        self.update_at(Instant::now());
    }

    fn update_at(&mut self, now: Instant) {
        let live = self
            .started_at
            .map(|start| now.saturating_duration_since(start))
            .unwrap_or_default();
        self.elapsed_time = self.banked + live;
    }

    pub fn on_game_start(&mut self) {
        self.banked = Duration::ZERO;
        self.elapsed_time = Duration::ZERO;
        self.started_at = Some(Instant::now());
    }

    pub fn on_pause(&mut self) {
        if let Some(start) = self.started_at.take() {
            self.banked += start.elapsed();
        }
        self.elapsed_time = self.banked;
    }

    pub fn on_resume(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    pub fn on_game_over(&mut self) {
        self.on_pause();
        self.games_played += 1;
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for RunClock {
    fn default() -> Self {
        Self::new()
    }
}
