use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::interval;
use tracing::{debug, info};

use crate::game::{Direction, GameEngine, TickOutcome};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::RunClock;
use crate::render::{Renderer, SceneView};
use crate::scheduler::TickScheduler;
use crate::starter::Starter;
use crate::storage::{BestScore, ScoreStore};

/// Render at ~30 FPS, independent of the simulation rate
const RENDER_INTERVAL: Duration = Duration::from_millis(33);

/// Which view of the minigame is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Game,
    GameOver,
}

pub struct PlayMode {
    engine: GameEngine,
    best: BestScore<Box<dyn ScoreStore>>,
    clock: RunClock,
    scheduler: TickScheduler,
    renderer: Renderer,
    input_handler: InputHandler,
    screen: Screen,
    starter: Starter,
    should_quit: bool,
}

impl PlayMode {
    pub fn new(engine: GameEngine, store: Box<dyn ScoreStore>, starter: Starter) -> Self {
        let best = BestScore::load(store);
        info!(best = best.get(), "minigame ready");

        Self {
            engine,
            best,
            clock: RunClock::new(),
            scheduler: TickScheduler::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            screen: Screen::Menu,
            starter,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_game_loop(&mut terminal).await;

        self.scheduler.cancel();
        self.cleanup_terminal(&mut terminal);

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut render_timer = interval(RENDER_INTERVAL);

        loop {
            // The interval may have shrunk or the run may have stopped since
            // the last iteration.
            self.sync_scheduler();

            tokio::select! {
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                _ = self.scheduler.next_tick() => {
                    self.on_tick();
                }

                _ = render_timer.tick() => {
                    self.clock.update();
                    let view = self.view();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &view);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                info!(games = self.clock.games_played, best = self.best.get(), "leaving minigame");
                break;
            }
        }

        Ok(())
    }

    fn sync_scheduler(&mut self) {
        let advancing = self.screen == Screen::Game && self.engine.is_running();
        self.scheduler.sync(self.engine.tick_interval(), advancing);
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            let action = self.input_handler.handle_key_event(key);
            self.apply(action);
        }
    }

    /// Route a key action according to the current screen
    fn apply(&mut self, action: KeyAction) {
        if action == KeyAction::Quit {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Menu => match action {
                KeyAction::Turn(Direction::Left) => self.starter = self.starter.prev(),
                KeyAction::Turn(Direction::Right) => self.starter = self.starter.next(),
                KeyAction::Pick(index) => {
                    if let Some(starter) = Starter::from_index(index) {
                        self.starter = starter;
                    }
                }
                KeyAction::Confirm => self.start_game(),
                _ => {}
            },
            Screen::Game => match action {
                KeyAction::Turn(direction) => {
                    self.engine.set_direction(direction);
                }
                KeyAction::TogglePause => self.toggle_pause(),
                KeyAction::Restart => self.start_game(),
                KeyAction::Menu => self.back_to_menu(),
                _ => {}
            },
            Screen::GameOver => match action {
                KeyAction::Confirm | KeyAction::Restart => self.start_game(),
                KeyAction::Menu => self.back_to_menu(),
                _ => {}
            },
        }
    }

    fn on_tick(&mut self) {
        match self.engine.tick() {
            TickOutcome::Collided(collision) => {
                debug!(?collision, "collision");
                self.finish_run();
            }
            TickOutcome::Ate { score } => {
                debug!(
                    score,
                    interval_ms = self.engine.tick_interval().as_millis() as u64,
                    "food eaten"
                );
            }
            TickOutcome::Moved | TickOutcome::Idle => {}
        }
    }

    fn start_game(&mut self) {
        self.engine.reset();
        self.clock.on_game_start();
        self.screen = Screen::Game;
        info!(starter = self.starter.name(), "run started");
    }

    fn toggle_pause(&mut self) {
        self.engine.toggle_pause();
        if self.engine.is_running() {
            self.clock.on_resume();
        } else {
            self.clock.on_pause();
        }
    }

    fn finish_run(&mut self) {
        self.clock.on_game_over();
        let score = self.engine.score();
        let new_best = self.best.record(score);
        info!(score, best = self.best.get(), new_best, ticks = self.engine.ticks(), "run over");
        self.screen = Screen::GameOver;
    }

    fn back_to_menu(&mut self) {
        self.engine.pause();
        self.clock.on_pause();
        self.screen = Screen::Menu;
    }

    fn view(&self) -> SceneView<'_> {
        SceneView {
            engine: &self.engine,
            screen: self.screen,
            starter: self.starter,
            best: self.best.get(),
            tracking_best: self.best.is_tracking(),
            clock: &self.clock,
        }
    }

    fn cleanup_terminal(&mut self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) {
        if let Err(err) = disable_raw_mode() {
            tracing::error!(?err, "failed to disable raw mode");
        }
        if let Err(err) = execute!(terminal.backend_mut(), LeaveAlternateScreen) {
            tracing::error!(?err, "failed to leave alternate screen");
        }
        if let Err(err) = terminal.show_cursor() {
            tracing::error!(?err, "failed to show cursor");
        }
    }
}
