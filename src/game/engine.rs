use super::{
    action::Direction,
    config::{ConfigError, GameConfig},
    state::{Cell, CollisionType, Grid, Phase, Snake},
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::time::Duration;
use tracing::{debug, warn};

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The engine is paused or the run is over; nothing changed
    Idle,
    /// The snake translated one cell
    Moved,
    /// The snake ate and grew
    Ate { score: u32 },
    /// The run just ended
    Collided(CollisionType),
}

impl TickOutcome {
    pub fn is_terminal(self) -> bool {
        matches!(self, TickOutcome::Collided(_))
    }
}

/// Owns the whole simulation. All mutation goes through its methods.
pub struct GameEngine<R = StdRng> {
    config: GameConfig,
    grid: Grid,
    rng: R,
    snake: Snake,
    heading: Direction,
    food: Cell,
    score: u32,
    ticks: u64,
    tick_interval: Duration,
    phase: Phase,
}

impl GameEngine<StdRng> {
    /// Create an engine seeded from the OS and start a fresh run
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::new_with_rng(config, StdRng::from_entropy())
    }

    /// Create an engine with a reproducible food sequence
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::new_with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GameEngine<R> {
    pub fn new_with_rng(config: GameConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = Grid::new(config.grid_width, config.grid_height);
        let snake = Self::spawn_snake(&config, grid);
        let tick_interval = config.initial_tick();

        let mut engine = Self {
            config,
            grid,
            rng,
            snake,
            heading: Direction::Right,
            food: Cell::new(0, 0),
            score: 0,
            ticks: 0,
            tick_interval,
            phase: Phase::Running,
        };
        engine.food = engine.spawn_food();
        Ok(engine)
    }

    /// Start from an explicit layout instead of the spawn segment. The run
    /// begins in the running phase with the configured initial interval.
    ///
    /// The layout must be one a running game could reach: at least two cells
    /// long, fully inside the grid, with food on a free cell.
    pub fn with_layout(
        config: GameConfig,
        rng: R,
        snake: Snake,
        heading: Direction,
        food: Cell,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = Grid::new(config.grid_width, config.grid_height);
        Self::check_layout(grid, &snake, food)?;
        let tick_interval = config.initial_tick();
        Ok(Self {
            config,
            grid,
            rng,
            snake,
            heading,
            food,
            score: 0,
            ticks: 0,
            tick_interval,
            phase: Phase::Running,
        })
    }

    fn check_layout(grid: Grid, snake: &Snake, food: Cell) -> Result<(), ConfigError> {
        if snake.len() < 2 {
            return Err(ConfigError::SnakeTooShort { length: snake.len() });
        }
        let out_of_grid = |cell: Cell| ConfigError::CellOutOfGrid {
            cell,
            width: grid.width,
            height: grid.height,
        };
        if let Some(cell) = snake.cells().find(|&cell| !grid.contains(cell)) {
            return Err(out_of_grid(cell));
        }
        if !grid.contains(food) {
            return Err(out_of_grid(food));
        }
        if snake.occupies(food) {
            return Err(ConfigError::FoodOnSnake { food });
        }
        Ok(())
    }

    fn spawn_snake(config: &GameConfig, grid: Grid) -> Snake {
        Snake::new(grid.center(), Direction::Right, config.initial_snake_length)
    }

    /// Restore the spawn layout, fresh food, zero score and the initial interval
    pub fn reset(&mut self) {
        self.snake = Self::spawn_snake(&self.config, self.grid);
        self.heading = Direction::Right;
        self.score = 0;
        self.ticks = 0;
        self.tick_interval = self.config.initial_tick();
        self.phase = Phase::Running;
        self.food = self.spawn_food();
        debug!(food = ?self.food, "run reset");
    }

    /// Change heading for the next tick. Reversals and calls outside a running
    /// phase are ignored.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if !self.phase.is_running() || self.heading.is_opposite(direction) {
            return false;
        }
        self.heading = direction;
        true
    }

    /// Advance the simulation by one cell
    pub fn tick(&mut self) -> TickOutcome {
        if !self.phase.is_running() {
            return TickOutcome::Idle;
        }

        let new_head = self.snake.head().moved_in_direction(self.heading);

        if let Some(collision) = self.check_collision(new_head) {
            self.phase = Phase::Over(collision);
            debug!(?collision, score = self.score, ticks = self.ticks, "run over");
            return TickOutcome::Collided(collision);
        }

        self.ticks += 1;

        if new_head == self.food {
            self.snake.grow_to(new_head);
            self.score += 1;
            self.food = self.spawn_food();
            self.tick_interval = self
                .tick_interval
                .saturating_sub(self.config.tick_step())
                .max(self.config.min_tick());
            return TickOutcome::Ate { score: self.score };
        }

        self.snake.advance_to(new_head);
        TickOutcome::Moved
    }

    fn check_collision(&self, cell: Cell) -> Option<CollisionType> {
        if !self.grid.contains(cell) {
            return Some(CollisionType::Wall);
        }

        // The tail still counts: it has not moved out yet when the head arrives.
        if self.snake.occupies(cell) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Sample a food cell off the snake. After `food_retry_limit` rejected
    /// samples the last one is kept even if occupied.
    fn spawn_food(&mut self) -> Cell {
        let mut candidate = self.random_cell();
        let mut tries = 0;
        while self.snake.occupies(candidate) && tries < self.config.food_retry_limit {
            candidate = self.random_cell();
            tries += 1;
        }

        if self.snake.occupies(candidate) {
            warn!(
                tries,
                food = ?candidate,
                snake_len = self.snake.len(),
                "food placement exhausted retries; placing on occupied cell"
            );
        }

        candidate
    }

    fn random_cell(&mut self) -> Cell {
        let x = self.rng.gen_range(0..self.grid.width) as i32;
        let y = self.rng.gen_range(0..self.grid.height) as i32;
        Cell::new(x, y)
    }

    pub fn pause(&mut self) {
        if self.phase.is_running() {
            self.phase = Phase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Running;
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            Phase::Running => self.pause(),
            Phase::Paused => self.resume(),
            Phase::Over(_) => {}
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn food(&self) -> Cell {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Current period between ticks; shrinks as the score rises
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase.is_running()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> GameEngine {
        GameEngine::with_seed(GameConfig::small(), 7).unwrap()
    }

    fn layout(cells: &[(i32, i32)], heading: Direction, food: (i32, i32)) -> GameEngine {
        let snake = Snake::from_cells(cells.iter().map(|&(x, y)| Cell::new(x, y))).unwrap();
        GameEngine::with_layout(
            GameConfig::small(),
            StdRng::seed_from_u64(11),
            snake,
            heading,
            Cell::new(food.0, food.1),
        )
        .unwrap()
    }

    #[test]
    fn test_new_run() {
        let engine = GameEngine::with_seed(GameConfig::default(), 1).unwrap();

        assert!(engine.is_running());
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.ticks(), 0);
        assert_eq!(engine.snake().len(), 3);
        assert_eq!(engine.snake().head(), Cell::new(6, 9));
        assert_eq!(engine.heading(), Direction::Right);
        assert_eq!(engine.tick_interval(), Duration::from_millis(180));
        assert!(!engine.snake().occupies(engine.food()));
    }

    #[test]
    fn test_rejects_invalid_config() {
        assert!(GameEngine::with_seed(GameConfig::new(0, 0), 1).is_err());
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = layout(&[(4, 4), (3, 4)], Direction::Right, (0, 0));

        let outcome = engine.tick();

        assert_eq!(outcome, TickOutcome::Moved);
        assert_eq!(engine.ticks(), 1);
        assert_eq!(
            engine.snake().cells().collect::<Vec<_>>(),
            vec![Cell::new(5, 4), Cell::new(4, 4)]
        );
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = layout(&[(4, 4), (3, 4)], Direction::Right, (5, 4));

        let outcome = engine.tick();

        assert_eq!(outcome, TickOutcome::Ate { score: 1 });
        assert_eq!(engine.score(), 1);
        assert_eq!(engine.snake().len(), 3);
        assert!(!engine.snake().occupies(engine.food()));
        assert_eq!(engine.tick_interval(), Duration::from_millis(175));
    }

    #[test]
    fn test_layout_rejects_unreachable_states() {
        let build = |cells: &[(i32, i32)], food: (i32, i32)| {
            let snake = Snake::from_cells(cells.iter().map(|&(x, y)| Cell::new(x, y))).unwrap();
            GameEngine::with_layout(
                GameConfig::small(),
                StdRng::seed_from_u64(11),
                snake,
                Direction::Right,
                Cell::new(food.0, food.1),
            )
        };

        assert!(matches!(
            build(&[(4, 4)], (0, 0)),
            Err(ConfigError::SnakeTooShort { length: 1 })
        ));
        assert!(matches!(
            build(&[(8, 4), (7, 4)], (0, 0)),
            Err(ConfigError::CellOutOfGrid { cell, .. }) if cell == Cell::new(8, 4)
        ));
        assert!(matches!(
            build(&[(0, 0), (-1, 0)], (4, 4)),
            Err(ConfigError::CellOutOfGrid { cell, .. }) if cell == Cell::new(-1, 0)
        ));
        assert!(matches!(
            build(&[(4, 4), (3, 4)], (4, 9)),
            Err(ConfigError::CellOutOfGrid { cell, .. }) if cell == Cell::new(4, 9)
        ));
        assert!(matches!(
            build(&[(4, 4), (3, 4)], (3, 4)),
            Err(ConfigError::FoodOnSnake { food }) if food == Cell::new(3, 4)
        ));
        assert!(build(&[(4, 4), (3, 4)], (5, 4)).is_ok());
    }

    #[test]
    fn test_interval_floor() {
        let config = GameConfig {
            initial_tick_ms: 64,
            min_tick_ms: 60,
            ..GameConfig::small()
        };
        let snake = Snake::from_cells([Cell::new(1, 1), Cell::new(0, 1)]).unwrap();
        let mut engine = GameEngine::with_layout(
            config,
            StdRng::seed_from_u64(3),
            snake,
            Direction::Right,
            Cell::new(2, 1),
        )
        .unwrap();

        engine.tick();
        assert_eq!(engine.tick_interval(), Duration::from_millis(60));
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = layout(&[(0, 4), (1, 4)], Direction::Left, (5, 5));
        let before = engine.snake().clone();

        let outcome = engine.tick();

        assert_eq!(outcome, TickOutcome::Collided(CollisionType::Wall));
        assert!(outcome.is_terminal());
        assert_eq!(engine.phase(), Phase::Over(CollisionType::Wall));
        assert_eq!(engine.snake(), &before);
    }

    #[test]
    fn test_self_collision() {
        // Head at (5,5) heading down into the loop it has drawn.
        let mut engine = layout(
            &[(5, 5), (6, 5), (6, 6), (5, 6), (4, 6)],
            Direction::Down,
            (0, 0),
        );

        let outcome = engine.tick();

        assert_eq!(outcome, TickOutcome::Collided(CollisionType::SelfCollision));
        assert!(!engine.is_running());
    }

    #[test]
    fn test_tail_cell_counts_as_body() {
        // Square loop: the next head lands on the current tail.
        let mut engine = layout(&[(2, 2), (3, 2), (3, 3), (2, 3)], Direction::Down, (0, 0));

        assert_eq!(
            engine.tick(),
            TickOutcome::Collided(CollisionType::SelfCollision)
        );
    }

    #[test]
    fn test_prevent_reversal() {
        let mut engine = engine();

        assert!(!engine.set_direction(Direction::Left));
        assert_eq!(engine.heading(), Direction::Right);

        assert!(engine.set_direction(Direction::Up));
        assert_eq!(engine.heading(), Direction::Up);
    }

    #[test]
    fn test_direction_ignored_when_not_running() {
        let mut engine = engine();
        engine.pause();

        assert!(!engine.set_direction(Direction::Up));
        assert_eq!(engine.heading(), Direction::Right);
    }

    #[test]
    fn test_over_is_terminal() {
        let mut engine = layout(&[(0, 4), (1, 4)], Direction::Left, (5, 5));
        engine.tick();
        let ticks = engine.ticks();

        assert_eq!(engine.tick(), TickOutcome::Idle);
        engine.resume();
        engine.toggle_pause();
        assert!(engine.phase().is_over());
        assert_eq!(engine.ticks(), ticks);
    }

    #[test]
    fn test_pause_and_resume() {
        let mut engine = engine();
        let head = engine.snake().head();

        engine.toggle_pause();
        assert_eq!(engine.phase(), Phase::Paused);
        assert_eq!(engine.tick(), TickOutcome::Idle);
        assert_eq!(engine.snake().head(), head);

        engine.toggle_pause();
        assert_ne!(engine.tick(), TickOutcome::Idle);
        assert_eq!(engine.snake().head(), head.moved_in_direction(Direction::Right));
    }

    #[test]
    fn test_reset_restores_spawn() {
        let mut engine = layout(&[(5, 4), (4, 4)], Direction::Right, (6, 4));
        engine.tick();
        engine.set_direction(Direction::Up);
        for _ in 0..10 {
            engine.tick();
        }
        assert!(engine.phase().is_over());

        engine.reset();

        assert!(engine.is_running());
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.ticks(), 0);
        assert_eq!(engine.heading(), Direction::Right);
        assert_eq!(engine.tick_interval(), Duration::from_millis(180));
        assert_eq!(
            engine.snake().cells().collect::<Vec<_>>(),
            vec![Cell::new(4, 4), Cell::new(3, 4), Cell::new(2, 4)]
        );
        assert!(!engine.snake().occupies(engine.food()));
    }

    #[test]
    fn test_food_retry_exhaustion_keeps_last_sample() {
        // A 2x1 board is completely filled by the spawn snake.
        let config = GameConfig {
            initial_snake_length: 2,
            food_retry_limit: 5,
            ..GameConfig::new(2, 1)
        };
        let engine = GameEngine::with_seed(config, 9).unwrap();

        assert!(engine.grid().contains(engine.food()));
        assert!(engine.snake().occupies(engine.food()));
    }

    #[test]
    fn test_same_seed_same_food() {
        let a = GameEngine::with_seed(GameConfig::default(), 42).unwrap();
        let b = GameEngine::with_seed(GameConfig::default(), 42).unwrap();
        assert_eq!(a.food(), b.food());
    }
}
