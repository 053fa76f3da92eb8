use std::collections::VecDeque;

use super::action::Direction;

/// A cell on the game grid, as (column, row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset the cell by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// The neighbouring cell in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    pub fn manhattan_distance(&self, other: Cell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// The snake body, stored head first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Cell>,
}

impl Snake {
    /// Lay out a straight snake with its head at `head`, trailing away from `direction`
    pub fn new(head: Cell, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.delta();
        let body = (0..length.max(1) as i32)
            .map(|i| head.moved_by(-dx * i, -dy * i))
            .collect();
        Self { body }
    }

    /// Build a snake from explicit cells, head first. Returns `None` for an empty
    /// or self-overlapping body.
    pub fn from_cells(cells: impl IntoIterator<Item = Cell>) -> Option<Self> {
        let body: VecDeque<Cell> = cells.into_iter().collect();
        if body.is_empty() {
            return None;
        }
        let has_duplicate = body
            .iter()
            .enumerate()
            .any(|(i, cell)| body.iter().skip(i + 1).any(|other| other == cell));
        if has_duplicate {
            return None;
        }
        Some(Self { body })
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn tail(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    /// All cells, head first
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.body.iter().copied()
    }

    /// Check if any segment (head and tail included) sits on `cell`
    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Push a new head and keep the tail
    pub fn grow_to(&mut self, head: Cell) {
        self.body.push_front(head);
    }

    /// Push a new head and drop the tail
    pub fn advance_to(&mut self, head: Cell) {
        self.body.push_front(head);
        self.body.pop_back();
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Never true for a snake built through the public constructors
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// What ended a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake left the grid
    Wall,
    /// Snake ran into its own body
    SelfCollision,
}

/// Whether the engine is currently advancing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    Paused,
    Over(CollisionType),
}

impl Phase {
    pub fn is_running(self) -> bool {
        self == Phase::Running
    }

    pub fn is_over(self) -> bool {
        matches!(self, Phase::Over(_))
    }
}

/// Grid dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Check if a cell is within [0, width) x [0, height)
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.width as i32 && cell.y >= 0 && cell.y < self.height as i32
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn center(&self) -> Cell {
        Cell::new((self.width / 2) as i32, (self.height / 2) as i32)
    }
}
