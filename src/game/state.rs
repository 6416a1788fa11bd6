use std::time::Duration;

use super::action::Direction;
use super::board::Position;

/// The snake in the game
///
/// A passive container: it never checks its own invariants, the engine does.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    body: Vec<Position>,
}

impl Snake {
    /// Create a snake whose head faces `heading`, body trailing behind it
    pub fn new(head: Position, heading: Direction, length: usize) -> Self {
        let mut body = vec![head];

        let (dx, dy) = heading.delta();
        let (back_dx, back_dy) = (-dx, -dy);

        for i in 1..length {
            let prev = body[i - 1];
            body.push(prev.moved_by(back_dx, back_dy));
        }

        Self { body }
    }

    /// Create a snake from explicit cells, head first
    pub fn from_cells(body: Vec<Position>) -> Self {
        Self { body }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    pub fn cells(&self) -> &[Position] {
        &self.body
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Membership over every cell but the tail, which moves away on a plain step
    pub fn occupies_excluding_tail(&self, pos: Position) -> bool {
        match self.body.split_last() {
            Some((_, rest)) => rest.contains(&pos),
            None => false,
        }
    }

    /// Prepend a new head; the caller decides whether to drop the tail
    pub fn advance(&mut self, new_head: Position) {
        self.body.insert(0, new_head);
    }

    pub fn drop_tail(&mut self) {
        self.body.pop();
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Type of collision that ended a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Why a session is over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    Collision(CollisionType),
    /// The snake covers every cell, no food can be placed
    BoardFull,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    Over(GameOverReason),
}

impl GameStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, GameStatus::Running)
    }
}

/// Complete state of one session
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Option<Position>,
    /// Direction applied at the most recent tick
    pub direction: Direction,
    /// Single-slot buffer, promoted to `direction` at the next tick
    pub pending_direction: Direction,
    pub score: u32,
    pub steps: u32,
    /// Set once this session beats the best score it started with
    pub new_best: bool,
    pub status: GameStatus,
    pub tick_interval: Duration,
}

impl GameState {
    pub fn new(
        snake: Snake,
        food: Option<Position>,
        direction: Direction,
        tick_interval: Duration,
    ) -> Self {
        Self {
            snake,
            food,
            direction,
            pending_direction: direction,
            score: 0,
            steps: 0,
            new_best: false,
            status: GameStatus::Running,
            tick_interval,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.status.is_running()
    }
}

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    pub field_size: usize,
    pub snake: Vec<Position>,
    pub food: Option<Position>,
    pub score: u32,
    pub best_score: u32,
    pub steps: u32,
    pub new_best: bool,
    pub status: GameStatus,
    pub tick_interval: Duration,
}

impl GameSnapshot {
    pub fn head(&self) -> Option<Position> {
        self.snake.first().copied()
    }
}
