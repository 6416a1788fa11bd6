use std::time::Duration;

use super::{
    action::{CommandOutcome, Direction, GameCommand},
    board::{Board, Position},
    config::{ConfigError, GameConfig},
    food::FoodSpawner,
    state::{CollisionType, GameOverReason, GameSnapshot, GameState, GameStatus, Snake},
};
use crate::store::ScoreStore;

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision: Option<CollisionType>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the session is over; the tick timer should stop
    pub terminated: bool,
    /// Whether the tick interval changed; the tick timer should be rebuilt
    pub interval_changed: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

impl StepResult {
    fn idle() -> Self {
        Self {
            terminated: true,
            interval_changed: false,
            info: StepInfo {
                ate_food: false,
                collision: None,
            },
        }
    }
}

/// The game engine that handles all game logic
///
/// Owns the current session outright. Restarting replaces the session; only
/// the best score survives, through the [`ScoreStore`].
pub struct GameEngine<S: ScoreStore> {
    config: GameConfig,
    board: Board,
    spawner: FoodSpawner,
    store: S,
    state: GameState,
    best_score: u32,
}

impl<S: ScoreStore> GameEngine<S> {
    /// Create a new game engine and start its first session
    pub fn new(config: GameConfig, store: S) -> Result<Self, ConfigError> {
        config.validate()?;

        let board = Board::new(config.field_size);
        let mut spawner = FoodSpawner::new(config.seed);
        let state = Self::initial_state(&config, &board, &mut spawner);
        let best_score = Self::load_best(&store);

        log::info!(
            "Session started on a {0}x{0} field (best score {1})",
            config.field_size,
            best_score
        );

        Ok(Self {
            config,
            board,
            spawner,
            store,
            state,
            best_score,
        })
    }

    fn initial_state(config: &GameConfig, board: &Board, spawner: &mut FoodSpawner) -> GameState {
        let snake = Snake::new(board.center(), Direction::Right, config.initial_snake_length);
        let food = spawner.place(board, &snake);

        GameState::new(snake, food, Direction::Right, config.interval_for_score(0))
    }

    fn load_best(store: &S) -> u32 {
        store.read_best().unwrap_or_else(|err| {
            log::warn!("Could not read best score, using 0: {err:#}");
            0
        })
    }

    /// Reset the game to initial state
    pub fn restart(&mut self) {
        self.state = Self::initial_state(&self.config, &self.board, &mut self.spawner);
        self.best_score = Self::load_best(&self.store);
        log::info!("Session restarted (best score {})", self.best_score);
    }

    /// Queue a heading for the next tick
    ///
    /// Returns false when the request was ignored: the session is over or the
    /// heading reverses the effective direction. The pending slot holds one
    /// request, a later accepted request replaces an earlier one.
    pub fn request_direction(&mut self, direction: Direction) -> bool {
        if !self.state.is_alive() {
            log::debug!("Ignoring {:?}, session is over", direction);
            return false;
        }

        if self.state.direction.is_opposite(direction) {
            log::debug!(
                "Ignoring {:?}, reverses current direction {:?}",
                direction,
                self.state.direction
            );
            return false;
        }

        self.state.pending_direction = direction;
        true
    }

    pub fn apply(&mut self, command: GameCommand) -> CommandOutcome {
        match command {
            GameCommand::Turn(direction) => {
                if self.request_direction(direction) {
                    CommandOutcome::Accepted
                } else {
                    CommandOutcome::Ignored
                }
            }
            GameCommand::Restart => {
                self.restart();
                CommandOutcome::Restarted
            }
            GameCommand::Resume => {
                if self.state.is_alive() {
                    CommandOutcome::ResumeRequested
                } else {
                    CommandOutcome::Ignored
                }
            }
        }
    }

    /// Execute one step of the game
    pub fn step(&mut self) -> StepResult {
        if !self.state.is_alive() {
            return StepResult::idle();
        }

        self.state.direction = self.state.pending_direction;
        let new_head = self.state.snake.head().moved_in_direction(self.state.direction);
        self.state.steps += 1;

        // Check for collisions before touching the body
        if let Some(collision) = self.check_collision(new_head) {
            self.finish(GameOverReason::Collision(collision));

            return StepResult {
                terminated: true,
                interval_changed: false,
                info: StepInfo {
                    ate_food: false,
                    collision: Some(collision),
                },
            };
        }

        let ate_food = self.state.food == Some(new_head);
        self.state.snake.advance(new_head);

        if !ate_food {
            self.state.snake.drop_tail();
            return StepResult {
                terminated: false,
                interval_changed: false,
                info: StepInfo {
                    ate_food,
                    collision: None,
                },
            };
        }

        self.state.score += 1;
        self.record_score();

        let interval = self.config.interval_for_score(self.state.score);
        let interval_changed = interval != self.state.tick_interval;
        if interval_changed {
            log::debug!("Tick interval now {:?}", interval);
        }
        self.state.tick_interval = interval;

        self.state.food = self.spawner.place(&self.board, &self.state.snake);
        let terminated = self.state.food.is_none();
        if terminated {
            self.finish(GameOverReason::BoardFull);
        }

        StepResult {
            terminated,
            interval_changed,
            info: StepInfo {
                ate_food,
                collision: None,
            },
        }
    }

    /// Check if the new head position causes a collision
    fn check_collision(&self, pos: Position) -> Option<CollisionType> {
        if !self.board.contains(pos) {
            return Some(CollisionType::Wall);
        }

        // The tail only moves away when the snake does not grow.
        let growing = self.state.food == Some(pos);
        let hits_body = if growing {
            self.state.snake.occupies(pos)
        } else {
            self.state.snake.occupies_excluding_tail(pos)
        };

        hits_body.then_some(CollisionType::SelfCollision)
    }

    fn record_score(&mut self) {
        if self.state.score <= self.best_score {
            return;
        }

        self.best_score = self.state.score;
        self.state.new_best = true;
        match self.store.write_best(self.best_score) {
            Ok(()) => log::info!("New best score {}", self.best_score),
            Err(err) => log::warn!("Could not persist best score {}: {err:#}", self.best_score),
        }
    }

    fn finish(&mut self, reason: GameOverReason) {
        self.state.status = GameStatus::Over(reason);
        log::info!(
            "Game over ({:?}) after {} steps with score {}",
            reason,
            self.state.steps,
            self.state.score
        );
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            field_size: self.board.field_size(),
            snake: self.state.snake.cells().to_vec(),
            food: self.state.food,
            score: self.state.score,
            best_score: self.best_score,
            steps: self.state.steps,
            new_best: self.state.new_best,
            status: self.state.status,
            tick_interval: self.state.tick_interval,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    pub fn is_running(&self) -> bool {
        self.state.is_alive()
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn tick_interval(&self) -> Duration {
        self.state.tick_interval
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
