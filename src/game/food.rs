use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::board::{Board, Position};
use super::state::Snake;

/// Picks food cells uniformly among those the snake does not cover
pub struct FoodSpawner {
    rng: StdRng,
}

impl FoodSpawner {
    /// Seeded spawners produce the same sequence of placements
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// Returns `None` when the snake fills the board
    pub fn place(&mut self, board: &Board, snake: &Snake) -> Option<Position> {
        if snake.len() >= board.cell_count() {
            return None;
        }

        let size = board.field_size() as i32;
        loop {
            let x = self.rng.gen_range(0..size);
            let y = self.rng.gen_range(0..size);
            let pos = Position::new(x, y);

            if !snake.occupies(pos) {
                return Some(pos);
            }
        }
    }
}
