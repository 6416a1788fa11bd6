use serde::{Deserialize, Serialize};

use super::action::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// Square playing field of `field_size` x `field_size` cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    field_size: usize,
}

impl Board {
    pub fn new(field_size: usize) -> Self {
        Self { field_size }
    }

    pub fn field_size(&self) -> usize {
        self.field_size
    }

    pub fn cell_count(&self) -> usize {
        self.field_size * self.field_size
    }

    /// Check if a position is within the grid bounds
    pub fn contains(&self, pos: Position) -> bool {
        let size = self.field_size as i32;
        pos.x >= 0 && pos.x < size && pos.y >= 0 && pos.y < size
    }

    /// All cells in row-major order (y outer, x inner)
    pub fn cells(&self) -> impl Iterator<Item = Position> + use<> {
        let size = self.field_size as i32;
        (0..size).flat_map(move |y| (0..size).map(move |x| Position::new(x, y)))
    }

    /// Row-major index of an on-board cell
    pub fn index_of(&self, pos: Position) -> Option<usize> {
        if !self.contains(pos) {
            return None;
        }
        Some(pos.y as usize * self.field_size + pos.x as usize)
    }

    pub fn center(&self) -> Position {
        let half = (self.field_size / 2) as i32;
        Position::new(half, half)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_movement() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.moved_by(1, 0), Position::new(6, 5));
        assert_eq!(pos.moved_by(-1, 0), Position::new(4, 5));
        assert_eq!(pos.moved_in_direction(Direction::Down), Position::new(5, 6));
        assert_eq!(pos.moved_in_direction(Direction::Up), Position::new(5, 4));
    }

    #[test]
    fn test_bounds_checking() {
        let board = Board::new(10);

        assert!(board.contains(Position::new(0, 0)));
        assert!(board.contains(Position::new(9, 9)));
        assert!(!board.contains(Position::new(-1, 0)));
        assert!(!board.contains(Position::new(0, -1)));
        assert!(!board.contains(Position::new(10, 0)));
        assert!(!board.contains(Position::new(0, 10)));
    }

    #[test]
    fn test_cells_are_row_major() {
        let board = Board::new(3);
        let cells: Vec<Position> = board.cells().collect();

        assert_eq!(cells.len(), board.cell_count());
        assert_eq!(cells[0], Position::new(0, 0));
        assert_eq!(cells[1], Position::new(1, 0));
        assert_eq!(cells[3], Position::new(0, 1));
        assert_eq!(cells[8], Position::new(2, 2));
    }

    #[test]
    fn test_index_matches_enumeration() {
        let board = Board::new(4);
        for (i, pos) in board.cells().enumerate() {
            assert_eq!(board.index_of(pos), Some(i));
        }
        assert_eq!(board.index_of(Position::new(4, 0)), None);
        assert_eq!(board.index_of(Position::new(-1, 2)), None);
    }

    #[test]
    fn test_center() {
        assert_eq!(Board::new(10).center(), Position::new(5, 5));
        assert_eq!(Board::new(7).center(), Position::new(3, 3));
    }
}
