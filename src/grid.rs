use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Cell coordinates on the world grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// One diagonal-capable step toward `target` (signum per axis).
    pub fn toward(self, target: Position) -> Self {
        self.step((target.x - self.x).signum(), (target.y - self.y).signum())
    }

    /// One diagonal-capable step away from `threat`.
    pub fn away_from(self, threat: Position) -> Self {
        self.step((self.x - threat.x).signum(), (self.y - threat.y).signum())
    }
}

/// The four cardinal offsets; adjacency everywhere means Manhattan distance 1.
pub const CARDINAL: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

#[derive(Debug, Clone, Copy)]
pub struct Grid {
    width: i32,
    height: i32,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Result<Self, ConfigError> {
        if width <= 0 || height <= 0 {
            return Err(ConfigError::Dimensions { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Bounds policy: clamp per axis into `[0, width) x [0, height)`.
    pub fn clamp(&self, pos: Position) -> Position {
        Position {
            x: pos.x.clamp(0, self.width - 1),
            y: pos.y.clamp(0, self.height - 1),
        }
    }

    /// In-bounds cardinal neighbors of `pos`.
    pub fn neighbors(&self, pos: Position) -> Vec<Position> {
        CARDINAL
            .iter()
            .map(|&(dx, dy)| pos.step(dx, dy))
            .filter(|p| self.contains(*p))
            .collect()
    }

    pub fn distance(&self, a: Position, b: Position) -> u32 {
        a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let width = self.width;
        (0..self.width * self.height).map(move |i| Position::new(i % width, i / width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_dimensions() {
        assert!(Grid::new(0, 10).is_err());
        assert!(Grid::new(10, -1).is_err());
        assert!(Grid::new(1, 1).is_ok());
    }

    #[test]
    fn clamp_keeps_positions_in_bounds() {
        let grid = Grid::new(10, 5).unwrap();
        assert_eq!(grid.clamp(Position::new(-3, 2)), Position::new(0, 2));
        assert_eq!(grid.clamp(Position::new(10, 5)), Position::new(9, 4));
        assert_eq!(grid.clamp(Position::new(4, 4)), Position::new(4, 4));
    }

    #[test]
    fn corner_has_two_neighbors() {
        let grid = Grid::new(10, 5).unwrap();
        assert_eq!(grid.neighbors(Position::new(0, 0)).len(), 2);
        assert_eq!(grid.neighbors(Position::new(5, 2)).len(), 4);
    }

    #[test]
    fn manhattan_distance() {
        let grid = Grid::new(10, 10).unwrap();
        assert_eq!(grid.distance(Position::new(0, 0), Position::new(3, 4)), 7);
    }

    #[test]
    fn steps_toward_and_away() {
        let here = Position::new(5, 5);
        assert_eq!(here.toward(Position::new(8, 5)), Position::new(6, 5));
        assert_eq!(here.toward(Position::new(2, 9)), Position::new(4, 6));
        assert_eq!(here.away_from(Position::new(8, 5)), Position::new(4, 5));
    }
}
