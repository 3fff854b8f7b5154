use serde::{Deserialize, Serialize};

/// The six movement directions on the staggered-column grid.
///
/// The grid offsets columns vertically by parity, so the row component of a
/// diagonal step depends on the parity of the column the step starts from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::Up,
        Direction::Down,
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];

    /// `(d_row, d_col)` for a step taken from a tile in column `col`.
    #[inline]
    pub fn offset(self, col: i64) -> (i64, i64) {
        let even = col % 2 == 0;
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::UpLeft => {
                if even {
                    (-1, -1)
                } else {
                    (0, -1)
                }
            }
            Direction::UpRight => {
                if even {
                    (-1, 1)
                } else {
                    (0, 1)
                }
            }
            Direction::DownLeft => {
                if even {
                    (0, -1)
                } else {
                    (1, -1)
                }
            }
            Direction::DownRight => {
                if even {
                    (0, 1)
                } else {
                    (1, 1)
                }
            }
        }
    }

    /// Destination of one step from `(row, col)`.
    #[inline]
    pub fn step(self, row: i64, col: i64) -> (i64, i64) {
        let (dr, dc) = self.offset(col);
        (row + dr, col + dc)
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::UpLeft => Direction::DownRight,
            Direction::UpRight => Direction::DownLeft,
            Direction::DownLeft => Direction::UpRight,
            Direction::DownRight => Direction::UpLeft,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::UpLeft => "upleft",
            Direction::UpRight => "upright",
            Direction::DownLeft => "downleft",
            Direction::DownRight => "downright",
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "upleft" => Ok(Direction::UpLeft),
            "upright" => Ok(Direction::UpRight),
            "downleft" => Ok(Direction::DownLeft),
            "downright" => Ok(Direction::DownRight),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
