//! Random maze generation for the maze mini-game.
//!
//! Grids are carved with a randomized depth-first search over the odd
//! coordinates. The walk uses an explicit stack so large grids cannot
//! exhaust the call stack.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

pub const WALL: u8 = 1;
pub const PATH: u8 = 0;

pub const DEFAULT_SIZE: usize = 21;
pub const MIN_SIZE: usize = 5;
pub const MAX_SIZE: usize = 101;

const DIRECTIONS: [(isize, isize); 4] = [(0, -2), (2, 0), (0, 2), (-2, 0)];

/// A generated maze. `grid[y][x]` is [`WALL`] or [`PATH`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Maze {
    pub grid: Vec<Vec<u8>>,
    /// `[x, y]` of the entrance.
    pub start: [usize; 2],
    /// `[x, y]` of the exit.
    pub end: [usize; 2],
    pub width: usize,
    pub height: usize,
}

/// Clamp a requested dimension into range and make it odd.
#[must_use]
pub fn normalize_size(size: usize) -> usize {
    let size = size.clamp(MIN_SIZE, MAX_SIZE);
    if size % 2 == 0 { size + 1 } else { size }
}

impl Maze {
    /// Carve a perfect maze of the given size.
    ///
    /// Dimensions are normalized with [`normalize_size`] first.
    pub fn generate(width: usize, height: usize, rng: &mut impl Rng) -> Self {
        let width = normalize_size(width);
        let height = normalize_size(height);
        let mut grid = vec![vec![WALL; width]; height];

        let mut stack = vec![(1_usize, 1_usize)];
        grid[1][1] = PATH;

        while let Some(&(cx, cy)) = stack.last() {
            let mut directions = DIRECTIONS;
            directions.shuffle(rng);

            let next = directions.iter().find_map(|&(dx, dy)| {
                let nx = cx.checked_add_signed(dx)?;
                let ny = cy.checked_add_signed(dy)?;
                let inside = nx > 0 && nx < width - 1 && ny > 0 && ny < height - 1;
                (inside && grid[ny][nx] == WALL).then_some((nx, ny))
            });

            match next {
                Some((nx, ny)) => {
                    grid[(cy + ny) / 2][(cx + nx) / 2] = PATH;
                    grid[ny][nx] = PATH;
                    stack.push((nx, ny));
                }
                None => {
                    stack.pop();
                }
            }
        }

        grid[height - 2][width - 2] = PATH;

        Self {
            grid,
            start: [1, 1],
            end: [width - 2, height - 2],
            width,
            height,
        }
    }
}
