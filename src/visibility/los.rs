//! Line of sight over the tile grid
//!
//! Lines are traced with integer Bresenham stepping. Only interior cells of
//! the line can block; the endpoints themselves never do.

use crate::core::types::Position;
use crate::grid::map::GridMap;

/// Cells on the Bresenham line from `from` to `to`, both ends included
pub fn bresenham_line(from: Position, to: Position) -> Vec<Position> {
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };

    let mut err = dx + dy;
    let mut current = from;
    let mut line = Vec::with_capacity((dx.max(-dy) + 1) as usize);

    loop {
        line.push(current);
        if current == to {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            current.x += sx;
        }
        if e2 <= dx {
            err += dx;
            current.y += sy;
        }
    }
    line
}

/// Can `a` see `b` (and vice versa)?
///
/// The trace always starts from the lesser endpoint, so swapping the
/// arguments traces the same cells and gives the same answer.
pub fn line_of_sight(map: &GridMap, a: Position, b: Position) -> bool {
    let (from, to) = if a <= b { (a, b) } else { (b, a) };
    let line = bresenham_line(from, to);

    // Check all cells except start and end
    line.iter()
        .skip(1)
        .take(line.len().saturating_sub(2))
        .all(|pos| !map.is_wall(*pos))
}
