//! A* pathfinding and flood fill over the tile grid
//!
//! Paths use 8-way moves with unit cost and a Chebyshev heuristic.
//! Reachability uses 4-way flood fill, which is the stricter notion the level
//! generator guarantees.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use ahash::{AHashMap, AHashSet};

use crate::core::types::Position;
use crate::grid::map::GridMap;

/// Node in the A* open set
#[derive(Debug, Clone, Copy)]
struct PathNode {
    pos: Position,
    f_cost: i32, // g_cost + heuristic
    g_cost: i32,
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos
    }
}

impl Eq for PathNode {}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap; ties broken on position for determinism
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| self.g_cost.cmp(&other.g_cost))
            .then_with(|| other.pos.cmp(&self.pos))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find a walkable 8-way path from `start` to `goal`, inclusive of both ends
///
/// Returns None if no path exists or either end is not walkable.
pub fn find_path(map: &GridMap, start: Position, goal: Position) -> Option<Vec<Position>> {
    if !map.is_walkable(start) || !map.is_walkable(goal) {
        return None;
    }
    if start == goal {
        return Some(vec![start]);
    }

    let mut open_set = BinaryHeap::new();
    let mut came_from: AHashMap<Position, Position> = AHashMap::new();
    let mut g_scores: AHashMap<Position, i32> = AHashMap::new();

    g_scores.insert(start, 0);
    open_set.push(PathNode {
        pos: start,
        f_cost: start.distance(&goal),
        g_cost: 0,
    });

    while let Some(current) = open_set.pop() {
        if current.pos == goal {
            return Some(reconstruct_path(&came_from, current.pos));
        }

        let current_g = *g_scores.get(&current.pos).unwrap_or(&i32::MAX);
        if current.g_cost > current_g {
            continue; // stale entry
        }

        for neighbor in current.pos.neighbors() {
            if !map.is_walkable(neighbor) {
                continue;
            }

            let tentative_g = current_g + 1;
            let neighbor_g = *g_scores.get(&neighbor).unwrap_or(&i32::MAX);

            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.pos);
                g_scores.insert(neighbor, tentative_g);
                open_set.push(PathNode {
                    pos: neighbor,
                    f_cost: tentative_g + neighbor.distance(&goal),
                    g_cost: tentative_g,
                });
            }
        }
    }

    None // No path found
}

fn reconstruct_path(came_from: &AHashMap<Position, Position>, mut current: Position) -> Vec<Position> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// Every walkable cell reachable from `start` through cardinal steps
pub fn reachable_from(map: &GridMap, start: Position) -> AHashSet<Position> {
    let mut seen = AHashSet::new();
    if !map.is_walkable(start) {
        return seen;
    }

    let mut queue = VecDeque::new();
    seen.insert(start);
    queue.push_back(start);

    while let Some(pos) = queue.pop_front() {
        for next in pos.cardinal_neighbors() {
            if map.is_walkable(next) && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}

/// True if `b` can be reached from `a` through cardinal steps
pub fn is_connected(map: &GridMap, a: Position, b: Position) -> bool {
    reachable_from(map, a).contains(&b)
}
