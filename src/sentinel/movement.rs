//! Sentinel movement strategies
//!
//! Sentinels never step onto walls, the intruder, or each other.

use ahash::AHashSet;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::types::Position;
use crate::grid::map::GridMap;
use crate::sentinel::archetype::MovementStrategy;
use crate::sentinel::awareness::Awareness;
use crate::sentinel::Sentinel;

/// Result of one sentinel movement phase
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovementResult {
    /// (from, to) when the sentinel changed cells
    pub step: Option<(Position, Position)>,
    /// Disabled counter reached zero this turn
    pub reactivated: bool,
}

/// Cells a sentinel may not enter this turn
pub struct Blockers<'a> {
    pub map: &'a GridMap,
    pub intruder: Position,
    pub sentinels: &'a AHashSet<Position>,
}

impl Blockers<'_> {
    pub fn allows(&self, pos: Position) -> bool {
        self.map.is_walkable(pos) && pos != self.intruder && !self.sentinels.contains(&pos)
    }
}

/// One step from `from` toward `target`
///
/// Candidates in order: the direct delta, the axis-only deltas, then the
/// remaining diagonals that share a component with the direct delta.
pub fn step_toward(from: Position, target: Position, blockers: &Blockers) -> Option<Position> {
    let sx = (target.x - from.x).signum();
    let sy = (target.y - from.y).signum();
    if sx == 0 && sy == 0 {
        return None;
    }

    let mut candidates: Vec<(i32, i32)> = vec![(sx, sy), (sx, 0), (0, sy)];
    match (sx, sy) {
        (0, _) => candidates.extend([(1, sy), (-1, sy)]),
        (_, 0) => candidates.extend([(sx, 1), (sx, -1)]),
        _ => candidates.extend([(sx, -sy), (-sx, sy)]),
    }

    let mut tried: Vec<(i32, i32)> = Vec::with_capacity(candidates.len());
    for (dx, dy) in candidates {
        if (dx == 0 && dy == 0) || tried.contains(&(dx, dy)) {
            continue;
        }
        tried.push((dx, dy));
        let next = from.offset(dx, dy);
        if blockers.allows(next) {
            return Some(next);
        }
    }
    None
}

/// One random legal cardinal step
pub fn random_step(from: Position, blockers: &Blockers, rng: &mut impl Rng) -> Option<Position> {
    let mut options = from.cardinal_neighbors();
    options.shuffle(rng);
    options.into_iter().find(|p| blockers.allows(*p))
}

/// Run the movement phase for one sentinel
///
/// Disabled sentinels only count down. Non-patrol movers act every other
/// turn; patrols act every turn.
pub fn update_movement(
    sentinel: &mut Sentinel,
    blockers: &Blockers,
    rng: &mut impl Rng,
) -> MovementResult {
    let mut result = MovementResult::default();

    if sentinel.disabled_turns > 0 {
        sentinel.disabled_turns -= 1;
        result.reactivated = sentinel.disabled_turns == 0;
        return result;
    }

    let strategy = sentinel.movement();
    if strategy == MovementStrategy::Static {
        return result;
    }

    sentinel.move_cooldown = sentinel.move_cooldown.saturating_sub(1);
    if sentinel.move_cooldown > 0 {
        return result;
    }
    sentinel.move_cooldown = if strategy == MovementStrategy::Patrol { 1 } else { 2 };

    let from = sentinel.pos;
    let next = match strategy {
        MovementStrategy::Static => None,
        MovementStrategy::Random => random_step(from, blockers, rng),
        MovementStrategy::Patrol => match sentinel.patrol.as_mut() {
            Some(route) => {
                if from.distance(&route.current()) <= 1 {
                    route.advance();
                }
                step_toward(from, route.current(), blockers)
            }
            None => None,
        },
        MovementStrategy::Seek => match (sentinel.awareness, sentinel.last_known) {
            (Awareness::Hostile, Some(target)) => step_toward(from, target, blockers),
            _ => None,
        },
        MovementStrategy::Track => {
            if sentinel.awareness == Awareness::Hostile {
                step_toward(from, blockers.intruder, blockers)
            } else {
                None
            }
        }
    };

    if let Some(to) = next {
        sentinel.pos = to;
        result.step = Some((from, to));
    }
    result
}
