//! Presentation-facing visibility queries
//!
//! What the intruder can see, and which cells each sentinel is watching.

use crate::core::config::RunConfig;
use crate::core::types::{Position, SentinelId};
use crate::grid::map::GridMap;
use crate::intruder::Intruder;
use crate::sentinel::Sentinel;
use crate::visibility::los::line_of_sight;
use crate::visibility::observe::{can_observe, effective_vision};

/// Intruder sight radius, widened by enhanced vision
pub fn intruder_sight_range(intruder: &Intruder, config: &RunConfig) -> i32 {
    if intruder.has_enhanced_vision() {
        config.intruder_vision + config.enhanced_vision_bonus
    } else {
        config.intruder_vision
    }
}

/// Sentinels currently visible to the intruder
///
/// An active network scan reveals every sentinel. Otherwise a sentinel is
/// visible when adjacent, or within sight range with clear line of sight
/// (walls are ignored under enhanced vision).
pub fn visible_sentinels(
    intruder: &Intruder,
    sentinels: &[Sentinel],
    map: &GridMap,
    config: &RunConfig,
    scan_active: bool,
) -> Vec<SentinelId> {
    if scan_active {
        return sentinels.iter().map(|s| s.id).collect();
    }

    let range = intruder_sight_range(intruder, config);
    let through_walls = intruder.has_enhanced_vision();
    sentinels
        .iter()
        .filter(|s| {
            let distance = intruder.pos.distance(&s.pos);
            distance <= 1
                || (distance <= range
                    && (through_walls || line_of_sight(map, intruder.pos, s.pos)))
        })
        .map(|s| s.id)
        .collect()
}

/// Cells this sentinel would spot a visible intruder on, row-major
///
/// Disabled sentinels watch nothing.
pub fn vision_overlay(sentinel: &Sentinel, map: &GridMap) -> Vec<Position> {
    if sentinel.is_disabled() {
        return Vec::new();
    }
    let reach = effective_vision(sentinel.vision(), map.is_shadow(sentinel.pos)).max(1);
    let mut cells = Vec::new();
    for y in sentinel.pos.y - reach..=sentinel.pos.y + reach {
        for x in sentinel.pos.x - reach..=sentinel.pos.x + reach {
            let pos = Position::new(x, y);
            if pos == sentinel.pos || !map.is_walkable(pos) {
                continue;
            }
            if can_observe(sentinel.pos, sentinel.vision(), pos, map.is_shadow(pos), false, map) {
                cells.push(pos);
            }
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intruder::StatusKind;
    use crate::sentinel::Archetype;

    fn setup() -> (GridMap, Intruder, RunConfig) {
        let config = RunConfig::default();
        let map = GridMap::new(40, 40);
        let intruder = Intruder::new(Position::new(2, 2), &config);
        (map, intruder, config)
    }

    #[test]
    fn test_walls_hide_sentinels() {
        let (mut map, intruder, config) = setup();
        let hidden = Sentinel::new(SentinelId::new(1), Archetype::Scanner, Position::new(2, 8));
        let seen = Sentinel::new(SentinelId::new(2), Archetype::Scanner, Position::new(8, 2));
        map.set_wall(Position::new(2, 5));
        let visible = visible_sentinels(&intruder, &[hidden, seen], &map, &config, false);
        assert_eq!(visible, vec![SentinelId::new(2)]);
    }

    #[test]
    fn test_enhanced_vision_sees_through_walls_and_farther() {
        let (mut map, mut intruder, config) = setup();
        map.set_wall(Position::new(2, 5));
        let behind_wall = Sentinel::new(SentinelId::new(1), Archetype::Scanner, Position::new(2, 8));
        let far = Sentinel::new(SentinelId::new(2), Archetype::Scanner, Position::new(20, 2));
        let sentinels = [behind_wall, far];

        assert!(visible_sentinels(&intruder, &sentinels, &map, &config, false).is_empty());
        intruder.effects.grant(StatusKind::EnhancedVision, 15);
        assert_eq!(visible_sentinels(&intruder, &sentinels, &map, &config, false).len(), 2);
    }

    #[test]
    fn test_scan_reveals_everything() {
        let (map, intruder, config) = setup();
        let far = Sentinel::new(SentinelId::new(7), Archetype::Hunter, Position::new(35, 35));
        assert_eq!(
            visible_sentinels(&intruder, &[far], &map, &config, true),
            vec![SentinelId::new(7)]
        );
    }

    #[test]
    fn test_overlay_matches_vision() {
        let (map, _, _) = setup();
        let s = Sentinel::new(SentinelId::new(1), Archetype::Patrol, Position::new(10, 10));
        let overlay = vision_overlay(&s, &map);
        // Vision 3 in the open: a 7x7 square minus the sentinel's own cell
        assert_eq!(overlay.len(), 48);
        assert!(overlay.iter().all(|p| p.distance(&s.pos) <= 3));
    }

    #[test]
    fn test_overlay_skips_shadow_beyond_adjacency() {
        let (mut map, _, _) = setup();
        map.add_shadow(Position::new(11, 10));
        map.add_shadow(Position::new(13, 10));
        let s = Sentinel::new(SentinelId::new(1), Archetype::Patrol, Position::new(10, 10));
        let overlay = vision_overlay(&s, &map);
        assert!(overlay.contains(&Position::new(11, 10)));
        assert!(!overlay.contains(&Position::new(13, 10)));
    }

    #[test]
    fn test_disabled_overlay_is_empty() {
        let (map, _, _) = setup();
        let mut s = Sentinel::new(SentinelId::new(1), Archetype::Hunter, Position::new(10, 10));
        s.disable(3);
        assert!(vision_overlay(&s, &map).is_empty());
    }
}
