//! Observation rules shared by sentinels and the overlay query

use crate::core::types::Position;
use crate::grid::map::GridMap;
use crate::visibility::los::line_of_sight;

/// Vision radius after cover: halved (floor) while the observer is in shadow
pub fn effective_vision(range: i32, in_shadow: bool) -> i32 {
    if in_shadow {
        range / 2
    } else {
        range
    }
}

/// Can an observer at `observer_pos` see a target at `target_pos`?
///
/// Rules, in order:
/// 1. an invisible target is never seen;
/// 2. an adjacent target (distance <= 1) is always seen;
/// 3. a target standing in shadow is hidden;
/// 4. a target beyond effective vision is out of range;
/// 5. otherwise line of sight decides.
pub fn can_observe(
    observer_pos: Position,
    observer_vision: i32,
    target_pos: Position,
    target_in_shadow: bool,
    target_invisible: bool,
    map: &GridMap,
) -> bool {
    if target_invisible {
        return false;
    }

    let distance = observer_pos.distance(&target_pos);
    if distance <= 1 {
        return true;
    }

    if target_in_shadow {
        return false;
    }

    let range = effective_vision(observer_vision, map.is_shadow(observer_pos));
    if distance > range {
        return false;
    }

    line_of_sight(map, observer_pos, target_pos)
}
