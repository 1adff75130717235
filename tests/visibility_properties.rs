//! Visibility engine properties and scenarios

use proptest::prelude::*;

use rogue_signal::grid::GridMap;
use rogue_signal::visibility::{can_observe, effective_vision, line_of_sight};
use rogue_signal::Position;

const SIZE: i32 = 16;

fn map_with_walls(walls: &[(i32, i32)]) -> GridMap {
    let mut map = GridMap::new(SIZE, SIZE);
    for &(x, y) in walls {
        map.set_wall(Position::new(x, y));
    }
    map
}

fn interior() -> impl Strategy<Value = Position> {
    (1..SIZE - 1, 1..SIZE - 1).prop_map(|(x, y)| Position::new(x, y))
}

proptest! {
    #[test]
    fn test_line_of_sight_is_symmetric(
        walls in prop::collection::vec((1..SIZE - 1, 1..SIZE - 1), 0..40),
        a in interior(),
        b in interior(),
    ) {
        let map = map_with_walls(&walls);
        prop_assert_eq!(line_of_sight(&map, a, b), line_of_sight(&map, b, a));
    }

    #[test]
    fn test_adjacency_always_observes(
        walls in prop::collection::vec((1..SIZE - 1, 1..SIZE - 1), 0..40),
        observer in interior(),
        dx in -1i32..=1,
        dy in -1i32..=1,
        vision in 0i32..6,
        target_in_shadow in any::<bool>(),
    ) {
        let map = map_with_walls(&walls);
        let target = observer.offset(dx, dy);
        prop_assert!(can_observe(observer, vision, target, target_in_shadow, false, &map));
        prop_assert!(can_observe(target, vision, observer, target_in_shadow, false, &map));
    }

    #[test]
    fn test_invisible_targets_are_never_observed(
        observer in interior(),
        target in interior(),
        vision in 0i32..20,
        target_in_shadow in any::<bool>(),
    ) {
        let map = GridMap::new(SIZE, SIZE);
        prop_assert!(!can_observe(observer, vision, target, target_in_shadow, true, &map));
    }

    #[test]
    fn test_shadowed_observer_never_sees_farther(range in 0i32..30) {
        prop_assert!(effective_vision(range, true) <= effective_vision(range, false));
        prop_assert_eq!(effective_vision(range, true), range / 2);
    }
}

#[test]
fn test_wall_blocks_static_watcher() {
    let mut map = GridMap::new(10, 10);
    let watcher = Position::new(1, 4);
    let intruder = Position::new(1, 1);

    assert!(can_observe(watcher, 3, intruder, false, false, &map));

    map.set_wall(Position::new(1, 3));
    assert!(!can_observe(watcher, 3, intruder, false, false, &map));
    assert!(!can_observe(intruder, 3, watcher, false, false, &map));
}

#[test]
fn test_shadow_hides_beyond_adjacency() {
    let map = GridMap::new(10, 10);
    let watcher = Position::new(2, 2);
    assert!(!can_observe(watcher, 5, Position::new(4, 2), true, false, &map));
    assert!(can_observe(watcher, 5, Position::new(3, 2), true, false, &map));
}
