//! Level generation integration tests
//!
//! Every generated level must be fully connected and reproducible from its seed.

use proptest::prelude::*;

use rogue_signal::generation::{generate_level, LevelParams};
use rogue_signal::grid::{find_path, reachable_from};
use rogue_signal::simulation::level_seed;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn test_every_floor_cell_reachable_from_spawn(seed in any::<u64>(), level in 1u32..=3) {
        let params = LevelParams::for_level(level);
        let generated = generate_level(&params, seed);
        let reachable = reachable_from(&generated.map, generated.spawn);

        let gateway = generated.gateway.expect("gateway placed");
        prop_assert!(reachable.contains(&gateway));
        for cell in generated.map.floor_cells() {
            prop_assert!(reachable.contains(&cell), "pocket at {}", cell);
        }
        for sentinel in &generated.sentinels {
            prop_assert!(reachable.contains(&sentinel.pos));
        }
    }

    #[test]
    fn test_generation_is_deterministic(seed in any::<u64>(), level in 1u32..=3) {
        let params = LevelParams::for_level(level);
        prop_assert_eq!(generate_level(&params, seed), generate_level(&params, seed));
    }
}

#[test]
fn test_presets_reach_shadow_coverage() {
    // The gateway fallback may clear one shaded cell
    for level in 1..=3 {
        let params = LevelParams::for_level(level);
        for seed in 0..10 {
            let generated = generate_level(&params, level_seed(seed, level));
            let floor = generated.map.floor_count();
            let target = (floor as f32 * params.shadow_coverage) as usize;
            assert!(
                generated.map.shadow_count() + 1 >= target,
                "level {} seed {}: {} of {} shaded, target {}",
                level,
                seed,
                generated.map.shadow_count(),
                floor,
                target
            );
        }
    }
}

#[test]
fn test_presets_scale_with_level() {
    let names: Vec<String> = (1..=3).map(|l| LevelParams::for_level(l).name).collect();
    assert_eq!(names, ["Corporate Network", "Government System", "Military Backbone"]);

    let easy = LevelParams::for_level(1);
    let hard = LevelParams::for_level(3);
    assert!(hard.sentinel_count > easy.sentinel_count);
    assert!(hard.passive_cadence < easy.passive_cadence);
}

#[test]
fn test_gateway_is_far_and_walkable() {
    for level in 1..=3 {
        let params = LevelParams::for_level(level);
        let generated = generate_level(&params, level_seed(2024, level));
        let gateway = generated.gateway.expect("gateway placed");
        assert!(generated.map.is_walkable(gateway));
        assert!(!generated.map.is_shadow(gateway));
        assert!(gateway.distance(&generated.spawn) > 10);
        assert!(find_path(&generated.map, generated.spawn, gateway).is_some());
    }
}

#[test]
fn test_placement_respects_spawn_distances() {
    let params = LevelParams::for_level(2);
    let generated = generate_level(&params, 31337);
    let spawn = generated.spawn;
    for pos in generated.map.cooling_tiles().into_iter().chain(generated.map.restore_tiles()) {
        assert!(pos.distance(&spawn) > 8);
    }
    for (pos, _) in generated.map.pickups() {
        assert!(pos.distance(&spawn) > 5);
    }
    for sentinel in &generated.sentinels {
        assert!(sentinel.pos.distance(&spawn) > 12);
        assert!(!generated.map.is_shadow(sentinel.pos));
    }
}
