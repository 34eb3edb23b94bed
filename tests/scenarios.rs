//! End-to-end scenarios on scripted and generated boards.

use tile_cascade::core::ids::SequentialIds;
use tile_cascade::core::rng::DeterministicRng;
use tile_cascade::game::cascade::{CascadeController, Phase, SwapStart};
use tile_cascade::game::config::{EngineConfig, NoMatchPolicy};
use tile_cascade::game::events::{total_delay_ms, CascadeEvent, CascadeEventData};
use tile_cascade::game::grid::{Grid, Position};
use tile_cascade::game::level::{builtin, catalog, LevelConfig};
use tile_cascade::game::matcher::has_match;
use tile_cascade::game::session::{Session, StageOutcome};
use tile_cascade::game::tile::SpecialEffect;
use tile_cascade::{INITIAL_LIVES, SWAP_MS};

fn p(row: usize, col: usize) -> Position {
    Position::new(row, col)
}

/// Diagonal stripes with no runs; row 2 is one swap away from three 5s.
fn kind_five_codes() -> Vec<Vec<u8>> {
    let mut rows: Vec<Vec<u8>> = (0..6)
        .map(|r| (0..6).map(|c| ((3 * r + c) % 9 + 1) as u8).collect())
        .collect();
    rows[2] = vec![7, 5, 5, 1, 5, 3];
    rows
}

fn scripted(codes: &[Vec<u8>], config: EngineConfig, edit: impl FnOnce(&mut Grid)) -> CascadeController<DeterministicRng, SequentialIds> {
    let mut grid = Grid::from_codes(codes, &mut SequentialIds::new()).unwrap();
    edit(&mut grid);
    CascadeController::with_grid(
        LevelConfig::default(),
        config,
        grid,
        DeterministicRng::new(4242),
        SequentialIds::starting_at(10_000),
    )
    .unwrap()
}

#[test]
fn test_area_burst_carried_into_a_match() {
    let mut ctl = scripted(&kind_five_codes(), EngineConfig::plain(), |grid| {
        grid.tile_mut(p(2, 4)).unwrap().special = SpecialEffect::AreaBurst;
    });

    let outcome = ctl.request_swap(p(2, 3), p(2, 4)).unwrap();
    let first = &outcome.passes[0];

    // Run (2,1)..(2,3) plus the 3x3 window around (2,3)
    assert_eq!(first.cleared, 10);
    assert_eq!(first.points, 100);
    assert!(first.removed.contains(&p(2, 1)));
    for row in 1..=3 {
        for col in 2..=4 {
            assert!(first.removed.contains(&p(row, col)));
        }
    }

    let events = ctl.take_events();
    assert!(events.iter().any(|e| matches!(
        e.data,
        CascadeEventData::SpecialTriggered { pos, effect: SpecialEffect::AreaBurst } if pos == p(2, 3)
    )));
}

#[test]
fn test_obstacle_next_to_match_is_destroyed() {
    let mut codes = kind_five_codes();
    codes[1][2] = 99;
    let mut ctl = scripted(&codes, EngineConfig::plain(), |_| {});

    let outcome = ctl.request_swap(p(2, 3), p(2, 4)).unwrap();
    let first = &outcome.passes[0];

    assert_eq!(first.obstacles_destroyed, 1);
    assert_eq!(first.cleared, 4);
    assert_eq!(first.points, 40);
    assert!(!ctl.grid().is_obstacle(p(1, 2)));
    assert!(ctl.grid().obstacle_positions().is_empty());
}

#[test]
fn test_stepped_cascade_events_are_ordered() {
    let mut ctl = scripted(&kind_five_codes(), EngineConfig::default(), |_| {});

    assert_eq!(ctl.begin_swap(p(2, 3), p(2, 4)).unwrap(), SwapStart::Cascading);
    assert_eq!(ctl.phase(), Phase::Resolving);
    assert!(!ctl.pending_matches().is_empty());

    let mut passes = 0;
    while let Some(report) = ctl.step() {
        passes += 1;
        assert_eq!(report.combo, passes);
    }
    assert_eq!(ctl.phase(), Phase::Idle);
    assert_eq!(ctl.combo(), passes);

    let events = ctl.take_events();
    assert!(matches!(events[0].data, CascadeEventData::Swapped { .. }));
    assert!(events.windows(2).all(|w| (w[0].pass, w[0].phase) <= (w[1].pass, w[1].phase)));
    assert!(events
        .iter()
        .any(|e| matches!(e.data, CascadeEventData::Settled { combo, .. } if combo == passes)));
    assert!(total_delay_ms(&events) > SWAP_MS);

    // Event log survives a JSON round trip for replay tooling
    let json = serde_json::to_string(&events).unwrap();
    let back: Vec<CascadeEvent> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, events);
}

#[test]
fn test_free_move_policy_consumes_a_move() {
    let config = EngineConfig {
        no_match: NoMatchPolicy::FreeMove,
        ..EngineConfig::plain()
    };
    let controller = scripted(&kind_five_codes(), config, |_| {});
    let mut session = Session::new(controller);
    let before = session.grid().tile(p(0, 0)).cloned();

    let outcome = session.play(p(0, 0), p(0, 1)).unwrap();
    assert!(outcome.accepted);
    assert!(outcome.passes.is_empty());
    assert_eq!(session.moves_remaining(), LevelConfig::default().move_limit - 1);
    assert_eq!(session.score(), 0);
    assert_eq!(session.grid().tile(p(0, 1)).cloned(), before);
}

#[test]
fn test_json_level_with_obstacle_mask() {
    let json = r#"{
        "id": 42,
        "name": "Test Ridge",
        "grid_size": 5,
        "min_match_length": 3,
        "move_limit": 12,
        "target_score": 500,
        "tile_kind_count": 6,
        "obstacle_mask": [
            [false, false, false, false, false],
            [false, true,  false, true,  false],
            [false, false, false, false, false],
            [false, true,  false, true,  false],
            [false, false, false, false, false]
        ]
    }"#;
    let level = LevelConfig::from_json_str(json).unwrap();
    assert_eq!(level.obstacle_count(), 4);

    let rules = EngineConfig::from_json_str(r#"{ "base_points_per_tile": 5, "no_match": "free_move" }"#).unwrap();
    let session = Session::start(level.clone(), rules, 7).unwrap();

    let grid = session.grid();
    assert!(grid.is_full());
    assert!(!has_match(grid, 3));
    for pos in grid.positions() {
        assert_eq!(grid.is_obstacle(pos), level.is_obstacle(pos));
    }
    grid.validate(level.tile_kind_count).unwrap();
}

#[test]
fn test_catalog_levels_play_to_an_outcome() {
    for id in [1, 2, 3, 4, 10] {
        let level = builtin(id).unwrap();
        let mut session = Session::start(level.clone(), EngineConfig::default(), u64::from(id) * 31).unwrap();

        while !session.is_over() {
            let (a, b) = session.hint().expect("running stage has a move");
            let outcome = session.play(a, b).unwrap();
            assert!(outcome.accepted);
        }

        match session.outcome().unwrap() {
            StageOutcome::Cleared => assert!(session.score() >= level.target_score),
            StageOutcome::Failed => {
                assert_eq!(session.moves_remaining(), 0);
                assert_eq!(session.lives(), INITIAL_LIVES - 1);
            }
            StageOutcome::BoardUnplayable => assert_eq!(session.lives(), INITIAL_LIVES),
        }
        assert!(session.moves_remaining() < level.move_limit);
    }
}

#[test]
fn test_catalog_is_complete_and_valid() {
    let levels = catalog();
    assert_eq!(levels.len(), 100);
    for (i, level) in levels.iter().enumerate() {
        assert_eq!(level.id as usize, i + 1);
        level.validate().unwrap();
    }
    assert!(levels.windows(2).all(|w| w[0].target_score < w[1].target_score));
}
