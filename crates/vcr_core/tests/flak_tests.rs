//! Fleet battle tests against the standard catalog.

use vcr_core::flak::is_partition;
use vcr_core::prelude::*;
use vcr_test_utils::determinism::{
    find_first_divergence, run_parallel_battles_scoped, verify_determinism, verify_idempotence,
};
use vcr_test_utils::fixtures::{self, beams};
use vcr_test_utils::proptest::prelude::*;

fn with_ctx<R>(f: impl FnOnce(&BattleContext<'_>) -> R) -> R {
    let (config, catalog) = (fixtures::standard_config(), fixtures::standard_catalog());
    f(&BattleContext::new(&config, &catalog))
}

// =============================================================================
// Scenario B
// =============================================================================

fn with_fleet_ctx<R>(f: impl FnOnce(&BattleContext<'_>) -> R) -> R {
    let (config, catalog) = (fixtures::fleet_config(), fixtures::standard_catalog());
    f(&BattleContext::new(&config, &catalog))
}

#[test]
fn test_scenario_b_known_values() {
    with_fleet_ctx(|ctx| {
        let battle = fixtures::scenario_b();
        assert_eq!(battle.num_objects(), 8);
        assert_eq!(battle.num_groups(), 4);
        battle.prepare_result(ctx, ResultLevel::COMPLETE_RESULT);

        assert_eq!(battle.outcome(ctx, 0), 0);
        assert_eq!(battle.outcome(ctx, 1), 0);
        assert_eq!(battle.outcome(ctx, 2), -1);
        assert_eq!(battle.outcome(ctx, 7), -1);

        let after = |slot| battle.object(slot, true).unwrap();
        let damage: Vec<i32> = [0, 1, 2, 7].iter().map(|&s| after(s).damage).collect();
        let shield: Vec<i32> = [0, 1, 2, 7].iter().map(|&s| after(s).shield).collect();
        assert_eq!(damage, [0, 0, 105, 101]);
        assert_eq!(shield, [35, 100, 0, 0]);
    });
}

#[test]
fn test_scenario_b_player_one_prevails() {
    with_fleet_ctx(|ctx| {
        let battle = fixtures::scenario_b();
        let outcomes: Vec<i32> = (0..8).map(|slot| battle.outcome(ctx, slot)).collect();
        assert_eq!(outcomes, [0, 0, -1, 0, -1, -1, -1, -1]);
        assert!(battle.battle_result().unwrap().is_empty());

        let result = battle.result().unwrap();
        assert_eq!(result.ticks, 272);
        // Eight torpedoes fired, none left.
        assert_eq!(battle.object(1, true).unwrap().num_torpedoes, 0);
        assert_eq!(battle.object(2, true).unwrap().crew, 40);
        assert_eq!(battle.object(7, true).unwrap().crew, 137);
    });
}

#[test]
fn test_scenario_b_scores_and_summary() {
    with_fleet_ctx(|ctx| {
        let battle = fixtures::scenario_b();

        let destroyer = battle.compute_scores(ctx, 1).unwrap();
        assert_eq!(destroyer.tons_destroyed, ScoreRange::exact(4 * 79));
        // 316 kt finished at 10 points and 316 kt damaged at 2 points per 10 kt.
        assert_eq!(destroyer.build_millipoints, ScoreRange::exact(379_200));
        let tender = battle.compute_scores(ctx, 0).unwrap();
        assert_eq!(tender, Score::default());
        for slot in [2, 4, 5, 6, 7] {
            assert!(battle.compute_scores(ctx, slot).is_none(), "slot {slot}");
        }

        let ours = battle.result_summary(ctx, 1, &NumberedPlayers, &NoTranslation, &GroupedNumbers);
        assert_eq!(
            ours,
            "Both sides suffered losses in this fight. We earned 379 build points."
        );
        let theirs = battle.result_summary(ctx, 2, &NumberedPlayers, &NoTranslation, &GroupedNumbers);
        assert_eq!(theirs, "Both sides suffered losses in this fight.");
    });
}

#[test]
fn test_scenario_b_statistics() {
    with_fleet_ctx(|ctx| {
        let battle = fixtures::scenario_b();
        assert!(battle.statistic(0).is_none());
        battle.prepare_result(ctx, ResultLevel::COMPLETE_RESULT);

        let hits: Vec<i32> = (0..8)
            .map(|slot| battle.statistic(slot).unwrap().num_torpedo_hits)
            .collect();
        assert_eq!(hits, [0, 8, 0, 0, 1, 1, 0, 1]);
        assert!((0..8).all(|slot| battle.statistic(slot).unwrap().num_fights == 1));
        assert!(battle.statistic(8).is_none());
    });
}

#[test]
fn test_scenario_b_quick_tier() {
    with_fleet_ctx(|ctx| {
        let battle = fixtures::scenario_b();
        battle.prepare_result(ctx, ResultLevel::QUICK_OUTCOME);
        assert_eq!(battle.battle_result(), Some(BattleResult::empty()));
        assert_eq!(battle.outcome(ctx, 2), -1);
        // Same outcome, but no statistics or "after" snapshots yet.
        assert!(battle.statistic(2).is_none());
        assert!(battle.result().is_none());
        assert_eq!(battle.object(2, true), battle.object(2, false));

        battle.prepare_result(ctx, ResultLevel::COMPLETE_RESULT);
        assert_eq!(battle.object(2, true).unwrap().damage, 105);
        assert_eq!(battle.outcome(ctx, 2), -1);
    });
}

#[test]
fn test_scenario_b_determinism() {
    with_fleet_ctx(|ctx| {
        verify_determinism(3, ctx, fixtures::scenario_b).assert_deterministic();
        assert!(verify_idempotence(ctx, fixtures::scenario_b));
        run_parallel_battles_scoped(ctx, fixtures::scenario_b, 4).assert_deterministic();
        assert_eq!(find_first_divergence(ctx, || fixtures::scenario_b().into()), None);
    });
}

// =============================================================================
// Battle Contract
// =============================================================================

#[test]
fn test_group_partition_of_fixture() {
    let battle = fixtures::scenario_b();
    let objects: Vec<Object> = (0..battle.num_objects())
        .filter_map(|slot| battle.object(slot, false).cloned())
        .collect();
    let groups: Vec<GroupInfo> = (0..battle.num_groups())
        .filter_map(|index| battle.group_info(index).copied())
        .collect();

    assert!(is_partition(&groups, &objects));
    let covered: usize = groups.iter().map(|g| g.num_objects).sum();
    assert_eq!(covered, objects.len());
}

#[test]
fn test_any_battle_dispatch() {
    with_ctx(|ctx| {
        let battles: Vec<AnyBattle> = vec![fixtures::scenario_a().into(), fixtures::scenario_b().into()];
        let names: Vec<&str> = battles.iter().map(Battle::algorithm_name).collect();
        assert_eq!(names, ["Host", "FLAK"]);

        for battle in &battles {
            assert_eq!(battle.playability(ctx), Playability::IsPlayable);
            battle.prepare_result(ctx, ResultLevel::COMPLETE_RESULT);
            assert!(battle.statistic(0).is_some());
        }
        assert_eq!(battles[0].auxiliary_information(AuxInfo::Seed), Some(42));
        assert_eq!(battles[1].auxiliary_information(AuxInfo::Seed), Some(31_337));
        assert!(!battles[1].is_esb_active(ctx));
    });
}

#[test]
fn test_replay_reports_destruction() {
    with_fleet_ctx(|ctx| {
        let battle: AnyBattle = fixtures::scenario_b().into();
        let mut log: Vec<(u32, CombatEvent)> = Vec::new();
        let result = battle.replay(ctx, &mut log);
        assert_eq!(result, Some(BattleResult::empty()));

        let destroyed: Vec<(u32, usize)> = log
            .iter()
            .filter_map(|(tick, event)| match event {
                CombatEvent::UnitDestroyed { slot } => Some((*tick, *slot)),
                _ => None,
            })
            .collect();
        assert_eq!(destroyed, [(34, 2), (68, 7), (136, 4), (204, 5), (272, 6)]);
        assert!(log.windows(2).all(|w| w[0].0 <= w[1].0));
    });
}

// =============================================================================
// Fighters
// =============================================================================

/// A carrier for player 1 at the origin facing a durable unarmed hulk of
/// player 2 within fighter range.
fn carrier_battle(bays: i32, fighters: i32) -> FlakBattle {
    let objects = vec![
        Object::ship(1, 1, "Carrier")
            .with_hull_state(400, 500, 100)
            .with_fighters(bays, fighters),
        Object::ship(2, 2, "Hulk").with_hull_state(1000, 1000, 100),
    ];
    let groups = vec![
        GroupInfo::new(0, 1, 1),
        GroupInfo::new(1, 1, 2).with_position(2000, 0),
    ];
    FlakBattle::new(objects, groups, 5).unwrap()
}

fn replay_with(config: &HostConfig, battle: FlakBattle) -> (Option<BattleResult>, Vec<(u32, CombatEvent)>) {
    let catalog = fixtures::standard_catalog();
    let ctx = BattleContext::new(config, &catalog);
    let mut log = Vec::new();
    let result = battle.replay(&ctx, &mut log);
    (result, log)
}

#[test]
fn test_carrier_launch_cadence() {
    let mut config = fixtures::standard_config();
    config.set_option("FlakMaxTicks", "50").unwrap();
    let (result, log) = replay_with(&config, carrier_battle(4, 20));
    assert_eq!(result, Some(BattleResult::TIMEOUT));

    // Bays fill on tick 20; launches are then spaced by the launch
    // interval until every full bay is empty, and resume once bay 0 refills.
    let launches: Vec<u32> = log
        .iter()
        .filter(|(_, e)| matches!(e, CombatEvent::FighterLaunched { from: 0 }))
        .map(|(tick, _)| *tick)
        .collect();
    assert_eq!(launches, [20, 23, 26, 29, 40, 43, 46, 49]);
}

#[test]
fn test_fighters_return_after_their_strikes() {
    let mut config = fixtures::standard_config();
    config.set_option("StrikesPerFighter", "3").unwrap();
    config.set_option("FlakMaxTicks", "90").unwrap();
    let (result, log) = replay_with(&config, carrier_battle(1, 1));
    assert_eq!(result, Some(BattleResult::TIMEOUT));

    let ticks = |pred: fn(&CombatEvent) -> bool| -> Vec<u32> {
        log.iter().filter(|(_, e)| pred(e)).map(|(tick, _)| *tick).collect()
    };
    let launches = ticks(|e| matches!(e, CombatEvent::FighterLaunched { .. }));
    let strikes = ticks(|e| matches!(e, CombatEvent::FighterStrike { .. }));
    let landings = ticks(|e| matches!(e, CombatEvent::FighterLanded { at: 0 }));

    assert_eq!(launches, [20, 40, 60, 80]);
    assert_eq!(strikes, [20, 21, 22, 40, 41, 42, 60, 61, 62, 80, 81, 82]);
    assert_eq!(landings, [23, 43, 63, 83]);
    // Fighter strikes never roll.
    assert!(log
        .iter()
        .all(|(_, e)| !matches!(e, CombatEvent::FighterStrike { hit: false, .. })));
}

// =============================================================================
// Experience
// =============================================================================

#[test]
fn test_veteran_outguns_rookie() {
    let mut config = fixtures::standard_config();
    config.set_option("BeamHitOdds", "0").unwrap();
    config.set_option("EModBeamHitOdds", "0,0,100").unwrap();
    config.set_option("EModBeamRechargeRate", "0,0,8").unwrap();
    config.set_option("FlakMaxTicks", "100").unwrap();

    let objects = vec![
        Object::ship(1, 1, "Veteran")
            .with_hull_state(100, 50, 100)
            .with_beams(beams::LASER, 1)
            .with_experience(2),
        Object::ship(2, 1, "Rookie")
            .with_hull_state(100, 50, 100)
            .with_beams(beams::LASER, 1),
        Object::ship(3, 2, "Hulk").with_hull_state(1000, 1000, 100),
    ];
    let groups = vec![
        GroupInfo::new(0, 2, 1),
        GroupInfo::new(2, 1, 2).with_position(2000, 0),
    ];
    let (_, log) = replay_with(&config, FlakBattle::new(objects, groups, 9).unwrap());

    let shots = |slot: usize| -> Vec<(u32, bool)> {
        log.iter()
            .filter_map(|(tick, e)| match e {
                CombatEvent::BeamFired { from, hit, .. } if *from == slot => Some((*tick, *hit)),
                _ => None,
            })
            .collect()
    };
    // 16 charge per tick reaches 600 on tick 38; 8 per tick on tick 75.
    assert_eq!(shots(0), [(38, true), (76, true)]);
    assert_eq!(shots(1), [(75, false)]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_fleet_outcomes_well_formed(seed in any::<u32>(), escorts in 0usize..3) {
        let (config, catalog) = (fixtures::standard_config(), fixtures::standard_catalog());
        let ctx = BattleContext::new(&config, &catalog);

        let mut objects = vec![fixtures::fleet_warship(1, 1)];
        for i in 0..escorts {
            objects.push(fixtures::fleet_warship(10 + i as u16, 1).with_beams(beams::LASER, 2));
        }
        let first_enemy = objects.len();
        objects.push(fixtures::fleet_warship(20, 2).with_beams(beams::DISRUPTOR, 4));
        objects.push(fixtures::fleet_freighter(21, 2));
        let groups = vec![
            GroupInfo::new(0, first_enemy, 1).with_speed(80),
            GroupInfo::new(first_enemy, 2, 2).with_position(20_000, 5_000).with_speed(60),
        ];
        let battle = FlakBattle::new(objects, groups, seed).unwrap();
        battle.prepare_result(&ctx, ResultLevel::COMPLETE_RESULT);

        for slot in 0..battle.num_objects() {
            let outcome = battle.outcome(&ctx, slot);
            let after = battle.object(slot, true).unwrap();
            prop_assert!(outcome >= -1);
            if outcome == -1 {
                prop_assert!(after.is_destroyed());
            }
            if outcome > 0 {
                prop_assert_eq!(i32::from(after.owner), outcome);
            }
        }
    }
}
