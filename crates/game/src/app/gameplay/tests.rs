use arena_engine::{
    Ability, EnterOutcome, EntityId, FireOutcome, InputAction, InputSnapshot, Simulation,
    Transform, Vec2,
};

use super::{ArenaAbility, ArenaSession, DamageOutcome, PursuitTarget};
use crate::app::tuning::ArenaTuning;

const DT: f32 = 0.1;
const TICKS_TO_FIRST_SPAWN: usize = 50;

fn arena_tuning() -> ArenaTuning {
    let mut tuning = ArenaTuning::default();
    tuning.enemies.spawn_points = vec![Transform::at(Vec2::new(3.0, 0.0))];
    tuning.enemies.speed = 0.0;
    tuning
}

fn idle() -> InputSnapshot {
    InputSnapshot::empty()
}

fn holding_fire() -> InputSnapshot {
    InputSnapshot::empty().with_action_down(InputAction::Fire, true)
}

fn releasing_fire() -> InputSnapshot {
    InputSnapshot::empty().with_fire_released(true)
}

fn run(session: &mut ArenaSession, ticks: usize, input: InputSnapshot) {
    for _ in 0..ticks {
        session.tick(DT, &input);
    }
}

fn first_enemy(session: &ArenaSession) -> EntityId {
    session
        .world()
        .horde
        .active()
        .next()
        .map(|enemy| enemy.id())
        .expect("an active enemy")
}

fn select(session: &mut ArenaSession, name: &str) {
    for _ in 0..session.controller().abilities().len() {
        if session.controller().active_ability().map(Ability::name) == Some(name) {
            return;
        }
        session.switch_ability();
    }
    panic!("no ability named {name}");
}

fn session_with_frozen_enemy() -> (ArenaSession, EntityId) {
    let mut session = ArenaSession::new(&arena_tuning());
    run(&mut session, TICKS_TO_FIRST_SPAWN, idle());
    select(&mut session, "frost");
    run(&mut session, 1, holding_fire());
    let enemy = first_enemy(&session);
    assert_eq!(session.summary().frozen_enemies, 1);
    (session, enemy)
}

#[test]
fn first_enemy_spawns_after_one_interval() {
    let mut session = ArenaSession::new(&arena_tuning());
    run(&mut session, TICKS_TO_FIRST_SPAWN - 1, idle());
    assert_eq!(session.world().horde.active_count(), 0);

    run(&mut session, 1, idle());
    assert_eq!(session.world().horde.active_count(), 1);
    let enemy = first_enemy(&session);
    assert_eq!(
        session.world().horde.find(enemy).map(|e| e.position()),
        Some(Vec2::new(3.0, 0.0))
    );
}

#[test]
fn spawner_population_is_capped() {
    let mut tuning = arena_tuning();
    tuning.enemies.max_per_spawner = 2;
    let mut session = ArenaSession::new(&tuning);

    run(&mut session, 205, idle());

    assert_eq!(session.world().horde.active_count(), 2);
}

#[test]
fn held_lightning_fires_once_per_cooldown() {
    let mut session = ArenaSession::new(&arena_tuning());
    run(&mut session, 10, holding_fire());

    let bolts = match &session.controller().abilities()[0] {
        ArenaAbility::Lightning(lightning) => lightning.bolts().in_flight(),
        other => panic!("slot 0 is {}", other.name()),
    };
    assert_eq!(bolts, 2);
}

#[test]
fn lightning_fires_when_pressed_and_released_within_one_tick() {
    let mut session = ArenaSession::new(&arena_tuning());
    run(
        &mut session,
        1,
        idle().with_fire_pressed(true).with_fire_released(true),
    );

    let bolts = match &session.controller().abilities()[0] {
        ArenaAbility::Lightning(lightning) => lightning.bolts().in_flight(),
        other => panic!("slot 0 is {}", other.name()),
    };
    assert_eq!(bolts, 1);
    assert!(session.summary().cooldown_remaining_seconds > 0.0);
}

#[test]
fn frost_cone_debuffs_enemy_and_release_clears_it() {
    let (mut session, enemy) = session_with_frozen_enemy();
    assert!(session.world().horde.find(enemy).expect("enemy").is_debuffed());
    assert!(session.summary().frost_emitting);

    run(&mut session, 1, releasing_fire());

    let summary = session.summary();
    assert!(!summary.frost_emitting);
    assert_eq!(summary.frozen_enemies, 0);
    assert_eq!(session.frost().expect("frost").tracker().attached_count(), 0);
}

#[test]
fn frost_does_not_start_a_cooldown() {
    let (session, _) = session_with_frozen_enemy();
    assert_eq!(session.summary().cooldown_remaining_seconds, 0.0);
}

#[test]
fn repeated_enter_reuses_the_existing_debuff() {
    let (mut session, enemy) = session_with_frozen_enemy();

    assert_eq!(session.cone_enter(enemy), EnterOutcome::Refreshed);
    assert_eq!(session.frost().expect("frost").tracker().attached_count(), 1);
}

#[test]
fn frozen_enemies_move_at_the_slow_multiplier() {
    let mut tuning = arena_tuning();
    tuning.enemies.speed = 1.0;
    tuning.enemies.spawn_points = vec![Transform::at(Vec2::new(4.0, 0.0))];
    let mut session = ArenaSession::new(&tuning);
    run(&mut session, TICKS_TO_FIRST_SPAWN, idle());
    select(&mut session, "frost");
    run(&mut session, 1, holding_fire());
    let enemy = first_enemy(&session);
    let before = session.world().horde.find(enemy).expect("enemy").position();

    run(&mut session, 1, holding_fire());

    let after = session.world().horde.find(enemy).expect("enemy").position();
    let expected = tuning.enemies.speed * tuning.abilities.frost_slow_multiplier * DT;
    assert!(((before.x - after.x) - expected).abs() < 1e-4);
}

#[test]
fn frost_capacity_limits_simultaneous_debuffs() {
    let mut tuning = arena_tuning();
    tuning.abilities.max_freezable_enemies = 1;
    tuning.enemies.spawn_points = vec![
        Transform::at(Vec2::new(3.0, 0.0)),
        Transform::at(Vec2::new(3.0, 0.5)),
    ];
    let mut session = ArenaSession::new(&tuning);
    run(&mut session, TICKS_TO_FIRST_SPAWN, idle());
    select(&mut session, "frost");

    run(&mut session, 1, holding_fire());

    assert_eq!(session.world().horde.active_count(), 2);
    assert_eq!(session.summary().frozen_enemies, 1);
}

#[test]
fn switching_away_from_frost_releases_every_debuff() {
    let (mut session, _) = session_with_frozen_enemy();

    run(
        &mut session,
        1,
        holding_fire().with_switch_ability_pressed(true),
    );

    let summary = session.summary();
    assert_eq!(summary.active_ability, "stink");
    assert_eq!(summary.frozen_enemies, 0);
    assert!(!summary.frost_emitting);
}

#[test]
fn defeating_a_frozen_enemy_releases_frost_and_recycles_it() {
    let (mut session, enemy) = session_with_frozen_enemy();

    assert!(session.defeat_enemy(enemy));
    assert!(!session.defeat_enemy(enemy));

    assert_eq!(session.frost().expect("frost").tracker().attached_count(), 0);
    assert_eq!(session.world().horde.active_count(), 0);
    assert_eq!(session.score(), 10);
    assert_eq!(session.summoner().points(), 10);

    run(&mut session, TICKS_TO_FIRST_SPAWN, holding_fire());
    assert_eq!(session.world().horde.active_count(), 1);
}

#[test]
fn non_enemies_are_filtered_out_of_the_cone() {
    let (mut session, _) = session_with_frozen_enemy();
    let player = session.world().player.id();
    assert_eq!(session.cone_enter(player), EnterOutcome::Ignored);
    assert!(!session.cone_exit(player));
}

#[test]
fn summon_redirects_enemies_until_the_ally_expires() {
    let mut session = ArenaSession::new(&arena_tuning());
    session.add_score(500);

    run(&mut session, 1, idle().with_summon_pressed(true));

    assert_eq!(session.pursuit(), PursuitTarget::Ally);
    assert!(session.summoner().is_summoned());
    let ally = session.summoner().singleton().expect("ally");
    assert_eq!(ally.destination(), Some(Vec2::ZERO));
    assert!((ally.position().y + 1.5).abs() < 1e-4);
    assert_eq!(session.pursuit_position(), Some(ally.position()));

    session.add_score(40);
    run(&mut session, 151, idle());

    assert_eq!(session.pursuit(), PursuitTarget::Player);
    assert!(!session.summoner().is_summoned());
    assert_eq!(session.summoner().points(), 0);
    assert!(!session.summoner().can_summon());
}

#[test]
fn summon_is_refused_below_the_threshold() {
    let mut session = ArenaSession::new(&arena_tuning());
    session.add_score(99);
    assert!(!session.summon_ally());
    assert_eq!(session.pursuit(), PursuitTarget::Player);
}

#[test]
fn player_defeat_is_terminal_for_the_controller() {
    let (mut session, _) = session_with_frozen_enemy();
    session.add_score(1000);

    assert_eq!(session.damage_player(40), DamageOutcome::Damaged);
    assert_eq!(session.damage_player(60), DamageOutcome::Defeated);

    let summary = session.summary();
    assert!(!summary.can_act);
    assert_eq!(summary.frozen_enemies, 0);
    assert_eq!(summary.pursuit, PursuitTarget::Nobody);
    assert_eq!(session.fire_input(), FireOutcome::Refused);
    assert_eq!(session.switch_ability(), None);
    assert_eq!(session.damage_player(10), DamageOutcome::Ignored);

    run(&mut session, TICKS_TO_FIRST_SPAWN * 2, holding_fire());
    assert_eq!(session.world().horde.active_count(), 1);
    assert_eq!(session.summary().frozen_enemies, 0);
}

#[test]
fn ally_can_still_be_summoned_after_player_defeat() {
    let mut session = ArenaSession::new(&arena_tuning());
    session.add_score(100);
    assert_eq!(session.damage_player(100), DamageOutcome::Defeated);
    assert_eq!(session.pursuit(), PursuitTarget::Nobody);

    assert!(session.summon_ally());
    assert_eq!(session.pursuit(), PursuitTarget::Ally);
    assert_eq!(session.summoner().points(), 100);

    run(&mut session, 151, idle());

    assert!(!session.summoner().is_summoned());
    assert_eq!(session.summoner().points(), 0);
    assert_eq!(session.pursuit(), PursuitTarget::Nobody);
}

#[test]
fn summoned_ally_takes_the_spawn_rotation() {
    let tuning = arena_tuning();
    let mut session = ArenaSession::new(&tuning);
    session.add_score(100);
    assert!(session.summon_ally());

    let ally = session.summoner().singleton().expect("ally");
    assert_eq!(Some(ally.rotation_radians()), tuning.ally.spawn_point.rotation_radians);
}

#[test]
fn stink_fires_on_release_not_while_held() {
    let mut session = ArenaSession::new(&arena_tuning());
    select(&mut session, "stink");

    run(&mut session, 5, holding_fire());
    assert_eq!(session.summary().cooldown_remaining_seconds, 0.0);

    run(&mut session, 1, releasing_fire());
    let remaining = session.summary().cooldown_remaining_seconds;
    assert!((remaining - 2.0).abs() < 1e-4);
}

#[test]
fn empty_slime_does_not_start_a_cooldown() {
    let mut tuning = arena_tuning();
    tuning.abilities.slime_ammo = 1;
    let mut session = ArenaSession::new(&tuning);
    select(&mut session, "slime");

    assert_eq!(session.release_input(), FireOutcome::Executed);
    assert!(session.summary().cooldown_remaining_seconds > 0.0);

    run(&mut session, 11, idle());
    assert_eq!(session.release_input(), FireOutcome::Refused);
    assert_eq!(session.summary().cooldown_remaining_seconds, 0.0);
    assert_eq!(session.summary().slime_ammo, 0);
}

#[test]
fn movement_input_moves_and_turns_the_player() {
    let mut session = ArenaSession::new(&arena_tuning());
    run(
        &mut session,
        10,
        idle().with_action_down(InputAction::MoveUp, true),
    );

    let player = &session.world().player;
    assert!((player.position().y - 6.0).abs() < 1e-3);
    assert_eq!(player.facing(), Vec2::new(0.0, 1.0));
}
