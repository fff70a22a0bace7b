use engine_core::{Quat, Vec3};
use game::{BotConfig, Category, Game, GameConfig, GameEvent, PersistRecord, WeaponKind};
use input::{Action, InputState};

const DT: f32 = 1.0 / 60.0;

fn config() -> GameConfig {
    let mut config = GameConfig::default();
    config.rocks.count = 0;
    config
}

fn bots(max_count: usize) -> BotConfig {
    BotConfig {
        max_count,
        spawn_interval_ms: 100,
        ..Default::default()
    }
}

fn run(game: &mut Game, input: &mut InputState, seconds: f32, pitch: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let frames = (seconds / DT).round() as usize;
    for _ in 0..frames {
        let camera = game.player_camera(0.0, pitch);
        game.tick(DT, input, Some(&camera));
        input.begin_frame();
        events.extend(game.drain_scene_events());
    }
    events
}

#[test]
fn bots_wait_for_weapons_then_fill_the_world() {
    let mut game = Game::new(config(), Ok(bots(3)), 7);
    let mut input = InputState::new();

    run(&mut game, &mut input, 0.5, 0.0);
    let hud = game.hud();
    assert_eq!(hud.bot_billboards, 0);
    assert_eq!(hud.pending_bots, 3);

    game.on_assets_loaded();
    run(&mut game, &mut input, 1.0, 0.0);
    let hud = game.hud();
    assert_eq!(hud.bot_billboards, 3);
    assert_eq!(hud.pending_bots, 0);
    assert_eq!(game.bots().tracked_count(), 3);
}

#[test]
fn place_then_shoot_down_a_billboard() {
    let mut game = Game::new(config(), Ok(bots(0)), 7);
    game.on_assets_loaded();
    let mut input = InputState::new();
    let pitch = -0.6;

    input.press(Action::Fire);
    run(&mut game, &mut input, DT, pitch);
    input.release(Action::Fire);
    run(&mut game, &mut input, DT, pitch);
    assert_eq!(game.hud().placements, 1);
    assert_eq!(game.hud().ammo, 9);

    input.press(Action::SwitchWeapon);
    run(&mut game, &mut input, DT, pitch);
    input.release(Action::SwitchWeapon);
    assert_eq!(game.hud().active_weapon, WeaponKind::Projectile);

    input.press(Action::Fire);
    let events = run(&mut game, &mut input, 4.0, pitch);
    input.release(Action::Fire);
    let events: Vec<GameEvent> = events
        .into_iter()
        .chain(run(&mut game, &mut input, 1.5, pitch))
        .collect();

    let destroyed = events
        .iter()
        .filter(|e| matches!(e, GameEvent::BillboardDestroyed { .. }))
        .count();
    assert_eq!(destroyed, 1);
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::BillboardRemoved { category: Category::Player, .. })));
    assert_eq!(game.hud().placements, 0);
    assert!(!game.weapons().is_firing());

    let records = game.drain_records();
    assert!(records
        .iter()
        .any(|r| matches!(r, PersistRecord::BillboardRemoved { .. })));
    let damage_records = records
        .iter()
        .filter(|r| matches!(r, PersistRecord::BillboardDamaged { .. }))
        .count();
    assert_eq!(damage_records, 25);
}

#[test]
fn removed_bot_billboard_is_replaced() {
    let mut game = Game::new(config(), Ok(bots(1)), 3);
    game.on_assets_loaded();
    let mut input = InputState::new();
    run(&mut game, &mut input, 0.1, 0.0);
    let first = game.weapons().registry().ids()[0].clone();

    assert!(game.weapons_mut().remove_billboard(&first));
    run(&mut game, &mut input, 0.5, 0.0);
    assert_eq!(game.hud().bot_billboards, 0);

    run(&mut game, &mut input, 1.0, 0.0);
    let ids = game.weapons().registry().ids();
    assert_eq!(ids.len(), 1);
    assert_ne!(ids[0], first);
}

#[test]
fn walking_keeps_the_player_on_the_shell() {
    let mut game = Game::new(config(), Ok(bots(0)), 1);
    let mut input = InputState::new();
    input.press(Action::MoveForward);
    let start = game.player.position;
    run(&mut game, &mut input, 1.0, 0.0);
    let end = game.player.position;
    assert!((end.length() - 51.8).abs() < 1e-3);
    assert!(start.distance(end) > 9.0 && start.distance(end) < 10.5);
}

#[test]
fn remote_records_apply_without_echo() {
    let mut game = Game::new(config(), Ok(bots(0)), 1);
    game.on_assets_loaded();
    let record = PersistRecord::BillboardPlaced {
        id: "remote-1".to_string(),
        category: Category::Player,
        position: [0.0, 50.0, 0.0],
        rotation: Quat::IDENTITY.to_array(),
        size: 4.0,
        text: "hello".to_string(),
        color: "#00ff00".to_string(),
        health: 100,
    };
    game.apply_remote(&record);
    game.apply_remote(&PersistRecord::BillboardDamaged {
        id: "remote-1".to_string(),
        health: 40,
    });
    game.apply_remote(&PersistRecord::AmmoChanged {
        weapon: WeaponKind::Placement,
        ammo: 2,
    });

    let view = game.weapons().registry().get("remote-1").expect("restored");
    assert_eq!(view.health.current, 40);
    assert!(view.transform.position.distance(Vec3::new(0.0, 50.0, 0.0)) < 1e-5);
    assert_eq!(game.hud().ammo, 2);
    assert!(game.outbox().is_empty());

    game.apply_remote(&PersistRecord::BillboardRemoved {
        id: "remote-1".to_string(),
    });
    assert!(game.weapons().registry().is_empty());
    let scene = game.drain_scene_events();
    assert_eq!(scene.len(), 3);
    assert!(game.drain_records().is_empty());
}

fn place_one(game: &mut Game, input: &mut InputState) {
    input.press(Action::Fire);
    run(game, input, DT, -0.6);
    input.release(Action::Fire);
    run(game, input, DT, -0.6);
}

#[test]
fn remote_zero_health_topples_the_billboard() {
    let mut game = Game::new(config(), Ok(bots(0)), 5);
    game.on_assets_loaded();
    let mut input = InputState::new();
    place_one(&mut game, &mut input);
    let id = game.weapons().registry().ids()[0].clone();
    game.drain_records();

    game.apply_remote(&PersistRecord::BillboardDamaged { id: id.clone(), health: 0 });
    let view = game.weapons().registry().get(&id).expect("toppling");
    assert!(view.destroying);

    let mut events = game.drain_scene_events();
    events.extend(run(&mut game, &mut input, 1.5, 0.0));
    let destroyed = events
        .iter()
        .filter(|e| matches!(e, GameEvent::BillboardDestroyed { .. }))
        .count();
    assert_eq!(destroyed, 1);
    assert!(!game.weapons().registry().contains(&id));
    assert_eq!(game.hud().placements, 0);
}

#[test]
fn billboards_from_two_sessions_coexist() {
    let mut a = Game::new(config(), Ok(bots(0)), 11);
    let mut b = Game::new(config(), Ok(bots(0)), 12);
    a.on_assets_loaded();
    b.on_assets_loaded();
    let mut input = InputState::new();
    place_one(&mut a, &mut input);
    place_one(&mut b, &mut input);
    assert_ne!(a.weapons().registry().ids(), b.weapons().registry().ids());

    for record in a.drain_records() {
        b.apply_remote(&record);
    }
    assert_eq!(b.weapons().registry().len(), 2);
    assert_eq!(b.hud().placements, 2);
}
