//! Headless session harness: runs a scripted minute of play at 60 Hz and logs what happens.
//!
//! Usage: `marsboards [records.ron]`. With a path, the persistence records produced by the
//! session are written there.

use anyhow::{Context, Result};
use game::{BotConfig, Game, GameConfig, GameEvent};
use input::{Action, InputState};

const TICK: f32 = 1.0 / 60.0;
const SESSION_SECONDS: f32 = 60.0;
/// Bots start spawning before the weapon models are "loaded" and must queue.
const ASSETS_LOADED_AT: f32 = 0.5;

/// Scripted input for one frame.
fn script(input: &mut InputState, t: f32) {
    let held = |from: f32, to: f32| t >= from && t < to;
    let mut set = |action: Action, on: bool| {
        if on {
            input.press(action);
        } else {
            input.release(action);
        }
    };
    set(Action::MoveForward, held(1.0, 3.0) || held(20.0, 22.0));
    set(Action::StrafeLeft, held(3.0, 4.0));
    set(Action::Jump, held(2.0, 2.1));
    // two placements, then switch to the blaster and shoot at them
    set(Action::Fire, held(5.0, 5.05) || held(6.0, 6.05) || held(8.0, 18.0));
    set(Action::SwitchWeapon, held(7.0, 7.05));
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = GameConfig::load();
    let bot_config = BotConfig::load();
    let mut game = Game::new(config, bot_config, 0x4d41_5253);
    let mut input = InputState::new();

    let mut destroyed = 0usize;
    let mut t = 0.0f32;
    let mut frame = 0u64;
    while t < SESSION_SECONDS {
        if t >= ASSETS_LOADED_AT && !game.weapons().is_initialized() {
            game.on_assets_loaded();
        }

        input.begin_frame();
        script(&mut input, t);
        // look down at the ground ahead while placing and shooting
        let pitch = if (4.5..18.0).contains(&t) { -0.6 } else { 0.0 };
        let camera = game.player_camera(0.0, pitch);
        game.tick(TICK, &input, Some(&camera));

        for event in game.drain_scene_events() {
            if let GameEvent::BillboardDestroyed { id, category } = event {
                destroyed += 1;
                log::info!("{:?} billboard {} destroyed", category, id);
            }
        }

        frame += 1;
        if frame % 60 == 0 {
            log::info!("t={:>4.1}s  {}", game.time().elapsed_seconds(), game.hud());
        }
        t += TICK;
    }
    game.shutdown();

    let records = game.outbox().len();
    log::info!(
        "Session over: {} billboards destroyed, {} persistence records, {} rocks",
        destroyed,
        records,
        game.rocks().len()
    );

    if let Some(path) = std::env::args().nth(1) {
        let text = game.outbox().to_ron().context("Failed to serialize records")?;
        std::fs::write(&path, text).with_context(|| format!("Failed to write {}", path))?;
        log::info!("Wrote {} records to {}", records, path);
    }
    Ok(())
}
