//! Headless match harness.
//!
//! Drives a scripted brawl through the same intent codec and channel
//! a real transport would use, and prints the authoritative event
//! stream. Usage: `arena_server [--seed N] [--ticks N]`.

use anyhow::{Context, Result};
use glam::Vec2;
use net_core::command::Intent;
use net_core::event::Event;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use server_core::session::{Session, SessionConfig};
use server_core::{EntityId, ParticipantId};

const TICK_S: f64 = 1.0 / 60.0;

struct Args {
    seed: u64,
    ticks: u32,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let grab = |flag: &str| -> Option<u64> {
        args.iter()
            .skip_while(|a| a.as_str() != flag)
            .nth(1)
            .and_then(|v| v.parse().ok())
    };
    Args {
        seed: grab("--seed").unwrap_or(42),
        ticks: grab("--ticks").map_or(3600, |t| u32::try_from(t).unwrap_or(3600)),
    }
}

fn main() -> Result<()> {
    let telemetry_cfg =
        data_runtime::configs::telemetry::load_default().context("load telemetry config")?;
    let _guard = server_core::telemetry::init_telemetry(&telemetry_cfg)?;
    // Fallback for builds that skip the tracing subscriber; a no-op
    // once one is installed.
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .format_timestamp_secs()
    .try_init();

    let args = parse_args();
    let cfg = SessionConfig {
        rules: data_runtime::configs::match_rules::load_default().context("load match rules")?,
        weapon: data_runtime::configs::weapon::load_default().context("load weapon config")?,
        knockback: data_runtime::configs::knockback::load_default()
            .context("load knockback config")?,
    };

    let authority = ParticipantId(0);
    let p1 = ParticipantId(1);
    let p2 = ParticipantId(2);
    let mut session = Session::new(authority, cfg);
    let e1 = session.spawn_player(p1, 0.5, 100)?;
    let e2 = session.spawn_player(p2, 0.5, 100)?;
    let ai = session.spawn_ai(0.5, 60)?;
    session.mark_started();

    // One inbound intent channel per participant.
    let (tx1, rx1) = net_core::channel::channel::<Intent>();
    let (tx2, rx2) = net_core::channel::channel::<Intent>();
    let inboxes = [(p1, rx1), (p2, rx2)];

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    log::info!("match start: seed={} ticks={}", args.seed, args.ticks);

    for tick in 0..args.ticks {
        let now = session.now();
        script_player(&session, &tx1, e1, e2, now, &mut rng, false);
        script_player(&session, &tx2, e2, e1, now, &mut rng, true);
        script_ai(&mut session, ai, e1, now, &mut rng);

        for (who, rx) in &inboxes {
            for msg in rx.drain() {
                match msg {
                    Ok(cmd) => session.submit(*who, cmd.into()),
                    Err(e) => log::warn!("bad intent frame from {who:?}: {e}"),
                }
            }
        }

        session.tick(TICK_S);
        for ev in session.drain_events() {
            print_event(tick, &ev);
        }
        if session.winner().is_some() {
            break;
        }
    }

    match session.winner() {
        Some(w) => log::info!("winner: {w:?}"),
        None => log::info!("tick budget exhausted with no winner"),
    }
    session.teardown();
    Ok(())
}

/// Close in on the opponent, then swing; the defensive script raises
/// its shield on a timer instead of always trading.
fn script_player(
    session: &Session,
    tx: &net_core::channel::Tx<Intent>,
    me: EntityId,
    opponent: EntityId,
    now: f64,
    rng: &mut ChaCha8Rng,
    defensive: bool,
) {
    let Ok(e) = session.entity(me) else { return };
    let Ok(target) = session.entity(opponent) else {
        return;
    };
    if !e.can_act() {
        return;
    }
    let to = target.pos - e.pos;
    let dist = to.length();
    let send = |cmd: Intent| {
        let _ = tx.send(&cmd);
    };
    if dist > 0.9 {
        let step = e.pos + to.normalize_or_zero() * 0.08;
        send(Intent::Move {
            entity: me.0,
            pos: [step.x, step.y],
            grounded: true,
        });
        return;
    }
    if defensive && !e.defending && rng.gen_bool(0.02) {
        send(Intent::Defend {
            entity: me.0,
            active: true,
        });
        return;
    }
    if e.defending && rng.gen_bool(0.05) {
        send(Intent::Defend {
            entity: me.0,
            active: false,
        });
        return;
    }
    if !e.defending && now >= e.attack_ready_at && rng.gen_bool(0.6) {
        send(Intent::Attack {
            attacker: me.0,
            at: now,
        });
    }
}

/// The AI is authority-owned, so its intents skip the wire.
fn script_ai(
    session: &mut Session,
    ai: EntityId,
    prey: EntityId,
    now: f64,
    rng: &mut ChaCha8Rng,
) {
    let (pos, ready_at, acting) = match session.entity(ai) {
        Ok(e) => (e.pos, e.attack_ready_at, e.can_act()),
        Err(_) => return,
    };
    let Ok(target_pos) = session.entity(prey).map(|t| t.pos) else {
        return;
    };
    if !acting {
        return;
    }
    let to = target_pos - pos;
    if to.length() > 0.9 {
        let step = pos + to.normalize_or_zero() * 0.05;
        session.submit(
            ParticipantId(0),
            server_core::SessionIntent::Move {
                entity: ai,
                pos: Vec2::new(step.x, step.y),
                grounded: true,
            },
        );
    } else if now >= ready_at && rng.gen_bool(0.3) {
        session.submit(
            ParticipantId(0),
            server_core::SessionIntent::Attack { attacker: ai, at: now },
        );
    }
}

fn print_event(tick: u32, ev: &Event) {
    match ev {
        Event::HealthChanged { entity, hp, max } => {
            log::info!("[{tick}] entity {entity}: hp {hp}/{max}");
        }
        Event::LifecycleChanged { entity, state } => {
            log::info!("[{tick}] entity {entity}: lifecycle -> {state}");
        }
        Event::DamageDealt {
            attacker,
            target,
            amount,
            fatal,
            ..
        } => {
            log::info!(
                "[{tick}] {attacker} hit {target} for {amount}{}",
                if *fatal { " (fatal)" } else { "" }
            );
        }
        Event::KnockbackApplied {
            entity, duration, ..
        } => {
            log::info!("[{tick}] entity {entity}: knocked back, stunned {duration}s");
        }
        Event::RespawnScheduled { entity, eta_s } => {
            log::info!("[{tick}] entity {entity}: respawn in {eta_s}s");
        }
        Event::MatchEnded { winner } => {
            log::info!("[{tick}] match ended, winner {winner}");
        }
    }
}
