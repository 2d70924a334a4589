use data_runtime::configs::knockback::KnockbackCfg;
use data_runtime::configs::match_rules::MatchRulesCfg;
use data_runtime::configs::weapon::WeaponCfg;
use glam::vec2;
use net_core::event::Event;
use server_core::session::{Session, SessionConfig};
use server_core::{ParticipantId, SessionIntent};

// Two attackers flank one target: each is in reach of the target but
// not of the other, so the swings never cross.
fn gated_session(hit_stun_s: f32) -> Session {
    let rules = MatchRulesCfg {
        spawn_points: vec![[-1.2, 0.0], [1.2, 0.0], [0.0, 0.0]],
        ..MatchRulesCfg::default()
    };
    Session::new(
        ParticipantId(0),
        SessionConfig {
            rules,
            weapon: WeaponCfg {
                hit_stun_s,
                ..WeaponCfg::default()
            },
            knockback: KnockbackCfg {
                force: 0.0,
                ..KnockbackCfg::default()
            },
        },
    )
}

#[test]
fn second_hit_inside_the_window_is_gated() {
    let mut s = gated_session(1.0);
    let p1 = ParticipantId(1);
    let p2 = ParticipantId(2);
    let a1 = s.spawn_player(p1, 0.5, 100).unwrap();
    let a2 = s.spawn_player(p2, 0.5, 100).unwrap();
    let b = s.spawn_player(ParticipantId(3), 0.5, 100).unwrap();
    s.mark_started();
    s.drain_events();

    // Both swings land in the same tick; only the first connects.
    s.submit(p1, SessionIntent::Attack { attacker: a1, at: s.now() });
    s.submit(p2, SessionIntent::Attack { attacker: a2, at: s.now() });
    s.tick(1.0 / 60.0);

    assert_eq!(s.entity(b).unwrap().hp.hp, 75, "second hit falls in the window");
    let dmg = s
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, Event::DamageDealt { .. }))
        .count();
    assert_eq!(dmg, 1, "the gated swing emits no damage event");
    // The gated attacker still armed its cooldown; it swung, the hit
    // just did not connect.
    assert_eq!(s.entity(a2).unwrap().score, 0);

    // Past the window the same attacker connects.
    s.tick(1.1);
    s.submit(p2, SessionIntent::Attack { attacker: a2, at: s.now() });
    s.tick(1.0 / 60.0);
    assert_eq!(s.entity(b).unwrap().hp.hp, 50);
    assert_eq!(s.entity(a2).unwrap().score, 25);
}

#[test]
fn zero_window_disables_the_gate() {
    let mut s = gated_session(0.0);
    let p1 = ParticipantId(1);
    let p2 = ParticipantId(2);
    let a1 = s.spawn_player(p1, 0.5, 100).unwrap();
    let a2 = s.spawn_player(p2, 0.5, 100).unwrap();
    let b = s.spawn_player(ParticipantId(3), 0.5, 100).unwrap();
    s.mark_started();

    s.submit(p1, SessionIntent::Attack { attacker: a1, at: s.now() });
    s.submit(p2, SessionIntent::Attack { attacker: a2, at: s.now() });
    s.tick(1.0 / 60.0);

    assert_eq!(s.entity(b).unwrap().hp.hp, 50, "both same-tick hits land");
}

#[test]
fn accepted_move_updates_position_and_grounded() {
    let mut s = gated_session(1.0);
    let p1 = ParticipantId(1);
    let a = s.spawn_player(p1, 0.5, 100).unwrap();
    s.mark_started();

    s.submit(
        p1,
        SessionIntent::Move {
            entity: a,
            pos: vec2(2.5, 1.0),
            grounded: false,
        },
    );
    s.tick(1.0 / 60.0);

    let e = s.entity(a).unwrap();
    assert_eq!(e.pos, vec2(2.5, 1.0));
    assert!(!e.grounded);
}
