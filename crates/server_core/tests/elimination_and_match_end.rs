use data_runtime::configs::knockback::KnockbackCfg;
use data_runtime::configs::match_rules::MatchRulesCfg;
use data_runtime::configs::weapon::WeaponCfg;
use net_core::event::{Event, LIFECYCLE_ELIMINATED};
use server_core::session::{Session, SessionConfig};
use server_core::{Lifecycle, ParticipantId, SessionIntent};

fn sudden_death_session() -> Session {
    // No respawns: the first death eliminates.
    let rules = MatchRulesCfg {
        starting_lives: 0,
        spawn_points: vec![[0.0, 0.0], [0.5, 0.0]],
        ..MatchRulesCfg::default()
    };
    Session::new(
        ParticipantId(0),
        SessionConfig {
            rules,
            weapon: WeaponCfg::default(),
            knockback: KnockbackCfg::default(),
        },
    )
}

#[test]
fn out_of_lives_means_elimination_not_respawn() {
    let mut s = sudden_death_session();
    let p1 = ParticipantId(1);
    let a = s.spawn_player(p1, 0.5, 100).unwrap();
    let b = s.spawn_player(ParticipantId(2), 0.5, 10).unwrap();
    s.mark_started();
    s.drain_events();

    s.submit(
        p1,
        SessionIntent::Attack {
            attacker: a,
            at: s.now(),
        },
    );
    s.tick(1.0 / 60.0);

    let loser = s.entity(b).unwrap();
    assert_eq!(loser.lifecycle, Lifecycle::Eliminated);
    assert_eq!(loser.lives, -1);
    assert!(loser.respawn_timer.is_none(), "no respawn is scheduled");

    let events = s.drain_events();
    assert!(events.iter().any(
        |e| matches!(e, Event::LifecycleChanged { entity, state } if *entity == b.0 && *state == LIFECYCLE_ELIMINATED)
    ));
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, Event::RespawnScheduled { .. })),
        "eliminated entities never respawn"
    );

    // Long after the usual respawn delay, still eliminated.
    s.tick(10.0);
    assert_eq!(s.entity(b).unwrap().lifecycle, Lifecycle::Eliminated);
}

#[test]
fn last_standing_wins_and_match_ends_once() {
    let mut s = sudden_death_session();
    let p1 = ParticipantId(1);
    let a = s.spawn_player(p1, 0.5, 100).unwrap();
    let b = s.spawn_player(ParticipantId(2), 0.5, 10).unwrap();
    s.mark_started();
    s.drain_events();

    s.submit(
        p1,
        SessionIntent::Attack {
            attacker: a,
            at: s.now(),
        },
    );
    s.tick(1.0 / 60.0);

    assert_eq!(s.winner(), Some(a));
    let events = s.drain_events();
    let ended: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, Event::MatchEnded { winner } if *winner == a.0))
        .collect();
    assert_eq!(ended.len(), 1);

    // Further ticks never re-announce the result.
    s.tick(1.0);
    s.tick(1.0);
    assert!(!s
        .drain_events()
        .iter()
        .any(|e| matches!(e, Event::MatchEnded { .. })));
    assert_eq!(s.winner(), Some(a));
    let _ = b;
}

#[test]
fn no_winner_before_match_start() {
    let mut s = sudden_death_session();
    let _lone = s.spawn_player(ParticipantId(1), 0.5, 100).unwrap();
    // A lone early joiner is trivially "last standing" but the match
    // has not begun, so no result is declared.
    s.tick(1.0 / 60.0);
    s.tick(1.0 / 60.0);
    assert_eq!(s.winner(), None);
    assert!(!s
        .drain_events()
        .iter()
        .any(|e| matches!(e, Event::MatchEnded { .. })));
}
