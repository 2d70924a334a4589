use data_runtime::configs::knockback::KnockbackCfg;
use data_runtime::configs::match_rules::{MatchRulesCfg, WinMode};
use data_runtime::configs::weapon::WeaponCfg;
use net_core::event::Event;
use server_core::session::{Session, SessionConfig};
use server_core::{ParticipantId, SessionIntent};

fn score_session(score_to_win: i32) -> Session {
    let rules = MatchRulesCfg {
        win: WinMode::ScoreThreshold,
        score_to_win,
        spawn_points: vec![[0.0, 0.0], [0.5, 0.0]],
        ..MatchRulesCfg::default()
    };
    Session::new(
        ParticipantId(0),
        SessionConfig {
            rules,
            weapon: WeaponCfg::default(),
            knockback: KnockbackCfg {
                force: 0.0,
                ..KnockbackCfg::default()
            },
        },
    )
}

#[test]
fn damage_dealt_accumulates_as_score_toward_the_threshold() {
    let mut s = score_session(50);
    let p1 = ParticipantId(1);
    let a = s.spawn_player(p1, 0.5, 100).unwrap();
    let b = s.spawn_player(ParticipantId(2), 0.5, 100).unwrap();
    s.mark_started();
    s.drain_events();

    // First hit: 25 points, below the bar.
    s.submit(
        p1,
        SessionIntent::Attack {
            attacker: a,
            at: s.now(),
        },
    );
    s.tick(1.0 / 60.0);
    assert_eq!(s.entity(a).unwrap().score, 25);
    assert_eq!(s.winner(), None);
    s.drain_events();

    // Second hit crosses it.
    s.tick(0.5);
    s.submit(
        p1,
        SessionIntent::Attack {
            attacker: a,
            at: s.now(),
        },
    );
    s.tick(1.0 / 60.0);
    assert_eq!(s.entity(a).unwrap().score, 50);
    assert_eq!(s.winner(), Some(a));
    assert!(s
        .drain_events()
        .iter()
        .any(|e| matches!(e, Event::MatchEnded { winner } if *winner == a.0)));
    let _ = b;
}

#[test]
fn defended_hits_score_only_the_reduced_amount() {
    let mut s = score_session(25);
    let p1 = ParticipantId(1);
    let p2 = ParticipantId(2);
    let a = s.spawn_player(p1, 0.5, 100).unwrap();
    let b = s.spawn_player(p2, 0.5, 100).unwrap();
    s.mark_started();

    s.submit(
        p2,
        SessionIntent::Defend {
            entity: b,
            active: true,
        },
    );
    s.submit(
        p1,
        SessionIntent::Attack {
            attacker: a,
            at: s.now(),
        },
    );
    s.tick(1.0 / 60.0);

    // floor(25 / 4) = 6 points; well short of the threshold.
    assert_eq!(s.entity(a).unwrap().score, 6);
    assert_eq!(s.winner(), None);
}
