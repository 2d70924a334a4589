use glam::vec2;
use server_core::combat::{CombatResolver, DamageEvent};
use server_core::{EntityKind, Lifecycle, ParticipantId, Registry};

const AUTH: ParticipantId = ParticipantId(0);

#[test]
fn same_event_id_mutates_health_at_most_once() {
    let mut reg = Registry::new(AUTH);
    let attacker = reg
        .register(AUTH, EntityKind::Player, ParticipantId(1), vec2(0.0, 0.0), 0.5, 100, 2)
        .unwrap();
    let target = reg
        .register(AUTH, EntityKind::Player, ParticipantId(2), vec2(0.5, 0.0), 0.5, 100, 2)
        .unwrap();
    reg.set_lifecycle(AUTH, attacker, Lifecycle::Alive).unwrap();
    reg.set_lifecycle(AUTH, target, Lifecycle::Alive).unwrap();

    let mut resolver = CombatResolver::new();
    let mut ev = DamageEvent {
        event_id: 77,
        attacker,
        target,
        raw: 25,
        defended: false,
        amount: 25,
        hp_after: 0,
        fatal: false,
    };
    assert!(resolver.apply(&mut reg, 0.0, &mut ev));
    assert_eq!(reg.get(target).unwrap().hp.hp, 75);

    // Duplicate delivery of the same audit record: silent no-op.
    let mut dup = ev;
    assert!(!resolver.apply(&mut reg, 0.1, &mut dup));
    assert_eq!(reg.get(target).unwrap().hp.hp, 75);
    assert_eq!(reg.get(attacker).unwrap().score, 25, "no double scoring");
}

#[test]
fn raw_zeroed_health_still_dies_through_the_resolver() {
    // set_health is a raw write; it leaves a 0-hp entity Alive. The
    // next resolver hit owes the target its exactly-once Dead
    // transition.
    let mut reg = Registry::new(AUTH);
    let attacker = reg
        .register(AUTH, EntityKind::Player, ParticipantId(1), vec2(0.0, 0.0), 0.5, 100, 2)
        .unwrap();
    let target = reg
        .register(AUTH, EntityKind::Player, ParticipantId(2), vec2(0.5, 0.0), 0.5, 100, 2)
        .unwrap();
    reg.set_lifecycle(AUTH, attacker, Lifecycle::Alive).unwrap();
    reg.set_lifecycle(AUTH, target, Lifecycle::Alive).unwrap();
    reg.set_health(AUTH, target, 0).unwrap();
    assert_eq!(reg.get(target).unwrap().lifecycle, Lifecycle::Alive);

    let mut resolver = CombatResolver::new();
    let mut ev = DamageEvent {
        event_id: 5,
        attacker,
        target,
        raw: 25,
        defended: false,
        amount: 25,
        hp_after: 0,
        fatal: false,
    };
    assert!(resolver.apply(&mut reg, 0.0, &mut ev));
    assert!(ev.fatal);
    assert_eq!(reg.get(target).unwrap().lifecycle, Lifecycle::Dead);
    assert_eq!(reg.get(target).unwrap().deaths, 1);
}

#[test]
fn dead_target_receives_no_further_mutations() {
    let mut reg = Registry::new(AUTH);
    let attacker = reg
        .register(AUTH, EntityKind::Player, ParticipantId(1), vec2(0.0, 0.0), 0.5, 100, 2)
        .unwrap();
    let target = reg
        .register(AUTH, EntityKind::Player, ParticipantId(2), vec2(0.5, 0.0), 0.5, 25, 2)
        .unwrap();
    reg.set_lifecycle(AUTH, attacker, Lifecycle::Alive).unwrap();
    reg.set_lifecycle(AUTH, target, Lifecycle::Alive).unwrap();

    let mut resolver = CombatResolver::new();
    let mut fatal = DamageEvent {
        event_id: 1,
        attacker,
        target,
        raw: 25,
        defended: false,
        amount: 25,
        hp_after: 0,
        fatal: false,
    };
    assert!(resolver.apply(&mut reg, 0.0, &mut fatal));
    // Landing on exactly 0 is a kill, processed exactly once.
    assert!(fatal.fatal);
    assert_eq!(reg.get(target).unwrap().lifecycle, Lifecycle::Dead);
    assert_eq!(reg.get(attacker).unwrap().kills, 1);

    let mut post = DamageEvent {
        event_id: 2,
        attacker,
        target,
        raw: 25,
        defended: false,
        amount: 25,
        hp_after: 0,
        fatal: false,
    };
    assert!(!resolver.apply(&mut reg, 0.2, &mut post));
    assert!(!post.fatal, "death must not be processed twice");
    assert_eq!(reg.get(attacker).unwrap().kills, 1);
}
