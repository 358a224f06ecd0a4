use plan_core::{AtomId, Condition, WorldState};

#[test]
fn set_then_get_holds_for_every_atom() {
    for id in 0..=255u8 {
        let atom = AtomId(id);
        let mut state = WorldState::EMPTY;
        state.set_bit(atom, true);
        assert!(state.get_bit(atom), "atom {id} set");
        assert_eq!(state.count_ones(), 1);

        let mut state = WorldState::FULL;
        state.set_bit(atom, false);
        assert!(!state.get_bit(atom), "atom {id} cleared");
        assert_eq!(state.count_ones(), 255);
    }
}

#[test]
fn match_is_reflexive_when_mask_and_values_are_the_state() {
    let states = [
        WorldState::EMPTY,
        WorldState::FULL,
        WorldState::from_atoms([AtomId(0), AtomId(64), AtomId(129), AtomId(255)]),
        WorldState::from_words([0xdead_beef, 0, u64::MAX, 1 << 40]),
    ];
    for state in states {
        assert!(state.matches(&Condition::new(state, state)));
    }
}

#[test]
fn match_ignores_unmasked_atoms() {
    let cond = Condition::always()
        .require(AtomId(10), true)
        .require(AtomId(200), false);

    assert!(WorldState::from_atoms([AtomId(10), AtomId(11)]).matches(&cond));
    assert!(!WorldState::from_atoms([AtomId(10), AtomId(200)]).matches(&cond));
    assert!(!WorldState::EMPTY.matches(&cond));
    assert!(WorldState::EMPTY.matches(&Condition::always()));
}

#[test]
fn equal_states_hash_equal() {
    let a = WorldState::from_atoms([AtomId(1), AtomId(100)]);
    let b = WorldState::EMPTY
        .with_bit(AtomId(100), true)
        .with_bit(AtomId(1), true);
    assert_eq!(a, b);
    assert_eq!(a.state_hash(), b.state_hash());
}
