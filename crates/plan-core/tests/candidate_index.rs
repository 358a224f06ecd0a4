use plan_core::{
    ActionDefinition, ActionId, ActionLibrary, AtomId, Condition, WorldState, ALWAYS_BUCKET,
    BUCKET_COUNT,
};

fn cond(facts: &[(u8, bool)]) -> Condition {
    facts
        .iter()
        .fold(Condition::always(), |c, (atom, value)| c.require(AtomId(*atom), *value))
}

fn library() -> ActionLibrary {
    ActionLibrary::compile(vec![
        ActionDefinition::new("wander", cond(&[]), cond(&[(0, true)]), 1),
        ActionDefinition::new("reload", cond(&[(2, true), (1, false)]), cond(&[(1, true)]), 1),
        ActionDefinition::new("aim", cond(&[(70, true), (3, true)]), cond(&[(4, true)]), 2),
        ActionDefinition::new("hide", cond(&[(5, false)]), cond(&[(5, true)]), 3),
        ActionDefinition::new("shoot", cond(&[(1, true), (3, true)]), cond(&[(6, true)]), 1),
        ActionDefinition::new("melee", cond(&[(255, true)]), cond(&[(6, true)]), 4),
    ])
}

#[test]
fn every_action_lands_in_exactly_one_bucket() {
    let lib = library();
    for action in lib.ids() {
        let holding: Vec<usize> = (0..BUCKET_COUNT)
            .filter(|b| lib.index().bucket(*b).contains(&action))
            .collect();
        assert_eq!(holding.len(), 1, "{:?} in buckets {holding:?}", lib.name(action));
    }
    assert_eq!(lib.index().len(), lib.len());

    assert_eq!(lib.index().bucket_of(ActionId(0)), Some(ALWAYS_BUCKET));
    assert_eq!(lib.index().bucket_of(ActionId(1)), Some(2));
    assert_eq!(lib.index().bucket_of(ActionId(2)), Some(3));
    assert_eq!(lib.index().bucket_of(ActionId(3)), Some(ALWAYS_BUCKET));
    assert_eq!(lib.index().bucket_of(ActionId(4)), Some(1));
    assert_eq!(lib.index().bucket_of(ActionId(5)), Some(255));
}

#[test]
fn candidates_visit_always_bucket_then_true_atoms() {
    let lib = library();
    let state = WorldState::from_atoms([AtomId(1), AtomId(3), AtomId(255)]);

    let candidates: Vec<ActionId> = lib.candidates(&state).collect();
    assert_eq!(
        candidates,
        vec![ActionId(0), ActionId(3), ActionId(4), ActionId(2), ActionId(5)]
    );

    // `aim` needs atom 70 too, so the full precondition check rejects it.
    let applicable: Vec<ActionId> = lib.applicable(&state).collect();
    assert_eq!(
        applicable,
        vec![ActionId(0), ActionId(3), ActionId(4), ActionId(5)]
    );
}

#[test]
fn apply_post_and_lookup_helpers() {
    let lib = library();
    let reload = lib.find("reload").unwrap();
    let state = WorldState::from_atoms([AtomId(2)]);

    assert!(lib.is_applicable(reload, &state));
    let next = lib.apply_post(reload, &state);
    assert!(next.get_bit(AtomId(1)));
    assert!(!lib.is_applicable(reload, &next));

    assert_eq!(lib.cost(reload), Some(1));
    assert_eq!(lib.plan_cost(&[ActionId(0), ActionId(5)]), Some(5));
    assert_eq!(lib.plan_cost(&[ActionId(99)]), None);
    assert!(!lib.is_applicable(ActionId(99), &state));
    assert_eq!(lib.apply_post(ActionId(99), &state), state);
}

#[test]
fn compiling_twice_yields_identical_tables() {
    assert_eq!(library(), library());
}
