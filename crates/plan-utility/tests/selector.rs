use plan_core::{AtomId, Blackboard, GoalPresetId, IntKey, PlanningStrategy, WorldState};
use plan_utility::{
    Consideration, UtilityGoalDefinition, UtilitySelector, UtilitySelectorConfig,
};

const ENEMY_VISIBLE: AtomId = AtomId(0);
const LOW_HEALTH: AtomId = AtomId(1);
const K_HUNGER: IntKey = IntKey::new(7);

const ATTACK: GoalPresetId = GoalPresetId(0);
const FLEE: GoalPresetId = GoalPresetId(1);
const EAT: GoalPresetId = GoalPresetId(2);

#[test]
fn satisfied_true_score_outscores_equal_base_weight() {
    let selector = UtilitySelector::compile(vec![
        UtilityGoalDefinition::new(ATTACK, PlanningStrategy::Goap, 1.0)
            .with(Consideration::atom(ENEMY_VISIBLE, 2.0, 0.5)),
        UtilityGoalDefinition::new(FLEE, PlanningStrategy::Htn, 1.0)
            .with(Consideration::atom(LOW_HEALTH, 2.0, 0.5)),
    ]);

    let choice = selector
        .select(&WorldState::from_atoms([LOW_HEALTH]))
        .unwrap();
    assert_eq!(choice.goal, FLEE);
    assert_eq!(choice.strategy, PlanningStrategy::Htn);
    assert_eq!(choice.index, 1);
    assert_eq!(choice.score, 2.0);

    let choice = selector
        .select(&WorldState::from_atoms([ENEMY_VISIBLE]))
        .unwrap();
    assert_eq!(choice.goal, ATTACK);
}

#[test]
fn considerations_multiply() {
    let selector = UtilitySelector::compile(vec![UtilityGoalDefinition::new(
        ATTACK,
        PlanningStrategy::Goap,
        2.0,
    )
    .with(Consideration::atom(ENEMY_VISIBLE, 3.0, 1.0))
    .with(Consideration::atom(LOW_HEALTH, 0.25, 1.0))]);

    let state = WorldState::from_atoms([ENEMY_VISIBLE, LOW_HEALTH]);
    assert_eq!(selector.score(0, &state, &Blackboard::new()), Some(1.5));
    assert_eq!(selector.score(3, &state, &Blackboard::new()), None);
}

#[test]
fn ties_go_to_the_first_declared_goal() {
    let selector = UtilitySelector::compile(vec![
        UtilityGoalDefinition::new(EAT, PlanningStrategy::Goap, 1.0),
        UtilityGoalDefinition::new(ATTACK, PlanningStrategy::Goap, 1.0),
    ]);
    assert_eq!(selector.select(&WorldState::EMPTY).unwrap().goal, EAT);
}

#[test]
fn threshold_and_empty_selector_yield_no_goal() {
    let selector = UtilitySelector::compile(vec![UtilityGoalDefinition::new(
        ATTACK,
        PlanningStrategy::Goap,
        1.0,
    )
    .with(Consideration::atom(ENEMY_VISIBLE, 1.0, 0.1))])
    .with_config(UtilitySelectorConfig { min_score: 0.5 });

    assert!(selector.select(&WorldState::EMPTY).is_none());
    assert!(selector
        .select(&WorldState::from_atoms([ENEMY_VISIBLE]))
        .is_some());
    assert!(UtilitySelector::default().select(&WorldState::EMPTY).is_none());
}

#[test]
fn nan_scores_never_win() {
    let selector = UtilitySelector::compile(vec![
        UtilityGoalDefinition::new(ATTACK, PlanningStrategy::Goap, f32::NAN),
        UtilityGoalDefinition::new(FLEE, PlanningStrategy::Goap, 0.1),
    ]);
    assert_eq!(selector.select(&WorldState::EMPTY).unwrap().goal, FLEE);
}

#[test]
fn int_range_reads_the_blackboard() {
    let selector = UtilitySelector::compile(vec![
        UtilityGoalDefinition::new(EAT, PlanningStrategy::Goap, 1.0).with(
            Consideration::IntRange {
                key: K_HUNGER,
                min: 0,
                max: 100,
                low: 0.0,
                high: 2.0,
            },
        ),
        UtilityGoalDefinition::new(ATTACK, PlanningStrategy::Goap, 1.0),
    ]);

    let mut bb = Blackboard::new();
    bb.set(K_HUNGER, 75);
    let choice = selector.select_with(&WorldState::EMPTY, &bb).unwrap();
    assert_eq!(choice.goal, EAT);
    assert_eq!(choice.score, 1.5);

    bb.set(K_HUNGER, 400);
    assert_eq!(selector.score(0, &WorldState::EMPTY, &bb), Some(2.0));

    // Without blackboard input the range scores `low`.
    assert_eq!(selector.select(&WorldState::EMPTY).unwrap().goal, ATTACK);
}
