use plan_core::{ActionId, AtomId, CompileError, Condition, PlanError, PlanStatus, WorldState};
use plan_htn::{HtnDomain, HtnPlanner, HtnPlannerConfig, MethodDefinition, TaskDefinition, TaskId};

const HAS_MONEY: AtomId = AtomId(0);
const IS_NIGHT: AtomId = AtomId(1);
const HAS_BOW: AtomId = AtomId(2);

const TRAVEL_STORE: ActionId = ActionId(0);
const BUY_TOOL: ActionId = ActionId(1);
const STEAL_TOOL: ActionId = ActionId(2);
const CRAFT_TOOL: ActionId = ActionId(3);
const SHARPEN: ActionId = ActionId(4);
const TRACK: ActionId = ActionId(5);
const SHOOT: ActionId = ActionId(6);
const GATHER: ActionId = ActionId(7);
const ACTION_COUNT: usize = 8;

fn when(atom: AtomId) -> Condition {
    Condition::always().require(atom, true)
}

fn tool_domain() -> HtnDomain {
    let get_tool = TaskDefinition::new("get_tool")
        .method(MethodDefinition::new("steal", when(IS_NIGHT), 1).action(STEAL_TOOL))
        .method(
            MethodDefinition::new("buy", when(HAS_MONEY), 2)
                .action(TRAVEL_STORE)
                .action(BUY_TOOL),
        )
        .method(MethodDefinition::new("craft", Condition::always(), 5).action(CRAFT_TOOL));
    HtnDomain::compile(vec![get_tool], ACTION_COUNT).unwrap()
}

#[test]
fn cheapest_holding_method_is_chosen() {
    let domain = tool_domain();
    let mut planner = HtnPlanner::default();
    let root = domain.find_task("get_tool").unwrap();

    let plan = planner
        .plan(&domain, &WorldState::from_atoms([HAS_MONEY]), root)
        .unwrap();
    assert_eq!(plan, &[TRAVEL_STORE, BUY_TOOL], "steal fails, buy beats craft");

    let plan = planner.plan(&domain, &WorldState::EMPTY, root).unwrap();
    assert_eq!(plan, &[CRAFT_TOOL], "only craft holds");

    let plan = planner
        .plan(&domain, &WorldState::from_atoms([HAS_MONEY, IS_NIGHT]), root)
        .unwrap();
    assert_eq!(plan, &[STEAL_TOOL], "cheapest holding method wins");
}

#[test]
fn cost_ties_resolve_to_declaration_order() {
    let task = TaskDefinition::new("pick")
        .method(MethodDefinition::new("late", Condition::always(), 4).action(GATHER))
        .method(MethodDefinition::new("first", Condition::always(), 2).action(SHARPEN))
        .method(MethodDefinition::new("second", Condition::always(), 2).action(TRACK));
    let domain = HtnDomain::compile(vec![task], ACTION_COUNT).unwrap();

    let mut planner = HtnPlanner::default();
    let plan = planner.plan(&domain, &WorldState::EMPTY, TaskId(0)).unwrap();
    assert_eq!(plan, &[SHARPEN]);
}

#[test]
fn dead_end_rolls_back_emitted_actions() {
    let obtain_food = TaskDefinition::new("obtain_food")
        .method(
            MethodDefinition::new("hunt", Condition::always(), 1)
                .action(SHARPEN)
                .action(TRACK)
                .task(TaskId(1)),
        )
        .method(MethodDefinition::new("forage", Condition::always(), 3).action(GATHER));
    let kill = TaskDefinition::new("kill")
        .method(MethodDefinition::new("with_bow", when(HAS_BOW), 1).action(SHOOT));
    let domain = HtnDomain::compile(vec![obtain_food, kill], ACTION_COUNT).unwrap();

    let mut planner = HtnPlanner::default();
    let plan = planner.plan(&domain, &WorldState::EMPTY, TaskId(0)).unwrap();
    assert_eq!(plan, &[GATHER]);
    assert_eq!(planner.last_stats().backtracks, 1);

    let plan = planner
        .plan(&domain, &WorldState::from_atoms([HAS_BOW]), TaskId(0))
        .unwrap();
    assert_eq!(plan, &[SHARPEN, TRACK, SHOOT]);
    assert_eq!(planner.last_stats().backtracks, 0);
}

#[test]
fn failure_propagates_through_nested_tasks() {
    let root = TaskDefinition::new("root")
        .method(
            MethodDefinition::new("deep", Condition::always(), 1)
                .action(SHARPEN)
                .task(TaskId(1)),
        )
        .method(MethodDefinition::new("shallow", Condition::always(), 2).action(GATHER));
    let middle = TaskDefinition::new("middle").method(
        MethodDefinition::new("only", Condition::always(), 1)
            .action(TRACK)
            .task(TaskId(2)),
    );
    let dead = TaskDefinition::new("dead")
        .method(MethodDefinition::new("never", when(IS_NIGHT), 1).action(SHOOT));
    let domain = HtnDomain::compile(vec![root, middle, dead], ACTION_COUNT).unwrap();

    let mut planner = HtnPlanner::default();
    let plan = planner.plan(&domain, &WorldState::EMPTY, TaskId(0)).unwrap();
    assert_eq!(plan, &[GATHER]);
    assert_eq!(planner.last_stats().max_depth, 3);
}

#[test]
fn root_without_applicable_method_fails() {
    let domain = HtnDomain::compile(
        vec![TaskDefinition::new("night_only")
            .method(MethodDefinition::new("sneak", when(IS_NIGHT), 1).action(STEAL_TOOL))],
        ACTION_COUNT,
    )
    .unwrap();

    let mut planner = HtnPlanner::default();
    let err = planner
        .plan(&domain, &WorldState::EMPTY, TaskId(0))
        .unwrap_err();
    assert_eq!(err, PlanError::NoApplicableMethod { task: 0 });
    assert_eq!(err.status(), PlanStatus::NoSolution);
}

#[test]
fn method_without_subtasks_succeeds_with_empty_plan() {
    let domain = HtnDomain::compile(
        vec![TaskDefinition::new("idle").method(MethodDefinition::new(
            "nothing",
            Condition::always(),
            0,
        ))],
        ACTION_COUNT,
    )
    .unwrap();

    let mut planner = HtnPlanner::default();
    assert!(planner
        .plan(&domain, &WorldState::EMPTY, TaskId(0))
        .unwrap()
        .is_empty());
}

#[test]
fn recursion_hits_the_depth_limit() {
    let domain = HtnDomain::compile(
        vec![TaskDefinition::new("forever")
            .method(MethodDefinition::new("again", Condition::always(), 1).task(TaskId(0)))],
        ACTION_COUNT,
    )
    .unwrap();

    let mut planner = HtnPlanner::new(HtnPlannerConfig {
        max_depth: 8,
        ..HtnPlannerConfig::default()
    });
    let err = planner
        .plan(&domain, &WorldState::EMPTY, TaskId(0))
        .unwrap_err();
    assert_eq!(err, PlanError::StackOverflow { max_depth: 8 });
    assert_eq!(err.status(), PlanStatus::Exhausted);
}

#[test]
fn long_plans_report_output_exhaustion() {
    let mut method = MethodDefinition::new("many", Condition::always(), 1);
    for _ in 0..5 {
        method = method.action(GATHER);
    }
    let domain =
        HtnDomain::compile(vec![TaskDefinition::new("busy").method(method)], ACTION_COUNT)
            .unwrap();

    let mut planner = HtnPlanner::new(HtnPlannerConfig {
        max_plan_len: 3,
        ..HtnPlannerConfig::default()
    });
    let err = planner
        .plan(&domain, &WorldState::EMPTY, TaskId(0))
        .unwrap_err();
    assert_eq!(
        err,
        PlanError::OutputTooSmall {
            needed: 4,
            capacity: 3
        }
    );
}

#[test]
fn unknown_root_is_an_invalid_request() {
    let domain = tool_domain();
    let mut planner = HtnPlanner::default();
    let err = planner
        .plan(&domain, &WorldState::EMPTY, TaskId(9))
        .unwrap_err();
    assert_eq!(err, PlanError::UnknownTask { task: 9 });
    assert_eq!(err.status(), PlanStatus::InvalidRequest);
}

#[test]
fn compile_reports_every_bad_reference() {
    let broken = TaskDefinition::new("broken").method(
        MethodDefinition::new("m", Condition::always(), 1)
            .action(ActionId(40))
            .task(TaskId(7)),
    );
    let empty = TaskDefinition::new("empty");

    let errors = HtnDomain::compile(vec![broken, empty], ACTION_COUNT).unwrap_err();
    assert_eq!(errors.len(), 3);
    assert!(errors.iter().any(|e| matches!(
        e,
        CompileError::ActionOutOfRange { action: 40, len: ACTION_COUNT, .. }
    )));
    assert!(errors
        .iter()
        .any(|e| matches!(e, CompileError::TaskOutOfRange { task: 7, len: 2, .. })));
    assert!(errors
        .iter()
        .any(|e| matches!(e, CompileError::TaskWithoutMethods { task } if task == "empty")));
}
