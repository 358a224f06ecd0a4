use criterion::{black_box, criterion_group, criterion_main, Criterion};
use plan_core::{ActionDefinition, ActionLibrary, AtomId, Condition, WorldState};
use plan_goap::{GoapPlanner, GoapPlannerConfig};

fn toy_library(bits: u8) -> (ActionLibrary, Condition) {
    let mut actions = Vec::with_capacity(bits as usize);
    let mut goal = Condition::always();
    for i in 0..bits {
        let atom = AtomId(i);
        // Each switch needs the previous one, so the index has real buckets to walk.
        let pre = if i == 0 {
            Condition::always()
        } else {
            Condition::always().require(AtomId(i - 1), true)
        };
        actions.push(ActionDefinition::new(
            "set_bit",
            pre,
            Condition::always().require(atom, true),
            1,
        ));
        goal = goal.require(atom, true);
    }
    (ActionLibrary::compile(actions), goal)
}

fn bench_goap_planner(c: &mut Criterion) {
    let (library, goal) = toy_library(12);
    let mut planner = GoapPlanner::new(GoapPlannerConfig {
        max_nodes: 1 << 14,
        max_plan_len: 32,
    });

    c.bench_function("plan-goap/planner.plan(bits=12)", |b| {
        b.iter(|| {
            let plan = planner
                .plan(&library, WorldState::EMPTY, &goal, 1)
                .expect("plan");
            black_box(plan.len());
        })
    });
}

criterion_group!(benches, bench_goap_planner);
criterion_main!(benches);
