use criterion::{black_box, criterion_group, criterion_main, Criterion};
use plan_core::{ActionId, Condition, WorldState};
use plan_htn::{HtnDomain, HtnPlanner, HtnPlannerConfig, MethodDefinition, TaskDefinition, TaskId};

fn build_domain(steps: usize) -> HtnDomain {
    let mut many_steps = MethodDefinition::new("many_steps", Condition::always(), 1);
    for _ in 0..steps {
        many_steps = many_steps.action(ActionId(0));
    }
    let root = TaskDefinition::new("root").method(many_steps);
    HtnDomain::compile(vec![root], 1).expect("domain")
}

fn bench_htn_planner(c: &mut Criterion) {
    let domain = build_domain(256);
    let mut planner = HtnPlanner::new(HtnPlannerConfig {
        max_plan_len: 256,
        ..HtnPlannerConfig::default()
    });

    c.bench_function("plan-htn/planner.plan(steps=256)", |b| {
        b.iter(|| {
            let plan = planner
                .plan(&domain, &WorldState::EMPTY, TaskId(0))
                .expect("plan");
            black_box(plan.len());
        })
    });
}

criterion_group!(benches, bench_htn_planner);
criterion_main!(benches);
