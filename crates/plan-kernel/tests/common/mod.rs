#![allow(dead_code)]

use plan_kernel::core::{EntityKey, IntKey, PlanningStrategy, SubmitMode, TagId};
use plan_kernel::{
    ActionConfig, BindingConfig, ConsiderationConfig, DomainConfig, GoalConfig, MethodConfig,
    OrderConfig, ProjectionConfig, ProjectionOpConfig, TaskConfig, UtilityGoalConfig, Vocabulary,
};

pub const K_HEALTH: IntKey = IntKey::new(1);
pub const K_AMMO: IntKey = IntKey::new(2);
pub const K_TARGET: EntityKey = EntityKey::new(10);
pub const K_ARMORY: EntityKey = EntityKey::new(11);

pub const TAG_MOVE: TagId = TagId(1);
pub const TAG_ATTACK: TagId = TagId(2);
pub const TAG_PICKUP: TagId = TagId(3);
pub const TAG_RETREAT: TagId = TagId(4);

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("debug")
        .try_init();
}

pub fn vocabulary() -> Vocabulary {
    Vocabulary::new()
        .with_tag("move", TAG_MOVE)
        .with_tag("attack", TAG_ATTACK)
        .with_tag("pickup", TAG_PICKUP)
        .with_tag("retreat", TAG_RETREAT)
        .with_int_key("health", K_HEALTH)
        .with_int_key("ammo", K_AMMO)
        .with_entity_key("target", K_TARGET)
        .with_entity_key("armory", K_ARMORY)
}

/// A soldier that either fights (GOAP) or looks after itself (HTN).
pub fn soldier() -> DomainConfig {
    let atoms = [
        "has_weapon",
        "enemy_visible",
        "enemy_dead",
        "at_armory",
        "low_health",
        "safe",
    ];

    DomainConfig {
        atoms: atoms.iter().map(|a| a.to_string()).collect(),
        projections: vec![
            ProjectionConfig {
                atom: "low_health".into(),
                op: ProjectionOpConfig::IntAtMost {
                    key: "health".into(),
                    value: 30,
                },
            },
            ProjectionConfig {
                atom: "enemy_visible".into(),
                op: ProjectionOpConfig::EntityPresent {
                    key: "target".into(),
                },
            },
        ],
        actions: vec![
            ActionConfig::new("go_to_armory", 2)
                .post("at_armory", true)
                .order(OrderConfig::new("move"))
                .binding(BindingConfig::EntityToTarget {
                    key: "armory".into(),
                }),
            ActionConfig::new("pick_up_weapon", 1)
                .pre("at_armory", true)
                .post("has_weapon", true)
                .order(OrderConfig::new("pickup")),
            ActionConfig::new("attack", 1)
                .pre("has_weapon", true)
                .pre("enemy_visible", true)
                .post("enemy_dead", true)
                .order(OrderConfig::new("attack"))
                .binding(BindingConfig::EntityToTarget {
                    key: "target".into(),
                })
                .binding(BindingConfig::IntToArg {
                    key: "ammo".into(),
                    slot: 0,
                }),
            ActionConfig::new("retreat", 1).post("safe", true).order(OrderConfig {
                tag: "retreat".into(),
                mode: SubmitMode::Append,
                player: 2,
            }),
        ],
        goals: vec![
            GoalConfig::new("kill_enemy").require("enemy_dead", true),
            GoalConfig::new("stay_safe").root_task("survive"),
        ],
        tasks: vec![
            TaskConfig::new("survive")
                .method(
                    MethodConfig::new("flee", 1)
                        .when("low_health", true)
                        .action("retreat"),
                )
                .method(MethodConfig::new("hold", 5).task("arm")),
            TaskConfig::new("arm").method(
                MethodConfig::new("armory", 1)
                    .action("go_to_armory")
                    .action("pick_up_weapon"),
            ),
        ],
        utility: vec![
            UtilityGoalConfig::new("kill_enemy", PlanningStrategy::Goap, 1.0).with(
                ConsiderationConfig::Atom {
                    atom: "enemy_visible".into(),
                    if_true: 2.0,
                    if_false: 0.0,
                },
            ),
            UtilityGoalConfig::new("stay_safe", PlanningStrategy::Htn, 1.0).with(
                ConsiderationConfig::Atom {
                    atom: "low_health".into(),
                    if_true: 3.0,
                    if_false: 0.5,
                },
            ),
        ],
        min_utility_score: 0.1,
    }
}
