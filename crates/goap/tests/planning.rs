mod common;

use common::{wood_goal, woodcutter_actions, woodcutter_library, woodcutter_start};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use goap::{
    Action, ActionDef, ActionLibrary, BudgetLimit, Conditions, Cost, Effect, FactKey, FactValue,
    Goal, Memory, Plan, PlanFailureKind, Planner, PlannerConfig, SearchBudget, Solver,
    TargetedDef, WorldState, ZeroHeuristic,
};

fn planner() -> Planner {
    Planner::new(PlannerConfig::default())
}

#[test]
fn woodcutter_plan_has_cost_four_and_gets_wood() {
    let library = woodcutter_library();
    let plan = planner()
        .plan(&woodcutter_start(), &wood_goal(), &library, &SearchBudget::default())
        .unwrap();

    assert_eq!(plan.total_cost(), Cost::new(4));
    assert_eq!(
        plan.final_state().get("has_wood"),
        Some(&FactValue::Bool(true))
    );
    let ids: Vec<_> = plan.action_ids().map(|id| id.as_str()).collect();
    assert_eq!(ids, ["get_axe", "go_to_tree", "chop_tree"]);
}

#[test]
fn goal_requiring_unproduced_fact_is_unreachable() {
    let goal = Goal::new("eat", Conditions::new().and_eq("has_food", true));
    let err = planner()
        .plan(&woodcutter_start(), &goal, &woodcutter_library(), &SearchBudget::unbounded())
        .unwrap_err();
    assert_eq!(err.kind(), PlanFailureKind::Unreachable);
}

#[test]
fn zero_node_budget() {
    let budget = SearchBudget::unbounded().with_max_nodes(0);
    let library = woodcutter_library();

    let err = planner()
        .plan(&woodcutter_start(), &wood_goal(), &library, &budget)
        .unwrap_err();
    assert_eq!(err.kind(), PlanFailureKind::BudgetExceeded(BudgetLimit::Nodes));

    let done = woodcutter_start().with("has_wood", true);
    let plan = planner().plan(&done, &wood_goal(), &library, &budget).unwrap();
    assert!(plan.is_empty());
}

#[test]
fn plan_replays_and_costs_add_up() {
    let library = woodcutter_library();
    let start = woodcutter_start();
    let plan = planner()
        .plan(&start, &wood_goal(), &library, &SearchBudget::default())
        .unwrap();

    let end = plan.replay(&library).unwrap();
    assert!(wood_goal().is_satisfied_by(&end));

    let mut state = start;
    let mut total = Cost::ZERO;
    for step in plan.steps() {
        let action = library.lookup(step.action.as_str()).unwrap();
        assert!(action.is_applicable(&state));
        total += action.cost(&state);
        assert_eq!(step.cost, action.cost(&state));
        state = action.apply(&state);
        assert_eq!(state, step.expected_state);
    }
    assert_eq!(total, plan.total_cost());
}

#[test]
fn repeated_calls_are_identical() {
    let library = woodcutter_library();
    let first = planner()
        .plan(&woodcutter_start(), &wood_goal(), &library, &SearchBudget::default())
        .unwrap();
    for _ in 0..5 {
        let again = planner()
            .plan(&woodcutter_start(), &wood_goal(), &library, &SearchBudget::default())
            .unwrap();
        assert_eq!(again.steps(), first.steps());
        assert_eq!(again.stats().expanded, first.stats().expanded);
    }
}

#[test]
fn library_order_does_not_change_cost() {
    let baseline = planner()
        .plan(
            &woodcutter_start(),
            &wood_goal(),
            &woodcutter_library(),
            &SearchBudget::default(),
        )
        .unwrap();

    let mut actions = woodcutter_actions();
    for _ in 0..actions.len() {
        actions.rotate_left(1);
        let library = ActionLibrary::from_actions(actions.clone()).unwrap();
        let plan = planner()
            .plan(&woodcutter_start(), &wood_goal(), &library, &SearchBudget::default())
            .unwrap();
        assert_eq!(plan.total_cost(), baseline.total_cost());
    }

    actions.reverse();
    let library = ActionLibrary::from_actions(actions).unwrap();
    let plan = planner()
        .plan(&woodcutter_start(), &wood_goal(), &library, &SearchBudget::default())
        .unwrap();
    assert_eq!(plan.total_cost(), baseline.total_cost());
}

/// A crafting domain with several competing routes.
fn crafting_library() -> ActionLibrary {
    ActionLibrary::from_actions([
        ActionDef::new("buy_tools")
            .requires_eq("has_gold", true)
            .effect(Effect::remove("has_gold"))
            .sets("has_tools", true)
            .cost(Cost::new(4)),
        ActionDef::new("forge_tools")
            .requires_eq("has_ore", true)
            .sets("has_tools", true)
            .cost(Cost::new(2)),
        ActionDef::new("mine_ore").sets("has_ore", true).cost(Cost::new(3)),
        ActionDef::new("sell_ore")
            .requires_eq("has_ore", true)
            .effect(Effect::remove("has_ore"))
            .sets("has_gold", true)
            .cost(Cost::new(1)),
        ActionDef::new("craft_boat")
            .requires_eq("has_tools", true)
            .requires_eq("has_planks", true)
            .sets("has_boat", true)
            .cost(Cost::new(5)),
        ActionDef::new("saw_planks")
            .requires_eq("has_tools", true)
            .sets("has_planks", true)
            .cost(Cost::new(2)),
        ActionDef::new("buy_planks")
            .requires_eq("has_gold", true)
            .effect(Effect::remove("has_gold"))
            .sets("has_planks", true)
            .cost(Cost::new(1)),
    ])
    .unwrap()
}

fn brute_force(
    library: &ActionLibrary,
    state: &WorldState,
    goal: &Goal,
    depth: usize,
) -> Option<Cost> {
    if goal.is_satisfied_by(state) {
        return Some(Cost::ZERO);
    }
    if depth == 0 {
        return None;
    }
    library
        .iter()
        .filter(|action| action.is_applicable(state))
        .filter_map(|action| {
            let rest = brute_force(library, &action.apply(state), goal, depth - 1)?;
            Some(action.cost(state) + rest)
        })
        .min()
}

#[test]
fn planner_matches_brute_force_optimum() {
    let library = crafting_library();
    let starts = [
        WorldState::new(),
        WorldState::from_facts([("has_gold", true)]),
        WorldState::from_facts([("has_ore", true)]),
        WorldState::from_facts([("has_tools", true)]),
    ];
    let goals = [
        Goal::new("boat", Conditions::new().and_eq("has_boat", true)),
        Goal::new("kit", Conditions::new().and_eq("has_tools", true).and_eq("has_planks", true)),
    ];

    for start in &starts {
        for goal in &goals {
            let expected = brute_force(&library, start, goal, 6);
            for result in [
                planner().plan(start, goal, &library, &SearchBudget::unbounded()),
                Planner::with_heuristic(PlannerConfig::default(), ZeroHeuristic).plan(
                    start,
                    goal,
                    &library,
                    &SearchBudget::unbounded(),
                ),
            ] {
                let actual = result.ok().map(|plan| plan.total_cost());
                assert_eq!(actual, expected, "start {start}, goal {goal}");
            }
        }
    }
}

#[test]
fn dynamic_costs_steer_route_choice() {
    // Walking cost grows with distance; the cart is flat-priced.
    let library = ActionLibrary::from_actions([
        ActionDef::new("walk")
            .sets("at_market", true)
            .cost_fn(Cost::ONE, |state| {
                let distance = state
                    .get("distance")
                    .and_then(FactValue::as_int)
                    .unwrap_or(0);
                Cost::new(distance.unsigned_abs())
            }),
        ActionDef::new("take_cart")
            .sets("at_market", true)
            .cost(Cost::new(5)),
    ])
    .unwrap();
    let goal = Goal::new("market", Conditions::new().and_eq("at_market", true));

    let near = WorldState::from_facts([("distance", 2)]);
    let plan = planner()
        .plan(&near, &goal, &library, &SearchBudget::default())
        .unwrap();
    assert_eq!(plan.steps()[0].action, "walk");
    assert_eq!(plan.total_cost(), Cost::new(2));

    let far = WorldState::from_facts([("distance", 9)]);
    let plan = planner()
        .plan(&far, &goal, &library, &SearchBudget::default())
        .unwrap();
    assert_eq!(plan.steps()[0].action, "take_cart");
    assert_eq!(plan.total_cost(), Cost::new(5));

    let here = WorldState::from_facts([("distance", 0)]);
    let plan = planner()
        .plan(&here, &goal, &library, &SearchBudget::default())
        .unwrap();
    assert_eq!(plan.total_cost(), Cost::ONE);
}

#[test]
fn integer_facts_and_ordering_goals() {
    let library = ActionLibrary::from_actions([
        ActionDef::new("chop_log").effect(Effect::add("logs", 1)).cost(Cost::new(2)),
        ActionDef::new("haul_stack").effect(Effect::add("logs", 3)).cost(Cost::new(5)),
    ])
    .unwrap();
    let goal = Goal::new(
        "stockpile",
        Conditions::new().and(goap::Condition::at_least("logs", 4)),
    );

    let plan = planner()
        .plan(&WorldState::new(), &goal, &library, &SearchBudget::default())
        .unwrap();
    // one haul + one chop (7) beats four chops (8)
    assert_eq!(plan.total_cost(), Cost::new(7));
    assert_eq!(plan.len(), 2);
}

#[test]
fn depth_budget_is_distinguished_from_unreachable() {
    let budget = SearchBudget::unbounded().with_max_depth(1);
    let err = planner()
        .plan(&woodcutter_start(), &wood_goal(), &woodcutter_library(), &budget)
        .unwrap_err();
    assert_eq!(err.kind(), PlanFailureKind::BudgetExceeded(BudgetLimit::Depth));
}

#[test]
fn planning_leaves_inputs_untouched() {
    let library = woodcutter_library();
    let start = woodcutter_start();
    let snapshot = start.clone();
    planner()
        .plan(&start, &wood_goal(), &library, &SearchBudget::default())
        .unwrap();
    assert_eq!(start, snapshot);
    assert_eq!(library.len(), 3);
}

fn backward() -> Planner {
    Planner::new(PlannerConfig {
        solver: Solver::Backward,
        ..PlannerConfig::default()
    })
}

#[test]
fn depth_limit_still_finds_shallow_plan() {
    let library = ActionLibrary::from_actions([
        ActionDef::new("direct").sets("x", true).cost(Cost::new(10)),
        ActionDef::new("s1").sets("y", true),
        ActionDef::new("s2")
            .requires_eq("y", true)
            .effect(Effect::remove("y"))
            .sets("x", true),
        ActionDef::new("finish").requires_eq("x", true).sets("c", true),
    ])
    .unwrap();
    let goal = Goal::new("c", Conditions::new().and_eq("c", true));
    let budget = SearchBudget::unbounded().with_max_depth(2);

    for planner in [planner(), backward()] {
        let plan = planner
            .plan(&WorldState::new(), &goal, &library, &budget)
            .unwrap();
        let ids: Vec<&str> = plan.action_ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, ["direct", "finish"]);
        assert_eq!(plan.total_cost(), Cost::new(11));
    }
}

#[test]
fn zero_time_limit_reports_time_budget() {
    let budget = SearchBudget::unbounded().with_time_limit(Duration::ZERO);
    let err = planner()
        .plan(&woodcutter_start(), &wood_goal(), &woodcutter_library(), &budget)
        .unwrap_err();
    assert_eq!(err.kind(), PlanFailureKind::BudgetExceeded(BudgetLimit::Time));
}

#[test]
fn satisfied_start_plans_nothing_even_with_zero_time() {
    let budget = SearchBudget::unbounded().with_time_limit(Duration::ZERO);
    let start = woodcutter_start().with("has_wood", true);
    let plan = planner()
        .plan(&start, &wood_goal(), &woodcutter_library(), &budget)
        .unwrap();
    assert!(plan.is_empty());
    assert_eq!(plan.total_cost(), Cost::ZERO);
    assert_eq!(plan.final_state(), &start);
}

#[test]
fn threads_share_one_library() {
    let library = Arc::new(woodcutter_library());
    let expected = planner()
        .plan(&woodcutter_start(), &wood_goal(), &library, &SearchBudget::default())
        .unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let library = Arc::clone(&library);
            thread::spawn(move || {
                planner()
                    .plan(&woodcutter_start(), &wood_goal(), &library, &SearchBudget::default())
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        let plan: Plan = handle.join().unwrap();
        assert_eq!(plan.steps(), expected.steps());
        assert_eq!(plan.total_cost(), expected.total_cost());
    }
}

#[test]
fn planning_types_cross_threads() {
    fn shareable<T: Send + Sync>() {}
    shareable::<ActionLibrary>();
    shareable::<WorldState>();
    shareable::<Goal>();
    shareable::<Plan>();
    shareable::<Memory>();
    shareable::<Planner>();
}

#[test]
fn backward_solver_agrees_with_forward_on_woodcutter() {
    let library = woodcutter_library();
    let forward = planner()
        .plan(&woodcutter_start(), &wood_goal(), &library, &SearchBudget::default())
        .unwrap();
    let regressed = backward()
        .plan(&woodcutter_start(), &wood_goal(), &library, &SearchBudget::default())
        .unwrap();

    assert_eq!(regressed.total_cost(), forward.total_cost());
    assert_eq!(regressed.replay(&library).unwrap(), *regressed.final_state());
    assert!(wood_goal().is_satisfied_by(regressed.final_state()));
}

#[test]
fn backward_solver_reports_unreachable_goal() {
    let goal = Goal::new("feast", Conditions::new().and_eq("has_food", true));
    let err = backward()
        .plan(&woodcutter_start(), &goal, &woodcutter_library(), &SearchBudget::unbounded())
        .unwrap_err();
    assert_eq!(err.kind(), PlanFailureKind::Unreachable);
}

fn courier_library() -> ActionLibrary {
    let mut library = ActionLibrary::from_actions([ActionDef::new("rest").sets("rested", true)])
        .unwrap();
    library
        .register(TargetedDef::new("deliver", |town: &FactKey| {
            Some(
                ActionDef::new("deliver")
                    .requires_eq("rested", true)
                    .sets(format!("served_{town}"), true)
                    .cost(Cost::new(if town.as_str() == "far" { 5 } else { 1 })),
            )
        }))
        .unwrap();
    library
}

#[test]
fn targeted_steps_record_their_target() {
    let library = courier_library();
    let goal = Goal::new(
        "serve",
        Conditions::new().and_eq("served_near", true).and_eq("served_far", true),
    );
    let memory = Memory::from_targets(["near", "far"]);

    for planner in [planner(), backward()] {
        let plan = planner
            .plan_with_memory(&WorldState::new(), &goal, &library, &memory, &SearchBudget::default())
            .unwrap();
        assert_eq!(plan.total_cost(), Cost::new(7));
        let targets: Vec<Option<&str>> = plan
            .steps()
            .iter()
            .map(|step| step.target.as_ref().map(FactKey::as_str))
            .collect();
        assert_eq!(targets.len(), 3);
        assert_eq!(targets[0], None);
        assert!(targets.contains(&Some("near")) && targets.contains(&Some("far")));
        assert_eq!(plan.replay(&library).unwrap(), *plan.final_state());
    }

    let err = planner()
        .plan(&WorldState::new(), &goal, &library, &SearchBudget::default())
        .unwrap_err();
    assert_eq!(err.kind(), PlanFailureKind::Unreachable);
}
