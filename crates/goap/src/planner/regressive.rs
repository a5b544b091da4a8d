//! Regressive (goal-to-start) A* search.
//!
//! Nodes hold the conditions still to be met. Regressing a condition set
//! through an action keeps what the action leaves alone, drops what it
//! achieves and adds its preconditions. A node whose conditions already
//! hold in the start state is replayed forward before it is accepted, so a
//! returned plan is always executable.
//!
//! Integer conditions are shifted back through `Add` effects on the
//! assumption that the fact exists in the start state; a fact the start
//! state lacks can make a regression miss a plan but never yield a wrong
//! one.

use std::time::Instant;

use super::budget::SearchBudget;
use super::candidates::Candidates;
use super::error::PlanFailure;
use super::frontier::OpenSet;
use super::heuristic::Heuristic;
use super::node::{FrontierKey, NodeArena, NodeId, Offer, Reached, SearchNode};
use super::plan::{Plan, PlanStep, SearchStats};
use super::search::{Planner, exceeded, exhausted, finish, limit_hit};
use crate::action::{ActionSchema, Cost, Effect, NetWrite};
use crate::goal::Goal;
use crate::state::{Comparison, Condition, Conditions, FactValue, WorldState};

impl<H: Heuristic> Planner<H> {
    pub(super) fn search_backward(
        &self,
        start: &WorldState,
        goal: &Goal,
        candidates: &Candidates,
        budget: &SearchBudget,
        started: Instant,
    ) -> Result<Plan, PlanFailure> {
        let bounds = self.bounds(candidates);
        let estimate = |pending: &Conditions| {
            self.heuristic()
                .estimate(start, &Goal::new(goal.name(), pending.clone()), &bounds)
        };
        let mut arena: NodeArena<Conditions> = NodeArena::default();
        let mut open = OpenSet::default();
        let mut reached = Reached::new(budget.max_depth.is_some());
        let mut stats = SearchStats::default();
        let mut depth_pruned = false;

        let target = goal.conditions().normalized();
        let root = SearchNode::root(target.clone(), estimate(&target));
        let root_f = root.f();
        let root_id = arena.push(root);
        reached.offer(target, Cost::ZERO, 0);
        open.push(FrontierKey::new(root_f, root_id));
        stats.generated = 1;

        while let Some(id) = open.pop() {
            let node = arena.get(id);
            if reached.is_stale(&node.state, node.g, node.depth) {
                stats.stale += 1;
                continue;
            }

            if node.state.is_satisfied_by(start) {
                match self.replay(&arena, id, candidates, start, goal) {
                    Some(steps) => {
                        return Ok(Plan::new(
                            start.clone(),
                            steps,
                            finish(stats, &open, started),
                        ));
                    }
                    None => {
                        tracing::trace!("regression {} does not replay", node.state);
                        stats.rejected += 1;
                    }
                }
            }

            if let Some(limit) = limit_hit(budget, &stats, started) {
                return Err(exceeded(limit, stats, &open, started));
            }
            if let Some(max_depth) = budget.max_depth
                && node.depth >= max_depth
            {
                depth_pruned = true;
                continue;
            }

            stats.expanded += 1;
            let pending = node.state.clone();
            let (g, depth) = (node.g, node.depth);
            tracing::trace!("regressing {} g={} depth={}", pending, g, depth);

            for (index, action) in candidates.iter().enumerate() {
                let Some(schema) = action.schema() else {
                    continue;
                };
                let Some(earlier) = regress(&pending, schema) else {
                    continue;
                };
                let step_cost = if self.config().unit_action_costs {
                    Cost::ONE
                } else {
                    action.cost_floor()
                };
                let child_g = g + step_cost;
                stats.generated += 1;

                match reached.offer(earlier.clone(), child_g, depth + 1) {
                    Offer::Dominated => {
                        stats.duplicates += 1;
                        continue;
                    }
                    Offer::Improved => stats.reopened += 1,
                    Offer::New => {}
                }

                let h = estimate(&earlier);
                let child = SearchNode {
                    state: earlier,
                    g: child_g,
                    h,
                    step_cost,
                    parent: Some(id),
                    action: Some(index),
                    depth: depth + 1,
                };
                let f = child.f();
                let child_id = arena.push(child);
                open.push(FrontierKey::new(f, child_id));
                tracing::trace!("  via {} g={} h={}", action.id(), child_g, h);
            }
        }

        tracing::trace!("regression exhausted after {} nodes", arena.len());
        Err(exhausted(depth_pruned, finish(stats, &open, started)))
    }

    /// Executes the chain ending at `leaf` from `start`.
    ///
    /// The leaf was regressed last, so walking toward the root visits the
    /// actions in execution order.
    fn replay(
        &self,
        arena: &NodeArena<Conditions>,
        leaf: NodeId,
        candidates: &Candidates,
        start: &WorldState,
        goal: &Goal,
    ) -> Option<Vec<PlanStep>> {
        let mut state = start.clone();
        let mut steps = Vec::new();
        for id in arena.ancestry(leaf) {
            let Some(index) = arena.get(id).action else {
                continue;
            };
            let action = candidates.get(index)?;
            if !action.is_applicable(&state) {
                return None;
            }
            let cost = self.step_cost(action.as_ref(), &state);
            state = action.apply(&state);
            steps.push(PlanStep {
                action: action.id().clone(),
                target: action.target().cloned(),
                cost,
                expected_state: state.clone(),
            });
        }
        goal.is_satisfied_by(&state).then_some(steps)
    }
}

/// Conditions that must hold before `schema` runs for `pending` to hold
/// after it.
///
/// Returns `None` when the action achieves none of `pending`, breaks one
/// of them, or demands contradictory conditions.
fn regress(pending: &Conditions, schema: ActionSchema<'_>) -> Option<Conditions> {
    let mut helps = false;
    let mut earlier = Conditions::new();

    for condition in pending {
        match Effect::net_write(schema.effects, &condition.key) {
            NetWrite::Untouched | NetWrite::Offset(0) => earlier.push(condition.clone()),
            NetWrite::Assign(value) => {
                if !condition.holds_for(value.as_ref()) {
                    return None;
                }
                helps = true;
            }
            NetWrite::Offset(delta) => {
                let (shifted, advances) = shift(condition, delta)?;
                helps |= advances;
                earlier.push(shifted);
            }
        }
    }
    if !helps {
        return None;
    }

    for precondition in schema.preconditions {
        earlier.push(precondition.clone());
    }
    let earlier = earlier.normalized();
    earlier.validate().ok()?;
    Some(earlier)
}

/// Moves an integer condition back across an `Add` of `delta`.
///
/// The flag tells whether the addition brings the fact closer to the
/// condition.
fn shift(condition: &Condition, delta: i64) -> Option<(Condition, bool)> {
    let Some(operand) = condition.value.as_int() else {
        return Some((condition.clone(), false));
    };
    let advances = match condition.comparison {
        Comparison::AtLeast => delta > 0,
        Comparison::AtMost => delta < 0,
        Comparison::Eq | Comparison::NotEq => true,
    };
    let shifted = Condition {
        value: FactValue::Int(operand.checked_sub(delta)?),
        ..condition.clone()
    };
    Some((shifted, advances))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Action, ActionDef, TargetedDef};
    use crate::config::{PlannerConfig, Solver};
    use crate::library::ActionLibrary;
    use crate::memory::Memory;
    use crate::planner::{BudgetLimit, PlanFailureKind};
    use crate::state::FactKey;

    fn backward() -> Planner {
        Planner::new(PlannerConfig {
            solver: Solver::Backward,
            ..PlannerConfig::default()
        })
    }

    fn regress_through(pending: &Conditions, def: &ActionDef) -> Option<Conditions> {
        regress(pending, def.schema().unwrap())
    }

    #[test]
    fn regress_swaps_achieved_goal_for_preconditions() {
        let chop = ActionDef::new("chop")
            .requires_eq("has_axe", true)
            .sets("has_wood", true);
        let pending = Conditions::new()
            .and_eq("has_wood", true)
            .and_eq("warm", true);

        let earlier = regress_through(&pending, &chop).unwrap();
        assert_eq!(
            earlier,
            Conditions::new()
                .and_eq("has_axe", true)
                .and_eq("warm", true)
                .normalized()
        );
    }

    #[test]
    fn regress_skips_unrelated_and_conflicting_actions() {
        let pending = Conditions::new().and_eq("has_wood", true);
        let idle = ActionDef::new("idle").sets("rested", true);
        let burn = ActionDef::new("burn").sets("has_wood", false);
        let stray = ActionDef::new("stray")
            .requires_eq("near_tree", false)
            .sets("has_wood", true);
        let at_tree = Conditions::new()
            .and_eq("has_wood", true)
            .and_eq("near_tree", true);

        assert_eq!(regress_through(&pending, &idle), None);
        assert_eq!(regress_through(&pending, &burn), None);
        assert_eq!(regress_through(&at_tree, &stray), None);
    }

    #[test]
    fn regress_shifts_integer_thresholds() {
        let gather = ActionDef::new("gather").effect(Effect::add("wood", 2));
        let pending = Conditions::new().and(Condition::at_least("wood", 5));

        let earlier = regress_through(&pending, &gather).unwrap();
        assert_eq!(earlier, Conditions::new().and(Condition::at_least("wood", 3)));

        let spend = ActionDef::new("spend").effect(Effect::add("wood", -1));
        assert_eq!(regress_through(&pending, &spend), None);
    }

    #[test]
    fn backward_woodcutter_matches_forward_cost() {
        let library = ActionLibrary::from_actions([
            ActionDef::new("get_axe")
                .requires_eq("has_axe", false)
                .sets("has_axe", true),
            ActionDef::new("go_to_tree").sets("near_tree", true),
            ActionDef::new("chop_tree")
                .requires_eq("near_tree", true)
                .requires_eq("has_axe", true)
                .sets("has_wood", true)
                .cost(Cost::new(2)),
        ])
        .unwrap();
        let start = WorldState::from_facts([("has_axe", false), ("near_tree", false)]);
        let goal = Goal::new("wood", Conditions::new().and_eq("has_wood", true));

        let plan = backward()
            .plan(&start, &goal, &library, &SearchBudget::default())
            .unwrap();
        assert_eq!(plan.total_cost(), Cost::new(4));
        assert_eq!(plan.steps().last().unwrap().action, "chop_tree");
        assert_eq!(plan.replay(&library).unwrap(), *plan.final_state());
    }

    #[test]
    fn backward_counts_up_to_threshold() {
        let library = ActionLibrary::from_actions([
            ActionDef::new("gather").effect(Effect::add("wood", 1)),
        ])
        .unwrap();
        let start = WorldState::from_facts([("wood", 0)]);
        let goal = Goal::new("stock", Conditions::new().and(Condition::at_least("wood", 3)));

        let plan = backward()
            .plan(&start, &goal, &library, &SearchBudget::default())
            .unwrap();
        assert_eq!(plan.len(), 3);
        assert_eq!(plan.final_state().get("wood"), Some(&FactValue::Int(3)));
    }

    #[test]
    fn backward_binds_targets_from_memory() {
        let mut library = ActionLibrary::new();
        library
            .register(TargetedDef::new("fetch", |item: &FactKey| {
                Some(ActionDef::new("fetch").sets(format!("has_{item}"), true))
            }))
            .unwrap();
        let goal = Goal::new("fed", Conditions::new().and_eq("has_bread", true));
        let memory = Memory::from_targets(["water", "bread"]);

        let plan = backward()
            .plan_with_memory(
                &WorldState::new(),
                &goal,
                &library,
                &memory,
                &SearchBudget::default(),
            )
            .unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.steps()[0].target.as_ref().map(FactKey::as_str), Some("bread"));
    }

    #[test]
    fn backward_reports_depth_budget() {
        let library = ActionLibrary::from_actions([
            ActionDef::new("a").sets("a", true),
            ActionDef::new("b").requires_eq("a", true).sets("b", true),
        ])
        .unwrap();
        let goal = Goal::new("b", Conditions::new().and_eq("b", true));
        let err = backward()
            .plan(
                &WorldState::new(),
                &goal,
                &library,
                &SearchBudget::unbounded().with_max_depth(1),
            )
            .unwrap_err();
        assert_eq!(err.kind(), PlanFailureKind::BudgetExceeded(BudgetLimit::Depth));
    }
}
