//! Best-first (A*) search over world states.

use std::time::Instant;

use super::budget::{BudgetLimit, SearchBudget};
use super::candidates::Candidates;
use super::error::PlanFailure;
use super::frontier::OpenSet;
use super::heuristic::{ActionBounds, FactDeficit, Heuristic};
use super::node::{FrontierKey, NodeArena, NodeId, Offer, Reached, SearchNode};
use super::plan::{Plan, PlanStep, SearchStats};
use crate::action::{Action, Cost};
use crate::config::{PlannerConfig, Solver};
use crate::goal::Goal;
use crate::library::ActionLibrary;
use crate::memory::Memory;
use crate::state::WorldState;

/// Computes minimum-cost plans.
///
/// A planner holds no per-search state: every call allocates its own arena
/// and open set and drops them on return, so one planner can serve many
/// agents.
///
/// # Search
///
/// - Children are enumerated in library registration order; targeted
///   actions are bound to each remembered target in memory order.
/// - The open set is ordered by `f = g + h`; equal `f` pops the node
///   discovered first.
/// - A state reached again at equal or higher cost is dropped; a strictly
///   cheaper path re-opens it. Under a depth limit a shallower path is kept
///   too, since the cheaper one may be too deep to finish.
/// - The goal test runs when a node is popped, so the returned plan is
///   optimal whenever the heuristic is admissible.
///
/// [`Solver::Backward`] runs the same loop over goal regressions instead;
/// see [`PlannerConfig::solver`].
#[derive(Clone, Debug, Default)]
pub struct Planner<H = FactDeficit> {
    config: PlannerConfig,
    heuristic: H,
}

impl Planner<FactDeficit> {
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            config,
            heuristic: FactDeficit,
        }
    }
}

impl<H: Heuristic> Planner<H> {
    pub fn with_heuristic(config: PlannerConfig, heuristic: H) -> Self {
        Self { config, heuristic }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn heuristic(&self) -> &H {
        &self.heuristic
    }

    /// Plans with the configured default budget.
    pub fn plan_default(
        &self,
        start: &WorldState,
        goal: &Goal,
        library: &ActionLibrary,
    ) -> Result<Plan, PlanFailure> {
        self.plan(start, goal, library, &self.config.budget)
    }

    /// Searches for the cheapest action sequence from `start` to a state
    /// satisfying `goal`.
    ///
    /// Targeted actions take no part; use
    /// [`plan_with_memory`](Self::plan_with_memory) to bind them.
    pub fn plan(
        &self,
        start: &WorldState,
        goal: &Goal,
        library: &ActionLibrary,
        budget: &SearchBudget,
    ) -> Result<Plan, PlanFailure> {
        self.plan_with_memory(start, goal, library, &Memory::new(), budget)
    }

    /// Same as [`plan`](Self::plan), with targeted actions bound to every
    /// target in `memory`.
    pub fn plan_with_memory(
        &self,
        start: &WorldState,
        goal: &Goal,
        library: &ActionLibrary,
        memory: &Memory,
        budget: &SearchBudget,
    ) -> Result<Plan, PlanFailure> {
        let started = Instant::now();
        let candidates = Candidates::bind(library, memory);
        tracing::debug!(
            "planning toward {} from {} with {} actions ({} solver)",
            goal.name(),
            start,
            candidates.len(),
            self.config.solver
        );

        let result = match self.config.solver {
            Solver::Forward => self.search_forward(start, goal, &candidates, budget, started),
            Solver::Backward => self.search_backward(start, goal, &candidates, budget, started),
        };
        match &result {
            Ok(plan) => tracing::debug!(
                "plan for {} found: {} [{}]",
                goal.name(),
                plan,
                plan.stats()
            ),
            Err(failure) => tracing::debug!("planning for {} failed: {}", goal.name(), failure),
        }
        result
    }

    pub(super) fn bounds(&self, candidates: &Candidates) -> ActionBounds {
        let bounds = candidates.bounds();
        if self.config.unit_action_costs && !candidates.is_empty() {
            bounds.with_floor(Cost::ONE)
        } else {
            bounds
        }
    }

    pub(super) fn step_cost(&self, action: &dyn Action, state: &WorldState) -> Cost {
        if self.config.unit_action_costs {
            Cost::ONE
        } else {
            action.cost(state)
        }
    }

    fn search_forward(
        &self,
        start: &WorldState,
        goal: &Goal,
        candidates: &Candidates,
        budget: &SearchBudget,
        started: Instant,
    ) -> Result<Plan, PlanFailure> {
        let bounds = self.bounds(candidates);
        let mut arena = NodeArena::default();
        let mut open = OpenSet::default();
        let mut reached = Reached::new(budget.max_depth.is_some());
        let mut stats = SearchStats::default();
        let mut depth_pruned = false;

        let root = SearchNode::root(
            start.clone(),
            self.heuristic.estimate(start, goal, &bounds),
        );
        let root_f = root.f();
        let root_id = arena.push(root);
        reached.offer(start.clone(), Cost::ZERO, 0);
        open.push(FrontierKey::new(root_f, root_id));
        stats.generated = 1;

        while let Some(id) = open.pop() {
            let node = arena.get(id);
            if reached.is_stale(&node.state, node.g, node.depth) {
                stats.stale += 1;
                continue;
            }

            if goal.is_satisfied_by(&node.state) {
                return Ok(reconstruct(&arena, id, candidates, start, finish(stats, &open, started)));
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
            let state = node.state.clone();
            let (g, depth) = (node.g, node.depth);
            tracing::trace!(
                "expanding {} g={} depth={} open={}",
                state,
                g,
                depth,
                open.len()
            );

            for (index, action) in candidates.iter().enumerate() {
                if !action.is_applicable(&state) {
                    continue;
                }
                let step_cost = self.step_cost(action.as_ref(), &state);
                let child = action.apply(&state);
                let child_g = g + step_cost;
                stats.generated += 1;

                match reached.offer(child.clone(), child_g, depth + 1) {
                    Offer::Dominated => {
                        stats.duplicates += 1;
                        continue;
                    }
                    Offer::Improved => stats.reopened += 1,
                    Offer::New => {}
                }

                let h = self.heuristic.estimate(&child, goal, &bounds);
                let child_node = SearchNode {
                    state: child,
                    g: child_g,
                    h,
                    step_cost,
                    parent: Some(id),
                    action: Some(index),
                    depth: depth + 1,
                };
                let f = child_node.f();
                let child_id = arena.push(child_node);
                open.push(FrontierKey::new(f, child_id));
                tracing::trace!("  via {} g={} h={}", action.id(), child_g, h);
            }
        }

        tracing::trace!("open set exhausted after {} nodes", arena.len());
        Err(exhausted(depth_pruned, finish(stats, &open, started)))
    }
}

/// Node or time limit reached before the next expansion.
pub(super) fn limit_hit(
    budget: &SearchBudget,
    stats: &SearchStats,
    started: Instant,
) -> Option<BudgetLimit> {
    if budget.max_nodes.is_some_and(|max_nodes| stats.expanded >= max_nodes) {
        return Some(BudgetLimit::Nodes);
    }
    if budget
        .time_limit
        .is_some_and(|time_limit| started.elapsed() >= time_limit)
    {
        return Some(BudgetLimit::Time);
    }
    None
}

pub(super) fn finish(mut stats: SearchStats, open: &OpenSet, started: Instant) -> SearchStats {
    stats.frontier_high_water = open.high_water();
    stats.elapsed = started.elapsed();
    stats
}

pub(super) fn exceeded(
    limit: BudgetLimit,
    stats: SearchStats,
    open: &OpenSet,
    started: Instant,
) -> PlanFailure {
    PlanFailure::BudgetExceeded {
        limit,
        stats: finish(stats, open, started),
    }
}

/// Failure for an emptied open set; depth pruning makes it a budget failure.
pub(super) fn exhausted(depth_pruned: bool, stats: SearchStats) -> PlanFailure {
    if depth_pruned {
        PlanFailure::BudgetExceeded {
            limit: BudgetLimit::Depth,
            stats,
        }
    } else {
        PlanFailure::Unreachable { stats }
    }
}

fn reconstruct(
    arena: &NodeArena,
    goal_id: NodeId,
    candidates: &Candidates,
    start: &WorldState,
    stats: SearchStats,
) -> Plan {
    let mut steps: Vec<PlanStep> = arena
        .ancestry(goal_id)
        .filter_map(|id| {
            let node = arena.get(id);
            let action = candidates.get(node.action?)?;
            Some(PlanStep {
                action: action.id().clone(),
                target: action.target().cloned(),
                cost: node.step_cost,
                expected_state: node.state.clone(),
            })
        })
        .collect();
    steps.reverse();
    Plan::new(start.clone(), steps, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionDef, Effect};
    use crate::planner::{PlanFailureKind, ZeroHeuristic};
    use crate::state::Conditions;

    fn woodcutter() -> ActionLibrary {
        ActionLibrary::from_actions([
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
        .unwrap()
    }

    fn start() -> WorldState {
        WorldState::from_facts([("has_axe", false), ("near_tree", false), ("has_wood", false)])
    }

    fn wood() -> Goal {
        Goal::new("gather_wood", Conditions::new().and_eq("has_wood", true))
    }

    fn planner() -> Planner {
        Planner::new(PlannerConfig::default())
    }

    #[test]
    fn woodcutter_plan_costs_four() {
        let plan = planner()
            .plan(&start(), &wood(), &woodcutter(), &SearchBudget::default())
            .unwrap();

        assert_eq!(plan.total_cost(), Cost::new(4));
        assert_eq!(plan.len(), 3);
        assert_eq!(plan.steps()[2].action, "chop_tree");
        assert!(wood().is_satisfied_by(plan.final_state()));
    }

    #[test]
    fn satisfied_start_yields_empty_plan_even_without_budget() {
        let done = start().with("has_wood", true);
        let budget = SearchBudget::unbounded().with_max_nodes(0);
        let plan = planner().plan(&done, &wood(), &woodcutter(), &budget).unwrap();
        assert!(plan.is_empty());
        assert_eq!(plan.total_cost(), Cost::ZERO);
    }

    #[test]
    fn zero_node_budget_fails() {
        let budget = SearchBudget::unbounded().with_max_nodes(0);
        let err = planner()
            .plan(&start(), &wood(), &woodcutter(), &budget)
            .unwrap_err();
        assert_eq!(err.kind(), PlanFailureKind::BudgetExceeded(BudgetLimit::Nodes));
    }

    #[test]
    fn depth_limit_is_reported() {
        let budget = SearchBudget::unbounded().with_max_depth(2);
        let err = planner()
            .plan(&start(), &wood(), &woodcutter(), &budget)
            .unwrap_err();
        assert_eq!(err.kind(), PlanFailureKind::BudgetExceeded(BudgetLimit::Depth));
    }

    #[test]
    fn missing_producer_is_unreachable() {
        let goal = Goal::new("feast", Conditions::new().and_eq("has_food", true));
        let err = planner()
            .plan(&start(), &goal, &woodcutter(), &SearchBudget::unbounded())
            .unwrap_err();
        assert_eq!(err.kind(), PlanFailureKind::Unreachable);
        assert!(err.stats().expanded > 0);
    }

    #[test]
    fn cheaper_path_reopens_state() {
        // `shortcut` reaches `b` directly but at a high price; the two-step
        // detour reaches it cheaper and must win.
        let library = ActionLibrary::from_actions([
            ActionDef::new("shortcut").sets("b", true).cost(Cost::new(10)),
            ActionDef::new("step_a").sets("a", true),
            ActionDef::new("step_b")
                .requires_eq("a", true)
                .effect(Effect::remove("a"))
                .sets("b", true),
        ])
        .unwrap();
        let goal = Goal::new("b", Conditions::new().and_eq("b", true));

        let plan = Planner::with_heuristic(PlannerConfig::default(), ZeroHeuristic)
            .plan(&WorldState::new(), &goal, &library, &SearchBudget::unbounded())
            .unwrap();
        assert_eq!(plan.total_cost(), Cost::new(2));
    }

    #[test]
    fn depth_limit_keeps_shallow_costly_route() {
        // `detour` + `arrive` reach `x` cheaply at depth 2; `direct` reaches
        // it at depth 1. Only the latter leaves room for `finish`.
        let library = ActionLibrary::from_actions([
            ActionDef::new("direct").sets("x", true).cost(Cost::new(10)),
            ActionDef::new("detour").sets("y", true),
            ActionDef::new("arrive")
                .requires_eq("y", true)
                .effect(Effect::remove("y"))
                .sets("x", true),
            ActionDef::new("finish").requires_eq("x", true).sets("c", true),
        ])
        .unwrap();
        let goal = Goal::new("c", Conditions::new().and_eq("c", true));

        let plan = planner()
            .plan(
                &WorldState::new(),
                &goal,
                &library,
                &SearchBudget::unbounded().with_max_depth(2),
            )
            .unwrap();
        let ids: Vec<_> = plan.action_ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, ["direct", "finish"]);
        assert_eq!(plan.total_cost(), Cost::new(11));
    }

    #[test]
    fn zero_time_limit_fails_before_expanding() {
        let budget = SearchBudget::unbounded().with_time_limit(std::time::Duration::ZERO);
        let err = planner()
            .plan(&start(), &wood(), &woodcutter(), &budget)
            .unwrap_err();
        assert_eq!(err.kind(), PlanFailureKind::BudgetExceeded(BudgetLimit::Time));
        assert_eq!(err.stats().expanded, 0);
    }

    #[test]
    fn unit_costs_ignore_declared_costs() {
        let config = PlannerConfig {
            unit_action_costs: true,
            ..PlannerConfig::default()
        };
        let plan = Planner::new(config)
            .plan_default(&start(), &wood(), &woodcutter())
            .unwrap();
        assert_eq!(plan.total_cost(), Cost::new(3));
    }
}
