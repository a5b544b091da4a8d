//! Goals and goal arbitration.

use std::fmt;

use crate::state::{Conditions, WorldState};

/// Desired world condition with a priority weight.
///
/// Goals are supplied per planning request and never owned by the planner.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Goal {
    name: String,
    conditions: Conditions,
    priority: f32,
    validity: Conditions,
}

impl Goal {
    /// Creates a goal with priority `1.0` that is always valid.
    pub fn new(name: &str, conditions: Conditions) -> Self {
        Self {
            name: name.to_owned(),
            conditions,
            priority: 1.0,
            validity: Conditions::new(),
        }
    }

    #[must_use]
    pub fn with_priority(mut self, priority: f32) -> Self {
        self.priority = priority;
        self
    }

    /// Restricts arbitration to states where `validity` holds.
    #[must_use]
    pub fn valid_when(mut self, validity: Conditions) -> Self {
        self.validity = validity;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn conditions(&self) -> &Conditions {
        &self.conditions
    }

    pub fn priority(&self) -> f32 {
        self.priority
    }

    pub fn validity(&self) -> &Conditions {
        &self.validity
    }

    /// Termination test.
    pub fn is_satisfied_by(&self, state: &WorldState) -> bool {
        self.conditions.is_satisfied_by(state)
    }

    pub fn is_valid_in(&self, state: &WorldState) -> bool {
        self.validity.is_satisfied_by(state)
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.conditions)
    }
}

/// Ordered collection of goals keyed by name.
#[derive(Clone, Debug, Default)]
pub struct GoalSet {
    goals: Vec<Goal>,
}

impl GoalSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a goal; a goal with the same name is replaced in place.
    ///
    /// Returns the replaced goal, if any.
    pub fn insert(&mut self, goal: Goal) -> Option<Goal> {
        match self.goals.iter_mut().find(|g| g.name == goal.name) {
            Some(slot) => Some(std::mem::replace(slot, goal)),
            None => {
                self.goals.push(goal);
                None
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Goal> {
        let position = self.goals.iter().position(|g| g.name() == name)?;
        Some(self.goals.remove(position))
    }

    pub fn get(&self, name: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Goal> {
        self.goals.iter()
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    /// Picks the goal to pursue in `state`.
    ///
    /// Candidates are goals with positive priority that are valid in `state`
    /// and not already satisfied. A NaN priority is not positive. The highest
    /// priority wins; ties go to the goal inserted first.
    pub fn select(&self, state: &WorldState) -> Option<&Goal> {
        self.select_except(state, None)
    }

    /// [`select`](Self::select) with the goal named `skip` left out.
    pub fn select_except(&self, state: &WorldState, skip: Option<&str>) -> Option<&Goal> {
        let mut best: Option<&Goal> = None;
        for goal in &self.goals {
            if skip == Some(goal.name()) {
                continue;
            }
            if goal.priority.is_nan()
                || goal.priority <= 0.0
                || !goal.is_valid_in(state)
                || goal.is_satisfied_by(state)
            {
                continue;
            }
            let better = match best {
                Some(current) => goal.priority.total_cmp(&current.priority).is_gt(),
                None => true,
            };
            if better {
                best = Some(goal);
            }
        }
        best
    }
}
