//! Search nodes and their per-call arena.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

use crate::action::Cost;
use crate::state::WorldState;

/// Handle to a node in a [`NodeArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct NodeId(usize);

/// A reached search state together with how it was reached.
///
/// Forward search stores world states; regressive search stores the
/// conditions still to be met.
#[derive(Debug)]
pub(crate) struct SearchNode<S = WorldState> {
    pub state: S,
    /// Path cost from the search root.
    pub g: Cost,
    /// Heuristic estimate to the goal.
    pub h: Cost,
    /// Cost of the action that produced this node.
    pub step_cost: Cost,
    pub parent: Option<NodeId>,
    /// Candidate index of the producing action.
    pub action: Option<usize>,
    pub depth: u32,
}

impl<S> SearchNode<S> {
    pub fn root(state: S, h: Cost) -> Self {
        Self {
            state,
            g: Cost::ZERO,
            h,
            step_cost: Cost::ZERO,
            parent: None,
            action: None,
            depth: 0,
        }
    }

    pub fn f(&self) -> Cost {
        self.g + self.h
    }
}

/// Append-only node storage for one planning call.
///
/// Node ids are handed out in discovery order, which doubles as the
/// tie-break sequence.
#[derive(Debug)]
pub(crate) struct NodeArena<S = WorldState> {
    nodes: Vec<SearchNode<S>>,
}

impl<S> Default for NodeArena<S> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<S> NodeArena<S> {
    pub fn push(&mut self, node: SearchNode<S>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: NodeId) -> &SearchNode<S> {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Node ids from `id` back to the root.
    pub fn ancestry(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), |&current| self.get(current).parent)
    }
}

/// Outcome of offering a newly reached key to [`Reached`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Offer {
    /// First time this key is reached.
    New,
    /// Reached before, but never this cheaply (or this shallowly).
    Improved,
    /// An earlier path is at least as good.
    Dominated,
}

/// Best `(g, depth)` pairs seen per search key.
///
/// Without a depth limit only `g` matters and each key keeps one entry.
/// With a depth limit a deeper path may be unable to finish within the
/// limit while a costlier shallower one still can, so every pair that no
/// other pair beats on both cost and depth is kept.
#[derive(Debug)]
pub(crate) struct Reached<K> {
    best: HashMap<K, Vec<(Cost, u32)>>,
    track_depth: bool,
}

impl<K: Hash + Eq> Reached<K> {
    pub fn new(track_depth: bool) -> Self {
        Self {
            best: HashMap::new(),
            track_depth,
        }
    }

    /// `known` is at least as cheap and, when depth matters, as shallow.
    fn covers(track_depth: bool, known: (Cost, u32), g: Cost, depth: u32) -> bool {
        known.0 <= g && (!track_depth || known.1 <= depth)
    }

    pub fn offer(&mut self, key: K, g: Cost, depth: u32) -> Offer {
        let track_depth = self.track_depth;
        let entries = self.best.entry(key).or_default();
        if entries
            .iter()
            .any(|&known| Self::covers(track_depth, known, g, depth))
        {
            return Offer::Dominated;
        }
        let outcome = if entries.is_empty() {
            Offer::New
        } else {
            Offer::Improved
        };
        entries.retain(|&(kg, kd)| !Self::covers(track_depth, (g, depth), kg, kd));
        entries.push((g, depth));
        outcome
    }

    /// Whether a better path to `key` was recorded after this one was queued.
    pub fn is_stale(&self, key: &K, g: Cost, depth: u32) -> bool {
        self.best.get(key).is_some_and(|entries| {
            entries
                .iter()
                .any(|&known| known != (g, depth) && Self::covers(self.track_depth, known, g, depth))
        })
    }
}

/// Open-set ordering: lowest `f` first, then earliest discovery.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct FrontierKey {
    pub f: Cost,
    pub id: NodeId,
}

impl FrontierKey {
    pub fn new(f: Cost, id: NodeId) -> Self {
        Self { f, id }
    }
}

impl Ord for FrontierKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f.cmp(&other.f).then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for FrontierKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
