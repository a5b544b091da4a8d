//! Woodcutter domain: actions, goals and action durations.

use goap::{
    ActionDef, ActionLibrary, Conditions, Cost, Effect, FactKey, Goal, LibraryError, Memory,
    TargetedDef, WorldState,
};

pub fn library() -> Result<ActionLibrary, LibraryError> {
    let mut library = ActionLibrary::from_actions([
        ActionDef::new("get_axe")
            .requires_eq("has_axe", false)
            .sets("has_axe", true),
        ActionDef::new("chop_tree")
            .requires_eq("near_tree", true)
            .requires_eq("has_axe", true)
            .effect(Effect::add("logs", 1))
            .cost(Cost::new(2)),
        ActionDef::new("gather_branches")
            .requires_eq("near_tree", true)
            .effect(Effect::add("logs", 1))
            .cost(Cost::new(5)),
        ActionDef::new("go_home")
            .sets("near_tree", false)
            .sets("is_safe", true)
            .cost(Cost::new(2)),
        ActionDef::new("light_fire")
            .requires(goap::Condition::at_least("logs", 2))
            .requires_eq("is_safe", true)
            .effect(Effect::add("logs", -2))
            .sets("warm", true)
            // once lit, the fire must be tended until it catches
            .uncancellable(),
    ])?;
    library.register(TargetedDef::new("go_to_tree", |tree: &FactKey| {
        let walk = tree_distance(tree.as_str())?;
        Some(
            ActionDef::new("go_to_tree")
                .sets("near_tree", true)
                .sets("is_safe", false)
                .cost(Cost::new(walk)),
        )
    }))?;
    Ok(library)
}

/// Walking cost to a known tree; unknown names cannot be reached.
fn tree_distance(tree: &str) -> Option<u64> {
    match tree {
        "oak" => Some(1),
        "pine" => Some(3),
        _ => None,
    }
}

/// Trees the woodcutter knows about at the start.
pub fn memory() -> Memory {
    Memory::from_targets(["pine", "oak"])
}

pub fn start() -> WorldState {
    WorldState::from_facts([
        ("has_axe", false),
        ("near_tree", false),
        ("is_safe", true),
        ("warm", false),
    ])
    .with("logs", 0)
}

pub fn goals() -> [Goal; 2] {
    [
        Goal::new("keep_warm", Conditions::new().and_eq("warm", true)).with_priority(1.0),
        Goal::new("flee", Conditions::new().and_eq("is_safe", true))
            .with_priority(10.0)
            .valid_when(Conditions::new().and_eq("wolf_nearby", true)),
    ]
}

/// Ticks an action takes once started.
pub fn duration(action: &str) -> u32 {
    match action {
        "chop_tree" | "go_to_tree" | "go_home" => 3,
        "gather_branches" => 4,
        _ => 1,
    }
}
