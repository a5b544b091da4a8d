//! Symbolic world model.
//!
//! Facts are `(FactKey, FactValue)` pairs collected in an immutable
//! [`WorldState`]. [`Conditions`] express predicates over those facts and are
//! shared by action preconditions and goals.
pub mod condition;
pub mod symbol;
pub mod value;
pub mod world;

pub use condition::{Comparison, Condition, ConditionError, Conditions};
pub use symbol::FactKey;
pub use value::{FactValue, ValueKind};
pub use world::{FactMap, WorldState};
