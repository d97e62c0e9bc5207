pub mod actor;

pub use actor::{require_actor, ActorContext};
