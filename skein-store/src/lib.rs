//! Actor-class resolution and component persistence.
//!
//! The compiler consults a store to resolve an actor-type name into its
//! port lists and to compute signatures; the install flow persists
//! exported component definitions back into it.
mod signature;
mod store;

pub use signature::{actor_signature, SignatureDescriptor};
pub use store::{ActorClass, ActorStore, LocalStore, Lookup};
