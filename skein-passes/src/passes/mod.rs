//! The rewriting passes, in pipeline order.
mod component_collector;
mod expander;
mod flatten;
mod implicit_port_rewrite;
mod manifest_emitter;
mod portmap_resolver;

pub use component_collector::ComponentCollector;
pub use expander::Expander;
pub use flatten::Flatten;
pub use implicit_port_rewrite::ImplicitPortRewrite;
pub use manifest_emitter::ManifestEmitter;
pub use portmap_resolver::PortMapResolver;
