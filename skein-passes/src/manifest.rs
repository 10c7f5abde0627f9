//! The flat application manifest the pipeline emits.
use linked_hash_map::LinkedHashMap;
use serde::Serialize;
use skein_ast::Literal;

/// One deployable actor instance.
#[derive(Clone, Debug, Serialize)]
pub struct ActorEntry {
    pub actor_type: String,
    pub args: LinkedHashMap<String, Literal>,
    pub signature: String,
}

/// The compiled form of a script: fully qualified actors and the fan-out
/// of every outbound port. Key order follows emission order, so serialized
/// manifests are byte-stable for a fixed input.
#[derive(Debug, Serialize)]
pub struct Manifest {
    pub name: String,
    pub actors: LinkedHashMap<String, ActorEntry>,
    pub connections: LinkedHashMap<String, Vec<String>>,
    pub valid: bool,
}

impl Manifest {
    pub fn new(name: &str) -> Self {
        Manifest {
            name: name.to_string(),
            actors: LinkedHashMap::new(),
            connections: LinkedHashMap::new(),
            valid: true,
        }
    }
}
