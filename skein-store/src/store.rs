//! The actor store: built-in actor classes plus installed components.
use crate::{actor_signature, SignatureDescriptor};
use lazy_static::lazy_static;
use skein_ast::JsonNode;
use skein_utils::{Error, Id, SkeinResult};
use std::collections::HashMap;
use std::rc::Rc;

/// Port-level description of an actor class.
#[derive(Clone, Debug)]
pub struct ActorClass {
    pub actor_type: Id,
    pub inports: Vec<Id>,
    pub outports: Vec<Id>,
    pub is_primitive: bool,
}

impl ActorClass {
    pub fn new(
        actor_type: &str,
        inports: &[&str],
        outports: &[&str],
        is_primitive: bool,
    ) -> Self {
        ActorClass {
            actor_type: Id::from(actor_type),
            inports: inports.iter().map(|p| Id::from(*p)).collect(),
            outports: outports.iter().map(|p| Id::from(*p)).collect(),
            is_primitive,
        }
    }

    /// The canonical signature of this class.
    pub fn signature(&self) -> String {
        actor_signature(&SignatureDescriptor {
            actor_type: self.actor_type.as_ref(),
            inports: self.inports.iter().map(|p| p.to_string()).collect(),
            is_primitive: self.is_primitive,
            outports: self.outports.iter().map(|p| p.to_string()).collect(),
        })
    }
}

/// Outcome of resolving an actor-type name.
pub enum Lookup {
    /// A primitive actor class.
    Actor(Rc<ActorClass>),
    /// An installed composite component.
    Component(Rc<ActorClass>),
    NotFound,
}

impl Lookup {
    pub fn class(&self) -> Option<&Rc<ActorClass>> {
        match self {
            Lookup::Actor(c) | Lookup::Component(c) => Some(c),
            Lookup::NotFound => None,
        }
    }
}

/// Read-only resolution interface consumed by the compiler.
pub trait ActorStore {
    fn lookup(&self, actor_type: Id) -> Lookup;
}

// The actor library every store starts from: (type, inports, outports).
type ClassSpec = (&'static str, &'static [&'static str], &'static [&'static str]);

const BUILTIN_CLASSES: &[ClassSpec] = &[
    ("std.Constant", &[], &["token"]),
    ("std.Identity", &["token"], &["token"]),
    ("std.Sum", &["integer"], &["integer"]),
    ("std.Join", &["token_1", "token_2"], &["token"]),
    ("std.Terminator", &["void"], &[]),
    ("io.Print", &["token"], &[]),
    ("io.StandardIn", &[], &["token"]),
    ("io.StandardOut", &["token"], &[]),
];

lazy_static! {
    static ref BUILTINS: Vec<ActorClass> = BUILTIN_CLASSES
        .iter()
        .map(|(ty, inports, outports)| ActorClass::new(
            ty, inports, outports, true
        ))
        .collect();
}

/// An installed component: its interface plus the definition needed to
/// expand it elsewhere.
struct StoredComponent {
    class: Rc<ActorClass>,
    #[allow(dead_code)]
    definition: JsonNode,
}

/// In-memory store preloaded with the built-in actor library.
pub struct LocalStore {
    actors: HashMap<Id, Rc<ActorClass>>,
    components: HashMap<Id, StoredComponent>,
}

impl Default for LocalStore {
    fn default() -> Self {
        let actors = BUILTINS
            .iter()
            .map(|class| (class.actor_type, Rc::new(class.clone())))
            .collect();
        LocalStore {
            actors,
            components: HashMap::new(),
        }
    }
}

impl LocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an extra actor class, e.g. from a platform-specific
    /// library.
    pub fn add_actor(&mut self, class: ActorClass) {
        self.actors.insert(class.actor_type, Rc::new(class));
    }

    /// Persist an exported component definition under
    /// `<namespace>.<name>`. Refuses to replace an existing definition
    /// unless `overwrite` is set.
    pub fn add_component(
        &mut self,
        namespace: &str,
        name: &str,
        interface: ActorClass,
        definition: JsonNode,
        overwrite: bool,
    ) -> SkeinResult<()> {
        let qualified = Id::new(format!("{namespace}.{name}"));
        if self.components.contains_key(&qualified) && !overwrite {
            return Err(Error::misc(format!(
                "Component `{qualified}' already installed"
            )));
        }
        let class = Rc::new(ActorClass {
            actor_type: qualified,
            is_primitive: false,
            ..interface
        });
        self.components
            .insert(qualified, StoredComponent { class, definition });
        Ok(())
    }

    pub fn has_component(&self, qualified: &str) -> bool {
        self.components.contains_key(&Id::from(qualified))
    }
}

impl ActorStore for LocalStore {
    fn lookup(&self, actor_type: Id) -> Lookup {
        if let Some(class) = self.actors.get(&actor_type) {
            return Lookup::Actor(Rc::clone(class));
        }
        if let Some(stored) = self.components.get(&actor_type) {
            return Lookup::Component(Rc::clone(&stored.class));
        }
        Lookup::NotFound
    }
}
