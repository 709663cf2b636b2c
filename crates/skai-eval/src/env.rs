//! Environment frames - the lexical scope chain.
//!
//! Frames live in an arena owned by the interpreter and are addressed by
//! [`EnvId`]; a frame maps names to variable cells (ordered, so iteration
//! and error output stay deterministic) and optionally points at an
//! enclosing frame. Function values capture the id of their declaration
//! frame, so a closure and the environment that stores it never form an
//! ownership cycle - the arena owns everything.
//!
//! Frames are never popped: a call frame stays alive as long as the arena,
//! which is what lets closures created inside it keep working after the
//! call returns.
//!
//! The arena only defines and resolves bindings. Mutation goes through the
//! [`VarCell`]s themselves - evaluating an assignment target yields its
//! cell, which also covers targets that are not name-reachable from the
//! current frame (instance members).

use std::rc::Rc;

use indexmap::IndexMap;
use skai_util::{Fatal, Result};

use crate::value::VarCell;

/// Index of a frame in the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnvId(usize);

impl EnvId {
    /// The global frame.
    pub const GLOBAL: EnvId = EnvId(0);
}

/// One scope frame.
struct Frame {
    /// Enclosing frame; `None` only for the global frame.
    parent: Option<EnvId>,
    /// Ordered name → cell bindings.
    names: IndexMap<String, Rc<VarCell>>,
}

/// The frame arena.
pub struct Environments {
    frames: Vec<Frame>,
}

impl Environments {
    /// A fresh arena containing only the global frame.
    pub fn new() -> Self {
        Self {
            frames: vec![Frame {
                parent: None,
                names: IndexMap::new(),
            }],
        }
    }

    /// Create a child frame of `parent`.
    pub fn push_frame(&mut self, parent: EnvId) -> EnvId {
        let id = EnvId(self.frames.len());
        self.frames.push(Frame {
            parent: Some(parent),
            names: IndexMap::new(),
        });
        id
    }

    /// Bind `name` in `frame`. Redefinition in the same frame is an error.
    pub fn define(&mut self, frame: EnvId, name: &str, cell: Rc<VarCell>) -> Result<()> {
        let names = &mut self.frames[frame.0].names;
        if names.contains_key(name) {
            return Err(Fatal::name(format!(
                "redefinition of '{name}' in the same scope"
            )));
        }
        names.insert(name.to_string(), cell);
        Ok(())
    }

    /// Resolve `name` starting at `frame` and walking outward.
    pub fn lookup(&self, frame: EnvId, name: &str) -> Result<Rc<VarCell>> {
        let mut current = Some(frame);
        while let Some(id) = current {
            let frame = &self.frames[id.0];
            if let Some(cell) = frame.names.get(name) {
                return Ok(cell.clone());
            }
            current = frame.parent;
        }
        Err(Fatal::name(format!("use of undeclared identifier '{name}'")))
    }

    /// Resolve `name` in `frame` only, without walking outward. Member
    /// access uses this so an instance does not expose its class's
    /// enclosing scope as members.
    pub fn lookup_local(&self, frame: EnvId, name: &str) -> Option<Rc<VarCell>> {
        self.frames[frame.0].names.get(name).cloned()
    }
}

impl Default for Environments {
    fn default() -> Self {
        Self::new()
    }
}
