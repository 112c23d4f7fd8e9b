//! Chained lookup frames with parent links (spec §4.C).
//!
//! Frames are stored in one append-only arena and referenced by [`EnvId`],
//! rather than via `Rc<RefCell<_>>` parent pointers — the same indexed-arena
//! shape this evaluator's ambient stack uses for its own namespace storage.
//! `deactivate` only flips `is_removed`; nothing is ever deleted (spec §3
//! invariant 3), so existing `EnvId`s stay valid for the lifetime of a run.

use std::collections::HashMap;

use crate::symbol::{EnvId, Symbol};

pub struct EnvFrame {
    pub index: EnvId,
    pub parent: Option<EnvId>,
    bindings: HashMap<String, Symbol>,
    pub is_removed: bool,
}

impl EnvFrame {
    /// `E.lookup`: walks parent links, returning the first binding whose key
    /// matches `name` by text. If no binding exists up to and including the
    /// root, returns a fresh `Symbol::Id(name)` (spec §4.C "Lookup
    /// contract") — this is how unbound names like `Print` or `Stem` reach
    /// the γ-application dispatch as opaque tokens to be recognized there.
    fn lookup<'a>(&'a self, envs: &'a Envs, name: &str) -> Symbol {
        if let Some(value) = self.bindings.get(name) {
            return value.clone();
        }
        match self.parent {
            Some(parent) => envs.frame(parent).lookup(envs, name),
            None => Symbol::Id(name.to_owned()),
        }
    }
}

/// Storage for every environment frame created during a run (spec §3
/// "Environments" lifecycle: append-only, deactivated but never deleted).
pub struct Envs {
    frames: Vec<EnvFrame>,
}

impl Envs {
    /// Creates the environment list with just the root frame `e0` (spec
    /// §4.B "Output": the initial environment list is `[e0]`).
    pub fn new() -> Self {
        Self { frames: vec![EnvFrame { index: EnvId(0), parent: None, bindings: HashMap::new(), is_removed: false }] }
    }

    pub const ROOT: EnvId = EnvId(0);

    pub fn frame(&self, id: EnvId) -> &EnvFrame {
        &self.frames[id.0 as usize]
    }

    /// Creates a new frame bound to `bindings`, linked to `parent` (the
    /// closure's captured environment). Returns the fresh `EnvId`; the
    /// caller is responsible for handing out unique, strictly increasing
    /// indices (spec §8 "Frame monotonicity").
    pub fn activate(&mut self, parent: EnvId, bindings: HashMap<String, Symbol>) -> EnvId {
        let index = EnvId(self.frames.len() as u32);
        self.frames.push(EnvFrame { index, parent: Some(parent), bindings, is_removed: false });
        index
    }

    /// Marks a frame deactivated (spec §4.D rule 4). Once set, `is_removed`
    /// is never cleared (spec §8 "Deactivation terminality").
    pub fn deactivate(&mut self, id: EnvId) {
        self.frames[id.0 as usize].is_removed = true;
    }

    pub fn lookup(&self, id: EnvId, name: &str) -> Symbol {
        self.frame(id).lookup(self, name)
    }

    /// Scans frames from the end for the deepest non-removed frame, which
    /// becomes `current_env` after a frame is deactivated (spec §4.D rule 4,
    /// "Set `current_env` to the deepest non-removed frame").
    pub fn deepest_active(&self) -> EnvId {
        self.frames
            .iter()
            .rev()
            .find(|frame| !frame.is_removed)
            .map(|frame| frame.index)
            .expect("the root frame e0 is never removed")
    }
}

impl Default for Envs {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_falls_back_to_opaque_identifier() {
        let envs = Envs::new();
        assert_eq!(envs.lookup(Envs::ROOT, "Print"), Symbol::Id("Print".to_owned()));
    }

    #[test]
    fn lookup_walks_parent_chain() {
        let mut envs = Envs::new();
        let mut root_bindings = HashMap::new();
        root_bindings.insert("x".to_owned(), Symbol::Int(1));
        let parent = envs.activate(Envs::ROOT, root_bindings);
        let child = envs.activate(parent, HashMap::new());
        assert_eq!(envs.lookup(child, "x"), Symbol::Int(1));
    }

    #[test]
    fn inner_binding_shadows_outer() {
        let mut envs = Envs::new();
        let mut outer = HashMap::new();
        outer.insert("x".to_owned(), Symbol::Int(1));
        let parent = envs.activate(Envs::ROOT, outer);
        let mut inner = HashMap::new();
        inner.insert("x".to_owned(), Symbol::Int(2));
        let child = envs.activate(parent, inner);
        assert_eq!(envs.lookup(child, "x"), Symbol::Int(2));
    }

    #[test]
    fn deactivation_is_terminal_and_updates_deepest_active() {
        let mut envs = Envs::new();
        let a = envs.activate(Envs::ROOT, HashMap::new());
        let b = envs.activate(a, HashMap::new());
        assert_eq!(envs.deepest_active(), b);
        envs.deactivate(b);
        assert_eq!(envs.deepest_active(), a);
        assert!(envs.frame(b).is_removed);
    }
}
