use bhasha_util::{define_idx, IndexVec};
use rustc_hash::FxHashMap;

define_idx!(RibId);

/// Which kind of slot a [`Symbol`] occupies (spec.md §4.3 "Symbol").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Slot in the VM's fixed-size global array.
    Global,
    /// Slot in the current call frame's local window.
    Local,
    /// Ordinal into the native built-in function table.
    Builtin,
    /// Index into the currently-compiling function's captured-value list.
    Free,
    /// The currently-compiling closure itself, for named recursion.
    Function,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub scope: Scope,
    pub index: usize,
}

struct Rib {
    bindings: FxHashMap<String, Symbol>,
    parent: Option<RibId>,
    /// Symbols from an enclosing *function* scope captured into this one
    /// (spec.md §4.3 "define_free"), in capture order.
    free: Vec<Symbol>,
    num_definitions: usize,
}

/// A stack of frames ("ribs"); the bottom one is the global scope. Entering
/// a function compilation pushes a rib, leaving it pops back to the parent
/// (spec.md §4.3 "Symbol table").
pub struct SymbolTable {
    ribs: IndexVec<RibId, Rib>,
    root: RibId,
    current: RibId,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        let mut ribs = IndexVec::new();
        let root = ribs.push(Rib {
            bindings: FxHashMap::default(),
            parent: None,
            free: Vec::new(),
            num_definitions: 0,
        });
        Self {
            ribs,
            root,
            current: root,
        }
    }

    pub fn enter_scope(&mut self) {
        let parent = Some(self.current);
        let rib = Rib {
            bindings: FxHashMap::default(),
            parent,
            free: Vec::new(),
            num_definitions: 0,
        };
        self.current = self.ribs.push(rib);
    }

    /// Pops the current frame back to its parent. Callers that need the
    /// frame's definition count or captured free-variable list must read
    /// them (via [`Self::num_definitions`] / [`Self::free_variables`])
    /// before calling this.
    pub fn leave_scope(&mut self) {
        if let Some(parent) = self.ribs[self.current].parent {
            self.current = parent;
        }
    }

    pub fn num_definitions(&self) -> usize {
        self.ribs[self.current].num_definitions
    }

    pub fn free_variables(&self) -> &[Symbol] {
        &self.ribs[self.current].free
    }

    /// Defines `name` in the current frame: `Global` at the root frame,
    /// `Local` everywhere else.
    pub fn define(&mut self, name: &str) -> Symbol {
        let rib_id = self.current;
        let scope = if self.ribs[rib_id].parent.is_none() {
            Scope::Global
        } else {
            Scope::Local
        };
        let index = self.ribs[rib_id].num_definitions;
        let symbol = Symbol {
            name: name.to_string(),
            scope,
            index,
        };
        self.ribs[rib_id].bindings.insert(name.to_string(), symbol.clone());
        self.ribs[rib_id].num_definitions += 1;
        symbol
    }

    /// Defines a native built-in at a caller-supplied ordinal, always in the
    /// root (global) frame regardless of which frame is current.
    pub fn define_builtin(&mut self, index: usize, name: &str) -> Symbol {
        let symbol = Symbol {
            name: name.to_string(),
            scope: Scope::Builtin,
            index,
        };
        self.ribs[self.root]
            .bindings
            .insert(name.to_string(), symbol.clone());
        symbol
    }

    /// Binds `name` to the currently-compiling closure itself, enabling
    /// named recursion inside a function literal.
    pub fn define_function_name(&mut self, name: &str) -> Symbol {
        let symbol = Symbol {
            name: name.to_string(),
            scope: Scope::Function,
            index: 0,
        };
        self.ribs[self.current]
            .bindings
            .insert(name.to_string(), symbol.clone());
        symbol
    }

    fn define_free(&mut self, rib_id: RibId, original: Symbol) -> Symbol {
        let rib = &mut self.ribs[rib_id];
        rib.free.push(original.clone());
        let index = rib.free.len() - 1;
        let symbol = Symbol {
            name: original.name.clone(),
            scope: Scope::Free,
            index,
        };
        rib.bindings.insert(symbol.name.clone(), symbol.clone());
        symbol
    }

    /// Resolves `name` from the current frame outward. A name found in an
    /// enclosing function's frame is captured as a `Free` symbol in every
    /// frame between that enclosing frame and the current one, cascading
    /// through nested closures one level at a time (spec.md §4.3 "resolve").
    pub fn resolve(&mut self, name: &str) -> Option<Symbol> {
        self.resolve_in(self.current, name)
    }

    fn resolve_in(&mut self, rib_id: RibId, name: &str) -> Option<Symbol> {
        if let Some(symbol) = self.ribs[rib_id].bindings.get(name) {
            return Some(symbol.clone());
        }
        let parent_id = self.ribs[rib_id].parent?;
        let resolved = self.resolve_in(parent_id, name)?;
        if matches!(resolved.scope, Scope::Global | Scope::Builtin) {
            return Some(resolved);
        }
        Some(self.define_free(rib_id, resolved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_definitions_get_global_scope() {
        let mut table = SymbolTable::new();
        let a = table.define("a");
        let b = table.define("b");
        assert_eq!(a.scope, Scope::Global);
        assert_eq!(a.index, 0);
        assert_eq!(b.index, 1);
    }

    #[test]
    fn nested_definitions_get_local_scope() {
        let mut table = SymbolTable::new();
        table.define("a");
        table.enter_scope();
        let local = table.define("b");
        assert_eq!(local.scope, Scope::Local);
        assert_eq!(local.index, 0);
    }

    #[test]
    fn resolve_finds_enclosing_global() {
        let mut table = SymbolTable::new();
        table.define("a");
        table.enter_scope();
        let resolved = table.resolve("a").expect("a should resolve");
        assert_eq!(resolved.scope, Scope::Global);
    }

    #[test]
    fn resolve_captures_enclosing_local_as_free() {
        let mut table = SymbolTable::new();
        table.enter_scope();
        table.define("outer");
        table.enter_scope();
        let resolved = table.resolve("outer").expect("outer should resolve");
        assert_eq!(resolved.scope, Scope::Free);
        assert_eq!(resolved.index, 0);
        assert_eq!(table.free_variables().len(), 1);
    }

    #[test]
    fn resolve_cascades_free_capture_through_two_levels() {
        let mut table = SymbolTable::new();
        table.enter_scope();
        table.define("outer");
        table.enter_scope(); // middle
        table.enter_scope(); // innermost
        let resolved = table.resolve("outer").expect("outer should resolve");
        assert_eq!(resolved.scope, Scope::Free);

        table.leave_scope(); // back to middle
        assert_eq!(table.free_variables().len(), 1);
    }

    #[test]
    fn builtin_is_visible_from_a_nested_scope() {
        let mut table = SymbolTable::new();
        table.define_builtin(0, "দৈর্ঘ্য");
        table.enter_scope();
        table.enter_scope();
        let resolved = table.resolve("দৈর্ঘ্য").expect("builtin should resolve");
        assert_eq!(resolved.scope, Scope::Builtin);
        assert_eq!(resolved.index, 0);
        assert!(table.free_variables().is_empty());
    }

    #[test]
    fn function_name_resolves_in_its_own_scope() {
        let mut table = SymbolTable::new();
        table.enter_scope();
        let symbol = table.define_function_name("রেকার্সিভ");
        assert_eq!(symbol.scope, Scope::Function);
        let resolved = table.resolve("রেকার্সিভ").unwrap();
        assert_eq!(resolved.scope, Scope::Function);
    }

    #[test]
    fn leave_scope_restores_parent_definitions() {
        let mut table = SymbolTable::new();
        table.define("a");
        table.enter_scope();
        table.define("b");
        table.define("c");
        assert_eq!(table.num_definitions(), 2);
        table.leave_scope();
        assert_eq!(table.num_definitions(), 1);
    }
}
