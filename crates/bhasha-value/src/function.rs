//! Callable runtime values: compiled functions, closures and native
//! built-ins (spec.md §3 "Runtime value").

use std::rc::Rc;

use crate::Value;

/// A function body as the compiler leaves it: one instruction buffer plus
/// the frame geometry the VM needs to set up a call (spec.md §4.4
/// "Function literal").
#[derive(Debug, PartialEq, Eq)]
pub struct CompiledFunction {
    pub instructions: Vec<u8>,
    pub num_locals: usize,
    pub num_parameters: usize,
}

/// A `CompiledFunction` plus the free values it captured at the point its
/// `OpClosure` instruction ran (spec.md §4.7 "Closures").
#[derive(Debug, PartialEq)]
pub struct Closure {
    pub function: Rc<CompiledFunction>,
    pub free: Vec<Value>,
}

pub type BuiltinFn = fn(&[Value]) -> Result<Value, String>;

/// A native function. Built-ins are looked up by ordinal (`OpGetBuiltin`,
/// spec.md §6.5), so every `Builtin` value the VM ever produces points at
/// one of the entries in the static table `bhasha-vm` owns; there is
/// exactly one live instance per built-in, never a fresh allocation per
/// call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}
