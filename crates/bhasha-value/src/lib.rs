//! The runtime value model (spec.md §3 "Runtime value", §4.6, §4.7).
//!
//! `Value` is a tagged variant; reference-counted payloads (`Rc<str>`,
//! `Rc<Vec<Value>>`, ...) make `clone()` cheap enough to use freely on the
//! VM's hot path instead of threading lifetimes through the stack.

mod function;
mod hash_key;

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

pub use function::{Builtin, BuiltinFn, Closure, CompiledFunction};
pub use hash_key::HashKey;

/// The fixed, ordered built-in catalogue (spec.md §6.5, SPEC_FULL.md
/// §6.5.1). Ordinal == position in this array == the `OpGetBuiltin` operand;
/// both `bhasha-compiler` (pre-defining these names in the global symbol
/// table) and `bhasha-vm` (building the native-function table) index off
/// this single list so the two sides of the ordinal mapping cannot drift.
pub const BUILTIN_NAMES: &[&str] = &[
    "print",
    "length",
    "first",
    "last",
    "rest",
    "push",
    "type",
    "split",
    "join",
    "upper",
    "lower",
    "trim",
    "replace",
    "find",
    "pow",
    "sqrt",
    "abs",
    "max",
    "min",
    "round",
    "reverse",
    "sort",
    "keys",
    "values",
    "has",
    "merge",
    "to_char",
    "to_string",
    "parse_int",
    "parse_float",
    "to_byte",
    "to_short",
    "to_int",
    "to_long",
    "to_float",
    "to_double",
    "read_file",
    "write_file",
    "json_parse",
    "json_stringify",
];

#[derive(Debug, Default, PartialEq)]
pub struct HashValue(pub IndexMap<HashKey, (Value, Value)>);

#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Byte(u8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),
    Bool(bool),
    String(Rc<str>),
    Null,
    Array(Rc<Vec<Value>>),
    Hash(Rc<HashValue>),
    CompiledFunction(Rc<CompiledFunction>),
    Closure(Rc<Closure>),
    Builtin(&'static Builtin),
    /// Evaluator-only wrapper wanted by the host-facing pipeline for
    /// propagating an explicit `return`; the bytecode VM never produces it
    /// (spec.md §3).
    ReturnValue(Box<Value>),
    /// A data-level failure such as an out-of-range cast, distinct from a
    /// VM execution error: it is a first-class value a program can inspect
    /// (spec.md §6.5.1).
    Error(String),
}

impl Value {
    pub const TRUE: Value = Value::Bool(true);
    pub const FALSE: Value = Value::Bool(false);

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "Integer",
            Value::Byte(_) => "Byte",
            Value::Short(_) => "Short",
            Value::Int(_) => "Int",
            Value::Long(_) => "Long",
            Value::Float(_) => "Float",
            Value::Double(_) => "Double",
            Value::Char(_) => "Char",
            Value::Bool(_) => "Boolean",
            Value::String(_) => "String",
            Value::Null => "Null",
            Value::Array(_) => "Array",
            Value::Hash(_) => "Hash",
            Value::CompiledFunction(_) => "CompiledFunction",
            Value::Closure(_) => "Closure",
            Value::Builtin(_) => "Builtin",
            Value::ReturnValue(_) => "ReturnValue",
            Value::Error(_) => "Error",
        }
    }

    /// Human-readable rendering used by the print built-in, error messages
    /// and tests (spec.md §4.6 "inspect()").
    pub fn inspect(&self) -> String {
        match self {
            Value::Integer(n) => n.to_string(),
            Value::Byte(n) => n.to_string(),
            Value::Short(n) => n.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Long(n) => n.to_string(),
            Value::Float(n) => n.to_string(),
            Value::Double(n) => n.to_string(),
            Value::Char(c) => c.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::String(s) => s.to_string(),
            Value::Null => "null".to_string(),
            Value::Array(items) => {
                let rendered: Vec<String> = items.iter().map(Value::inspect).collect();
                format!("[{}]", rendered.join(", "))
            }
            Value::Hash(map) => {
                let rendered: Vec<String> = map
                    .0
                    .values()
                    .map(|(k, v)| format!("{}: {}", k.inspect(), v.inspect()))
                    .collect();
                format!("{{{}}}", rendered.join(", "))
            }
            Value::CompiledFunction(_) => "CompiledFunction".to_string(),
            Value::Closure(_) => "Closure".to_string(),
            Value::Builtin(b) => format!("builtin:{}", b.name),
            Value::ReturnValue(inner) => inner.inspect(),
            Value::Error(message) => format!("ERROR: {message}"),
        }
    }

    /// Everything is truthy except `Null` and the `false` singleton
    /// (spec.md §4.6 "Truthiness").
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Bool(false))
    }

    pub fn is_floating(&self) -> bool {
        matches!(self, Value::Float(_) | Value::Double(_))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Value::Integer(_)
                | Value::Byte(_)
                | Value::Short(_)
                | Value::Int(_)
                | Value::Long(_)
                | Value::Float(_)
                | Value::Double(_)
                | Value::Char(_)
        )
    }

    /// Widens any integral numeric (including `Char`, by ordinal) to a
    /// signed 64-bit value. `None` for `Float`/`Double`/non-numerics.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) | Value::Long(n) => Some(*n),
            Value::Byte(n) => Some(*n as i64),
            Value::Short(n) => Some(*n as i64),
            Value::Int(n) => Some(*n as i64),
            Value::Char(c) => Some(*c as i64),
            _ => None,
        }
    }

    /// Converts any numeric tag to `f64`, widening integers and `Char`'s
    /// ordinal along the way.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n as f64),
            Value::Double(n) => Some(*n),
            other => other.as_i64().map(|n| n as f64),
        }
    }

    /// The `(tag, digest)` hash key for this value, or `None` if it is not
    /// hashable (spec.md §4.6 "Hashability").
    pub fn hash_key(&self) -> Option<HashKey> {
        match self {
            Value::Integer(n) | Value::Long(n) => Some(HashKey::numeric(*n as u64)),
            Value::Byte(n) => Some(HashKey::numeric(*n as u64)),
            Value::Short(n) => Some(HashKey::numeric(*n as i64 as u64)),
            Value::Int(n) => Some(HashKey::numeric(*n as i64 as u64)),
            Value::Float(n) => Some(HashKey::numeric(n.to_bits() as u64)),
            Value::Double(n) => Some(HashKey::numeric(n.to_bits())),
            Value::Char(c) => Some(HashKey::char_value(*c)),
            Value::String(s) => Some(HashKey::string(s)),
            Value::Bool(b) => Some(HashKey::boolean(*b)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inspect())
    }
}

/// Hand-implemented rather than derived: numerics compare across tags by
/// promoted value (a `Byte` and an `Int` holding the same number are equal),
/// composites (`Array`/`Hash`/`Closure`) compare structurally, and everything
/// else falls back to identity equality of its payload (spec.md §4.7
/// "Equal/NotEqual").
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        if self.is_numeric() && other.is_numeric() {
            return if self.is_floating() || other.is_floating() {
                self.as_f64() == other.as_f64()
            } else {
                self.as_i64() == other.as_i64()
            };
        }
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Hash(a), Value::Hash(b)) => a == b,
            (Value::Closure(a), Value::Closure(b)) => a == b,
            (Value::CompiledFunction(a), Value::CompiledFunction(b)) => a == b,
            (Value::Builtin(a), Value::Builtin(b)) => a == b,
            (Value::ReturnValue(a), Value::ReturnValue(b)) => a == b,
            (Value::Error(a), Value::Error(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_null_and_false_are_falsy() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(Value::Integer(0).is_truthy());
        assert!(Value::String(Rc::from("")).is_truthy());
        assert!(Value::Array(Rc::new(Vec::new())).is_truthy());
    }

    #[test]
    fn inspect_renders_arrays_and_hashes() {
        let array = Value::Array(Rc::new(vec![Value::Integer(1), Value::Integer(2)]));
        assert_eq!(array.inspect(), "[1, 2]");
    }

    #[test]
    fn as_i64_widens_every_integral_tag() {
        assert_eq!(Value::Byte(5).as_i64(), Some(5));
        assert_eq!(Value::Short(-5).as_i64(), Some(-5));
        assert_eq!(Value::Int(100).as_i64(), Some(100));
        assert_eq!(Value::Char('a').as_i64(), Some('a' as i64));
        assert_eq!(Value::Float(1.5).as_i64(), None);
    }

    #[test]
    fn hash_key_is_stable_across_numeric_widths_with_equal_bit_pattern() {
        assert_eq!(Value::Byte(5).hash_key(), Value::Integer(5).hash_key());
    }

    #[test]
    fn numerics_compare_equal_across_tags() {
        assert_eq!(Value::Byte(5), Value::Int(5));
        assert_eq!(Value::Int(2), Value::Double(2.0));
        assert_ne!(Value::Int(2), Value::Double(2.5));
    }

    #[test]
    fn arrays_compare_structurally() {
        let a = Value::Array(Rc::new(vec![Value::Integer(1), Value::Integer(2)]));
        let b = Value::Array(Rc::new(vec![Value::Integer(1), Value::Integer(2)]));
        assert_eq!(a, b);
        assert_ne!(
            a,
            Value::Array(Rc::new(vec![Value::Integer(1), Value::Integer(3)]))
        );
    }

    #[test]
    fn different_variants_are_never_equal() {
        assert_ne!(Value::Null, Value::Bool(false));
        assert_ne!(Value::String(Rc::from("1")), Value::Integer(1));
    }

    #[test]
    fn builtin_catalogue_ordinals_match_the_base_table() {
        assert_eq!(BUILTIN_NAMES[0], "print");
        assert_eq!(BUILTIN_NAMES[20], "reverse");
        assert_eq!(BUILTIN_NAMES[21], "sort");
        assert_eq!(BUILTIN_NAMES.len(), 40);
    }

    #[test]
    fn floats_are_not_hashable_by_identity_but_do_hash() {
        assert!(Value::Double(1.5).hash_key().is_some());
        assert!(Value::Array(Rc::new(Vec::new())).hash_key().is_none());
    }
}
