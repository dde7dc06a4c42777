//! Native built-in functions (spec.md §6.5, SPEC_FULL.md §6.5.1).
//!
//! Every entry here is a plain `fn`, matching [`bhasha_value::BuiltinFn`]'s
//! signature; the VM special-cases ordinal 0 (`print`) so its output can be
//! redirected to an in-memory sink for tests, bypassing this table for that
//! one entry (see `Vm::exec_call`).

use std::cmp::Ordering;
use std::fs;
use std::rc::Rc;

use bhasha_value::{Builtin, HashValue, Value, BUILTIN_NAMES};
use indexmap::IndexMap;

use crate::cast;
use crate::json;

fn arity(name: &str, args: &[Value], expected: usize) -> Result<(), String> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(format!(
            "{name}: expected {expected} argument(s), got {}",
            args.len()
        ))
    }
}

fn as_string<'a>(name: &str, v: &'a Value) -> Result<&'a str, String> {
    match v {
        Value::String(s) => Ok(s),
        other => Err(format!(
            "{name}: expected a String, got {}",
            other.type_name()
        )),
    }
}

fn as_array<'a>(name: &str, v: &'a Value) -> Result<&'a [Value], String> {
    match v {
        Value::Array(items) => Ok(items),
        other => Err(format!(
            "{name}: expected an Array, got {}",
            other.type_name()
        )),
    }
}

fn as_hash<'a>(name: &str, v: &'a Value) -> Result<&'a HashValue, String> {
    match v {
        Value::Hash(map) => Ok(map),
        other => Err(format!("{name}: expected a Hash, got {}", other.type_name())),
    }
}

fn numeric_cmp(a: &Value, b: &Value) -> Option<Ordering> {
    if a.is_floating() || b.is_floating() {
        a.as_f64()?.partial_cmp(&b.as_f64()?)
    } else {
        a.as_i64()?.partial_cmp(&b.as_i64()?)
    }
}

fn bi_print(args: &[Value]) -> Result<Value, String> {
    for value in args {
        println!("{}", value.inspect());
    }
    Ok(Value::Null)
}

fn bi_length(args: &[Value]) -> Result<Value, String> {
    arity("length", args, 1)?;
    match &args[0] {
        Value::String(s) => Ok(Value::Integer(s.chars().count() as i64)),
        Value::Array(items) => Ok(Value::Integer(items.len() as i64)),
        other => Err(format!(
            "length: expected a String or Array, got {}",
            other.type_name()
        )),
    }
}

fn bi_first(args: &[Value]) -> Result<Value, String> {
    arity("first", args, 1)?;
    Ok(as_array("first", &args[0])?
        .first()
        .cloned()
        .unwrap_or(Value::Null))
}

fn bi_last(args: &[Value]) -> Result<Value, String> {
    arity("last", args, 1)?;
    Ok(as_array("last", &args[0])?
        .last()
        .cloned()
        .unwrap_or(Value::Null))
}

fn bi_rest(args: &[Value]) -> Result<Value, String> {
    arity("rest", args, 1)?;
    let items = as_array("rest", &args[0])?;
    if items.is_empty() {
        Ok(Value::Null)
    } else {
        Ok(Value::Array(Rc::new(items[1..].to_vec())))
    }
}

fn bi_push(args: &[Value]) -> Result<Value, String> {
    arity("push", args, 2)?;
    let items = as_array("push", &args[0])?;
    let mut copy = items.to_vec();
    copy.push(args[1].clone());
    Ok(Value::Array(Rc::new(copy)))
}

fn bi_type(args: &[Value]) -> Result<Value, String> {
    arity("type", args, 1)?;
    Ok(Value::String(Rc::from(args[0].type_name())))
}

fn bi_split(args: &[Value]) -> Result<Value, String> {
    arity("split", args, 2)?;
    let s = as_string("split", &args[0])?;
    let sep = as_string("split", &args[1])?;
    let parts: Vec<Value> = if sep.is_empty() {
        s.chars().map(|c| Value::String(Rc::from(c.to_string().as_str()))).collect()
    } else {
        s.split(sep).map(|part| Value::String(Rc::from(part))).collect()
    };
    Ok(Value::Array(Rc::new(parts)))
}

fn bi_join(args: &[Value]) -> Result<Value, String> {
    arity("join", args, 2)?;
    let items = as_array("join", &args[0])?;
    let sep = as_string("join", &args[1])?;
    let parts: Result<Vec<&str>, String> = items.iter().map(|v| as_string("join", v)).collect();
    Ok(Value::String(Rc::from(parts?.join(sep).as_str())))
}

fn bi_upper(args: &[Value]) -> Result<Value, String> {
    arity("upper", args, 1)?;
    Ok(Value::String(Rc::from(
        as_string("upper", &args[0])?.to_uppercase().as_str(),
    )))
}

fn bi_lower(args: &[Value]) -> Result<Value, String> {
    arity("lower", args, 1)?;
    Ok(Value::String(Rc::from(
        as_string("lower", &args[0])?.to_lowercase().as_str(),
    )))
}

fn bi_trim(args: &[Value]) -> Result<Value, String> {
    arity("trim", args, 1)?;
    Ok(Value::String(Rc::from(as_string("trim", &args[0])?.trim())))
}

fn bi_replace(args: &[Value]) -> Result<Value, String> {
    arity("replace", args, 3)?;
    let s = as_string("replace", &args[0])?;
    let from = as_string("replace", &args[1])?;
    let to = as_string("replace", &args[2])?;
    Ok(Value::String(Rc::from(s.replace(from, to).as_str())))
}

fn bi_find(args: &[Value]) -> Result<Value, String> {
    arity("find", args, 2)?;
    let s = as_string("find", &args[0])?;
    let needle = as_string("find", &args[1])?;
    match s.find(needle) {
        Some(byte_pos) => Ok(Value::Integer(s[..byte_pos].chars().count() as i64)),
        None => Ok(Value::Integer(-1)),
    }
}

fn bi_pow(args: &[Value]) -> Result<Value, String> {
    arity("pow", args, 2)?;
    let base = &args[0];
    let exp = &args[1];
    if !base.is_numeric() || !exp.is_numeric() {
        return Err("pow: expected two numeric arguments".to_string());
    }
    if base.is_floating() || exp.is_floating() {
        Ok(Value::Double(base.as_f64().unwrap().powf(exp.as_f64().unwrap())))
    } else {
        let e = exp.as_i64().unwrap();
        if e < 0 {
            return Err("pow: negative exponent requires a floating base".to_string());
        }
        Ok(Value::Long(base.as_i64().unwrap().pow(e as u32)))
    }
}

fn bi_sqrt(args: &[Value]) -> Result<Value, String> {
    arity("sqrt", args, 1)?;
    let n = args[0]
        .as_f64()
        .ok_or_else(|| format!("sqrt: expected a number, got {}", args[0].type_name()))?;
    if n < 0.0 {
        return Err("sqrt: negative argument".to_string());
    }
    Ok(Value::Double(n.sqrt()))
}

fn bi_abs(args: &[Value]) -> Result<Value, String> {
    arity("abs", args, 1)?;
    match &args[0] {
        Value::Integer(n) => Ok(Value::Integer(n.abs())),
        Value::Long(n) => Ok(Value::Long(n.abs())),
        Value::Int(n) => Ok(Value::Int(n.abs())),
        Value::Short(n) => Ok(Value::Short(n.abs())),
        Value::Byte(n) => Ok(Value::Byte(*n)),
        Value::Float(n) => Ok(Value::Float(n.abs())),
        Value::Double(n) => Ok(Value::Double(n.abs())),
        other => Err(format!("abs: expected a number, got {}", other.type_name())),
    }
}

fn bi_max(args: &[Value]) -> Result<Value, String> {
    arity("max", args, 2)?;
    match numeric_cmp(&args[0], &args[1]) {
        Some(Ordering::Less) => Ok(args[1].clone()),
        Some(_) => Ok(args[0].clone()),
        None => Err("max: expected two numeric arguments".to_string()),
    }
}

fn bi_min(args: &[Value]) -> Result<Value, String> {
    arity("min", args, 2)?;
    match numeric_cmp(&args[0], &args[1]) {
        Some(Ordering::Greater) => Ok(args[1].clone()),
        Some(_) => Ok(args[0].clone()),
        None => Err("min: expected two numeric arguments".to_string()),
    }
}

fn bi_round(args: &[Value]) -> Result<Value, String> {
    arity("round", args, 1)?;
    match &args[0] {
        Value::Float(n) => Ok(Value::Long(n.round() as i64)),
        Value::Double(n) => Ok(Value::Long(n.round() as i64)),
        other if other.is_numeric() => Ok(Value::Long(other.as_i64().unwrap())),
        other => Err(format!("round: expected a number, got {}", other.type_name())),
    }
}

fn bi_reverse(args: &[Value]) -> Result<Value, String> {
    arity("reverse", args, 1)?;
    let items = as_array("reverse", &args[0])?;
    let mut copy = items.to_vec();
    copy.reverse();
    Ok(Value::Array(Rc::new(copy)))
}

fn bi_sort(args: &[Value]) -> Result<Value, String> {
    arity("sort", args, 1)?;
    let items = as_array("sort", &args[0])?;
    let mut copy = items.to_vec();
    let mut sort_err = None;
    copy.sort_by(|a, b| {
        if sort_err.is_some() {
            return Ordering::Equal;
        }
        match (a, b) {
            (Value::String(x), Value::String(y)) => x.cmp(y),
            _ if a.is_numeric() && b.is_numeric() => {
                numeric_cmp(a, b).unwrap_or(Ordering::Equal)
            }
            _ => {
                sort_err = Some(format!(
                    "sort: cannot compare {} and {}",
                    a.type_name(),
                    b.type_name()
                ));
                Ordering::Equal
            }
        }
    });
    match sort_err {
        Some(err) => Err(err),
        None => Ok(Value::Array(Rc::new(copy))),
    }
}

fn bi_keys(args: &[Value]) -> Result<Value, String> {
    arity("keys", args, 1)?;
    let map = as_hash("keys", &args[0])?;
    Ok(Value::Array(Rc::new(
        map.0.values().map(|(k, _)| k.clone()).collect(),
    )))
}

fn bi_values(args: &[Value]) -> Result<Value, String> {
    arity("values", args, 1)?;
    let map = as_hash("values", &args[0])?;
    Ok(Value::Array(Rc::new(
        map.0.values().map(|(_, v)| v.clone()).collect(),
    )))
}

fn bi_has(args: &[Value]) -> Result<Value, String> {
    arity("has", args, 2)?;
    let map = as_hash("has", &args[0])?;
    let key = args[1]
        .hash_key()
        .ok_or_else(|| format!("has: unhashable key of type {}", args[1].type_name()))?;
    Ok(Value::Bool(map.0.contains_key(&key)))
}

fn bi_merge(args: &[Value]) -> Result<Value, String> {
    arity("merge", args, 2)?;
    let left = as_hash("merge", &args[0])?;
    let right = as_hash("merge", &args[1])?;
    let mut merged = left.0.clone();
    for (key, pair) in right.0.iter() {
        merged.insert(*key, pair.clone());
    }
    Ok(Value::Hash(Rc::new(HashValue(merged))))
}

fn bi_to_char(args: &[Value]) -> Result<Value, String> {
    arity("to_char", args, 1)?;
    let n = args[0]
        .as_i64()
        .ok_or_else(|| format!("to_char: expected an integer, got {}", args[0].type_name()))?;
    char::from_u32(n as u32)
        .map(Value::Char)
        .ok_or_else(|| format!("to_char: {n} is not a valid Unicode scalar"))
}

fn bi_to_string(args: &[Value]) -> Result<Value, String> {
    arity("to_string", args, 1)?;
    if !args[0].is_numeric() {
        return Err(format!(
            "to_string: expected a number, got {}",
            args[0].type_name()
        ));
    }
    Ok(Value::String(Rc::from(args[0].inspect().as_str())))
}

fn bi_parse_int(args: &[Value]) -> Result<Value, String> {
    arity("parse_int", args, 1)?;
    let s = as_string("parse_int", &args[0])?;
    Ok(s.parse::<i64>()
        .map(Value::Integer)
        .unwrap_or(Value::Null))
}

fn bi_parse_float(args: &[Value]) -> Result<Value, String> {
    arity("parse_float", args, 1)?;
    let s = as_string("parse_float", &args[0])?;
    Ok(s.parse::<f64>().map(Value::Double).unwrap_or(Value::Null))
}

fn bi_to_byte(args: &[Value]) -> Result<Value, String> {
    arity("to_byte", args, 1)?;
    cast::cast_value(&args[0], "Byte")
}

fn bi_to_short(args: &[Value]) -> Result<Value, String> {
    arity("to_short", args, 1)?;
    cast::cast_value(&args[0], "Short")
}

fn bi_to_int(args: &[Value]) -> Result<Value, String> {
    arity("to_int", args, 1)?;
    cast::cast_value(&args[0], "Int")
}

fn bi_to_long(args: &[Value]) -> Result<Value, String> {
    arity("to_long", args, 1)?;
    cast::cast_value(&args[0], "Long")
}

fn bi_to_float(args: &[Value]) -> Result<Value, String> {
    arity("to_float", args, 1)?;
    cast::cast_value(&args[0], "Float")
}

fn bi_to_double(args: &[Value]) -> Result<Value, String> {
    arity("to_double", args, 1)?;
    cast::cast_value(&args[0], "Double")
}

fn bi_read_file(args: &[Value]) -> Result<Value, String> {
    arity("read_file", args, 1)?;
    let path = as_string("read_file", &args[0])?;
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Value::String(Rc::from(contents.as_str()))),
        Err(e) => Ok(Value::Error(format!("read_file: {e}"))),
    }
}

fn bi_write_file(args: &[Value]) -> Result<Value, String> {
    arity("write_file", args, 2)?;
    let path = as_string("write_file", &args[0])?;
    let contents = as_string("write_file", &args[1])?;
    match fs::write(path, contents) {
        Ok(()) => Ok(Value::Null),
        Err(e) => Ok(Value::Error(format!("write_file: {e}"))),
    }
}

fn bi_json_parse(args: &[Value]) -> Result<Value, String> {
    arity("json_parse", args, 1)?;
    let text = as_string("json_parse", &args[0])?;
    match json::parse(text) {
        Ok(value) => Ok(value),
        Err(e) => Ok(Value::Error(e)),
    }
}

fn bi_json_stringify(args: &[Value]) -> Result<Value, String> {
    arity("json_stringify", args, 1)?;
    Ok(Value::String(Rc::from(json::stringify(&args[0]).as_str())))
}

/// Ordinal == position == the `OpGetBuiltin` operand, mirroring
/// `bhasha_value::BUILTIN_NAMES` (checked by `ordinals_match_the_shared_name_catalogue`
/// below). `Value::Builtin` holds a `&'static Builtin`, so this table lives
/// as a `static`, not a constructed `Vec`: there is exactly one live
/// instance per built-in for the lifetime of the process.
pub static BUILTINS: [Builtin; 40] = [
    Builtin { name: "print", func: bi_print },
    Builtin { name: "length", func: bi_length },
    Builtin { name: "first", func: bi_first },
    Builtin { name: "last", func: bi_last },
    Builtin { name: "rest", func: bi_rest },
    Builtin { name: "push", func: bi_push },
    Builtin { name: "type", func: bi_type },
    Builtin { name: "split", func: bi_split },
    Builtin { name: "join", func: bi_join },
    Builtin { name: "upper", func: bi_upper },
    Builtin { name: "lower", func: bi_lower },
    Builtin { name: "trim", func: bi_trim },
    Builtin { name: "replace", func: bi_replace },
    Builtin { name: "find", func: bi_find },
    Builtin { name: "pow", func: bi_pow },
    Builtin { name: "sqrt", func: bi_sqrt },
    Builtin { name: "abs", func: bi_abs },
    Builtin { name: "max", func: bi_max },
    Builtin { name: "min", func: bi_min },
    Builtin { name: "round", func: bi_round },
    Builtin { name: "reverse", func: bi_reverse },
    Builtin { name: "sort", func: bi_sort },
    Builtin { name: "keys", func: bi_keys },
    Builtin { name: "values", func: bi_values },
    Builtin { name: "has", func: bi_has },
    Builtin { name: "merge", func: bi_merge },
    Builtin { name: "to_char", func: bi_to_char },
    Builtin { name: "to_string", func: bi_to_string },
    Builtin { name: "parse_int", func: bi_parse_int },
    Builtin { name: "parse_float", func: bi_parse_float },
    Builtin { name: "to_byte", func: bi_to_byte },
    Builtin { name: "to_short", func: bi_to_short },
    Builtin { name: "to_int", func: bi_to_int },
    Builtin { name: "to_long", func: bi_to_long },
    Builtin { name: "to_float", func: bi_to_float },
    Builtin { name: "to_double", func: bi_to_double },
    Builtin { name: "read_file", func: bi_read_file },
    Builtin { name: "write_file", func: bi_write_file },
    Builtin { name: "json_parse", func: bi_json_parse },
    Builtin { name: "json_stringify", func: bi_json_stringify },
];

/// The ordinal `print` lives at, so the VM can special-case it for output
/// redirection without disturbing the rest of the table.
pub const PRINT_ORDINAL: usize = 0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_match_the_shared_name_catalogue() {
        assert_eq!(BUILTINS.len(), BUILTIN_NAMES.len());
        for (i, name) in BUILTIN_NAMES.iter().enumerate() {
            assert_eq!(BUILTINS[i].name, *name, "ordinal {i} name mismatch");
        }
    }

    #[test]
    fn length_rejects_non_string_non_array() {
        assert!(bi_length(&[Value::Integer(5)]).is_err());
    }

    #[test]
    fn push_does_not_mutate_the_original_array() {
        let original = Value::Array(Rc::new(vec![Value::Integer(1)]));
        let result = bi_push(&[original.clone(), Value::Integer(2)]).unwrap();
        assert_eq!(original, Value::Array(Rc::new(vec![Value::Integer(1)])));
        assert_eq!(
            result,
            Value::Array(Rc::new(vec![Value::Integer(1), Value::Integer(2)]))
        );
    }

    #[test]
    fn sort_orders_numerics_across_tags() {
        let arr = Value::Array(Rc::new(vec![Value::Int(3), Value::Byte(1), Value::Long(2)]));
        let sorted = bi_sort(&[arr]).unwrap();
        assert_eq!(
            sorted,
            Value::Array(Rc::new(vec![Value::Byte(1), Value::Long(2), Value::Int(3)]))
        );
    }

    #[test]
    fn merge_prefers_the_right_hand_side_on_collision() {
        let mut left = IndexMap::new();
        let k = Value::String(Rc::from("a"));
        left.insert(k.hash_key().unwrap(), (k.clone(), Value::Integer(1)));
        let mut right = IndexMap::new();
        right.insert(k.hash_key().unwrap(), (k.clone(), Value::Integer(2)));
        let merged = bi_merge(&[
            Value::Hash(Rc::new(HashValue(left))),
            Value::Hash(Rc::new(HashValue(right))),
        ])
        .unwrap();
        let Value::Hash(merged) = merged else { panic!("expected a hash") };
        assert_eq!(merged.0.get(&k.hash_key().unwrap()).unwrap().1, Value::Integer(2));
    }
}
