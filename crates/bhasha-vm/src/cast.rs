//! The numeric/string conversion table shared by `OpTypeCast` and the
//! `to_byte`/`to_short`/.../`to_double` built-ins (spec.md §4.7 "Type
//! operations").

use std::rc::Rc;

use bhasha_value::Value;

fn numeric_to_i64(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| value.as_f64().map(|f| f as i64))
}

fn numeric_to_f64(value: &Value) -> Option<f64> {
    value.as_f64()
}

fn cast_err(value: &Value, target: &str) -> String {
    format!(
        "cannot cast {} ({}) to {target}",
        value.inspect(),
        value.type_name()
    )
}

/// If `value` already has the tag named by `target`, the cast is the
/// identity (spec.md §4.7 "If `v` already has the target tag...").
pub fn cast_value(value: &Value, target: &str) -> Result<Value, String> {
    if value.type_name() == target {
        return Ok(value.clone());
    }
    match target {
        "Byte" => numeric_to_i64(value)
            .filter(|n| (0..=255).contains(n))
            .map(|n| Value::Byte(n as u8))
            .ok_or_else(|| cast_err(value, target)),
        "Short" => numeric_to_i64(value)
            .filter(|n| (-32768..=32767).contains(n))
            .map(|n| Value::Short(n as i16))
            .ok_or_else(|| cast_err(value, target)),
        "Int" => numeric_to_i64(value)
            .filter(|n| (i32::MIN as i64..=i32::MAX as i64).contains(n))
            .map(|n| Value::Int(n as i32))
            .ok_or_else(|| cast_err(value, target)),
        "Long" => numeric_to_i64(value)
            .map(Value::Long)
            .ok_or_else(|| cast_err(value, target)),
        "Float" => numeric_to_f64(value)
            .map(|f| Value::Float(f as f32))
            .ok_or_else(|| cast_err(value, target)),
        "Double" => numeric_to_f64(value)
            .map(Value::Double)
            .ok_or_else(|| cast_err(value, target)),
        "String" => Ok(Value::String(Rc::from(value.inspect()))),
        "Char" => {
            if let Value::String(s) = value {
                let mut chars = s.chars();
                if let (Some(c), None) = (chars.next(), chars.next()) {
                    return Ok(Value::Char(c));
                }
            }
            Err(cast_err(value, target))
        }
        other => Err(format!("unknown cast target '{other}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widens_byte_to_long() {
        assert_eq!(cast_value(&Value::Byte(5), "Long"), Ok(Value::Long(5)));
    }

    #[test]
    fn out_of_range_byte_cast_errors() {
        assert!(cast_value(&Value::Integer(-1), "Byte").is_err());
        assert!(cast_value(&Value::Integer(300), "Byte").is_err());
    }

    #[test]
    fn single_scalar_string_casts_to_char() {
        assert_eq!(
            cast_value(&Value::String(Rc::from("a")), "Char"),
            Ok(Value::Char('a'))
        );
        assert!(cast_value(&Value::String(Rc::from("ab")), "Char").is_err());
    }

    #[test]
    fn identity_cast_is_a_no_op() {
        assert_eq!(cast_value(&Value::Int(5), "Int"), Ok(Value::Int(5)));
    }

    #[test]
    fn any_value_casts_to_string_via_inspect() {
        assert_eq!(
            cast_value(&Value::Bool(true), "String"),
            Ok(Value::String(Rc::from("true")))
        );
    }
}
