use serde_json::{Map, Number, Value};

use crate::error::{PathError, Result};
use crate::tree::{Compound, Scalar, Tag};

/// Convert a tag tree to JSON. Numeric types collapse to JSON numbers;
/// non-finite floats become `null`.
pub fn to_json(tag: &Tag) -> Value {
    match tag {
        Tag::Compound(map) => Value::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), to_json(value)))
                .collect::<Map<String, Value>>(),
        ),
        Tag::List(items) => Value::Array(items.iter().map(to_json).collect()),
        Tag::Scalar(scalar) => match scalar {
            Scalar::Byte(v) => Value::from(*v),
            Scalar::Short(v) => Value::from(*v),
            Scalar::Int(v) => Value::from(*v),
            Scalar::Long(v) => Value::from(*v),
            Scalar::Float(v) => float_value(f64::from(*v)),
            Scalar::Double(v) => float_value(*v),
            Scalar::String(s) => Value::String(s.clone()),
        },
    }
}

fn float_value(v: f64) -> Value {
    Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
}

/// Convert JSON into a tag tree.
///
/// Booleans become bytes, integers become ints (longs when they do not fit),
/// other numbers become doubles. `null` has no tag equivalent.
pub fn from_json(value: &Value) -> Result<Tag> {
    match value {
        Value::Null => Err(PathError::Json("null has no tag equivalent".to_string())),
        Value::Bool(b) => Ok(Tag::byte(i8::from(*b))),
        Value::Number(n) => number_to_tag(n),
        Value::String(s) => Ok(Tag::string(s.clone())),
        Value::Array(items) => items
            .iter()
            .map(from_json)
            .collect::<Result<Vec<_>>>()
            .map(Tag::List),
        Value::Object(map) => {
            let mut compound = Compound::new();
            for (key, value) in map {
                compound.insert(key.clone(), from_json(value)?);
            }
            Ok(Tag::Compound(compound))
        }
    }
}

fn number_to_tag(n: &Number) -> Result<Tag> {
    if let Some(i) = n.as_i64() {
        return Ok(match i32::try_from(i) {
            Ok(small) => Tag::int(small),
            Err(_) => Tag::long(i),
        });
    }
    n.as_f64()
        .map(Tag::double)
        .ok_or_else(|| PathError::Json(format!("number out of range: {}", n)))
}
