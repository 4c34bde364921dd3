//! Cache Key Derivation
//!
//! Keys are `<namespace>:<canonical JSON of the query shape>`. Object keys
//! are emitted in sorted order at every depth, so two shapes that differ
//! only in parameter order always produce the same key.

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

/// Builds the cache key for a query shape under `namespace`.
pub fn query_key<T: Serialize + ?Sized>(namespace: &str, shape: &T) -> Result<String> {
    let value = serde_json::to_value(shape)?;
    let mut key = String::with_capacity(namespace.len() + 32);
    key.push_str(namespace);
    key.push(':');
    write_canonical(&value, &mut key)?;
    Ok(key)
}

/// Writes `value` with object keys sorted, independent of the map
/// implementation serde_json was built with.
fn write_canonical(value: &Value, out: &mut String) -> Result<()> {
    match value {
        Value::Object(map) => {
            let mut fields: Vec<(&String, &Value)> = map.iter().collect();
            fields.sort_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (i, (name, field)) in fields.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&serde_json::to_string(name)?);
                out.push(':');
                write_canonical(field, out)?;
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out)?;
            }
            out.push(']');
        }
        scalar => out.push_str(&serde_json::to_string(scalar)?),
    }
    Ok(())
}
