//! Structural deduplication of raw records.
//!
//! Two records count as duplicates only when every key and value match
//! exactly, independent of key order. Each record is projected onto a
//! canonical string with object keys serialised in sorted order, and the
//! canonical strings are collected in a seen-set. The records this pass
//! sees hold scalar values; nested arrays and objects are canonicalised
//! recursively all the same.

use std::collections::HashSet;

use serde_json::Value;

/// Drop structural duplicates, keeping the first occurrence of each record
/// in its original position.
pub(crate) fn dedup_records(records: Vec<Value>) -> Vec<Value> {
    let mut seen = HashSet::with_capacity(records.len());
    let mut unique = Vec::with_capacity(records.len());
    for record in records {
        if seen.insert(canonical_key(&record)) {
            unique.push(record);
        }
    }
    unique
}

/// Canonical identity of a record: its JSON rendering with object keys in
/// sorted order at every level.
pub(crate) fn canonical_key(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::from(key.as_str()).to_string());
                out.push(':');
                write_canonical(&map[key.as_str()], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        other => out.push_str(&other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn key_order_does_not_matter() {
        let a = json!({"numero": "1", "classe": "Cível"});
        let b = json!({"classe": "Cível", "numero": "1"});
        assert_eq!(canonical_key(&a), canonical_key(&b));
    }

    #[test]
    fn differing_values_differ() {
        let a = json!({"numero": "1"});
        let b = json!({"numero": "2"});
        assert_ne!(canonical_key(&a), canonical_key(&b));
    }

    #[test]
    fn extra_key_differs() {
        let a = json!({"numero": "1"});
        let b = json!({"numero": "1", "classe": "Cível"});
        assert_ne!(canonical_key(&a), canonical_key(&b));
    }

    #[test]
    fn nested_values_canonicalised() {
        let a = json!({"partes": [{"nome": "A", "tipo": "Autor"}]});
        let b = json!({"partes": [{"tipo": "Autor", "nome": "A"}]});
        assert_eq!(canonical_key(&a), canonical_key(&b));
    }

    #[test]
    fn first_occurrence_order_preserved() {
        let records = vec![
            json!({"numero": "1"}),
            json!({"numero": "2"}),
            json!({"numero": "1"}),
            json!({"numero": "3"}),
            json!({"numero": "2"}),
        ];
        let unique = dedup_records(records);
        let numbers: Vec<&str> = unique
            .iter()
            .map(|r| r["numero"].as_str().unwrap())
            .collect();
        assert_eq!(numbers, ["1", "2", "3"]);
    }

    #[test]
    fn dedup_is_idempotent() {
        let records = vec![json!({"numero": "1"}), json!({"numero": "2"})];
        let once = dedup_records(records.clone());
        let twice = dedup_records(once.clone());
        assert_eq!(once.len(), twice.len());
    }
}
