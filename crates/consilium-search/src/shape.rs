//! Response-shape probing helpers shared by the two engines.

use serde_json::Value;

/// Accumulator threaded through recursive page fetches, passed and returned
/// by value. `records` never holds two structurally-equal entries after a
/// page step completes; first-occurrence order is preserved.
#[derive(Debug, Default)]
pub(crate) struct PageAccumulator {
    pub records: Vec<Value>,
    /// Server-reported total, captured from the first page that declares it.
    pub total: u64,
}

impl PageAccumulator {
    /// Record the declared total if it has not been captured yet.
    pub fn note_total(&mut self, response: &Value) {
        if self.total == 0 {
            self.total = response
                .get("qtdRegistrosTotal")
                .and_then(Value::as_u64)
                .unwrap_or(0);
        }
    }

    /// Whether the accumulated count is still short of the declared total.
    pub fn is_short(&self) -> bool {
        (self.records.len() as u64) < self.total
    }
}

/// The named field, when it holds a non-empty array.
pub(crate) fn non_empty_array<'a>(value: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    value
        .get(key)
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
}

/// Whether the field is present with a non-null, non-empty string value.
pub(crate) fn has_text(value: &Value, key: &str) -> bool {
    text(value, key).is_some()
}

/// The field's string value, when non-null and non-empty.
pub(crate) fn text<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}
