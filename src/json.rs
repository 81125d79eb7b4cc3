//! JSON view of normalized records.
//!
//! A record becomes a JSON object with one member per field, in file order.
//! Single-valued fields are strings and splittable fields are arrays of
//! strings. [`record_to_json`] adds the derived values under `record_id`
//! and `author_address` when they can be computed.
//!
//! # Examples
//!
//! ```
//! use wosfile::{json, RawRecord, Record};
//!
//! let mut raw = RawRecord::new();
//! raw.insert("AU".to_string(), "Doe, J; Foo, B".to_string());
//! raw.insert("PY".to_string(), "2016".to_string());
//! let record = Record::from_raw(&raw);
//!
//! let value = json::record_to_json(&record)?;
//! assert_eq!(value["fields"]["AU"][1], "Foo, B");
//! assert_eq!(value["record_id"], "Doe J, 2016");
//! # Ok::<(), wosfile::WosError>(())
//! ```

use crate::error::{Result, WosError};
use crate::record::Record;
use log::debug;
use serde_json::{json, Value};

/// Convert a record to JSON, including its derived values.
///
/// The result has the shape
///
/// ```json
/// {"fields": {"PT": "J", "AU": ["Doe, J"]}, "record_id": "Doe J", "author_address": null}
/// ```
///
/// `record_id` is `null` for records without an author. `author_address` is
/// `null` when the record has no address field or the field cannot be
/// parsed.
///
/// # Errors
///
/// Returns an error if the fields cannot be serialized.
pub fn record_to_json(record: &Record) -> Result<Value> {
    let fields = fields_to_json(record)?;

    let record_id = match record.record_id() {
        Ok(id) => Value::String(id),
        Err(err) => {
            debug!("no record id: {err}");
            Value::Null
        },
    };
    let author_address = match record.author_address() {
        Ok(Some(mapping)) => serde_json::to_value(mapping).map_err(serialization_error)?,
        Ok(None) => Value::Null,
        Err(err) => {
            debug!("address field not parsed: {err}");
            Value::Null
        },
    };

    Ok(json!({
        "fields": fields,
        "record_id": record_id,
        "author_address": author_address,
    }))
}

/// Convert only the fields of a record to a JSON object.
///
/// # Errors
///
/// Returns an error if the fields cannot be serialized.
pub fn fields_to_json(record: &Record) -> Result<Value> {
    serde_json::to_value(record).map_err(serialization_error)
}

/// Render a record as a JSON string.
///
/// # Errors
///
/// Returns an error if the record cannot be serialized.
pub fn record_to_json_string(record: &Record, pretty: bool) -> Result<String> {
    let value = record_to_json(record)?;
    let text = if pretty {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    };
    text.map_err(serialization_error)
}

fn serialization_error(err: serde_json::Error) -> WosError {
    WosError::Json(err)
}
