//! Conversion from JSON content objects to records.

use serde_json::{Map, Value};

use reel_core::{Record, Scalar};

/// Scalar properties of a JSON resource object.
///
/// Nested objects are child resources and are not properties. Arrays, nulls
/// and non-integer numbers fall outside the record model and are skipped.
pub fn record_from_object(object: &Map<String, Value>, origin: &str) -> Record {
    let mut record = Record::new();
    for (key, value) in object {
        if value.is_object() {
            continue;
        }
        match Scalar::from_json(value) {
            Some(scalar) => {
                record.insert(key.clone(), scalar);
            }
            None => tracing::debug!(origin, key = %key, "skipping non-scalar property"),
        }
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keeps_scalars_only() {
        let value = json!({
            "jcr:primaryType": "nt:unstructured",
            "jcr:mixinTypes": ["mix:versionable"],
            "title": "Gandhi",
            "year": 1982,
            "rating": 8.1,
            "notes": null,
            "isBestPicture": true,
            "poster": { "jcr:primaryType": "nt:file" }
        });
        let record = record_from_object(value.as_object().unwrap(), "/content/oscars/gandhi");
        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["isBestPicture", "jcr:primaryType", "title", "year"]);
        assert_eq!(record.int_field("year"), Some(1982));
    }
}
