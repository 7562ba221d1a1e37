use std::borrow::Cow;

use serde_json::Value;

/// Replacement written over sensitive values.
pub const MASK: &str = "********";

/// Masks sensitive fields in a JSON body.
///
/// Bodies that are not valid JSON come back untouched (borrowed). Valid JSON
/// is re-serialized in compact form with every matching key's value replaced
/// by [`MASK`].
pub fn mask_sensitive_data<'a>(data: &'a [u8], mask_fields: &[String]) -> Cow<'a, [u8]> {
    if data.is_empty() || mask_fields.is_empty() {
        return Cow::Borrowed(data);
    }

    let Ok(mut value) = serde_json::from_slice::<Value>(data) else {
        return Cow::Borrowed(data);
    };

    mask_json_value(&mut value, mask_fields);

    match serde_json::to_vec(&value) {
        Ok(masked) => Cow::Owned(masked),
        Err(_) => Cow::Borrowed(data),
    }
}

/// Recursively masks matching keys in a JSON value.
///
/// Key comparison is case-insensitive. A masked key's value is replaced
/// wholesale, so nested objects under it are not visited.
pub fn mask_json_value(value: &mut Value, mask_fields: &[String]) {
    match value {
        Value::Object(map) => {
            for (key, child) in map.iter_mut() {
                if mask_fields.iter().any(|f| f.eq_ignore_ascii_case(key)) {
                    *child = Value::String(MASK.to_string());
                } else {
                    mask_json_value(child, mask_fields);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                mask_json_value(item, mask_fields);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::audit::DEFAULT_MASK_FIELDS;

    fn fields() -> Vec<String> {
        DEFAULT_MASK_FIELDS.iter().map(|f| f.to_string()).collect()
    }

    fn masked(input: Value) -> Value {
        let bytes = serde_json::to_vec(&input).unwrap();
        serde_json::from_slice(&mask_sensitive_data(&bytes, &fields())).unwrap()
    }

    #[test]
    fn masks_top_level_keys() {
        assert_eq!(
            masked(json!({"user": "alice", "password": "hunter2"})),
            json!({"user": "alice", "password": MASK})
        );
    }

    #[test]
    fn key_match_ignores_case() {
        assert_eq!(
            masked(json!({"Password": "x", "API_KEY": "y"})),
            json!({"Password": MASK, "API_KEY": MASK})
        );
    }

    #[test]
    fn masks_nested_objects_and_arrays() {
        let input = json!({
            "profile": {"secret": "s", "name": "bob"},
            "sessions": [{"token": "t1"}, {"token": "t2", "device": "phone"}],
            "matrix": [[{"secret": "deep"}]]
        });
        let expected = json!({
            "profile": {"secret": MASK, "name": "bob"},
            "sessions": [{"token": MASK}, {"token": MASK, "device": "phone"}],
            "matrix": [[{"secret": MASK}]]
        });
        assert_eq!(masked(input), expected);
    }

    #[test]
    fn masks_object_valued_field_entirely() {
        assert_eq!(
            masked(json!({"authorization": {"scheme": "Bearer", "value": "abc"}})),
            json!({"authorization": MASK})
        );
    }

    #[test]
    fn masks_inside_top_level_array() {
        assert_eq!(
            masked(json!([{"id": 1, "token": "x"}])),
            json!([{"id": 1, "token": MASK}])
        );
    }

    #[test]
    fn non_json_is_returned_as_is() {
        let data = b"password=hunter2&user=alice";
        let out = mask_sensitive_data(data, &fields());
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out.as_ref(), data);
    }

    #[test]
    fn empty_body_is_returned_as_is() {
        assert!(mask_sensitive_data(b"", &fields()).is_empty());
    }

    #[test]
    fn no_fields_leaves_body_untouched() {
        let data = br#"{"password":"x"}"#;
        assert_eq!(mask_sensitive_data(data, &[]).as_ref(), data);
    }
}
