//! Answer sets and the merge rules between presets, overrides and prompts

use serde_json::{Map, Value};

/// Mapping of question keys to collected or derived values
pub type AnswerSet = Map<String, Value>;

/// Recursively merge `overlay` into `base`
///
/// Objects merge key by key; arrays and scalars in `overlay` replace what
/// `base` holds.
pub fn deep_merge(base: &mut AnswerSet, overlay: AnswerSet) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                deep_merge(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Return a merged copy, `overlay` winning on conflicts
pub fn merged(base: &AnswerSet, overlay: &AnswerSet) -> AnswerSet {
    let mut out = base.clone();
    deep_merge(&mut out, overlay.clone());
    out
}

/// Keep only the listed top-level keys; listed keys that are absent are omitted
pub fn pick_keys(answers: &AnswerSet, keys: &[String]) -> AnswerSet {
    keys.iter()
        .filter_map(|k| answers.get(k).map(|v| (k.clone(), v.clone())))
        .collect()
}

/// Look up a dotted path such as `author.name`
pub fn get_path<'a>(answers: &'a AnswerSet, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let mut current = answers.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

/// Insert a value at a dotted path, creating intermediate objects
pub fn set_path(answers: &mut AnswerSet, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            answers.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let entry = answers
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(inner) = entry {
                set_path(inner, rest, value);
            }
        }
    }
}

/// Handlebars-style truthiness
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(_) => true,
    }
}

/// Parse a `key=value` override
///
/// The value is read as JSON when it parses (`true`, `3`, `["a"]`), otherwise
/// it is kept as a plain string. Dotted keys create nested objects.
pub fn parse_override(pair: &str) -> Option<(String, Value)> {
    let (key, raw) = pair.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Some((key.to_string(), value))
}

/// Build an answer set from `key=value` pairs
pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = &'a str>) -> Result<AnswerSet, String> {
    let mut answers = AnswerSet::new();
    for pair in pairs {
        let (key, value) =
            parse_override(pair).ok_or_else(|| format!("Expected key=value, got '{}'", pair))?;
        set_path(&mut answers, &key, value);
    }
    Ok(answers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> AnswerSet {
        match v {
            Value::Object(m) => m,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_override_wins_and_keys_combine() {
        let preset = obj(json!({"a": 1, "b": 2}));
        let overrides = obj(json!({"b": 3, "c": 4}));
        assert_eq!(
            merged(&preset, &overrides),
            obj(json!({"a": 1, "b": 3, "c": 4}))
        );
    }

    #[test]
    fn test_nested_objects_merge_recursively() {
        let mut base = obj(json!({"author": {"name": "ana", "email": "a@x.io"}, "tags": [1, 2]}));
        deep_merge(
            &mut base,
            obj(json!({"author": {"email": "b@x.io"}, "tags": [3]})),
        );
        assert_eq!(
            base,
            obj(json!({"author": {"name": "ana", "email": "b@x.io"}, "tags": [3]}))
        );
    }

    #[test]
    fn test_scalar_replaces_object() {
        let mut base = obj(json!({"db": {"host": "localhost"}}));
        deep_merge(&mut base, obj(json!({"db": false})));
        assert_eq!(base, obj(json!({"db": false})));
    }

    #[test]
    fn test_pick_keys_omits_missing() {
        let answers = obj(json!({"a": 1, "b": 2}));
        let picked = pick_keys(&answers, &["a".to_string(), "zzz".to_string()]);
        assert_eq!(picked, obj(json!({"a": 1})));
    }

    #[test]
    fn test_dotted_paths() {
        let mut answers = AnswerSet::new();
        set_path(&mut answers, "author.name", json!("ana"));
        set_path(&mut answers, "name", json!("app"));
        assert_eq!(get_path(&answers, "author.name"), Some(&json!("ana")));
        assert_eq!(get_path(&answers, "author.missing"), None);
        assert_eq!(get_path(&answers, "name.deeper"), None);
    }

    #[test]
    fn test_parse_override_values() {
        assert_eq!(
            parse_override("port=8080"),
            Some(("port".to_string(), json!(8080)))
        );
        assert_eq!(
            parse_override("name=my-app"),
            Some(("name".to_string(), json!("my-app")))
        );
        assert_eq!(
            parse_override("msg=a=b"),
            Some(("msg".to_string(), json!("a=b")))
        );
        assert_eq!(parse_override("novalue"), None);
        assert_eq!(parse_override("=x"), None);
    }

    #[test]
    fn test_from_pairs_nests() {
        let answers = from_pairs(["author.name=ana", "private=true"]).unwrap();
        assert_eq!(answers, obj(json!({"author": {"name": "ana"}, "private": true})));
        assert!(from_pairs(["broken"]).is_err());
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!([])));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!({})));
    }
}
