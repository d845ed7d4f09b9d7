use serde_json::Value;

/// Walk a dot-separated path ("data.items.0.url") through a JSON value.
///
/// Objects are indexed by key, arrays by base-10 index. Returns `None` on the
/// first component that does not match.
pub fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(root, |current, component| match current {
        Value::Object(map) => map.get(component),
        Value::Array(items) => component
            .parse::<usize>()
            .ok()
            .and_then(|index| items.get(index)),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_object() {
        let value = json!({"data": {"url": "https://x/y.jpg"}});
        assert_eq!(lookup(&value, "data.url"), Some(&json!("https://x/y.jpg")));
    }

    #[test]
    fn test_missing_key() {
        let value = json!({"data": {"url": "https://x/y.jpg"}});
        assert_eq!(lookup(&value, "data.missing"), None);
    }

    #[test]
    fn test_array_index() {
        let value = json!({"items": ["a", "b", "c", "d"]});
        assert_eq!(lookup(&value, "items.2"), Some(&json!("c")));
        assert_eq!(lookup(&value, "items.9"), None);
        assert_eq!(lookup(&value, "items.-1"), None);
        assert_eq!(lookup(&value, "items.first"), None);
    }

    #[test]
    fn test_partial_path_returns_container() {
        let value = json!({"data": {"images": [{"url": "u"}]}});
        assert_eq!(lookup(&value, "data.images"), Some(&json!([{"url": "u"}])));
        assert_eq!(lookup(&value, "data.images.0.url"), Some(&json!("u")));
    }

    #[test]
    fn test_descending_into_scalar() {
        let value = json!({"data": "plain"});
        assert_eq!(lookup(&value, "data.url"), None);
    }
}
