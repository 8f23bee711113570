//! Lenient input normalization
//!
//! The admin forms have sent tags and list fields in several shapes over time.
//! These helpers coerce raw JSON into the stored shapes and never fail.

use serde_json::Value;

use crate::models::{BlogTag, LinkFollow};

/// Separator of the legacy `"name:::url"` tag encoding
const TAG_URL_SEPARATOR: &str = ":::";

/// Coerce one raw tag into a `BlogTag`
///
/// Accepts `"name"`, `"name:::url"` and `{name, url?, follow?}`. Returns `None`
/// for anything without a usable name.
pub fn normalize_tag(value: &Value) -> Option<BlogTag> {
    match value {
        Value::String(s) => {
            let (name, url) = match s.split_once(TAG_URL_SEPARATOR) {
                Some((name, url)) => (name, Some(url)),
                None => (s.as_str(), None),
            };
            tag_from_parts(name, url, None)
        }
        Value::Object(map) => {
            let name = map.get("name").and_then(Value::as_str)?;
            let url = map.get("url").and_then(Value::as_str);
            let follow = map
                .get("follow")
                .and_then(Value::as_str)
                .and_then(|f| f.parse::<LinkFollow>().ok());
            tag_from_parts(name, url, follow)
        }
        _ => None,
    }
}

fn tag_from_parts(name: &str, url: Option<&str>, follow: Option<LinkFollow>) -> Option<BlogTag> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let url = url.map(str::trim).filter(|u| !u.is_empty()).map(str::to_string);

    Some(BlogTag {
        name: name.to_string(),
        url,
        follow,
    })
}

/// Normalize a raw `linkTag` value; anything but an array yields no tags
pub fn normalize_tags(value: &Value) -> Vec<BlogTag> {
    match value {
        Value::Array(items) => items.iter().filter_map(normalize_tag).collect(),
        _ => Vec::new(),
    }
}

/// Names for the legacy `tags` column, `None` when there are no tags
pub fn legacy_tag_names(tags: &[BlogTag]) -> Option<Vec<String>> {
    if tags.is_empty() {
        None
    } else {
        Some(tags.iter().map(|t| t.name.clone()).collect())
    }
}

/// Coerce a form field into a list of strings
///
/// Arrays keep their scalar elements. Any other truthy scalar becomes a
/// one-element list; falsy values (`""`, `0`, `false`, null) and objects
/// become `[""]`.
pub fn lenient_string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(scalar_to_string).collect(),
        v => vec![scalar_to_string(v).filter(|_| is_truthy(v)).unwrap_or_default()],
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Coerce syllabus content into a list of lists of strings
pub fn lenient_syllabus_content(value: &Value) -> Vec<Vec<String>> {
    match value {
        Value::Array(sections) => sections
            .iter()
            .map(|section| match section {
                Value::Array(items) => items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect(),
                _ => vec![String::new()],
            })
            .collect(),
        _ => vec![vec![String::new()]],
    }
}

/// JavaScript-style truthiness, used for "is anything being updated" checks
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_tag_plain_string() {
        assert_eq!(normalize_tag(&json!("  rust ")), Some(BlogTag::named("rust")));
    }

    #[test]
    fn test_normalize_tag_legacy_encoding() {
        let tag = normalize_tag(&json!("Python::: https://python.org ")).unwrap();
        assert_eq!(tag.name, "Python");
        assert_eq!(tag.url.as_deref(), Some("https://python.org"));
        assert_eq!(tag.follow, None);

        let tag = normalize_tag(&json!("Python:::")).unwrap();
        assert_eq!(tag.url, None);
    }

    #[test]
    fn test_normalize_tag_object() {
        let tag = normalize_tag(&json!({"name": "AI", "url": "", "follow": "nofollow"})).unwrap();
        assert_eq!(tag.name, "AI");
        assert_eq!(tag.url, None);
        assert_eq!(tag.follow, Some(LinkFollow::Nofollow));

        let tag = normalize_tag(&json!({"name": "AI", "follow": "maybe"})).unwrap();
        assert_eq!(tag.follow, None);
    }

    #[test]
    fn test_normalize_tag_drops_unusable_values() {
        assert_eq!(normalize_tag(&json!({"name": ""})), None);
        assert_eq!(normalize_tag(&json!({"url": "https://x"})), None);
        assert_eq!(normalize_tag(&json!("   ")), None);
        assert_eq!(normalize_tag(&json!(42)), None);
        assert_eq!(normalize_tag(&Value::Null), None);
    }

    #[test]
    fn test_normalize_tags_non_array() {
        assert!(normalize_tags(&Value::Null).is_empty());
        assert!(normalize_tags(&json!("rust")).is_empty());
        assert_eq!(normalize_tags(&json!(["a", {"name": "b"}, 3])).len(), 2);
    }

    #[test]
    fn test_legacy_tag_names() {
        assert_eq!(legacy_tag_names(&[]), None);
        assert_eq!(
            legacy_tag_names(&[BlogTag::named("a"), BlogTag::named("b")]),
            Some(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn test_lenient_string_list() {
        assert_eq!(lenient_string_list(&json!(["a", 1, true, null, {}])), vec!["a", "1", "true"]);
        assert_eq!(lenient_string_list(&json!("solo")), vec!["solo"]);
        assert_eq!(lenient_string_list(&json!("")), vec![""]);
        assert_eq!(lenient_string_list(&Value::Null), vec![""]);
        assert!(lenient_string_list(&json!([])).is_empty());

        assert_eq!(lenient_string_list(&json!(5)), vec!["5"]);
        assert_eq!(lenient_string_list(&json!(2.5)), vec!["2.5"]);
        assert_eq!(lenient_string_list(&json!(true)), vec!["true"]);
        assert_eq!(lenient_string_list(&json!(0)), vec![""]);
        assert_eq!(lenient_string_list(&json!(false)), vec![""]);
        assert_eq!(lenient_string_list(&json!({"a": 1})), vec![""]);
    }

    #[test]
    fn test_lenient_syllabus_content() {
        assert_eq!(lenient_syllabus_content(&Value::Null), vec![vec![""]]);
        assert_eq!(lenient_syllabus_content(&json!("x")), vec![vec![""]]);
        assert_eq!(
            lenient_syllabus_content(&json!([["a", "b"], "oops", [1, "c"]])),
            vec![vec!["a", "b"], vec![""], vec!["c"]]
        );
    }

    #[test]
    fn test_is_truthy() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(false)));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!(-1.5)));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn normalized_tags_have_trimmed_nonempty_names(raw in proptest::collection::vec(".{0,20}", 0..10)) {
                let value = Value::Array(raw.into_iter().map(Value::String).collect());
                for tag in normalize_tags(&value) {
                    prop_assert!(!tag.name.is_empty());
                    prop_assert_eq!(tag.name.trim(), tag.name.as_str());
                    if let Some(url) = &tag.url {
                        prop_assert!(!url.is_empty());
                        prop_assert_eq!(url.trim(), url.as_str());
                    }
                }
            }

            #[test]
            fn string_arrays_pass_through(items in proptest::collection::vec("[a-z ]{0,10}", 0..8)) {
                let value = Value::Array(items.iter().cloned().map(Value::String).collect());
                prop_assert_eq!(lenient_string_list(&value), items);
            }

            #[test]
            fn legacy_names_mirror_tags(names in proptest::collection::vec("[a-z]{1,8}", 1..6)) {
                let tags: Vec<BlogTag> = names.iter().map(BlogTag::named).collect();
                prop_assert_eq!(legacy_tag_names(&tags), Some(names));
            }
        }
    }
}
