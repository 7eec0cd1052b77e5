//! Codecs for the label lists stored in text columns.
//!
//! Child interests and subjects are stored as a JSON array of strings.
//! Review reactions are stored comma-separated. Decoding never fails: older
//! rows holding plain text decode to a one-element list, and truncated JSON
//! decodes to an empty list.

use serde_json::Value;

/// Trim, drop empty entries and de-duplicate by exact match, keeping the
/// first occurrence of each label.
pub fn normalize_labels<I, S>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for label in labels {
        let label = label.as_ref().trim();
        if label.is_empty() || out.iter().any(|l| l == label) {
            continue;
        }
        out.push(label.to_string());
    }
    out
}

/// Split a comma-separated form field ("Space, Soccer,,Art") into labels.
pub fn split_labels(input: &str) -> Vec<String> {
    normalize_labels(input.split(','))
}

/// Encode an ordered label list as a JSON array.
pub fn encode_list(labels: &[String]) -> String {
    serde_json::to_string(labels).unwrap_or_else(|_| "[]".to_string())
}

/// Decode a stored label list.
///
/// - a JSON array yields its string elements in order
/// - a bare JSON scalar or plain text (`Space`) yields a one-element list
/// - absent, null, objects and broken JSON yield an empty list
pub fn decode_list(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Vec::new();
    };

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items.into_iter().filter_map(scalar_to_string).collect(),
        Ok(value) => scalar_to_string(value).into_iter().collect(),
        Err(_) if !raw.starts_with(&['[', '{', '"'][..]) => vec![raw.to_string()],
        Err(err) => {
            tracing::warn!(error = %err, "Discarding malformed label list");
            Vec::new()
        }
    }
}

/// Encode review reactions as comma-separated text.
///
/// Commas inside a label would split it on the way back, so they are
/// removed. Returns `None` when there is nothing to store.
pub fn encode_reactions(reactions: &[String]) -> Option<String> {
    let cleaned = normalize_labels(reactions.iter().map(|r| r.replace(',', "")));
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.join(","))
    }
}

/// Decode comma-separated review reactions.
pub fn decode_reactions(raw: Option<&str>) -> Vec<String> {
    raw.map(split_labels).unwrap_or_default()
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_list_round_trip() {
        for list in [labels(&[]), labels(&["Space"]), labels(&["Space", "Soccer", "Art"])] {
            assert_eq!(decode_list(Some(&encode_list(&list))), list);
        }
    }

    #[test]
    fn test_decode_bare_string() {
        assert_eq!(decode_list(Some("\"Dinosaurs\"")), labels(&["Dinosaurs"]));
        assert_eq!(decode_list(Some("7")), labels(&["7"]));
    }

    #[test]
    fn test_decode_malformed_or_absent() {
        assert!(decode_list(None).is_empty());
        assert!(decode_list(Some("")).is_empty());
        assert!(decode_list(Some("null")).is_empty());
        assert!(decode_list(Some("{\"a\":1}")).is_empty());
        assert!(decode_list(Some("[\"Space\",")).is_empty());
        assert!(decode_list(Some("{\"a\":")).is_empty());
    }

    #[test]
    fn test_decode_plain_text_keeps_value() {
        assert_eq!(decode_list(Some("Space")), labels(&["Space"]));
        assert_eq!(decode_list(Some("  Ancient Egypt ")), labels(&["Ancient Egypt"]));
    }

    #[test]
    fn test_decode_array_skips_non_scalars() {
        assert_eq!(
            decode_list(Some("[\"Space\", null, {\"x\": 1}, \"Art\"]")),
            labels(&["Space", "Art"])
        );
    }

    #[test]
    fn test_normalize_dedupes_in_order() {
        assert_eq!(
            normalize_labels(["Space", " Soccer ", "", "Space", "space"]),
            labels(&["Space", "Soccer", "space"])
        );
        assert_eq!(split_labels("Art, Music,,Art"), labels(&["Art", "Music"]));
    }

    #[test]
    fn test_reactions() {
        let encoded = encode_reactions(&labels(&["😀", "🤔", "😀", "a,b"])).unwrap();
        assert_eq!(encoded, "😀,🤔,ab");
        assert_eq!(decode_reactions(Some(&encoded)), labels(&["😀", "🤔", "ab"]));
        assert_eq!(encode_reactions(&labels(&["", " "])), None);
        assert!(decode_reactions(None).is_empty());
    }
}
