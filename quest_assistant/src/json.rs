use serde_json::Value;

pub fn attribute_from_value(value: &Value, attribute: &str) -> Option<String> {
    let element = value[attribute].as_str()?;
    if element.is_empty() {
        return None;
    }
    Some(String::from(element))
}

// "2024-01-01T10:00:00.000Z" -> "2024-01-01 10:00:00"; absent -> "Never".
pub fn display_timestamp(value: &Value, attribute: &str) -> String {
    match attribute_from_value(value, attribute) {
        Some(raw) => {
            let spaced = raw.replace('T', " ");
            spaced.split('.').next().unwrap_or("").to_string()
        }
        None => String::from("Never"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn attribute_is_none_for_missing_or_empty() {
        let value = json!({ "name": "", "count": 3 });
        assert_eq!(attribute_from_value(&value, "name"), None);
        assert_eq!(attribute_from_value(&value, "count"), None);
        assert_eq!(attribute_from_value(&value, "absent"), None);
    }

    #[test]
    fn display_timestamp_normalizes_iso_form() {
        let value = json!({ "lastCompletedAt": "2024-01-01T10:00:00.000Z" });
        assert_eq!(display_timestamp(&value, "lastCompletedAt"), "2024-01-01 10:00:00");
    }

    #[test]
    fn display_timestamp_without_fraction_keeps_seconds() {
        let value = json!({ "at": "2024-01-01T10:00:00" });
        assert_eq!(display_timestamp(&value, "at"), "2024-01-01 10:00:00");
    }

    #[test]
    fn display_timestamp_absent_is_never() {
        let value = json!({ "at": null });
        assert_eq!(display_timestamp(&value, "at"), "Never");
        assert_eq!(display_timestamp(&json!({}), "at"), "Never");
    }
}
