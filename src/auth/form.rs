//! Form field extraction from portal pages.

use scraper::{Html, Selector};

/// The name/value payload of an HTML form submission.
///
/// Pairs keep document order; inserting an existing name overwrites its value
/// in place, the way a browser serializes same-named elements (e.g. radio
/// groups).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    fields: Vec<(String, String)>,
}

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, overwriting the value of an earlier field with the
    /// same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Pairs in document order, ready for URL-encoded submission.
    pub fn as_slice(&self) -> &[(String, String)] {
        &self.fields
    }
}

/// Extract every `<input>`'s name/value from a parsed page, in document
/// order, last name wins. Inputs without a `value` attribute contribute an
/// empty string; unnamed inputs are skipped.
pub fn extract_inputs(document: &Html) -> FormFields {
    let mut fields = FormFields::new();
    let Ok(selector) = Selector::parse("input") else {
        return fields;
    };

    for input in document.select(&selector) {
        if let Some(name) = input.value().attr("name") {
            fields.insert(name, input.value().attr("value").unwrap_or(""));
        }
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> FormFields {
        extract_inputs(&Html::parse_document(html))
    }

    #[test]
    fn extracts_inputs_in_document_order() {
        let fields = extract(
            r#"<form>
                <input name="a" value="1">
                <input name="b" value="2">
                <input name="c">
            </form>"#,
        );
        assert_eq!(
            fields.as_slice(),
            &[
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string()),
                ("c".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn later_duplicate_name_wins() {
        let fields = extract(
            r#"<input name="x" value="a"><input name="x" value="b">"#,
        );
        assert_eq!(fields.get("x"), Some("b"));
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn unnamed_inputs_are_skipped() {
        let fields = extract(r#"<input value="orphan"><input name="y" value="1">"#);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("y"), Some("1"));
    }

    #[test]
    fn extraction_is_idempotent() {
        let html = r#"<input name="a" value="1"><input name="a" value="2"><input name="b">"#;
        assert_eq!(extract(html), extract(html));
    }

    #[test]
    fn handles_unclosed_void_inputs() {
        // The portal's markup never closes <input>; siblings must not nest.
        let fields = extract(r#"<form><input name="a" value="1"><input name="b" value="2"></form>"#);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get("b"), Some("2"));
    }

    #[test]
    fn insert_overwrites_in_place() {
        let mut fields = FormFields::new();
        fields.insert("first", "1");
        fields.insert("second", "2");
        fields.insert("first", "updated");
        assert_eq!(
            fields.as_slice(),
            &[
                ("first".to_string(), "updated".to_string()),
                ("second".to_string(), "2".to_string()),
            ]
        );
    }
}
