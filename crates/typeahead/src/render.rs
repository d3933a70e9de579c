//! Turning suggestion items into overlay rows.

use std::fmt;

use crate::overlay::Row;

/// Markup for one suggestion row.
///
/// The default renderer produces [`RowMarkup::escaped`] markup from the
/// item's display value. A caller-supplied renderer may return
/// [`RowMarkup::trusted`] markup, which overlay surfaces render verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RowMarkup(String);

impl RowMarkup {
    /// Markup showing `text` literally, with markup metacharacters escaped.
    pub fn escaped(text: &str) -> Self {
        Self(escape_markup(text))
    }

    /// Markup taken verbatim from the caller.
    ///
    /// No escaping is applied. Any data interpolated into `markup` must
    /// already be escaped by the caller.
    pub fn trusted(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    /// The markup as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the markup string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RowMarkup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Escape `&`, `<`, `>`, `"` and `'` for inclusion in markup.
pub fn escape_markup(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Build panel rows for `items`.
///
/// An empty list yields a single non-interactive empty-state row.
pub(crate) fn render_rows<T>(
    items: &[T],
    render_item: &(dyn Fn(&T) -> RowMarkup + Send + Sync),
    empty_label: &str,
) -> Vec<Row> {
    if items.is_empty() {
        return vec![Row::Empty {
            label: empty_label.to_string(),
        }];
    }

    items
        .iter()
        .enumerate()
        .map(|(index, item)| Row::Item {
            index,
            markup: render_item(item),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_markup() {
        assert_eq!(
            escape_markup(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape_markup("AB — Able"), "AB — Able");
    }

    #[test]
    fn test_trusted_markup_is_verbatim() {
        let markup = RowMarkup::trusted("<b>AB</b>");
        assert_eq!(markup.as_str(), "<b>AB</b>");
    }

    #[test]
    fn test_render_rows_empty_state() {
        let render = |item: &String| RowMarkup::escaped(item);
        let rows = render_rows::<String>(&[], &render, "No matches");
        assert_eq!(
            rows,
            vec![Row::Empty {
                label: "No matches".to_string()
            }]
        );
    }

    #[test]
    fn test_render_rows_one_per_item_in_order() {
        let render = |item: &String| RowMarkup::escaped(item);
        let items = vec!["b".to_string(), "a".to_string(), "a".to_string()];
        let rows = render_rows(&items, &render, "No matches");

        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0],
            Row::Item {
                index: 0,
                markup: RowMarkup::escaped("b")
            }
        );
        assert_eq!(
            rows[2],
            Row::Item {
                index: 2,
                markup: RowMarkup::escaped("a")
            }
        );
    }
}
