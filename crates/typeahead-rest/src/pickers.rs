//! Entity picker presets.
//!
//! Every picker of the console is the same typeahead pointed at a different
//! search endpoint. [`EntityKind`] names the entities, [`display_record`]
//! formats a JSON record as `CODE — Name`, and [`PickerSettings`] lets a
//! deployment override endpoints and limits from a TOML file.
//!
//! ```toml
//! limit = 25
//! term_param = "q"
//!
//! [endpoints]
//! parts = "/inventory/parts/search"
//!
//! [typeahead]
//! min_chars = 2
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use typeahead::{TypeaheadConfig, TypeaheadOptions};

use crate::client::RestClient;
use crate::error::{RestError, Result};
use crate::source::{DEFAULT_TERM_PARAM, RestSearchSource};

/// Separator between code and name in a formatted record.
pub const DISPLAY_SEPARATOR: &str = " — ";

/// The entities that have pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Customers,
    Parts,
    Materials,
    Suppliers,
    Employees,
    Steps,
}

impl EntityKind {
    /// Every entity kind.
    pub const ALL: [EntityKind; 6] = [
        Self::Customers,
        Self::Parts,
        Self::Materials,
        Self::Suppliers,
        Self::Employees,
        Self::Steps,
    ];

    /// The name used in settings files.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Customers => "customers",
            Self::Parts => "parts",
            Self::Materials => "materials",
            Self::Suppliers => "suppliers",
            Self::Employees => "employees",
            Self::Steps => "steps",
        }
    }

    /// The search endpoint used when settings do not override it.
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Self::Customers => "/customers/search",
            Self::Parts => "/parts/search",
            Self::Materials => "/materials/search",
            Self::Suppliers => "/suppliers/search",
            Self::Employees => "/employees/search",
            Self::Steps => "/steps/search",
        }
    }

    /// Record fields that may hold the short code, in order of preference.
    fn code_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Parts => &["part_number", "code"],
            Self::Employees => &["employee_code", "code"],
            _ => &["code"],
        }
    }

    /// Record fields that may hold the human-readable name.
    fn name_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Parts | Self::Materials => &["name", "description"],
            Self::Employees => &["full_name", "name"],
            Self::Steps => &["name", "label"],
            _ => &["name"],
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EntityKind {
    type Err = RestError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| RestError::UnknownEntity(s.to_string()))
    }
}

fn field_text(record: &Value, fields: &[&str]) -> Option<String> {
    fields.iter().find_map(|field| match record.get(field)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Format a record of `kind` as `CODE — Name`.
///
/// Falls back to whichever of code and name is present, then to the record's
/// `id`, then to an empty string.
pub fn display_record(kind: EntityKind, record: &Value) -> String {
    let code = field_text(record, kind.code_fields());
    let name = field_text(record, kind.name_fields());
    match (code, name) {
        (Some(code), Some(name)) => format!("{code}{DISPLAY_SEPARATOR}{name}"),
        (Some(text), None) | (None, Some(text)) => text,
        (None, None) => field_text(record, &["id"]).unwrap_or_default(),
    }
}

/// Deployment overrides for entity pickers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerSettings {
    /// Maximum results requested per search.
    pub limit: usize,
    /// Query parameter carrying the term.
    pub term_param: String,
    /// Endpoint overrides keyed by entity name.
    pub endpoints: HashMap<String, String>,
    /// Typeahead options shared by every picker.
    pub typeahead: TypeaheadOptions,
}

impl Default for PickerSettings {
    fn default() -> Self {
        Self {
            limit: 20,
            term_param: DEFAULT_TERM_PARAM.to_string(),
            endpoints: HashMap::new(),
            typeahead: TypeaheadOptions::default(),
        }
    }
}

impl PickerSettings {
    /// Parse settings from a TOML document. Missing keys take their defaults.
    ///
    /// Endpoint overrides must name a known entity.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let settings: Self = toml::from_str(source)?;
        for name in settings.endpoints.keys() {
            name.parse::<EntityKind>()?;
        }
        Ok(settings)
    }

    /// The endpoint for `kind`.
    pub fn endpoint(&self, kind: EntityKind) -> &str {
        self.endpoints
            .get(kind.name())
            .map(String::as_str)
            .unwrap_or_else(|| kind.default_endpoint())
    }

    /// The search source for `kind`.
    pub fn source(&self, client: &RestClient, kind: EntityKind) -> RestSearchSource<Value> {
        RestSearchSource::new(client.clone(), self.endpoint(kind))
            .term_param(self.term_param.clone())
            .limit(self.limit)
    }

    /// A typeahead config for picking a `kind` record.
    ///
    /// Add `on_pick` before attaching.
    pub fn picker(&self, client: &RestClient, kind: EntityKind) -> TypeaheadConfig<Value> {
        TypeaheadConfig::new()
            .search_source(self.source(client, kind))
            .display_value(move |record: &Value| display_record(kind, record))
            .options(self.typeahead.clone())
    }
}

/// A typeahead config for picking a `kind` record with default settings.
pub fn entity_picker(client: &RestClient, kind: EntityKind) -> TypeaheadConfig<Value> {
    PickerSettings::default().picker(client, kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_code_and_name() {
        let record = json!({"id": 1, "code": "AB", "name": "Able"});
        assert_eq!(display_record(EntityKind::Customers, &record), "AB — Able");
    }

    #[test]
    fn test_display_uses_kind_specific_fields() {
        let part = json!({"id": 7, "part_number": "P-100", "description": "Bracket"});
        assert_eq!(display_record(EntityKind::Parts, &part), "P-100 — Bracket");

        let employee = json!({"employee_code": 42, "full_name": "Dana Reyes"});
        assert_eq!(display_record(EntityKind::Employees, &employee), "42 — Dana Reyes");
    }

    #[test]
    fn test_display_fallbacks() {
        assert_eq!(
            display_record(EntityKind::Suppliers, &json!({"name": "Acme"})),
            "Acme"
        );
        assert_eq!(
            display_record(EntityKind::Suppliers, &json!({"code": "AC", "name": "  "})),
            "AC"
        );
        assert_eq!(display_record(EntityKind::Steps, &json!({"id": 9})), "9");
        assert_eq!(display_record(EntityKind::Steps, &json!("bare")), "");
    }

    #[test]
    fn test_entity_kind_names_round_trip() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.name().parse::<EntityKind>().unwrap(), kind);
        }
        assert!(matches!(
            "widgets".parse::<EntityKind>(),
            Err(RestError::UnknownEntity(name)) if name == "widgets"
        ));
    }

    #[test]
    fn test_settings_from_toml() {
        let settings = PickerSettings::from_toml_str(
            r#"
            limit = 5

            [endpoints]
            parts = "/inventory/parts"

            [typeahead]
            min_chars = 2
            "#,
        )
        .unwrap();

        assert_eq!(settings.limit, 5);
        assert_eq!(settings.term_param, "q");
        assert_eq!(settings.endpoint(EntityKind::Parts), "/inventory/parts");
        assert_eq!(settings.endpoint(EntityKind::Steps), "/steps/search");
        assert_eq!(settings.typeahead.min_chars, 2);
        assert_eq!(settings.typeahead.debounce_ms, 200);
    }

    #[test]
    fn test_settings_reject_unknown_entity() {
        let err = PickerSettings::from_toml_str("[endpoints]\nwidgets = \"/w\"").unwrap_err();
        assert!(matches!(err, RestError::UnknownEntity(_)));
    }
}
