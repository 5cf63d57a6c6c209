use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

fn default_indexed() -> bool {
    true
}

/// Per-field options relevant to term access.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldEntry {
    pub name: String,

    /// Whether the field carries an inverted term dictionary. Joining on a
    /// field requires it.
    #[serde(default = "default_indexed")]
    pub indexed: bool,

    /// Value prefix shared by every term of this field. When present, term
    /// enumeration over the field is restricted to terms carrying it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_prefix: Option<String>,
}

impl FieldEntry {
    pub fn new<T: Into<String>>(name: T) -> Self {
        Self { name: name.into(), indexed: true, term_prefix: None }
    }

    pub fn with_term_prefix<T: Into<String>>(mut self, prefix: T) -> Self {
        self.term_prefix = Some(prefix.into());
        self
    }

    pub fn not_indexed(mut self) -> Self {
        self.indexed = false;
        self
    }
}

/// The set of fields an index accepts documents for.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Schema {
    fields: BTreeMap<String, FieldEntry>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_field(&mut self, entry: FieldEntry) -> &mut Self {
        self.fields.insert(entry.name.clone(), entry);
        self
    }

    pub fn get_field(&self, name: &str) -> Option<&FieldEntry> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldEntry> {
        self.fields.values()
    }
}
