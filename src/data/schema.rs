use std::any::Any;

use serde::{Deserialize, Serialize};

/// One field (column source) of the schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaField {
    pub index: usize,
    pub name: String,
    #[serde(default)]
    pub header: Option<String>,
    #[serde(default)]
    pub default_width: Option<f32>,
}

impl SchemaField {
    pub fn new(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            header: None,
            default_width: None,
        }
    }

    /// Header text, falling back to the field name.
    pub fn header_text(&self) -> &str {
        self.header.as_deref().unwrap_or(&self.name)
    }
}

/// Source of field definitions.
pub trait SchemaServer {
    fn get_fields(&self) -> &[SchemaField];

    fn field_count(&self) -> usize {
        self.get_fields().len()
    }

    /// Downcasting hook, as for [`crate::data::DataServer::as_any_mut`].
    fn as_any_mut(&mut self) -> Option<&mut dyn Any> {
        None
    }
}

/// Schema server backed by a plain list of fields.
#[derive(Debug, Clone, Default)]
pub struct FieldListSchemaServer {
    fields: Vec<SchemaField>,
}

impl FieldListSchemaServer {
    pub fn new(fields: Vec<SchemaField>) -> Self {
        let mut server = Self { fields };
        server.reindex_fields();
        server
    }

    /// Build fields named after `names`, in order.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        Self::new(
            names
                .iter()
                .enumerate()
                .map(|(i, name)| SchemaField::new(i, name.as_ref()))
                .collect(),
        )
    }

    pub fn insert_fields(&mut self, index: usize, fields: Vec<SchemaField>) {
        let index = index.min(self.fields.len());
        self.fields.splice(index..index, fields);
        self.reindex_fields();
    }

    pub fn delete_fields(&mut self, index: usize, count: usize) {
        let start = index.min(self.fields.len());
        let end = index.saturating_add(count).min(self.fields.len());
        self.fields.drain(start..end);
        self.reindex_fields();
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }

    fn reindex_fields(&mut self) {
        for (i, field) in self.fields.iter_mut().enumerate() {
            field.index = i;
        }
    }
}

impl SchemaServer for FieldListSchemaServer {
    fn get_fields(&self) -> &[SchemaField] {
        &self.fields
    }

    fn as_any_mut(&mut self) -> Option<&mut dyn Any> {
        Some(self)
    }
}
