use std::sync::Arc;

use super::ConfigSource;
use crate::value::{FileFormat, Map, ValueOrigin, WithOrigin};

/// JSON-based configuration source.
#[derive(Debug)]
pub struct Json {
    origin: Arc<ValueOrigin>,
    inner: Map,
}

impl Json {
    /// Creates an empty JSON source with the specified name.
    pub fn empty(filename: &str) -> Self {
        Self::new(filename, serde_json::Map::default())
    }

    /// Creates a source with the specified name and contents.
    pub fn new(filename: &str, object: serde_json::Map<String, serde_json::Value>) -> Self {
        let origin = Arc::new(ValueOrigin::File {
            name: filename.to_owned(),
            format: FileFormat::Json,
        });
        let inner = object
            .into_iter()
            .map(|(key, value)| {
                let value = WithOrigin::from_json(value, &origin, key.clone());
                (key, value)
            })
            .collect();
        Self { origin, inner }
    }

    /// Inserts a value at the top level of the source, replacing an existing value if any.
    ///
    /// # Panics
    ///
    /// Panics if serializing `value` to the JSON object model fails.
    pub fn insert(&mut self, key: &str, value: impl serde::Serialize) {
        let value = serde_json::to_value(value).expect("failed serializing inserted value");
        let value = WithOrigin::from_json(value, &self.origin, key.to_owned());
        self.inner.insert(key.to_owned(), value);
    }
}

impl ConfigSource for Json {
    fn origin(&self) -> Arc<ValueOrigin> {
        self.origin.clone()
    }

    fn into_map(self) -> Map {
        self.inner
    }
}
