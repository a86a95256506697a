//! Configuration sources and raw input documents.

use std::{fs, path::Path, sync::Arc};

use anyhow::Context as _;

pub use self::{json::Json, yaml::Yaml};
use crate::value::{Map, ValueOrigin, WithOrigin};

mod json;
mod yaml;

/// Source of configuration input.
pub trait ConfigSource {
    /// Returns the origin of this source.
    fn origin(&self) -> Arc<ValueOrigin>;

    /// Converts this source into a flat map of raw values.
    fn into_map(self) -> Map;
}

/// Raw input document: a flat mapping from field names to raw values with their origins.
///
/// A document may be layered from multiple [sources](ConfigSource); a key supplied by a later source overrides
/// the value from earlier sources. The document is only read during resolution.
#[derive(Debug, Clone, Default)]
pub struct RawDocument {
    values: Map,
    sources: Vec<SourceInfo>,
}

/// Information about a source added to a [`RawDocument`].
#[derive(Debug, Clone)]
pub struct SourceInfo {
    /// Origin of the source.
    pub origin: Arc<ValueOrigin>,
    /// Number of keys supplied by the source.
    pub param_count: usize,
}

impl RawDocument {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Extends this document with a new source. Keys from the source override existing ones.
    #[must_use]
    pub fn with<S: ConfigSource>(mut self, source: S) -> Self {
        self.insert_source(source);
        self
    }

    #[tracing::instrument(level = "debug", name = "RawDocument::insert", skip_all)]
    fn insert_source<S: ConfigSource>(&mut self, source: S) {
        let origin = source.origin();
        let map = source.into_map();
        let param_count = map.len();
        for (key, value) in map {
            if let Some(prev) = self.values.insert(key, value) {
                tracing::debug!(origin = %prev.origin, "Overridden config value");
            }
        }
        tracing::debug!(%origin, param_count, "Inserted source into raw document");
        self.sources.push(SourceInfo {
            origin,
            param_count,
        });
    }

    /// Loads a document from the specified file. The file format is determined by the extension:
    /// `.json` for JSON, `.yml` or `.yaml` for YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, has an unsupported extension,
    /// or its contents are not an object in the corresponding format.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        Ok(Self::new().with(load_file(path)?))
    }

    /// Extends this document with the contents of the specified file. See [`Self::from_file()`] for details.
    ///
    /// # Errors
    ///
    /// Same as for [`Self::from_file()`].
    pub fn with_file(self, path: &Path) -> anyhow::Result<Self> {
        Ok(self.with(load_file(path)?))
    }

    /// Sets a single raw value with the specified origin.
    pub fn set(&mut self, key: impl Into<String>, value: WithOrigin) {
        self.values.insert(key.into(), value);
    }

    /// Returns a raw value for the specified key.
    pub fn get(&self, key: &str) -> Option<&WithOrigin> {
        self.values.get(key)
    }

    /// Iterates over all keys and values.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &WithOrigin)> + '_ {
        self.values.iter()
    }

    /// Returns the number of keys in the document.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Checks whether the document is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns information about sources this document was built from.
    pub fn sources(&self) -> &[SourceInfo] {
        &self.sources
    }

    /// Converts this document into the plain JSON object model. Secrets are exposed.
    pub fn to_json(&self) -> serde_json::Map<String, serde_json::Value> {
        self.values
            .iter()
            .map(|(key, value)| (key.clone(), value.inner.to_json()))
            .collect()
    }
}

impl FromIterator<(String, WithOrigin)> for RawDocument {
    fn from_iter<I: IntoIterator<Item = (String, WithOrigin)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
            sources: vec![],
        }
    }
}

/// Either a JSON or a YAML source loaded from a file.
#[derive(Debug)]
enum FileSource {
    Json(Json),
    Yaml(Yaml),
}

impl ConfigSource for FileSource {
    fn origin(&self) -> Arc<ValueOrigin> {
        match self {
            Self::Json(json) => json.origin(),
            Self::Yaml(yaml) => yaml.origin(),
        }
    }

    fn into_map(self) -> Map {
        match self {
            Self::Json(json) => json.into_map(),
            Self::Yaml(yaml) => yaml.into_map(),
        }
    }
}

fn load_file(path: &Path) -> anyhow::Result<FileSource> {
    let filename = path.to_string_lossy();
    let extension = path.extension().and_then(|ext| ext.to_str());
    let contents =
        fs::read_to_string(path).with_context(|| format!("failed reading config file `{filename}`"))?;

    Ok(match extension {
        Some("json") => {
            let object: serde_json::Map<String, serde_json::Value> =
                serde_json::from_str(&contents)
                    .with_context(|| format!("failed parsing `{filename}` as a JSON object"))?;
            FileSource::Json(Json::new(&filename, object))
        }
        Some("yml" | "yaml") => {
            let object: serde_yaml::Mapping = serde_yaml::from_str(&contents)
                .with_context(|| format!("failed parsing `{filename}` as a YAML mapping"))?;
            FileSource::Yaml(Yaml::new(&filename, object)?)
        }
        _ => anyhow::bail!(
            "unsupported extension of config file `{filename}`; expected `.json`, `.yml` or `.yaml`"
        ),
    })
}
