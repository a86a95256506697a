use std::sync::Arc;

use anyhow::Context;

use super::ConfigSource;
use crate::value::{FileFormat, Map, ValueOrigin, WithOrigin, join_path};

/// YAML-based configuration source.
///
/// YAML input is converted to the JSON object model, so it goes through the same origin tracking
/// as [`Json`](super::Json).
#[derive(Debug)]
pub struct Yaml {
    origin: Arc<ValueOrigin>,
    inner: Map,
}

impl Yaml {
    /// Creates a source with the specified name and contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the input doesn't conform to the JSON object model; e.g., if it has maps
    /// with array or map keys, or non-finite numbers.
    pub fn new(filename: &str, object: serde_yaml::Mapping) -> anyhow::Result<Self> {
        let origin = Arc::new(ValueOrigin::File {
            name: filename.to_owned(),
            format: FileFormat::Yaml,
        });
        let mut inner = Map::new();
        for (key, value) in object {
            let key = yaml_key(key, "")?;
            let value = yaml_to_json(value, &key)?;
            let value = WithOrigin::from_json(value, &origin, key.clone());
            inner.insert(key, value);
        }
        Ok(Self { origin, inner })
    }
}

fn yaml_key(key: serde_yaml::Value, parent_path: &str) -> anyhow::Result<String> {
    match key {
        serde_yaml::Value::String(key) => Ok(key),
        serde_yaml::Value::Number(key) => Ok(key.to_string()),
        serde_yaml::Value::Bool(key) => Ok(key.to_string()),
        serde_yaml::Value::Null => Ok("null".to_owned()),
        serde_yaml::Value::Tagged(tagged) => yaml_key(tagged.value, parent_path),
        serde_yaml::Value::Sequence(_) | serde_yaml::Value::Mapping(_) => anyhow::bail!(
            "unsupported key type at {parent_path:?}: {key:?}; keys must be strings, numbers, booleans or null"
        ),
    }
}

fn yaml_to_json(value: serde_yaml::Value, path: &str) -> anyhow::Result<serde_json::Value> {
    Ok(match value {
        serde_yaml::Value::Null => serde_json::Value::Null,
        serde_yaml::Value::Bool(flag) => flag.into(),
        serde_yaml::Value::String(s) => s.into(),
        serde_yaml::Value::Number(number) => {
            if let Some(number) = number.as_u64() {
                number.into()
            } else if let Some(number) = number.as_i64() {
                number.into()
            } else {
                let float = number
                    .as_f64()
                    .with_context(|| format!("unsupported number at {path:?}: {number}"))?;
                serde_json::Number::from_f64(float)
                    .with_context(|| format!("unsupported number at {path:?}: {float}"))?
                    .into()
            }
        }
        serde_yaml::Value::Sequence(items) => {
            let items = items.into_iter().enumerate().map(|(i, item)| {
                yaml_to_json(item, &join_path(path, &i.to_string()))
            });
            serde_json::Value::Array(items.collect::<anyhow::Result<_>>()?)
        }
        serde_yaml::Value::Mapping(entries) => {
            let mut object = serde_json::Map::with_capacity(entries.len());
            for (key, item) in entries {
                let key = yaml_key(key, path)?;
                let item = yaml_to_json(item, &join_path(path, &key))?;
                object.insert(key, item);
            }
            serde_json::Value::Object(object)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value, path)?,
    })
}

impl ConfigSource for Yaml {
    fn origin(&self) -> Arc<ValueOrigin> {
        self.origin.clone()
    }

    fn into_map(self) -> Map {
        self.inner
    }
}
