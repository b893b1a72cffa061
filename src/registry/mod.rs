//! Node registry: the static table a host uses to discover and invoke nodes by name.

mod nodes;
mod schema;

pub use nodes::NODES;
pub use schema::{InputKind, InputSpec, NodeFn, NodeSpec, OutputSpec, Value, ValueKind};

use std::collections::{BTreeMap, HashMap};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::image::ImageBatch;

/// Name-indexed view over a table of [`NodeSpec`]s.
#[derive(Debug, Clone)]
pub struct Registry {
    nodes: BTreeMap<&'static str, &'static NodeSpec>,
}

impl Registry {
    /// Build the registry of every node this crate provides.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateNode`] if two nodes share a name.
    pub fn load() -> Result<Self> {
        let registry = Self::from_specs(NODES)?;
        tracing::debug!(
            "Registered nodes: {:?}",
            registry.nodes.keys().collect::<Vec<_>>()
        );
        Ok(registry)
    }

    /// Build a registry from an arbitrary table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateNode`] if two nodes share a name.
    pub fn from_specs(specs: &'static [NodeSpec]) -> Result<Self> {
        let mut nodes = BTreeMap::new();
        for spec in specs {
            if nodes.insert(spec.name, spec).is_some() {
                return Err(Error::DuplicateNode {
                    name: spec.name.to_string(),
                });
            }
        }
        Ok(Self { nodes })
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'static NodeSpec> {
        self.nodes.get(name).copied()
    }

    /// Registered nodes, ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = &'static NodeSpec> + '_ {
        self.nodes.values().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Invoke the node called `name` with the given inputs.
    ///
    /// Missing scalar inputs take their schema default. Integer inputs are
    /// checked against their bounds before the node runs. Inputs the node
    /// does not declare are ignored.
    ///
    /// # Errors
    ///
    /// Returns a registry error for unknown nodes or invalid inputs, or
    /// whatever the node itself fails with.
    pub fn invoke(
        &self,
        name: &str,
        config: &Config,
        mut inputs: HashMap<String, Value>,
    ) -> Result<Vec<Value>> {
        let spec = self.get(name).ok_or_else(|| Error::UnknownNode {
            name: name.to_string(),
        })?;

        let mut resolved = HashMap::with_capacity(spec.inputs.len());
        for input in spec.inputs {
            let value = match inputs.remove(input.name) {
                Some(value) => value,
                None => input.kind.default_value().ok_or_else(|| Error::MissingInput {
                    node: spec.name.to_string(),
                    input: input.name.to_string(),
                })?,
            };
            check_input(spec, input, &value)?;
            resolved.insert(input.name, value);
        }

        for extra in inputs.keys() {
            tracing::debug!("Ignoring undeclared input {extra} for node {}", spec.name);
        }

        tracing::debug!("Invoking node {}", spec.name);
        (spec.function)(
            config,
            &Inputs {
                node: spec.name,
                values: resolved,
            },
        )
    }
}

/// Check a value against its input schema.
fn check_input(spec: &NodeSpec, input: &InputSpec, value: &Value) -> Result<()> {
    let expected = input.kind.value_kind();
    if value.kind() != expected {
        return Err(Error::InputType {
            node: spec.name.to_string(),
            input: input.name.to_string(),
            expected: expected.name(),
            actual: value.kind().name(),
        });
    }

    if let (InputKind::Int { min, max, .. }, Value::Int(v)) = (input.kind, value) {
        if !(min..=max).contains(v) {
            return Err(Error::InvalidParameter {
                name: input.name.to_string(),
                reason: format!("must be between {min} and {max}, got {v}"),
            });
        }
    }

    Ok(())
}

/// Validated inputs handed to a node function.
#[derive(Debug)]
pub struct Inputs {
    node: &'static str,
    values: HashMap<&'static str, Value>,
}

impl Inputs {
    /// Image batch input `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is absent or not an image.
    pub fn image(&self, name: &str) -> Result<&ImageBatch> {
        match self.value(name)? {
            Value::Image(images) => Ok(images),
            other => Err(self.type_error(name, ValueKind::Image, other)),
        }
    }

    /// Integer input `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is absent or not an integer.
    pub fn int(&self, name: &str) -> Result<i64> {
        match self.value(name)? {
            Value::Int(value) => Ok(*value),
            other => Err(self.type_error(name, ValueKind::Int, other)),
        }
    }

    /// Integer input `name` as a count or index.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is absent, not an integer, or negative.
    pub fn usize(&self, name: &str) -> Result<usize> {
        let value = self.int(name)?;
        usize::try_from(value).map_err(|_| Error::InvalidParameter {
            name: name.to_string(),
            reason: format!("must not be negative, got {value}"),
        })
    }

    /// String input `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is absent or not a string.
    pub fn string(&self, name: &str) -> Result<&str> {
        match self.value(name)? {
            Value::String(value) => Ok(value.as_str()),
            other => Err(self.type_error(name, ValueKind::String, other)),
        }
    }

    fn value(&self, name: &str) -> Result<&Value> {
        self.values.get(name).ok_or_else(|| Error::MissingInput {
            node: self.node.to_string(),
            input: name.to_string(),
        })
    }

    fn type_error(&self, name: &str, expected: ValueKind, actual: &Value) -> Error {
        Error::InputType {
            node: self.node.to_string(),
            input: name.to_string(),
            expected: expected.name(),
            actual: actual.kind().name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array4;
    use tempfile::tempdir;

    fn inputs<const N: usize>(values: [(&str, Value); N]) -> HashMap<String, Value> {
        values
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }

    fn config() -> Config {
        Config::with_output_dir(std::env::temp_dir().join("framegrid-registry-tests"))
    }

    #[test]
    fn test_load_registers_all_nodes() {
        let registry = Registry::load().unwrap();

        assert_eq!(registry.len(), 5);
        for name in [
            "ImageGridSplit",
            "ImageGridMerge",
            "FrameSelector",
            "SaveImageSequence",
            "LoadImageSequence",
        ] {
            assert!(registry.get(name).is_some(), "{name} missing");
        }
        assert_eq!(
            registry.get("ImageGridSplit").unwrap().display_name,
            "Split Image to Grid"
        );
        assert!(registry.get("SaveImageSequence").unwrap().output_node);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let twice: &'static [NodeSpec] = Box::leak(vec![NODES[0], NODES[0]].into_boxed_slice());
        let err = Registry::from_specs(twice).unwrap_err();
        assert!(matches!(err, Error::DuplicateNode { .. }));
    }

    #[test]
    fn test_unknown_node() {
        let registry = Registry::load().unwrap();
        let err = registry
            .invoke("NoSuchNode", &config(), HashMap::new())
            .unwrap_err();
        assert!(matches!(err, Error::UnknownNode { name } if name == "NoSuchNode"));
    }

    #[test]
    fn test_missing_image_input() {
        let registry = Registry::load().unwrap();
        let err = registry
            .invoke("ImageGridSplit", &config(), HashMap::new())
            .unwrap_err();
        assert!(matches!(err, Error::MissingInput { input, .. } if input == "image"));
    }

    #[test]
    fn test_defaults_applied() {
        let registry = Registry::load().unwrap();
        let image = Array4::<f32>::zeros((1, 100, 150, 3));

        let outputs = registry
            .invoke(
                "ImageGridSplit",
                &config(),
                inputs([("image", Value::Image(image))]),
            )
            .unwrap();

        // Default grid is 2x3.
        let tiles = outputs.into_iter().next().unwrap().into_image().unwrap();
        assert_eq!(tiles.shape(), &[6, 50, 50, 3]);
    }

    #[test]
    fn test_out_of_range_int() {
        let registry = Registry::load().unwrap();
        let image = Array4::<f32>::zeros((1, 4, 4, 3));

        let err = registry
            .invoke(
                "ImageGridSplit",
                &config(),
                inputs([("image", Value::Image(image)), ("rows", Value::Int(11))]),
            )
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name, .. } if name == "rows"));
    }

    #[test]
    fn test_wrong_value_kind() {
        let registry = Registry::load().unwrap();

        let err = registry
            .invoke(
                "FrameSelector",
                &config(),
                inputs([("images", Value::String("nope".to_string()))]),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InputType {
                expected: "IMAGE",
                actual: "STRING",
                ..
            }
        ));
    }

    #[test]
    fn test_merge_mismatch_through_registry() {
        let registry = Registry::load().unwrap();
        let tiles = Array4::<f32>::zeros((4, 2, 2, 3));

        let err = registry
            .invoke(
                "ImageGridMerge",
                &config(),
                inputs([("tiles", Value::Image(tiles))]),
            )
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "number of tiles (4) doesn't match grid size (2x3=6)"
        );
    }

    #[test]
    fn test_save_and_load_through_registry() {
        let dir = tempdir().unwrap();
        let config = Config::with_output_dir(dir.path());
        let registry = Registry::load().unwrap();
        let frames = Array4::from_elem((2, 3, 3, 3), 1.0_f32);

        let saved = registry
            .invoke(
                "SaveImageSequence",
                &config,
                inputs([
                    ("images", Value::Image(frames.clone())),
                    ("frame_index", Value::Int(5)),
                ]),
            )
            .unwrap();
        assert_eq!(
            saved[0].as_str(),
            Some(
                dir.path()
                    .join("depth_frames")
                    .to_string_lossy()
                    .into_owned()
                    .as_str()
            )
        );
        assert_eq!(saved[1].as_int(), Some(6));

        let loaded = registry
            .invoke("LoadImageSequence", &config, HashMap::new())
            .unwrap();
        assert_eq!(loaded[1].as_int(), Some(2));
        assert_eq!(loaded[0].clone().into_image().unwrap(), frames);
    }

    #[test]
    fn test_frame_selector_clamps_at_schema_bound() {
        let registry = Registry::load().unwrap();
        let frames = Array4::<f32>::zeros((3, 2, 2, 3));

        let outputs = registry
            .invoke(
                "FrameSelector",
                &config(),
                inputs([
                    ("images", Value::Image(frames)),
                    ("frame_index", Value::Int(10_000)),
                ]),
            )
            .unwrap();

        let frame = outputs[0].clone().into_image().unwrap();
        assert_eq!(frame.shape(), &[1, 2, 2, 3]);
        assert_eq!(outputs[1].as_int(), Some(3));
    }

    #[test]
    fn test_save_rejects_index_past_file_name_width() {
        let registry = Registry::load().unwrap();
        let frames = Array4::<f32>::zeros((1, 2, 2, 3));

        let err = registry
            .invoke(
                "SaveImageSequence",
                &config(),
                inputs([
                    ("images", Value::Image(frames)),
                    ("frame_index", Value::Int(10_000)),
                ]),
            )
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name, .. } if name == "frame_index"));
    }

    #[test]
    fn test_frame_selector_outputs() {
        let registry = Registry::load().unwrap();
        let frames = Array4::<f32>::zeros((3, 2, 2, 3));

        let outputs = registry
            .invoke(
                "FrameSelector",
                &config(),
                inputs([
                    ("images", Value::Image(frames)),
                    ("frame_index", Value::Int(7)),
                ]),
            )
            .unwrap();

        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[0].kind(), ValueKind::Image);
        assert_eq!(outputs[1].as_int(), Some(3));
    }
}
