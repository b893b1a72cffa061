//! The node table and the adapters between registry values and [`crate::ops`].

use crate::config::Config;
use crate::error::Result;
use crate::ops::{self, GridLayout};

use super::schema::{InputKind, InputSpec, NodeSpec, OutputSpec, ValueKind};
use super::{Inputs, Value};

/// Largest frame index whose file name fits the zero-padded field.
#[allow(clippy::cast_possible_wrap)]
const MAX_FRAME_INDEX: i64 = ops::FRAME_INDEX_LIMIT as i64 - 1;

#[allow(clippy::cast_possible_wrap)]
const MAX_GRID_DIM: i64 = ops::MAX_GRID_DIM as i64;

/// Frame selection clamps instead of naming files, so it is not held to the
/// file name width.
#[allow(clippy::cast_possible_wrap)]
const MAX_SELECT_INDEX: i64 = ops::FRAME_INDEX_LIMIT as i64;

const GRID_INPUTS: [InputSpec; 2] = [
    InputSpec {
        name: "rows",
        kind: InputKind::Int {
            default: 2,
            min: 1,
            max: MAX_GRID_DIM,
            step: 1,
            control_after_generate: false,
        },
    },
    InputSpec {
        name: "cols",
        kind: InputKind::Int {
            default: 3,
            min: 1,
            max: MAX_GRID_DIM,
            step: 1,
            control_after_generate: false,
        },
    },
];

const FRAME_INDEX: InputSpec = InputSpec {
    name: "frame_index",
    kind: InputKind::Int {
        default: 0,
        min: 0,
        max: MAX_FRAME_INDEX,
        step: 1,
        control_after_generate: true,
    },
};

const SELECT_INDEX: InputSpec = InputSpec {
    name: "frame_index",
    kind: InputKind::Int {
        default: 0,
        min: 0,
        max: MAX_SELECT_INDEX,
        step: 1,
        control_after_generate: true,
    },
};

/// Every node this crate provides.
pub static NODES: &[NodeSpec] = &[
    NodeSpec {
        name: "ImageGridSplit",
        display_name: "Split Image to Grid",
        category: "image",
        inputs: &[
            InputSpec {
                name: "image",
                kind: InputKind::Image,
            },
            GRID_INPUTS[0],
            GRID_INPUTS[1],
        ],
        outputs: &[OutputSpec {
            name: "tiles",
            kind: ValueKind::Image,
        }],
        output_node: false,
        function: grid_split,
    },
    NodeSpec {
        name: "ImageGridMerge",
        display_name: "Merge Grid to Image",
        category: "image",
        inputs: &[
            InputSpec {
                name: "tiles",
                kind: InputKind::Image,
            },
            GRID_INPUTS[0],
            GRID_INPUTS[1],
        ],
        outputs: &[OutputSpec {
            name: "image",
            kind: ValueKind::Image,
        }],
        output_node: false,
        function: grid_merge,
    },
    NodeSpec {
        name: "FrameSelector",
        display_name: "Select Frame from Video",
        category: "image/video",
        inputs: &[
            InputSpec {
                name: "images",
                kind: InputKind::Image,
            },
            SELECT_INDEX,
        ],
        outputs: &[
            OutputSpec {
                name: "frame",
                kind: ValueKind::Image,
            },
            OutputSpec {
                name: "total_frames",
                kind: ValueKind::Int,
            },
        ],
        output_node: false,
        function: frame_selector,
    },
    NodeSpec {
        name: "SaveImageSequence",
        display_name: "Save Image Sequence",
        category: "image/video",
        inputs: &[
            InputSpec {
                name: "images",
                kind: InputKind::Image,
            },
            InputSpec {
                name: "folder_name",
                kind: InputKind::String {
                    default: "depth_frames",
                },
            },
            FRAME_INDEX,
        ],
        outputs: &[
            OutputSpec {
                name: "folder_path",
                kind: ValueKind::String,
            },
            OutputSpec {
                name: "next_frame_index",
                kind: ValueKind::Int,
            },
        ],
        output_node: true,
        function: save_image_sequence,
    },
    NodeSpec {
        name: "LoadImageSequence",
        display_name: "Load Image Sequence",
        category: "image/video",
        inputs: &[InputSpec {
            name: "folder_path",
            kind: InputKind::String {
                default: "depth_frames",
            },
        }],
        outputs: &[
            OutputSpec {
                name: "images",
                kind: ValueKind::Image,
            },
            OutputSpec {
                name: "frame_count",
                kind: ValueKind::Int,
            },
        ],
        output_node: false,
        function: load_image_sequence,
    },
];

fn grid_layout(inputs: &Inputs) -> Result<GridLayout> {
    GridLayout::new(inputs.usize("rows")?, inputs.usize("cols")?)
}

fn count(value: usize) -> Value {
    Value::Int(i64::try_from(value).unwrap_or(i64::MAX))
}

fn grid_split(_config: &Config, inputs: &Inputs) -> Result<Vec<Value>> {
    let tiles = ops::split(inputs.image("image")?, grid_layout(inputs)?)?;
    Ok(vec![Value::Image(tiles)])
}

fn grid_merge(_config: &Config, inputs: &Inputs) -> Result<Vec<Value>> {
    let image = ops::merge(inputs.image("tiles")?, grid_layout(inputs)?)?;
    Ok(vec![Value::Image(image)])
}

fn frame_selector(_config: &Config, inputs: &Inputs) -> Result<Vec<Value>> {
    let selected = ops::select_frame(inputs.image("images")?, inputs.usize("frame_index")?)?;
    Ok(vec![
        Value::Image(selected.frame),
        count(selected.total_frames),
    ])
}

fn save_image_sequence(config: &Config, inputs: &Inputs) -> Result<Vec<Value>> {
    let saved = ops::save_sequence(
        inputs.image("images")?,
        inputs.string("folder_name")?,
        inputs.usize("frame_index")?,
        config,
    )?;
    Ok(vec![
        Value::String(saved.directory.to_string_lossy().into_owned()),
        count(saved.next_frame_index),
    ])
}

fn load_image_sequence(config: &Config, inputs: &Inputs) -> Result<Vec<Value>> {
    let loaded = ops::load_sequence(inputs.string("folder_path")?, config)?;
    Ok(vec![Value::Image(loaded.images), count(loaded.frame_count)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outputs_match_schema_arity() {
        for spec in NODES {
            assert!(!spec.outputs.is_empty(), "{} has no outputs", spec.name);
            assert!(!spec.inputs.is_empty(), "{} has no inputs", spec.name);
        }
    }

    #[test]
    fn test_frame_index_schema() {
        let save = NODES
            .iter()
            .find(|spec| spec.name == "SaveImageSequence")
            .unwrap();
        let frame_index = save.input("frame_index").unwrap();

        assert_eq!(
            frame_index.kind,
            InputKind::Int {
                default: 0,
                min: 0,
                max: 9999,
                step: 1,
                control_after_generate: true,
            }
        );
    }

    #[test]
    fn test_frame_selector_index_bound() {
        let select = NODES
            .iter()
            .find(|spec| spec.name == "FrameSelector")
            .unwrap();
        assert!(matches!(
            select.input("frame_index").unwrap().kind,
            InputKind::Int { max: 10_000, .. }
        ));
    }

    #[test]
    fn test_grid_bounds_follow_layout_limit() {
        let split = NODES
            .iter()
            .find(|spec| spec.name == "ImageGridSplit")
            .unwrap();
        for name in ["rows", "cols"] {
            assert!(matches!(
                split.input(name).unwrap().kind,
                InputKind::Int { min: 1, max: 10, .. }
            ));
        }
    }

    #[test]
    fn test_grid_defaults() {
        let split = NODES
            .iter()
            .find(|spec| spec.name == "ImageGridSplit")
            .unwrap();
        assert_eq!(
            split.input("rows").unwrap().kind.default_value().unwrap().as_int(),
            Some(2)
        );
        assert_eq!(
            split.input("cols").unwrap().kind.default_value().unwrap().as_int(),
            Some(3)
        );
    }
}
