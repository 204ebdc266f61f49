use indexmap::IndexMap;
use std::fmt;
use crate::Float;

pub mod frame;
pub mod topic_sample;

pub type FieldMap = IndexMap<String, FieldValue>;

/**
 * A decoded field: either a plain number or a one-level record of numbers, e.g. pos: {x, y, z}.
 */
#[derive(Debug,Clone,PartialEq)]
pub enum FieldValue {
    Scalar(Float),
    Vector(IndexMap<String, Float>)
}

/**
 * Vector sub-keys are kept sorted, so two records listing the same components in a different order
 * have the same shape.
 */
#[derive(Debug,Clone,PartialEq,Eq)]
pub enum FieldShape {
    Scalar,
    Vector(Vec<String>)
}

impl FieldValue {
    pub fn shape(&self) -> FieldShape {
        match self {
            FieldValue::Scalar(_) => FieldShape::Scalar,
            FieldValue::Vector(components) => {
                let mut sub_keys = components.keys().cloned().collect::<Vec<String>>();
                sub_keys.sort_unstable();
                FieldShape::Vector(sub_keys)
            }
        }
    }

    /**
     * (1-w)*self + w*other, per component for vectors. None if the two shapes differ.
     */
    pub fn blend(&self, other: &FieldValue, w: Float) -> Option<FieldValue> {
        match (self, other) {
            (FieldValue::Scalar(a), FieldValue::Scalar(b)) => Some(FieldValue::Scalar((1.0-w)*a + w*b)),
            (FieldValue::Vector(a), FieldValue::Vector(b)) => {
                if a.len() != b.len() {
                    return None;
                }
                a.iter().map(|(sub_key, a_val)| {
                    b.get(sub_key).map(|b_val| (sub_key.clone(), (1.0-w)*a_val + w*b_val))
                }).collect::<Option<IndexMap<String, Float>>>().map(FieldValue::Vector)
            },
            _ => None
        }
    }
}

impl fmt::Display for FieldShape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FieldShape::Scalar => write!(f, "scalar"),
            FieldShape::Vector(sub_keys) => write!(f, "{{{}}}", sub_keys.join(", "))
        }
    }
}

/**
 * Appends flattened (column, cell) pairs for a field map. Nested components are joined with '.'.
 */
pub fn flatten_fields(fields: &FieldMap, cells: &mut Vec<(String, String)>) {
    for (key, value) in fields {
        match value {
            FieldValue::Scalar(v) => cells.push((key.clone(), format_float(*v))),
            FieldValue::Vector(components) => {
                for (sub_key, v) in components {
                    cells.push((format!("{}.{}", key, sub_key), format_float(*v)));
                }
            }
        }
    }
}

// Debug keeps a trailing ".0" on integral values.
fn format_float(v: Float) -> String {
    format!("{:?}", v)
}
