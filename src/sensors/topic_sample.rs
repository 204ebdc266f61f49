use indexmap::IndexMap;
use crate::{Float, NS_TO_US};
use crate::sensors::{FieldMap, FieldShape, FieldValue, flatten_fields};
use crate::io::table_writer::TableRow;
use crate::io::topic_loader::TopicError;

/**
 * One decoded topic record. `timestamp` is in nanoseconds, `fields` holds only the requested keys.
 */
#[derive(Debug,Clone,PartialEq)]
pub struct TopicSample {
    pub timestamp: i64,
    pub fields: FieldMap
}

impl TopicSample {
    pub fn new(timestamp: i64, fields: FieldMap) -> TopicSample {
        TopicSample { timestamp, fields }
    }

    pub fn timestamp_us(&self) -> Float {
        self.timestamp as Float * NS_TO_US
    }

    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }
}

/**
 * All samples of one topic source. A requested key may be absent from some records; the shape of
 * every key is checked to be uniform over the records that carry it.
 */
#[derive(Debug,Clone)]
pub struct TopicSamples {
    time_key: String,
    samples: Vec<TopicSample>,
    shapes: IndexMap<String, FieldShape>
}

impl TopicSamples {
    pub fn new(time_key: &str, keys: &[String], samples: Vec<TopicSample>) -> Result<TopicSamples, TopicError> {
        let mut shapes = IndexMap::<String, FieldShape>::with_capacity(keys.len());

        for key in keys.iter().filter(|k| k.as_str() != time_key) {
            let mut expected: Option<FieldShape> = None;
            for (sample_index, sample) in samples.iter().enumerate() {
                let shape = match sample.field(key) {
                    Some(value) => value.shape(),
                    None => continue
                };
                match &expected {
                    None => expected = Some(shape),
                    Some(e) if *e != shape => return Err(TopicError::ShapeMismatch {
                        key: key.clone(),
                        sample: sample_index,
                        expected: e.clone(),
                        found: shape
                    }),
                    Some(_) => ()
                }
            }
            if let Some(shape) = expected {
                shapes.insert(key.clone(), shape);
            }
        }

        Ok(TopicSamples { time_key: time_key.to_string(), samples, shapes })
    }

    pub fn time_key(&self) -> &str {
        &self.time_key
    }

    pub fn samples(&self) -> &[TopicSample] {
        &self.samples
    }

    pub fn shape(&self, key: &str) -> Option<&FieldShape> {
        self.shapes.get(key)
    }

    /**
     * Index of the first sample that does not carry `key`.
     */
    pub fn first_missing(&self, key: &str) -> Option<usize> {
        self.samples.iter().position(|sample| sample.field(key).is_none())
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn rows(&self) -> Vec<SampleRow<'_>> {
        self.samples.iter().map(|sample| SampleRow { time_key: &self.time_key, sample }).collect()
    }
}

/**
 * Table view of a sample: the time key column first, then the flattened fields.
 */
pub struct SampleRow<'a> {
    time_key: &'a str,
    sample: &'a TopicSample
}

impl<'a> TableRow for SampleRow<'a> {
    fn cells(&self) -> Vec<(String, String)> {
        let mut cells = Vec::<(String, String)>::with_capacity(1 + self.sample.fields.len());
        cells.push((self.time_key.to_string(), self.sample.timestamp.to_string()));
        flatten_fields(&self.sample.fields, &mut cells);
        cells
    }
}
