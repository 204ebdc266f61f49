use crate::Float;
use crate::sensors::{FieldMap, flatten_fields};
use crate::io::table_writer::TableRow;

/**
 * One camera exposure. Timestamps are in microseconds.
 */
#[derive(Debug,Clone,PartialEq)]
pub struct Frame {
    pub timestamp: i64,
    pub image_reference: String,
    pub fields: FieldMap
}

impl Frame {
    pub fn new(timestamp: i64, image_reference: &str) -> Frame {
        Frame {
            timestamp,
            image_reference: image_reference.to_string(),
            fields: FieldMap::new()
        }
    }

    pub fn timestamp_us(&self) -> Float {
        self.timestamp as Float
    }
}

impl TableRow for Frame {
    fn cells(&self) -> Vec<(String, String)> {
        let mut cells = Vec::<(String, String)>::with_capacity(2 + self.fields.len());
        cells.push(("ts".to_string(), self.timestamp.to_string()));
        cells.push(("png".to_string(), self.image_reference.clone()));
        flatten_fields(&self.fields, &mut cells);
        cells
    }
}
