//! The authoritative item table: loaded once, read-only afterwards.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::Item;

const HEADER_ID: &str = "PresentId";

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<Item>,
    index: HashMap<u32, usize>,
}

impl Catalog {
    /// Builds a catalog, rejecting zero extents and repeated ids.
    pub fn new(records: Vec<Item>) -> Result<Self> {
        let mut index = HashMap::with_capacity(records.len());
        for (pos, item) in records.iter().enumerate() {
            if item.extents().contains(&0) {
                return Err(Error::ZeroExtent { id: item.id });
            }
            if index.insert(item.id, pos).is_some() {
                return Err(Error::DuplicateId { id: item.id });
            }
        }
        Ok(Self { records, index })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parses `id,dim1,dim2,dim3` lines. Blank lines are ignored, and the
    /// first non-blank line is skipped only when it is the `PresentId`
    /// header; anything else there is parsed as a record.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut records = Vec::new();
        let mut first = true;
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if std::mem::take(&mut first) && is_header(line) {
                continue;
            }
            records.push(parse_record(line, idx + 1)?);
        }
        Self::new(records)
    }

    pub fn get(&self, id: u32) -> Option<&Item> {
        self.index.get(&id).map(|&pos| &self.records[pos])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in file order, as fresh items at the origin.
    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, Item>> {
        self.records.iter().copied()
    }
}

fn is_header(line: &str) -> bool {
    line.split(',')
        .next()
        .is_some_and(|field| field.trim().eq_ignore_ascii_case(HEADER_ID))
}

fn parse_record(line: &str, line_no: usize) -> Result<Item> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != 4 {
        return Err(Error::TruncatedRecord {
            line: line_no,
            found: fields.len(),
        });
    }
    let mut values = [0u32; 4];
    for (value, field) in values.iter_mut().zip(&fields) {
        let digits = !field.is_empty() && field.bytes().all(|b| b.is_ascii_digit());
        *value = digits
            .then(|| field.parse::<u32>().ok())
            .flatten()
            .ok_or_else(|| Error::MalformedRecord {
                line: line_no,
                reason: format!("'{field}' is not a non-negative integer"),
            })?;
    }
    let [id, a, b, c] = values;
    Ok(Item::new(id, a, b, c))
}
