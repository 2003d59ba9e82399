use crate::types::{RecordId, ResultRecord};

/// Records of the last completed fetch cycle.
///
/// The store is only ever replaced wholesale or cleared; there is no way to
/// push a single record, so a partially arrived batch can never be observed.
#[derive(Debug, Clone)]
pub struct Store<T> {
    records: Vec<T>,
}

impl<T> Default for Store<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<T: ResultRecord> Store<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, records: Vec<T>) {
        self.records = records;
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, id: &RecordId) -> Option<&T> {
        self.records.iter().find(|r| &r.id() == id)
    }
}
