use std::collections::HashMap;

use crate::models::UrlRecord;

/// Session-scoped list of URL records, kept in creation order.
///
/// Records are only ever appended and updated in place, so the positions in
/// the two indexes stay valid for the life of the store.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<UrlRecord>,
    by_code: HashMap<String, usize>,
    by_id: HashMap<i64, usize>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains_code(&self, code: &str) -> bool {
        self.by_code.contains_key(code)
    }

    /// Append a record. The caller is responsible for picking a code and id
    /// that are not already present.
    pub(crate) fn append(&mut self, record: UrlRecord) -> &UrlRecord {
        debug_assert!(!self.contains_code(&record.code));
        debug_assert!(!self.by_id.contains_key(&record.id));

        let pos = self.records.len();
        self.by_code.insert(record.code.clone(), pos);
        self.by_id.insert(record.id, pos);
        self.records.push(record);
        &self.records[pos]
    }

    pub fn get(&self, id: i64) -> Option<&UrlRecord> {
        self.by_id.get(&id).map(|&pos| &self.records[pos])
    }

    pub(crate) fn get_mut(&mut self, id: i64) -> Option<&mut UrlRecord> {
        let pos = *self.by_id.get(&id)?;
        self.records.get_mut(pos)
    }

    /// Id of the most recently created record.
    pub fn last_id(&self) -> Option<i64> {
        self.records.last().map(|r| r.id)
    }

    /// All records, oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &UrlRecord> {
        self.records.iter()
    }

    /// The `limit` most recently created records, newest first.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &UrlRecord> {
        self.records.iter().rev().take(limit)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone, Utc};

    fn record(id: i64, code: &str) -> UrlRecord {
        let created_at = Utc.timestamp_millis_opt(id).unwrap();
        UrlRecord {
            id,
            original_url: format!("https://{code}.example"),
            code: code.to_owned(),
            short_url: format!("http://localhost:3000/{code}"),
            created_at,
            expiry_date: created_at + TimeDelta::minutes(30),
            clicks: 0,
            click_data: Vec::new(),
        }
    }

    #[test]
    fn lookups_by_code_and_id() {
        let mut store = RecordStore::new();
        store.append(record(1, "abc123"));
        store.append(record(2, "def456"));

        assert!(store.contains_code("abc123"));
        assert!(!store.contains_code("zzz999"));
        assert_eq!(store.get(2).map(|r| r.code.as_str()), Some("def456"));
        assert_eq!(store.get(1).map(|r| r.code.as_str()), Some("abc123"));
        assert!(store.get(3).is_none());
        assert_eq!(store.last_id(), Some(2));
    }

    #[test]
    fn recent_is_newest_first_and_capped() {
        let mut store = RecordStore::new();
        for (id, code) in ["a", "b", "c", "d"].into_iter().enumerate() {
            store.append(record(id as i64, code));
        }

        let recent: Vec<_> = store.recent(3).map(|r| r.code.as_str()).collect();
        assert_eq!(recent, ["d", "c", "b"]);

        let all: Vec<_> = store.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(all, ["a", "b", "c", "d"]);
    }

    #[test]
    fn updates_in_place_keep_order() {
        let mut store = RecordStore::new();
        store.append(record(10, "one"));
        store.append(record(20, "two"));

        let at = Utc.timestamp_millis_opt(15).unwrap();
        store.get_mut(10).unwrap().record_click(at);

        let first = store.iter().next().unwrap();
        assert_eq!(first.code, "one");
        assert_eq!(first.clicks, 1);
        assert_eq!(first.click_data.len(), 1);
        assert_eq!(store.len(), 2);
    }
}
