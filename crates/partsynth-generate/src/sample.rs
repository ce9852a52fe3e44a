use serde::ser::{Serialize, SerializeMap, Serializer};

use partsynth_core::METADATA_KEYS;

/// One synthesized record: attribute (or metadata key) to value.
///
/// Keys keep their first insertion position; re-assigning a key replaces
/// its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sample {
    entries: Vec<(String, String)>,
}

impl Sample {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Entries that are not metadata, in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().filter(|(key, _)| !is_metadata_key(key))
    }

    pub fn field_count(&self) -> usize {
        self.fields().count()
    }
}

pub fn is_metadata_key(key: &str) -> bool {
    METADATA_KEYS.contains(&key)
}

impl Serialize for Sample {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Sample {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut sample = Sample::new();
        for (key, value) in iter {
            sample.insert(key, value);
        }
        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reinsert_keeps_position_and_last_value() {
        let mut sample = Sample::new();
        sample.insert("class", "Filters");
        sample.insert("Type", "Active");
        sample.insert("Order", "2");
        sample.insert("Type", "Passive");

        assert_eq!(sample.len(), 3);
        assert_eq!(sample.get("Type"), Some("Passive"));
        assert_eq!(sample.keys().collect::<Vec<_>>(), vec!["class", "Type", "Order"]);
        assert_eq!(sample.field_count(), 2);
    }

    #[test]
    fn serializes_in_insertion_order() {
        let sample: Sample = [("b", "1"), ("a", "2")].into_iter().collect();
        let json = serde_json::to_string(&sample).expect("serialize sample");
        assert_eq!(json, r#"{"b":"1","a":"2"}"#);
    }
}
