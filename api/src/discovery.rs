//! Survey of which incident discriminators a feed actually carries and what
//! fields each of them uses. Handy when the upstream format drifts.

use crate::normalize::{INCIDENTS_KEY, feed_items};
use crate::sofascore::RawIncident;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Discovery {
    pub type_counts: BTreeMap<String, usize>,
    pub type_fields: BTreeMap<String, BTreeSet<String>>,
    /// First item seen for each discriminator.
    pub type_examples: BTreeMap<String, Value>,
}

impl Discovery {
    /// Fold another fixture's discovery into this one. Examples already held
    /// are kept.
    pub fn merge(&mut self, other: Discovery) {
        for (kind, count) in other.type_counts {
            *self.type_counts.entry(kind).or_default() += count;
        }
        for (kind, fields) in other.type_fields {
            self.type_fields.entry(kind).or_default().extend(fields);
        }
        for (kind, example) in other.type_examples {
            self.type_examples.entry(kind).or_insert(example);
        }
    }

    /// Discriminators ordered by how often they were seen, most common first.
    pub fn most_common(&self) -> Vec<(&str, usize)> {
        let mut counts: Vec<(&str, usize)> =
            self.type_counts.iter().map(|(kind, count)| (kind.as_str(), *count)).collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        counts
    }
}

pub fn discover(payload: &Value) -> Discovery {
    let mut discovery = Discovery::default();
    for item in feed_items(payload, INCIDENTS_KEY) {
        let (Some(raw), Some(fields)) = (RawIncident::from_value(item), item.as_object()) else {
            continue;
        };
        let kind = raw.discriminator().to_owned();
        *discovery.type_counts.entry(kind.clone()).or_default() += 1;
        discovery
            .type_fields
            .entry(kind.clone())
            .or_default()
            .extend(fields.keys().cloned());
        discovery.type_examples.entry(kind).or_insert_with(|| item.clone());
    }
    discovery
}
