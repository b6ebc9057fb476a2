use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use super::loader::read_records;
use super::model::Candidate;
use super::CatalogError;

/// Read-only table of precomputed candidate groups keyed by original id.
///
/// Group ordering follows the dataset and is significant; sessions traverse
/// it front to back.
#[derive(Debug, Default)]
pub struct CandidateStore {
    groups: HashMap<String, Arc<[Candidate]>>,
}

impl CandidateStore {
    /// Loads the store from a JSON dataset file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let rows = read_records(path.as_ref())?;

        let mut grouped: HashMap<String, Vec<Candidate>> = HashMap::new();
        for (original_id, candidate) in rows {
            grouped.entry(original_id).or_default().push(candidate);
        }

        let groups: HashMap<String, Arc<[Candidate]>> = grouped
            .into_iter()
            .map(|(id, group)| (id, Arc::from(group.into_boxed_slice())))
            .collect();

        info!(groups = groups.len(), "Candidate store built");
        Ok(Self { groups })
    }

    /// Builds a store directly from grouped candidates (tests, fixtures).
    pub fn from_groups(groups: impl IntoIterator<Item = (String, Vec<Candidate>)>) -> Self {
        Self {
            groups: groups
                .into_iter()
                .map(|(id, group)| (id, Arc::from(group.into_boxed_slice())))
                .collect(),
        }
    }

    /// Returns the ordered candidate group for an original product id.
    pub fn group_for(&self, original_id: &str) -> Option<Arc<[Candidate]>> {
        self.groups.get(original_id).cloned()
    }

    /// Number of original products with a precomputed group.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// All distinct candidates across groups (first occurrence wins), in
    /// the shape the index seeder wants.
    pub fn distinct_candidates(&self) -> Vec<Candidate> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut out = Vec::new();
        for group in self.groups.values() {
            for candidate in group.iter() {
                if seen.insert(candidate.id.as_str()) {
                    out.push(candidate.clone());
                }
            }
        }
        out
    }
}
