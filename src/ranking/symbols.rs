//! Name-based symbol resolution.
//!
//! Builds a read-only table from declared type name to declaring file and
//! uses it to turn each file's referenced-type counts into file dependencies.
//!
//! Resolution is a heuristic: when two files declare the same name, the file
//! that sorts first by path wins and the other declaration is ignored.
//! Shadowing and module qualification are not modelled.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::types::AnalysisRecord;

/// Declared type name -> declaring file. Immutable after construction.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    owners: HashMap<String, Arc<str>>,
}

impl SymbolTable {
    /// Build the table, scanning records in lexicographic path order.
    /// First writer wins.
    pub fn build(records: &[AnalysisRecord]) -> Self {
        let mut ordered: Vec<&AnalysisRecord> = records.iter().collect();
        ordered.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));

        let mut owners: HashMap<String, Arc<str>> = HashMap::new();
        for record in ordered {
            for name in &record.declared {
                owners
                    .entry(name.clone())
                    .or_insert_with(|| Arc::clone(&record.rel_path));
            }
        }

        Self { owners }
    }

    /// File declaring `name`, if any.
    pub fn owner(&self, name: &str) -> Option<&Arc<str>> {
        self.owners.get(name)
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

/// Fill `dependencies` and `inbound` on every record.
///
/// Each referenced name that resolves to another file adds that file to the
/// dependency set and bumps its inbound count by one. Unresolved names and
/// self-references are dropped. Returns the number of distinct edges.
pub fn resolve_dependencies(records: &mut [AnalysisRecord], table: &SymbolTable) -> usize {
    let index: HashMap<Arc<str>, usize> = records
        .iter()
        .enumerate()
        .map(|(i, r)| (Arc::clone(&r.rel_path), i))
        .collect();

    let mut inbound = vec![0u32; records.len()];
    let mut edges = 0;

    for record in records.iter_mut() {
        for name in record.references.keys() {
            let Some(owner) = table.owner(name) else {
                continue;
            };
            if *owner == record.rel_path {
                continue;
            }
            if let Some(&target) = index.get(owner) {
                inbound[target] += 1;
            }
            if record.dependencies.insert(Arc::clone(owner)) {
                edges += 1;
            }
        }
    }

    for (record, count) in records.iter_mut().zip(inbound) {
        record.inbound = count;
    }

    debug!(symbols = table.len(), edges, "resolved dependencies");
    edges
}
