//! Resources grouped by type.
//!
//! Used both for a location's inventory and for the selection carried by a
//! scheduling option. Iteration is always in ascending type order.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::{ResourceScheduled, ResourceType};

/// Ordered mapping `ResourceType → resources of that type`.
///
/// Within a type, resources keep insertion order; searches scan them in that
/// order.
#[derive(Debug, Clone, Default)]
pub struct ResourcesPerType {
    by_type: BTreeMap<ResourceType, Vec<Arc<ResourceScheduled>>>,
}

impl ResourcesPerType {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a resource to the bucket of its own type.
    pub fn push(&mut self, resource: Arc<ResourceScheduled>) {
        self.by_type
            .entry(resource.resource_type())
            .or_default()
            .push(resource);
    }

    /// Replaces the bucket for `resource_type`.
    pub fn insert(&mut self, resource_type: ResourceType, resources: Vec<Arc<ResourceScheduled>>) {
        self.by_type.insert(resource_type, resources);
    }

    /// Resources of a type (empty if the type is absent).
    pub fn get(&self, resource_type: ResourceType) -> &[Arc<ResourceScheduled>] {
        self.by_type
            .get(&resource_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether a bucket exists for the type.
    pub fn contains_type(&self, resource_type: ResourceType) -> bool {
        self.by_type.contains_key(&resource_type)
    }

    /// Types present, ascending.
    pub fn resource_types_sorted(&self) -> Vec<ResourceType> {
        self.by_type.keys().copied().collect()
    }

    /// Sum of served quantities for one type.
    pub fn served_quantity(&self, resource_type: ResourceType) -> u32 {
        self.get(resource_type)
            .iter()
            .map(|r| u32::from(r.served_quantity()))
            .sum()
    }

    /// Number of type buckets.
    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    /// Whether there are no type buckets.
    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }

    /// Total number of resources across all types.
    pub fn resource_count(&self) -> usize {
        self.by_type.values().map(Vec::len).sum()
    }

    /// Iterates buckets in ascending type order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceType, &[Arc<ResourceScheduled>])> {
        self.by_type.iter().map(|(t, rs)| (*t, rs.as_slice()))
    }
}

impl fmt::Display for ResourcesPerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ResourcesPerType{{")?;
        for (resource_type, resources) in self.iter() {
            writeln!(f, "\t{resource_type}: [")?;
            for resource in resources {
                writeln!(f, "\t\t{resource},")?;
            }
            writeln!(f, "\t],")?;
        }
        write!(f, "}}")
    }
}
