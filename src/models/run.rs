//! Run (task) model.
//!
//! A run is a unit of work requesting a bundle of resource types and
//! quantities for an estimated duration, and carrying a load that prices it
//! against a resource's cost rates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{LoadUnit, ResourceInfo, ResourceType};
use crate::error::{Result, SchedulerError};

/// Run identifier. Bookable runs have positive IDs.
pub type RunId = i64;

/// Reserved run ID marking site-owned occupancy (maintenance, blackout).
///
/// Never accepted by [`ResourceScheduled::add_run`](super::ResourceScheduled::add_run).
pub const MAINTENANCE: RunId = 0;

/// A need for `resource_quantity` units of one resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunDependency {
    /// Resource category needed.
    pub resource_type: ResourceType,
    /// Units of need (matched against `ResourceInfo::served_quantity`).
    pub resource_quantity: u8,
}

/// Magnitude and unit of the work a run performs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunLoad {
    /// Load magnitude.
    pub load: f32,
    /// Unit tag, looked up in `ResourceInfo::cost_per_load_unit`.
    pub load_unit: LoadUnit,
}

/// A run to be scheduled.
///
/// # Time Representation
/// `estimated_duration` is in seconds and is also the length of the
/// sub-intervals a search window is broken into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    /// Run identifier (`0` is reserved for [`MAINTENANCE`]).
    pub id: RunId,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Who asked for the run.
    #[serde(default)]
    pub initiator_id: i64,
    /// Expected duration (seconds).
    pub estimated_duration: i64,
    /// Resource needs. The same type may appear more than once.
    #[serde(default)]
    pub dependencies: Vec<RunDependency>,
    /// Work load used for costing.
    #[serde(default)]
    pub run_load: RunLoad,
}

impl Run {
    /// Creates a new run with the given ID.
    pub fn new(id: RunId) -> Self {
        Self {
            id,
            name: String::new(),
            initiator_id: 0,
            estimated_duration: 0,
            dependencies: Vec::new(),
            run_load: RunLoad::default(),
        }
    }

    /// Sets the run name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the initiator.
    pub fn with_initiator(mut self, initiator_id: i64) -> Self {
        self.initiator_id = initiator_id;
        self
    }

    /// Sets the estimated duration (seconds).
    pub fn with_estimated_duration(mut self, seconds: i64) -> Self {
        self.estimated_duration = seconds;
        self
    }

    /// Adds a resource need.
    pub fn with_dependency(mut self, resource_type: ResourceType, resource_quantity: u8) -> Self {
        self.dependencies.push(RunDependency {
            resource_type,
            resource_quantity,
        });
        self
    }

    /// Sets the work load.
    pub fn with_load(mut self, load: f32, load_unit: LoadUnit) -> Self {
        self.run_load = RunLoad { load, load_unit };
        self
    }

    /// Whether this is the reserved maintenance marker.
    pub fn is_maintenance(&self) -> bool {
        self.id == MAINTENANCE
    }

    /// Cost of running on `resource`: `load * rate(load_unit)`.
    ///
    /// # Errors
    /// `UnsupportedLoadUnit` if the resource has no rate for the run's unit.
    pub fn run_cost_using(&self, resource: &ResourceInfo) -> Result<f32> {
        let rate = resource.cost_rate(self.run_load.load_unit).ok_or(
            SchedulerError::UnsupportedLoadUnit {
                load_unit: self.run_load.load_unit,
            },
        )?;

        Ok(self.run_load.load * rate)
    }

    /// Distinct resource types the run needs, ascending.
    pub fn needed_resource_types(&self) -> Vec<ResourceType> {
        let mut types: Vec<ResourceType> =
            self.dependencies.iter().map(|d| d.resource_type).collect();
        types.sort_unstable();
        types.dedup();
        types
    }

    /// Total quantity needed per resource type.
    ///
    /// Dependencies naming the same type accumulate.
    pub fn needed_resources_per_type(&self) -> BTreeMap<ResourceType, u32> {
        let mut needed = BTreeMap::new();
        for dep in &self.dependencies {
            *needed.entry(dep.resource_type).or_insert(0) += u32::from(dep.resource_quantity);
        }
        needed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_builder() {
        let run = Run::new(7)
            .with_name("Night batch")
            .with_initiator(42)
            .with_estimated_duration(1800)
            .with_dependency(1, 2)
            .with_load(3.5, 1);

        assert_eq!(run.id, 7);
        assert_eq!(run.name, "Night batch");
        assert_eq!(run.initiator_id, 42);
        assert_eq!(run.estimated_duration, 1800);
        assert_eq!(run.dependencies.len(), 1);
        assert_eq!(run.run_load.load_unit, 1);
        assert!(!run.is_maintenance());
        assert!(Run::new(MAINTENANCE).is_maintenance());
    }

    #[test]
    fn test_needed_resources_accumulate() {
        let run = Run::new(1)
            .with_dependency(1, 2)
            .with_dependency(1, 3)
            .with_dependency(2, 1);

        let needed = run.needed_resources_per_type();
        assert_eq!(needed.len(), 2);
        assert_eq!(needed[&1], 5);
        assert_eq!(needed[&2], 1);
    }

    #[test]
    fn test_needed_types_deduplicated() {
        let run = Run::new(1)
            .with_dependency(3, 1)
            .with_dependency(1, 1)
            .with_dependency(3, 2);

        assert_eq!(run.needed_resource_types(), vec![1, 3]);
        assert!(Run::new(2).needed_resource_types().is_empty());
    }

    #[test]
    fn test_run_cost() {
        let run = Run::new(1).with_load(4.0, 2);
        let resource = ResourceInfo::new(1, "Oven", 1).with_cost(2, 2.5);

        let cost = run.run_cost_using(&resource).unwrap();
        assert!((cost - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_run_cost_unsupported_unit() {
        let run = Run::new(1).with_load(4.0, 9);
        let resource = ResourceInfo::new(1, "Oven", 1).with_cost(2, 2.5);

        assert_eq!(
            run.run_cost_using(&resource),
            Err(SchedulerError::UnsupportedLoadUnit { load_unit: 9 })
        );
    }

    #[test]
    fn test_run_from_json() {
        let run: Run = serde_json::from_str(
            r#"{
                "id": 3,
                "estimated_duration": 900,
                "dependencies": [{"resource_type": 1, "resource_quantity": 2}],
                "run_load": {"load": 1.5, "load_unit": 1}
            }"#,
        )
        .unwrap();

        assert_eq!(run.id, 3);
        assert!(run.name.is_empty());
        assert_eq!(run.needed_resources_per_type()[&1], 2);
    }
}
