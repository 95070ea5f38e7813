//! Scheduling option search.
//!
//! Given a run and a time window, a [`Location`] breaks the window into
//! sub-intervals of the run's estimated duration and, for each one, looks
//! for resources of every needed type that are free in that sub-interval.
//!
//! # Searches
//!
//! - `get_one_scheduling_option`: greedy first-fit, one option per feasible
//!   sub-interval.
//! - `get_all_scheduling_options`: up to `possibilities_up_to` alternative
//!   options per feasible sub-interval.
//!
//! Sub-intervals that cannot be served are left out of the result. An empty
//! result is a valid answer ("nothing fits"); errors are reserved for
//! rejected input.
//!
//! # Plans, not reservations
//!
//! Searches only read occupancy. Nothing is held between the search and a
//! booking, and bookings on several resources are not atomic as a group.
//! Re-check with [`OptionSchedule::is_still_available`] and book each chosen
//! resource with [`ResourceScheduled::add_run`](crate::models::ResourceScheduled::add_run).

mod alternatives;
mod options;
mod simple;

pub use options::{OptionSchedule, OptionsSchedule};

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::models::{Location, ResourceScheduled, ResourceType, ResourcesPerType, Run, TimeInterval};

/// Query for scheduling options.
#[derive(Debug, Clone, Copy)]
pub struct ParamsCanRun<'a> {
    /// Window to search.
    pub time_interval: TimeInterval,
    /// Run to place.
    pub task_run: &'a Run,
    /// Cap on alternatives per sub-interval (multi-option search only).
    pub possibilities_up_to: u8,
}

impl<'a> ParamsCanRun<'a> {
    /// Creates a query allowing one option per sub-interval.
    pub fn new(time_interval: TimeInterval, task_run: &'a Run) -> Self {
        Self {
            time_interval,
            task_run,
            possibilities_up_to: 1,
        }
    }

    /// Sets the cap on alternatives per sub-interval.
    pub fn with_possibilities(mut self, possibilities_up_to: u8) -> Self {
        self.possibilities_up_to = possibilities_up_to;
        self
    }
}

impl fmt::Display for ParamsCanRun<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let run = self.task_run;

        writeln!(f, "ParamsCanRun{{")?;
        writeln!(
            f,
            "\tTimeInterval: {} (offset {}),",
            self.time_interval, self.time_interval.seconds_offset
        )?;
        writeln!(f, "\tTaskRun: Run{{")?;
        writeln!(f, "\t\tID: {},", run.id)?;
        writeln!(f, "\t\tName: {:?},", run.name)?;
        writeln!(f, "\t\tInitiatorID: {},", run.initiator_id)?;
        writeln!(f, "\t\tEstimatedDuration: {},", run.estimated_duration)?;
        if run.dependencies.is_empty() {
            writeln!(f, "\t\tDependencies: [],")?;
        } else {
            writeln!(f, "\t\tDependencies: [")?;
            for dep in &run.dependencies {
                writeln!(
                    f,
                    "\t\t\t{{ResourceType: {}, ResourceQuantity: {}}},",
                    dep.resource_type, dep.resource_quantity
                )?;
            }
            writeln!(f, "\t\t],")?;
        }
        writeln!(
            f,
            "\t\tRunLoad: {{Load: {}, LoadUnit: {}}},",
            run.run_load.load, run.run_load.load_unit
        )?;
        writeln!(f, "\t}},")?;
        writeln!(f, "\tPossibilitiesUpTo: {},", self.possibilities_up_to)?;
        write!(f, "}}")
    }
}

/// Needs and candidate resources captured once per search.
///
/// The location's structure lock is released once the snapshot is taken.
struct SearchSpace {
    needed: BTreeMap<ResourceType, u32>,
    pools: ResourcesPerType,
}

impl SearchSpace {
    fn capture(location: &Location, run: &Run) -> Self {
        Self {
            needed: run.needed_resources_per_type(),
            pools: location.resources_for(&run.needed_resource_types()),
        }
    }
}

/// Resources of a pool that are free in `interval` and can serve something,
/// in stored order.
fn available_pool(
    pool: &[Arc<ResourceScheduled>],
    interval: &TimeInterval,
) -> Vec<Arc<ResourceScheduled>> {
    pool.iter()
        .filter(|r| r.served_quantity() > 0 && r.is_available_in(interval))
        .cloned()
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;
    use super::fixtures::*;

    #[test]
    fn test_params_defaults() {
        let run = reference_run();
        let params = ParamsCanRun::new(reference_window(), &run);
        assert_eq!(params.possibilities_up_to, 1);
        assert_eq!(params.with_possibilities(4).possibilities_up_to, 4);
    }

    #[test]
    fn test_params_display() {
        let run = reference_run();
        let text = ParamsCanRun::new(reference_window(), &run)
            .with_possibilities(2)
            .to_string();

        assert!(text.starts_with("ParamsCanRun{"));
        assert!(text.contains("EstimatedDuration: 1800,"));
        assert!(text.contains("{ResourceType: 2, ResourceQuantity: 1},"));
        assert!(text.contains("PossibilitiesUpTo: 2,"));
    }

    #[test]
    fn test_search_space_only_needed_types() {
        let loc = reference_location();
        let run = Run::new(1).with_dependency(2, 1).with_dependency(2, 2);

        let space = SearchSpace::capture(&loc, &run);
        assert_eq!(space.needed.len(), 1);
        assert_eq!(space.needed[&2], 3);
        assert_eq!(space.pools.resource_types_sorted(), vec![2]);
    }

    #[test]
    fn test_available_pool_filters() {
        let loc = reference_location();
        let pool = loc.resources_of_type(1);
        let first = TimeInterval::new(NOW, NOW + HALF_HOUR);

        let ids: Vec<_> = available_pool(&pool, &first).iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec![2]);
    }
}
