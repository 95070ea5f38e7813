//! Single-option search.
//!
//! # Algorithm
//!
//! 1. Break the window into sub-intervals of the run's estimated duration.
//! 2. For each sub-interval and each needed type, scan that type's resources
//!    in stored order and take every free one until the served quantity
//!    reaches the need.
//! 3. If any type falls short, drop the sub-interval; otherwise emit one
//!    option starting at the sub-interval start.
//!
//! # Complexity
//! O(s * r) availability probes, s = sub-intervals, r = resources of the
//! needed types.

use std::sync::Arc;

use tracing::{debug, trace};

use super::{OptionSchedule, OptionsSchedule, ParamsCanRun, SearchSpace};
use crate::error::Result;
use crate::models::{Location, ResourceScheduled, ResourcesPerType, TimeInterval};

impl Location {
    /// Finds one resource assignment per feasible sub-interval.
    ///
    /// Results follow sub-interval order. Sub-intervals that cannot be served
    /// are omitted, so the result may be empty. `possibilities_up_to` is
    /// ignored.
    ///
    /// # Example
    /// ```
    /// use u_booking::models::{Location, ParamsNewLocation, ResourceInfo, Run, TimeInterval};
    /// use u_booking::scheduler::ParamsCanRun;
    ///
    /// let location = Location::new(&ParamsNewLocation::new(1, "Depot")).unwrap();
    /// location.add_resource(ResourceInfo::new(1, "Van", 1));
    ///
    /// let run = Run::new(1).with_estimated_duration(600).with_dependency(1, 1);
    /// let window = TimeInterval::new(0, 1800);
    ///
    /// let options = location
    ///     .get_one_scheduling_option(&ParamsCanRun::new(window, &run))
    ///     .unwrap();
    /// assert_eq!(options.len(), 3);
    /// ```
    pub fn get_one_scheduling_option(&self, params: &ParamsCanRun<'_>) -> Result<OptionsSchedule> {
        let run = params.task_run;
        let space = SearchSpace::capture(self, run);
        let sub_intervals = params.time_interval.break_down(run.estimated_duration);
        let sub_interval_count = sub_intervals.len();

        let mut result = OptionsSchedule::new();

        'intervals: for interval in sub_intervals {
            let mut selection = ResourcesPerType::new();

            for (&resource_type, &needed) in &space.needed {
                match first_fit(space.pools.get(resource_type), &interval, needed) {
                    Some(chosen) => selection.insert(resource_type, chosen),
                    None => {
                        trace!(
                            location_id = self.id(),
                            run_id = run.id,
                            start = interval.time_start,
                            resource_type,
                            needed,
                            "sub-interval dropped"
                        );
                        continue 'intervals;
                    }
                }
            }

            result.push(OptionSchedule::new(interval, selection));
        }

        debug!(
            location_id = self.id(),
            run_id = run.id,
            sub_intervals = sub_interval_count,
            options = result.len(),
            "single-option search finished"
        );

        Ok(result)
    }
}

/// Free resources taken in stored order until `needed` is served.
///
/// Returns `None` if the pool runs out first.
fn first_fit(
    pool: &[Arc<ResourceScheduled>],
    interval: &TimeInterval,
    needed: u32,
) -> Option<Vec<Arc<ResourceScheduled>>> {
    let mut chosen = Vec::new();
    let mut served = 0u32;

    for resource in pool {
        if served >= needed {
            break;
        }
        if resource.served_quantity() == 0 || !resource.is_available_in(interval) {
            continue;
        }
        served += u32::from(resource.served_quantity());
        chosen.push(Arc::clone(resource));
    }

    (served >= needed).then_some(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ParamsNewLocation, ParamsRun, ResourceInfo, Run};
    use crate::scheduler::fixtures::*;

    #[test]
    fn test_one_option_per_time_interval() {
        let loc = reference_location();
        let run = reference_run();

        let options = loc
            .get_one_scheduling_option(&ParamsCanRun::new(reference_window(), &run))
            .unwrap();

        assert_eq!(options.len(), 4);
        for (k, option) in options.iter().enumerate() {
            assert_eq!(option.when_can_start, NOW + k as i64 * HALF_HOUR);
            assert!(!option.resources.is_empty());
            assert!(option.satisfies(&run));
            assert!(option.is_still_available());
        }
    }

    #[test]
    fn test_first_fit_picks_stored_order() {
        let loc = reference_location();
        let run = reference_run();

        let options = loc
            .get_one_scheduling_option(&ParamsCanRun::new(reference_window(), &run))
            .unwrap();

        let picked: Vec<i64> = options
            .iter()
            .map(|o| o.resources.get(1)[0].id())
            .collect();
        // [now,+30m): 1 and 3 busy; [+60m,+90m): 1 and 2 busy.
        assert_eq!(picked, vec![2, 1, 3, 1]);
        assert!(options.iter().all(|o| o.resources.get(2)[0].id() == 4));
    }

    #[test]
    fn test_infeasible_sub_intervals_dropped() {
        let loc = reference_location();
        let run = Run::new(1)
            .with_estimated_duration(HALF_HOUR)
            .with_dependency(1, 2);

        let options = loc
            .get_one_scheduling_option(&ParamsCanRun::new(reference_window(), &run))
            .unwrap();

        // Two free type-1 resources only at +30m and +90m.
        let starts: Vec<_> = options.iter().map(|o| o.when_can_start).collect();
        assert_eq!(starts, vec![NOW + HALF_HOUR, NOW + 3 * HALF_HOUR]);
        assert!(options.iter().all(|o| o.resources.get(1).len() == 2));
    }

    #[test]
    fn test_no_feasible_sub_interval_is_empty_not_error() {
        let loc = reference_location();
        let run = Run::new(1)
            .with_estimated_duration(HALF_HOUR)
            .with_dependency(9, 1);

        let options = loc
            .get_one_scheduling_option(&ParamsCanRun::new(reference_window(), &run))
            .unwrap();
        assert!(options.is_empty());
    }

    #[test]
    fn test_zero_duration_yields_nothing() {
        let loc = reference_location();
        let run = reference_run().with_estimated_duration(0);

        let options = loc
            .get_one_scheduling_option(&ParamsCanRun::new(reference_window(), &run))
            .unwrap();
        assert!(options.is_empty());
    }

    #[test]
    fn test_served_quantity_counts() {
        let loc = Location::new(&ParamsNewLocation::new(2, "Hotel")).unwrap();
        loc.add_resource(ResourceInfo::new(1, "Single", 1));
        loc.add_resource(ResourceInfo::new(2, "Apartment", 1).with_served_quantity(2));
        loc.add_resource(ResourceInfo::new(3, "Single", 1));

        let run = Run::new(5).with_estimated_duration(100).with_dependency(1, 3);
        let options = loc
            .get_one_scheduling_option(&ParamsCanRun::new(TimeInterval::new(0, 100), &run))
            .unwrap();

        assert_eq!(options.len(), 1);
        let ids: Vec<_> = options[0].resources.get(1).iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec![1, 2]); // 1 + 2 reaches 3, stop scanning
    }

    #[test]
    fn test_sees_bookings_made_after_setup() {
        let loc = reference_location();
        let run = reference_run();
        let slot = TimeInterval::new(NOW + HALF_HOUR, NOW + ONE_HOUR);

        loc.find_resource(2, 4)
            .unwrap()
            .add_run(&ParamsRun::new(slot, 77))
            .unwrap();

        let options = loc
            .get_one_scheduling_option(&ParamsCanRun::new(reference_window(), &run))
            .unwrap();
        assert_eq!(options.len(), 3);
        assert!(options.iter().all(|o| o.when_can_start != slot.time_start));
    }

    #[test]
    fn test_run_without_dependencies() {
        let loc = reference_location();
        let run = Run::new(1).with_estimated_duration(ONE_HOUR);

        let options = loc
            .get_one_scheduling_option(&ParamsCanRun::new(reference_window(), &run))
            .unwrap();
        assert_eq!(options.len(), 2);
        assert!(options.iter().all(|o| o.resources.is_empty()));
    }
}
