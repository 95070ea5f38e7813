//! Bounded multi-option search.
//!
//! # Algorithm
//!
//! Same decomposition and per-type feasibility rule as the single-option
//! search, but for each sub-interval:
//!
//! 1. For each needed type, enumerate up to `limit` selections from the
//!    resources free in that sub-interval.
//! 2. Combine the per-type selections into complete options, at most `limit`
//!    per sub-interval.
//!
//! # Enumeration order
//!
//! A selection is an increasing sequence of positions in the type's stored
//! order whose served quantities first reach the need at its last element
//! (every proper prefix falls short). Selections come out of a depth-first
//! search in lexicographic position order, pruned as soon as the remaining
//! resources cannot reach the need. The first selection is therefore the
//! first-fit selection of the single-option search.
//!
//! Types combine in ascending type order, the last type varying fastest.
//!
//! # Complexity
//! O(s * (r + limit * t)) in the common case; the depth-first search stops
//! after `limit` selections per type.

use std::sync::Arc;

use tracing::{debug, trace};

use super::{available_pool, OptionSchedule, OptionsSchedule, ParamsCanRun, SearchSpace};
use crate::error::Result;
use crate::models::{Location, ResourceScheduled, ResourceType, ResourcesPerType};

type Selection = Vec<Arc<ResourceScheduled>>;

impl Location {
    /// Finds up to `possibilities_up_to` resource assignments per feasible
    /// sub-interval.
    ///
    /// Every option serves every need of the run with resources free in its
    /// sub-interval. A sub-interval with at least one feasible assignment
    /// always contributes at least one option. A cap of `0` is treated as
    /// `1`.
    pub fn get_all_scheduling_options(&self, params: &ParamsCanRun<'_>) -> Result<OptionsSchedule> {
        let run = params.task_run;
        let limit = usize::from(params.possibilities_up_to.max(1));
        let space = SearchSpace::capture(self, run);
        let sub_intervals = params.time_interval.break_down(run.estimated_duration);
        let sub_interval_count = sub_intervals.len();

        let mut result = OptionsSchedule::new();

        'intervals: for interval in sub_intervals {
            let mut per_type = Vec::with_capacity(space.needed.len());

            for (&resource_type, &needed) in &space.needed {
                let pool = available_pool(space.pools.get(resource_type), &interval);
                let selections = enumerate_selections(&pool, needed, limit);

                if selections.is_empty() {
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

                per_type.push((resource_type, selections));
            }

            for resources in combine(&per_type, limit) {
                result.push(OptionSchedule::new(interval, resources));
            }
        }

        debug!(
            location_id = self.id(),
            run_id = run.id,
            sub_intervals = sub_interval_count,
            options = result.len(),
            limit,
            "multi-option search finished"
        );

        Ok(result)
    }
}

/// Depth-first enumeration state over one type's free resources.
struct SelectionSearch<'a> {
    pool: &'a [Arc<ResourceScheduled>],
    /// `remaining[i]`: served quantity of `pool[i..]`.
    remaining: Vec<u32>,
    needed: u32,
    limit: usize,
    picked: Vec<usize>,
    found: Vec<Selection>,
}

impl SelectionSearch<'_> {
    fn extend(&mut self, from: usize, served: u32) {
        for i in from..self.pool.len() {
            if self.found.len() >= self.limit || served + self.remaining[i] < self.needed {
                return;
            }

            let total = served + u32::from(self.pool[i].served_quantity());
            self.picked.push(i);
            if total >= self.needed {
                let selection = self.picked.iter().map(|&k| Arc::clone(&self.pool[k])).collect();
                self.found.push(selection);
            } else {
                self.extend(i + 1, total);
            }
            self.picked.pop();
        }
    }
}

/// Up to `limit` selections from `pool` serving `needed`, in lexicographic
/// order. A zero need has exactly one selection: nothing.
fn enumerate_selections(
    pool: &[Arc<ResourceScheduled>],
    needed: u32,
    limit: usize,
) -> Vec<Selection> {
    if needed == 0 {
        return vec![Vec::new()];
    }

    let mut remaining = vec![0u32; pool.len() + 1];
    for i in (0..pool.len()).rev() {
        remaining[i] = remaining[i + 1] + u32::from(pool[i].served_quantity());
    }

    let mut search = SelectionSearch {
        pool,
        remaining,
        needed,
        limit,
        picked: Vec::new(),
        found: Vec::new(),
    };
    search.extend(0, 0);
    search.found
}

/// Cartesian product of per-type selections, capped at `limit`.
fn combine(per_type: &[(ResourceType, Vec<Selection>)], limit: usize) -> Vec<ResourcesPerType> {
    let mut combos = Vec::new();
    let mut cursor = vec![0usize; per_type.len()];

    while combos.len() < limit {
        let mut resources = ResourcesPerType::new();
        for ((resource_type, selections), &k) in per_type.iter().zip(&cursor) {
            resources.insert(*resource_type, selections[k].clone());
        }
        combos.push(resources);

        // Odometer step; done once every position wraps.
        let mut pos = per_type.len();
        loop {
            if pos == 0 {
                return combos;
            }
            pos -= 1;
            cursor[pos] += 1;
            if cursor[pos] < per_type[pos].1.len() {
                break;
            }
            cursor[pos] = 0;
        }
    }

    combos
}
