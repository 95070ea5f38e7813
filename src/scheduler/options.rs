//! Scheduling option model.
//!
//! An option is one feasible assignment of concrete resources to one
//! sub-interval. Options are plans: they hold the chosen resources but book
//! nothing.

use std::ops::Deref;

use crate::error::Result;
use crate::models::{ResourcesPerType, Run, TimeInterval};

/// One feasible assignment for one sub-interval.
#[derive(Debug, Clone)]
pub struct OptionSchedule {
    /// Start of the sub-interval (local seconds).
    pub when_can_start: i64,
    /// The sub-interval itself; book chosen resources for exactly this.
    pub interval: TimeInterval,
    /// Chosen resources per needed type.
    pub resources: ResourcesPerType,
}

impl OptionSchedule {
    pub(crate) fn new(interval: TimeInterval, resources: ResourcesPerType) -> Self {
        Self {
            when_can_start: interval.time_start,
            interval,
            resources,
        }
    }

    /// Total cost of the run across every chosen resource.
    ///
    /// # Errors
    /// `UnsupportedLoadUnit` if a chosen resource cannot price the run.
    pub fn cost(&self, run: &Run) -> Result<f32> {
        let mut total = 0.0;
        for (_, resources) in self.resources.iter() {
            for resource in resources {
                total += run.run_cost_using(resource.info())?;
            }
        }
        Ok(total)
    }

    /// Whether the chosen resources serve every need of the run.
    pub fn satisfies(&self, run: &Run) -> bool {
        run.needed_resources_per_type()
            .into_iter()
            .all(|(resource_type, needed)| self.resources.served_quantity(resource_type) >= needed)
    }

    /// Whether every chosen resource is still free for the sub-interval.
    ///
    /// A `true` answer can go stale immediately; booking is the real check.
    pub fn is_still_available(&self) -> bool {
        self.resources
            .iter()
            .flat_map(|(_, resources)| resources)
            .all(|r| r.is_available_in(&self.interval))
    }

    /// Number of chosen resources.
    pub fn resource_count(&self) -> usize {
        self.resources.resource_count()
    }
}

/// Ordered scheduling options, in sub-interval order.
#[derive(Debug, Clone, Default)]
pub struct OptionsSchedule {
    options: Vec<OptionSchedule>,
}

impl OptionsSchedule {
    /// Creates an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, option: OptionSchedule) {
        self.options.push(option);
    }

    /// Consumes the result into its options.
    pub fn into_vec(self) -> Vec<OptionSchedule> {
        self.options
    }

    /// Number of distinct sub-intervals covered.
    pub fn sub_interval_count(&self) -> usize {
        let mut starts: Vec<_> = self.options.iter().map(|o| o.interval).collect();
        starts.dedup();
        starts.len()
    }

    /// Human-readable dump of every option, with costs for `run`.
    pub fn describe(&self, run: &Run) -> String {
        let mut out = format!(
            "OptionsSchedule for run {} ({:?}): {} option(s)\n",
            run.id,
            run.name,
            self.options.len()
        );

        for (k, option) in self.options.iter().enumerate() {
            out.push_str(&format!(
                "Option {}: start {} {}\n",
                k + 1,
                option.when_can_start,
                option.interval
            ));
            for (resource_type, resources) in option.resources.iter() {
                for resource in resources {
                    let cost = match run.run_cost_using(resource.info()) {
                        Ok(cost) => format!("{cost:.2}"),
                        Err(_) => "n/a".to_string(),
                    };
                    out.push_str(&format!("\ttype {resource_type}: {resource} cost {cost}\n"));
                }
            }
            if let Ok(total) = option.cost(run) {
                out.push_str(&format!("\ttotal cost: {total:.2}\n"));
            }
        }

        out
    }
}

impl Deref for OptionsSchedule {
    type Target = [OptionSchedule];

    fn deref(&self) -> &[OptionSchedule] {
        &self.options
    }
}

impl IntoIterator for OptionsSchedule {
    type Item = OptionSchedule;
    type IntoIter = std::vec::IntoIter<OptionSchedule>;

    fn into_iter(self) -> Self::IntoIter {
        self.options.into_iter()
    }
}

impl<'a> IntoIterator for &'a OptionsSchedule {
    type Item = &'a OptionSchedule;
    type IntoIter = std::slice::Iter<'a, OptionSchedule>;

    fn into_iter(self) -> Self::IntoIter {
        self.options.iter()
    }
}
