//! Resource model.
//!
//! `ResourceInfo` describes a bookable resource: its type, how many units of
//! need one instance serves, and what it costs per load unit.
//! `ResourceScheduled` wraps that description with a lock-protected
//! occupancy map of booked intervals.
//!
//! # Occupancy
//! Collisions are detected on exact interval keys only. Two bookings whose
//! intervals overlap without being identical are both accepted; the searches
//! in [`crate::scheduler`] only ever probe the sub-intervals they generate,
//! so they stay consistent with this rule.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use super::{LoadUnit, ResourceType, RunId, TimeInterval};
use crate::error::{Result, SchedulerError};
use crate::validation::{validate_new_resource, ValidationResult};

/// Identity and capability of a bookable resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceInfo {
    /// Identifier, unique within a location's type bucket.
    pub id: i64,
    /// Human-readable name.
    pub name: String,
    /// Resource category.
    pub resource_type: ResourceType,
    /// Units of need one instance satisfies (a two-room apartment serves 2).
    pub served_quantity: u16,
    /// Cost rate per load unit.
    pub cost_per_load_unit: HashMap<LoadUnit, f32>,
}

impl ResourceInfo {
    /// Creates a resource serving one unit, with no cost rates.
    pub fn new(id: i64, name: impl Into<String>, resource_type: ResourceType) -> Self {
        Self {
            id,
            name: name.into(),
            resource_type,
            served_quantity: 1,
            cost_per_load_unit: HashMap::new(),
        }
    }

    /// Sets the served quantity.
    pub fn with_served_quantity(mut self, served_quantity: u16) -> Self {
        self.served_quantity = served_quantity;
        self
    }

    /// Adds a cost rate for a load unit.
    pub fn with_cost(mut self, load_unit: LoadUnit, cost_per_unit: f32) -> Self {
        self.cost_per_load_unit.insert(load_unit, cost_per_unit);
        self
    }

    /// Cost rate for a load unit, if the resource supports it.
    pub fn cost_rate(&self, load_unit: LoadUnit) -> Option<f32> {
        self.cost_per_load_unit.get(&load_unit).copied()
    }
}

impl fmt::Display for ResourceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Name: {:?}, ResourceType: {}",
            self.id, self.name, self.resource_type
        )
    }
}

/// Parameters for [`ResourceScheduled::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamsNewResource {
    /// Resource name (required).
    pub name: String,
    /// Cost rate per load unit (required, rates non-negative).
    #[serde(default)]
    pub cost_per_load_unit: Option<HashMap<LoadUnit, f32>>,
    /// Resource identifier.
    pub id: i64,
    /// Resource category (must be positive).
    pub resource_type: u8,
    /// Units of need one instance satisfies.
    #[serde(default = "default_served_quantity")]
    pub served_quantity: u16,
}

fn default_served_quantity() -> u16 {
    1
}

impl ParamsNewResource {
    /// Creates parameters with an empty cost map and a served quantity of 1.
    pub fn new(id: i64, name: impl Into<String>, resource_type: u8) -> Self {
        Self {
            name: name.into(),
            cost_per_load_unit: Some(HashMap::new()),
            id,
            resource_type,
            served_quantity: default_served_quantity(),
        }
    }

    /// Adds a cost rate for a load unit.
    pub fn with_cost(mut self, load_unit: LoadUnit, cost_per_unit: f32) -> Self {
        self.cost_per_load_unit
            .get_or_insert_with(HashMap::new)
            .insert(load_unit, cost_per_unit);
        self
    }

    /// Sets the served quantity.
    pub fn with_served_quantity(mut self, served_quantity: u16) -> Self {
        self.served_quantity = served_quantity;
        self
    }

    /// Checks every field, reporting all issues.
    pub fn validate(&self) -> ValidationResult {
        validate_new_resource(self)
    }
}

/// A booking request: one run over one exact interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamsRun {
    /// Interval to occupy.
    pub interval: TimeInterval,
    /// Run occupying it ([`MAINTENANCE`](super::MAINTENANCE) is rejected).
    pub id: RunId,
}

impl ParamsRun {
    /// Creates a booking request.
    pub fn new(interval: TimeInterval, id: RunId) -> Self {
        Self { interval, id }
    }

    /// Whether the interval starts before it ends.
    #[inline]
    pub fn is_valid_duration(&self) -> bool {
        self.interval.is_valid()
    }

    /// Whether the run ID is positive.
    #[inline]
    pub fn is_valid_id(&self) -> bool {
        self.id > 0
    }
}

/// A concrete resource instance with its own occupancy map.
///
/// Every read and write of the occupancy map goes through the resource's
/// `RwLock`: availability checks and schedule dumps share it, bookings and
/// removals hold it exclusively.
#[derive(Debug)]
pub struct ResourceScheduled {
    info: ResourceInfo,
    schedule: RwLock<BTreeMap<TimeInterval, RunId>>,
}

impl ResourceScheduled {
    /// Creates a resource from validated parameters.
    ///
    /// # Errors
    /// `Validation` listing every offending field.
    pub fn new(params: &ParamsNewResource) -> Result<Self> {
        params
            .validate()
            .map_err(|errors| SchedulerError::Validation {
                caller: "ResourceScheduled::new",
                errors,
            })?;

        Ok(Self::from_info(ResourceInfo {
            id: params.id,
            name: params.name.clone(),
            resource_type: params.resource_type,
            served_quantity: params.served_quantity,
            cost_per_load_unit: params.cost_per_load_unit.clone().unwrap_or_default(),
        }))
    }

    /// Wraps a description with an empty occupancy map.
    pub fn from_info(info: ResourceInfo) -> Self {
        Self {
            info,
            schedule: RwLock::new(BTreeMap::new()),
        }
    }

    /// Static description of the resource.
    #[inline]
    pub fn info(&self) -> &ResourceInfo {
        &self.info
    }

    /// Resource identifier.
    #[inline]
    pub fn id(&self) -> i64 {
        self.info.id
    }

    /// Resource name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Resource category.
    #[inline]
    pub fn resource_type(&self) -> ResourceType {
        self.info.resource_type
    }

    /// Units of need one instance satisfies.
    #[inline]
    pub fn served_quantity(&self) -> u16 {
        self.info.served_quantity
    }

    // Entries are plain values, so a writer that panicked cannot leave the
    // map half-updated; recover instead of propagating the poison.
    fn read_schedule(&self) -> RwLockReadGuard<'_, BTreeMap<TimeInterval, RunId>> {
        self.schedule.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_schedule(&self) -> RwLockWriteGuard<'_, BTreeMap<TimeInterval, RunId>> {
        self.schedule.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Books `params.id` for exactly `params.interval`.
    ///
    /// # Errors
    /// - `InvalidDuration` if the interval does not start before it ends
    /// - `InvalidId` if the run ID is not positive
    /// - `AlreadyScheduled` if the identical interval is already booked
    pub fn add_run(&self, params: &ParamsRun) -> Result<()> {
        if !params.is_valid_duration() {
            return Err(SchedulerError::InvalidDuration {
                start: params.interval.time_start,
                end: params.interval.time_end,
            });
        }

        if !params.is_valid_id() {
            return Err(SchedulerError::InvalidId { id: params.id });
        }

        {
            let mut schedule = self.write_schedule();
            if schedule.contains_key(&params.interval) {
                return Err(SchedulerError::AlreadyScheduled {
                    interval: params.interval,
                });
            }
            schedule.insert(params.interval, params.id);
        }

        debug!(
            resource_id = self.info.id,
            resource_type = self.info.resource_type,
            run_id = params.id,
            start = params.interval.time_start,
            end = params.interval.time_end,
            "run booked"
        );

        Ok(())
    }

    /// Removes the earliest booking held by `run_id`.
    ///
    /// Reachable only through [`Location::remove_run`](super::Location::remove_run),
    /// which owns the coordination around removals.
    pub(crate) fn remove_run(&self, run_id: RunId) -> Result<()> {
        let removed = {
            let mut schedule = self.write_schedule();
            let interval = schedule
                .iter()
                .find(|(_, id)| **id == run_id)
                .map(|(interval, _)| *interval);

            if let Some(interval) = interval {
                schedule.remove(&interval);
            }
            interval
        };

        let interval = removed.ok_or(SchedulerError::NotFound { run_id })?;

        debug!(
            resource_id = self.info.id,
            run_id,
            start = interval.time_start,
            end = interval.time_end,
            "run removed"
        );

        Ok(())
    }

    /// Seeds site-owned occupancy (maintenance, blackouts) for `interval`.
    ///
    /// Same exact-key rule as [`add_run`](Self::add_run), but books the
    /// reserved [`MAINTENANCE`](super::MAINTENANCE) marker.
    pub(crate) fn block(&self, interval: TimeInterval) -> Result<()> {
        if !interval.is_valid() {
            return Err(SchedulerError::InvalidDuration {
                start: interval.time_start,
                end: interval.time_end,
            });
        }

        let mut schedule = self.write_schedule();
        if schedule.contains_key(&interval) {
            return Err(SchedulerError::AlreadyScheduled { interval });
        }
        schedule.insert(interval, super::MAINTENANCE);

        Ok(())
    }

    /// Whether no booking uses exactly `interval`.
    pub fn is_available_in(&self, interval: &TimeInterval) -> bool {
        !self.read_schedule().contains_key(interval)
    }

    /// Run booked for exactly `interval`, if any.
    pub fn run_in(&self, interval: &TimeInterval) -> Option<RunId> {
        self.read_schedule().get(interval).copied()
    }

    /// Snapshot of all bookings, sorted by interval.
    pub fn bookings(&self) -> Vec<(TimeInterval, RunId)> {
        self.read_schedule()
            .iter()
            .map(|(interval, id)| (*interval, *id))
            .collect()
    }

    /// Number of booked intervals.
    pub fn booked_count(&self) -> usize {
        self.read_schedule().len()
    }

    /// Human-readable dump of the bookings, sorted by start time.
    ///
    /// The lock is held only while copying entries out, so the text is a
    /// diagnostic view and may lag concurrent bookings.
    pub fn schedule(&self) -> String {
        let bookings = self.bookings();
        if bookings.is_empty() {
            return "Schedule: (empty)".to_string();
        }

        let mut out = String::from("Schedule:\n");
        for (interval, run_id) in bookings {
            out.push_str(&format!(
                "- [{}-{}] (UTC {}-{}) Offset {:.1}h → Run {}\n",
                interval.time_start,
                interval.time_end,
                interval.utc_time_start(),
                interval.utc_time_end(),
                interval.seconds_offset as f64 / 3600.0,
                run_id,
            ));
        }
        out
    }
}

impl fmt::Display for ResourceScheduled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.info, f)
    }
}
