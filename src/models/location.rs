//! Location model.
//!
//! A location is a named site owning typed collections of bookable
//! resources. It guards only the *structure* of that collection; every
//! resource guards its own occupancy map.
//!
//! # Locking
//! The structure lock is held while adding a resource or while cloning the
//! `Arc` lists out for a search or lookup, never while calling into a
//! resource. Searches therefore produce a plan, not a reservation: between a
//! search and a booking another caller may book the same slot, so each
//! chosen resource must be booked with
//! [`ResourceScheduled::add_run`] and its error handled.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};
use tracing::debug;

use super::{ParamsNewResource, ResourceInfo, ResourceScheduled, ResourceType, ResourcesPerType};
use super::{RunId, TimeInterval};
use crate::error::{Result, SchedulerError};
use crate::validation::{validate_new_location, ValidationResult};

/// Parameters for [`Location::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamsNewLocation {
    /// Site name (required).
    pub name: String,
    /// Site identifier (required, non-zero).
    pub id: i64,
    /// Local-to-UTC offset of the site (seconds).
    #[serde(default)]
    pub location_offset: i64,
}

impl ParamsNewLocation {
    /// Creates parameters with a zero offset.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id,
            location_offset: 0,
        }
    }

    /// Sets the site offset.
    pub fn with_offset(mut self, location_offset: i64) -> Self {
        self.location_offset = location_offset;
        self
    }

    /// Checks every field, reporting all issues.
    pub fn validate(&self) -> ValidationResult {
        validate_new_location(self)
    }
}

/// A whole site: location parameters plus its resource inventory.
///
/// Any serde format can feed it; see [`Location::from_config`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Site parameters.
    pub location: ParamsNewLocation,
    /// Resources, added in order.
    #[serde(default)]
    pub resources: Vec<ParamsNewResource>,
}

/// A named site owning bookable resources grouped by type.
#[derive(Debug)]
pub struct Location {
    id: i64,
    name: String,
    location_offset: i64,
    resources: RwLock<ResourcesPerType>,
}

impl Location {
    /// Creates an empty location.
    ///
    /// # Errors
    /// `Validation` if the name is empty or the ID is zero.
    pub fn new(params: &ParamsNewLocation) -> Result<Self> {
        params
            .validate()
            .map_err(|errors| SchedulerError::Validation {
                caller: "Location::new",
                errors,
            })?;

        Ok(Self {
            id: params.id,
            name: params.name.clone(),
            location_offset: params.location_offset,
            resources: RwLock::new(ResourcesPerType::new()),
        })
    }

    /// Builds a location and all its resources from a config.
    ///
    /// # Errors
    /// The first `Validation` error, from the location or from a resource.
    pub fn from_config(config: &LocationConfig) -> Result<Self> {
        let location = Self::new(&config.location)?;
        for params in &config.resources {
            location.try_add_resource(params)?;
        }
        Ok(location)
    }

    /// Site identifier.
    #[inline]
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Site name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Local-to-UTC offset of the site (seconds).
    #[inline]
    pub fn location_offset(&self) -> i64 {
        self.location_offset
    }

    fn read_resources(&self) -> RwLockReadGuard<'_, ResourcesPerType> {
        self.resources.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn insert(&self, resource: ResourceScheduled) -> Arc<ResourceScheduled> {
        let resource = Arc::new(resource);
        self.resources
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::clone(&resource));

        debug!(
            location_id = self.id,
            resource_id = resource.id(),
            resource_type = resource.resource_type(),
            "resource added"
        );

        resource
    }

    /// Adds a resource with an empty schedule to the bucket of its type.
    ///
    /// IDs are not checked for duplicates here; see
    /// [`validate_location`](crate::validation::validate_location).
    pub fn add_resource(&self, info: ResourceInfo) -> Arc<ResourceScheduled> {
        self.insert(ResourceScheduled::from_info(info))
    }

    /// Validates parameters, then adds the resource.
    ///
    /// # Errors
    /// `Validation` listing every offending field.
    pub fn try_add_resource(&self, params: &ParamsNewResource) -> Result<Arc<ResourceScheduled>> {
        Ok(self.insert(ResourceScheduled::new(params)?))
    }

    /// Snapshot of the inventory.
    ///
    /// Cloning shares the resources themselves, so bookings made through the
    /// snapshot are visible to the location.
    pub fn resources(&self) -> ResourcesPerType {
        self.read_resources().clone()
    }

    /// Snapshot of the buckets for the given types only.
    pub(crate) fn resources_for(&self, types: &[ResourceType]) -> ResourcesPerType {
        let all = self.read_resources();
        let mut subset = ResourcesPerType::new();
        for &resource_type in types {
            if all.contains_type(resource_type) {
                subset.insert(resource_type, all.get(resource_type).to_vec());
            }
        }
        subset
    }

    /// Resources of one type, in insertion order.
    pub fn resources_of_type(&self, resource_type: ResourceType) -> Vec<Arc<ResourceScheduled>> {
        self.read_resources().get(resource_type).to_vec()
    }

    /// First resource with the given type and ID.
    pub fn find_resource(
        &self,
        resource_type: ResourceType,
        resource_id: i64,
    ) -> Option<Arc<ResourceScheduled>> {
        self.read_resources()
            .get(resource_type)
            .iter()
            .find(|r| r.id() == resource_id)
            .cloned()
    }

    fn require_resource(
        &self,
        resource_type: ResourceType,
        resource_id: i64,
    ) -> Result<Arc<ResourceScheduled>> {
        self.find_resource(resource_type, resource_id)
            .ok_or(SchedulerError::ResourceNotFound {
                resource_type,
                resource_id,
            })
    }

    /// Removes the earliest booking of `run_id` from one resource.
    ///
    /// # Errors
    /// - `ResourceNotFound` if the location has no such resource
    /// - `NotFound` if the resource has no booking for the run
    pub fn remove_run(
        &self,
        resource_type: ResourceType,
        resource_id: i64,
        run_id: RunId,
    ) -> Result<()> {
        self.require_resource(resource_type, resource_id)?
            .remove_run(run_id)
    }

    /// Marks `interval` as site-owned maintenance on one resource.
    ///
    /// # Errors
    /// - `ResourceNotFound` if the location has no such resource
    /// - `InvalidDuration` / `AlreadyScheduled` as for a booking
    pub fn block(
        &self,
        resource_type: ResourceType,
        resource_id: i64,
        interval: TimeInterval,
    ) -> Result<()> {
        self.require_resource(resource_type, resource_id)?
            .block(interval)
    }
}
