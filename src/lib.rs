//! Resource booking core.
//!
//! Assigns scarce, typed, quantity-limited resources (rooms, machines, crew
//! units) to runs that request a bundle of resource types over a time
//! window.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `TimeInterval`, `Run`, `ResourceInfo`,
//!   `ResourceScheduled`, `ResourcesPerType`, `Location`
//! - **`scheduler`**: Option search: `ParamsCanRun`, `OptionSchedule`,
//!   `OptionsSchedule`, single- and multi-option searches on `Location`
//! - **`validation`**: Parameter and inventory integrity checks
//! - **`error`**: `SchedulerError` and the crate `Result`
//!
//! # Concurrency
//!
//! Every resource guards its own occupancy map with a read-write lock; a
//! location guards only the structure of its inventory. Searches read
//! availability without reserving anything, so a chosen option must still be
//! booked resource by resource, and a booking can fail with
//! `AlreadyScheduled` if another caller got there first.
//!
//! # Example
//!
//! ```
//! use u_booking::models::{Location, ParamsNewLocation, ParamsRun, ResourceInfo, Run, TimeInterval};
//! use u_booking::scheduler::ParamsCanRun;
//!
//! let location = Location::new(&ParamsNewLocation::new(1, "Hotel")).unwrap();
//! location.add_resource(ResourceInfo::new(1, "Room 101", 1).with_cost(1, 80.0));
//! location.add_resource(ResourceInfo::new(2, "Room 102", 1).with_cost(1, 95.0));
//!
//! let run = Run::new(42)
//!     .with_estimated_duration(3600)
//!     .with_dependency(1, 1)
//!     .with_load(1.0, 1);
//! let window = TimeInterval::new(0, 7200);
//!
//! let options = location
//!     .get_all_scheduling_options(&ParamsCanRun::new(window, &run).with_possibilities(2))
//!     .unwrap();
//! assert_eq!(options.len(), 4);
//!
//! let chosen = &options[0];
//! for (_, resources) in chosen.resources.iter() {
//!     for resource in resources {
//!         resource.add_run(&ParamsRun::new(chosen.interval, run.id)).unwrap();
//!     }
//! }
//! assert!(!chosen.is_still_available());
//! ```

pub mod error;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use error::{Result, SchedulerError};
