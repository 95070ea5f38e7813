//! Booking domain models.
//!
//! Provides the types describing what can be booked (resources at a
//! location), what asks for it (runs) and when (time intervals).
//!
//! # Domain Mappings
//!
//! | u-booking | Hospitality | Manufacturing | Field service |
//! |-----------|-------------|---------------|---------------|
//! | Location | Hotel | Plant | Depot |
//! | ResourceScheduled | Room / Suite | Machine | Crew unit |
//! | Run | Stay | Production run | Job |
//! | TimeInterval | Night | Shift slot | Visit window |

mod interval;
mod location;
mod resource;
mod resources_per_type;
mod run;

pub use interval::{BreakDown, TimeInterval};
pub use location::{Location, LocationConfig, ParamsNewLocation};
pub use resource::{ParamsNewResource, ParamsRun, ResourceInfo, ResourceScheduled};
pub use resources_per_type::ResourcesPerType;
pub use run::{Run, RunDependency, RunId, RunLoad, MAINTENANCE};

/// Resource category tag. Valid types are positive.
pub type ResourceType = u8;

/// Load unit tag used to look up a resource's cost rate.
pub type LoadUnit = u8;
