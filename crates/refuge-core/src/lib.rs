//! Refuge Core - Shelter Capacity Tracking
//!
//! Pure logic for locating emergency shelters and reserving spots in them.
//! Nothing in this crate performs I/O; the node crate wires it to storage,
//! HTTP and timers.
//!
//! # Capacity Invariant
//!
//! Every shelter keeps `0 <= occupancy <= capacity`. Available spots are
//! never stored: they are always `capacity - occupancy`, computed on read.
//!
//! # Components
//!
//! - **Tracker**: owns the shelter collection, guards check-in, replaces the
//!   collection wholesale on refresh
//! - **Record**: the JSON wire format exchanged with the shelter API
//! - **Simulation**: bounded random walk over occupancy for offline use
//! - **Monitor**: simulated environment sensors for a single shelter
//! - **View**: map / list / dashboard selection and dashboard ordering
//! - **Registration**: account form validation
//!
//! # Example
//!
//! ```
//! use refuge_core::{CapacityTracker, Shelter};
//!
//! let mut tracker = CapacityTracker::new();
//! tracker.replace_all(vec![Shelter::new(1, "Central", 100, 75).unwrap()]);
//!
//! let receipt = tracker.check_in(1).unwrap();
//! assert_eq!(receipt.occupancy, 76);
//! assert_eq!(receipt.available_spots, 24);
//! ```

mod error;
mod monitor;
mod record;
mod registration;
mod seed;
mod shelter;
mod simulation;
mod tracker;
mod view;

pub use error::{Error, Result};
pub use monitor::{AirQuality, EnvironmentMonitor, EnvironmentReading};
pub use record::{parse_resources, ShelterRecord};
pub use registration::Registration;
pub use seed::mock_shelters;
pub use shelter::{Contact, GeoPoint, Shelter, ShelterId};
pub use simulation::{OccupancySimulator, MAX_STEP};
pub use tracker::{CapacityTracker, CheckInReceipt, Totals};
pub use view::{dashboard_rows, DashboardRow, Navigation, View, ViewSelector};
