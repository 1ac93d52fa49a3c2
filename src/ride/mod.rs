mod entity;
mod manager;

pub use entity::{Coordinates, RequestRideInput, RequestRideOutput, Ride, RideStatus};
pub use manager::RideLifecycleManager;
