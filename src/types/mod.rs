//! Type definitions

pub mod location;
pub mod route;
pub mod shipment;
pub mod vehicle;

pub use location::*;
pub use route::*;
pub use shipment::*;
pub use vehicle::*;
