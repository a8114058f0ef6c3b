pub mod device;
pub mod flight;
pub mod record;
pub mod sensor;

pub use device::*;
pub use flight::*;
pub use record::*;
pub use sensor::*;
