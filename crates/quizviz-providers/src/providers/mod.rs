//! Provider adapter implementations

pub mod imagine;
pub mod stability;

pub use imagine::ImagineProvider;
pub use stability::StabilityProvider;
