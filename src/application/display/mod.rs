pub mod selector;

pub use selector::{DEFAULT_ROTATION_PERIOD, DisplaySelector};
