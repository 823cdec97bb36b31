// Asset universe and venue mappings
pub mod asset;

// Display mode and pinned selection
pub mod display;

// Domain-specific error types
pub mod errors;

// Port interfaces
pub mod ports;

// Quotes, trends and spread math
pub mod quote;
