pub mod display_mode_service;
pub mod pinned_token_service;

pub use display_mode_service::DisplayModeService;
pub use pinned_token_service::PinnedTokenService;
