// =============================================================================
// Status API
// =============================================================================

pub mod auth;
pub mod rest;
