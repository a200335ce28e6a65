// =============================================================================
// HTTP surface: JSON API plus the single analysis page
// =============================================================================

pub mod rest;
