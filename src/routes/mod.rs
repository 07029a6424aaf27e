/// Router Module Index
///
/// Organizes the application's routing surface into the areas the gate
/// distinguishes. Access control itself is NOT applied per-module here: the
/// gate middleware wraps the whole router and makes the per-request decision
/// before any of these handlers run. The split exists so the route surface
/// reads the same way the decision procedure does.

/// Pages reachable by everyone plus the per-role landing pages.
pub mod public;

/// The admin section. The gate denies non-admin roles before dispatch.
pub mod admin;

/// API routes. Always subject to the gate, regardless of extension.
pub mod api;
