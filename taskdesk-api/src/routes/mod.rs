/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Token issuance (login, refresh) and registration
/// - `users`: User administration (admin-only)
/// - `companies`, `areas`, `clients`: Entity CRUD with guarded deletes
/// - `tasks`: Task lifecycle, role-scoped

pub mod areas;
pub mod auth;
pub mod clients;
pub mod companies;
pub mod health;
pub mod tasks;
pub mod users;
