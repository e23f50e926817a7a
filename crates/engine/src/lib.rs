//! Tablekeep Engine library.
//!
//! This crate contains all server-side code for the Tablekeep campaign
//! manager.
//!
//! ## Structure
//!
//! - `use_cases/` - Operations behind each API area
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `stores/` - In-memory runtime state
//! - `api/` - HTTP entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod stores;
pub mod use_cases;

pub use app::App;
