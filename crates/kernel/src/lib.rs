//! Atrium admin console kernel.
//!
//! The console's screens are decided entirely by a permission-scoped menu
//! tree fetched after authentication. This crate is the engine behind that:
//! it normalizes the backend tree, projects it into a navigation menu and a
//! route tree, mounts the routes exactly once per session, gates every
//! navigation on authentication and route-readiness, and tears everything
//! down on sign-out so a later, differently-permissioned login never sees
//! leftover screens.

pub mod api;
pub mod config;
pub mod error;
pub mod menu;
pub mod router;
pub mod session;
pub mod state;
