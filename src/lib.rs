//! # vidhost
//!
//! Client state and session core for the video hosting service.
//!
//! The crate owns two state containers (session and video collections), the
//! REST transport they call through, the persisted bearer-token store and a
//! token-presence route guard. A UI layer (the `cli/` crate in this
//! repository) reads the state and invokes the operations.
//!
//! LAYERS
//! ======
//! `net` (transport) → `storage` (token) → `services::session` →
//! `services::videos` → `router` (guard). `state` holds the pure transitions
//! both managers apply; `notify` is the effect boundary for user-facing
//! notices; `context` wires one instance of everything together.

pub mod config;
pub mod context;
pub mod net;
pub mod notify;
pub mod router;
pub mod services;
pub mod state;
pub mod storage;

pub use context::ClientContext;
