//! Client-side state containers.
//!
//! DESIGN
//! ======
//! State is split by domain (`session`, `videos`) so a UI can depend on a
//! small focused model. Each container is plain data plus pure transition
//! methods: no I/O, no notices, no locks. The managers in `services` own the
//! locking and decide which transition an API outcome maps to.

pub mod session;
pub mod videos;

pub use session::{AuthStatus, SessionState};
pub use videos::VideoState;
