//! These models represent the objects passed around by the agent
//!
//! The transcript is the single source of truth for a run: it is resent to the
//! provider on every iteration, so the provider adapters convert it into their
//! wire format on the way out and convert replies back into a [`message::Message`]
//! on the way in. Nothing outside `providers` should see a wire format.
pub mod message;
pub mod role;
pub mod tool;
pub mod transcript;
