//! License-gated chat relay for a chemistry tutor persona.
//!
//! A session must present a valid time-windowed license code before its
//! messages are forwarded, together with a fixed system instruction, to an
//! OpenAI-compatible chat-completions endpoint.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
