//! Agent runtime surface
//!
//! Agents are conversational personas constructed by the host. Each agent
//! kind has one process-wide default system prompt that extensions may
//! replace before the first agent is built.

pub mod chat;
pub mod prompt;
