// src/core/mod.rs — Drafting engine: prompts, sessions, session registry

pub mod agent;
pub mod postprocess;
pub mod prompt;
pub mod service;
pub mod session;
pub mod store;
pub mod style;
pub mod types;
