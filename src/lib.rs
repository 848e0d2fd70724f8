// src/lib.rs — Library root for wxdraft

pub mod cli;
pub mod core;
pub mod infra;
pub mod provider;
pub mod publisher;
