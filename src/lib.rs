//! Backend and headless client for an AI-assisted portfolio site
//!
//! The `proxy` module serves a single endpoint that forwards prompts to the
//! Gemini API with a server-held key. The `client` module models the page
//! script: the project-description modal, the resume chat widget and the
//! scroll-triggered fade-in effect.

pub mod ai;
pub mod client;
pub mod error;
pub mod models;
pub mod prompts;
pub mod proxy;

pub use error::{Error, Result};
