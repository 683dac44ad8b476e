//! Prerender CLI
//!
//! Command-line entry point that prerenders a built single-page app after
//! a successful production build.

pub mod commands;
pub mod output;
pub mod reporter;
