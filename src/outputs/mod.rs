//! Output generation for the terminal.
//!
//! Rendering is kept as pure string building so it can be tested without a
//! terminal; `main` decides where the strings go.
//!
//! - [`terminal`]: headline listings and the full-article view
//! - [`browser`]: launching an article link in the system browser

pub mod browser;
pub mod terminal;
