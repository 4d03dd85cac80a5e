//! Developer tooling for the X402 browser extension.
//!
//! - [`icon_gen`] rasterizes the extension icons (16, 48 and 128 px).
//! - [`server`] serves the manual test pages over HTTP.

pub mod access_log;
pub mod canvas;
pub mod icon_gen;
pub mod label_font;
pub mod measure;
pub mod preflight;
pub mod server;
