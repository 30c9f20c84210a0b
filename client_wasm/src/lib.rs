//! Browser host for the local Pong core
//!
//! Draws on a Canvas 2D context, reads keyboard and touch input, stores
//! results through the history API and moves between page routes with the
//! location hash. The page flow in [`app`] is plain Rust and runs natively
//! under test; the web bindings only exist on wasm32.

pub mod app;
pub mod bracket_view;
pub mod fsm;
pub mod notice;

#[cfg(target_arch = "wasm32")]
mod bindings;
#[cfg(target_arch = "wasm32")]
mod canvas;
#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use bindings::*;
