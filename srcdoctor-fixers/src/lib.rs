//! Fix strategies: recognize one class of compiler diagnostic and propose a
//! textual edit with a confidence constant.
//!
//! This crate owns *what* edit should be proposed. It does not own *how*
//! edits are applied; that's the `srcdoctor-edit` crate.

mod context;
mod registry;
mod strategies;

pub use registry::{Fixer, Registry, builtin_fixers};
