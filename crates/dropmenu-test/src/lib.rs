//! Headless testing tools for dropmenu.
//!
//! [`MenuHarness`] drives a [`dropmenu::MenuManager`] with synthetic
//! pointer and keyboard input addressed by row label, and [`CallLog`]
//! records which callbacks ran.

#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::must_use_candidate)]

mod calls;
mod harness;

pub use calls::CallLog;
pub use harness::MenuHarness;
