//! starwave — a small terminal arcade shooter.
//!
//! The crate splits into a simulation core (`entities`, `session`) that is
//! free of any terminal or audio I/O, and host-facing modules (`display`,
//! `input`, `audio`, `config`) that translate between the core and the
//! outside world.

pub mod audio;
pub mod config;
pub mod display;
pub mod entities;
pub mod input;
pub mod session;
