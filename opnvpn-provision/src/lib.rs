//! Command-line front end for the OPNsense OpenVPN provisioning store.
//!
//! The store itself lives in `vpn-profile-core`; this crate adds the pieces a
//! front end needs around it:
//!
//! - [`persist`]: save-then-export step run after every edit
//! - [`refs`]: profile lookup by id or name
//! - [`report`]: colored terminal rendering
//! - [`runner`]: spawning the automation scripts and streaming their output
//! - [`runner_config`]: interpreter and script locations (TOML)

pub mod persist;
pub mod refs;
pub mod report;
pub mod runner;
pub mod runner_config;
