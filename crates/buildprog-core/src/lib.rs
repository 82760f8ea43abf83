//! buildprog-core - Build and flash orchestration for nRF5340 Audio DK fleets
//!
//! This crate turns a set of validated run options and a bench inventory into
//! builds and programming passes across every attached development kit. It
//! never spawns a process itself: the build tool, the probe enumeration and
//! the programmer are reached through the [`Builder`](build::Builder),
//! [`ProbeScanner`](fleet::ProbeScanner) and
//! [`FleetProgrammer`](fleet::FleetProgrammer) traits.
//!
//! # Data flow
//!
//! ```text
//! RawOptions --resolve--> RunOptions
//!                              │
//! inventory + probes --merge--> [DeviceRecord]
//!                              │
//!                 Orchestrator::run
//!          ┌───────────────────┼───────────────────┐
//!      reboot only     build (west, serial)    program (hex lookup,
//!                                               FleetProgrammer)
//!                              │
//!                       report::render
//! ```
//!
//! # Features
//!
//! - `clap` - Derive `clap::ValueEnum` on the selectable option enums

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod artifact;
pub mod build;
pub mod device;
pub mod error;
pub mod fleet;
pub mod inventory;
pub mod options;
pub mod report;
pub mod workspace;

pub use device::{Channel, DeviceRecord, SelectFlags};
pub use error::{Error, Result};
pub use fleet::{FleetProgrammer, Orchestrator, ProbeScanner, RunSummary};
pub use options::{RawOptions, RunOptions};
pub use workspace::Workspace;
