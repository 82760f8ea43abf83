//! buildprog-host - Host tool adapters for buildprog
//!
//! Implementations of the buildprog-core collaborator traits on top of the
//! tools installed on the developer's machine:
//!
//! - [`ShellBuilder`] runs `west build` command lines through the shell
//! - [`Nrfjprog`] lists attached J-Link probes and reboots or programs boards,
//!   one thread per board unless a sequential pass is requested
//!
//! # Example
//!
//! ```ignore
//! use buildprog_host::{Nrfjprog, ShellBuilder};
//! use buildprog_core::{Orchestrator, ProbeScanner};
//!
//! let mut probes = Nrfjprog::new().with_progress(true);
//! let serials = probes.list()?;
//!
//! let mut builder = ShellBuilder;
//! let mut orchestrator = Orchestrator::new(&options, &workspace, &mut builder, &mut probes);
//! orchestrator.run(&mut devices)?;
//! ```

pub mod nrfjprog;
pub mod shell;

pub use nrfjprog::{parse_serials, CommandRunner, Nrfjprog, SystemRunner};
pub use shell::ShellBuilder;
