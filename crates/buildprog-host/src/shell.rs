//! Build command runner

use buildprog_core::build::Builder;
use std::io;
use std::process::Command;

/// Runs build command lines through the platform shell
///
/// Output goes straight to the terminal. A process terminated by a signal
/// reports exit code `-1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellBuilder;

impl Builder for ShellBuilder {
    fn run(&mut self, command: &str) -> io::Result<i32> {
        let status = if cfg!(windows) {
            Command::new("cmd").args(["/C", command]).status()?
        } else {
            Command::new("sh").args(["-c", command]).status()?
        };
        Ok(status.code().unwrap_or(-1))
    }
}
