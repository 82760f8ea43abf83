//! Writes the buildprog(1) man page
//!
//! `gen-manpage [DIR]` renders into `DIR/buildprog.1` (default `man/`);
//! `gen-manpage -` prints the page to stdout.

use clap::CommandFactory;
use std::io::{self, Write};
use std::path::Path;

#[allow(dead_code)]
#[path = "../cli.rs"]
mod cli;

const PAGE: &str = "buildprog.1";

fn render() -> io::Result<Vec<u8>> {
    let mut page = Vec::new();
    clap_mangen::Man::new(cli::Cli::command()).render(&mut page)?;
    Ok(page)
}

fn main() -> io::Result<()> {
    let target = std::env::args().nth(1).unwrap_or_else(|| "man".to_string());
    let page = render()?;

    if target == "-" {
        return io::stdout().write_all(&page);
    }

    let dir = Path::new(&target);
    std::fs::create_dir_all(dir)?;
    let path = dir.join(PAGE);
    std::fs::write(&path, page)?;
    eprintln!("wrote {}", path.display());
    Ok(())
}
