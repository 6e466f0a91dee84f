//! `prosegate init` - write an example config file

use crate::config::EXAMPLE_CONFIG;
use anyhow::{bail, Context, Result};
use std::path::Path;

pub fn run() -> Result<i32> {
    let path = Path::new("prosegate.toml");
    if path.exists() {
        bail!("prosegate.toml already exists, not overwriting");
    }
    std::fs::write(path, EXAMPLE_CONFIG).context("cannot write prosegate.toml")?;
    println!("Wrote prosegate.toml with example settings");
    Ok(0)
}
