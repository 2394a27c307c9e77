//! Reading trace text from a file or stdin.

use std::io::Read;

use anyhow::Context;

/// Read `path`, or all of stdin when `path` is `None` or `-`.
pub fn read_input(path: Option<&str>) -> anyhow::Result<String> {
    match path {
        Some(path) if path != "-" => {
            std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))
        }
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}
