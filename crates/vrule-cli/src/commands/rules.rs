//! Rules command

use crate::extensions;
use anyhow::Result;
use std::path::Path;
use vrule::Registry;

/// Print every registered predicate name, one per line.
pub fn list_rules(extensions: Option<&Path>) -> Result<bool> {
    extensions::register(extensions, Registry::global())?;
    for name in Registry::global().rules().names() {
        println!("{name}");
    }
    Ok(true)
}
