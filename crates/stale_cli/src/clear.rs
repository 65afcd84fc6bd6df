//! `stale clear` — delete the snapshot, forcing a cold start.

use crate::GlobalArgs;

/// Runs the `stale clear` command.
///
/// Removes the snapshot file if it exists. Clearing an already-absent
/// snapshot is not an error.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let path = crate::snapshot_path(global)?;

    if path.is_file() {
        std::fs::remove_file(&path)?;
        if !global.quiet {
            println!("removed {}", path.display());
        }
    } else if !global.quiet {
        println!("no snapshot at {}", path.display());
    }
    Ok(0)
}
