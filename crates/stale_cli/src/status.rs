//! `stale status` — summarize the persisted snapshot.

use stale_engine::Snapshot;

use crate::GlobalArgs;

/// Runs the `stale status` command.
///
/// Prints the snapshot location, the number of tracked files, and the total
/// number of dependency edges. A missing or unreadable snapshot is reported
/// as a cold start, not an error.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let path = crate::snapshot_path(global)?;

    let Some(snapshot) = Snapshot::load(&path) else {
        if !global.quiet {
            println!("no snapshot at {} (next run starts cold)", path.display());
        }
        return Ok(0);
    };

    if !global.quiet {
        let edges: usize = snapshot.graph.values().map(Vec::len).sum();
        println!("snapshot: {}", path.display());
        println!("tracked files: {}", snapshot.hashes.len());
        println!("graph entries: {}", snapshot.graph.len());
        println!("dependency edges: {edges}");
    }
    Ok(0)
}
