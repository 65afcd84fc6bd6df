//! `stale show` — one file's recorded hash and direct dependencies.

use stale_engine::Snapshot;

use crate::{GlobalArgs, ReportFormat, ShowArgs};

/// Runs the `stale show` command.
///
/// Looks the file up in the persisted snapshot and prints its recorded
/// content hash and direct dependency edges. Returns exit code 1 when there
/// is no snapshot or the file is not recorded in it.
pub fn run(args: &ShowArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let path = crate::snapshot_path(global)?;

    let Some(snapshot) = Snapshot::load(&path) else {
        if !global.quiet {
            eprintln!("no snapshot at {}", path.display());
        }
        return Ok(1);
    };

    let hash = snapshot.hashes.get(&args.path);
    let deps = snapshot.graph.get(&args.path);
    if hash.is_none() && deps.is_none() {
        if !global.quiet {
            eprintln!("{} is not recorded in the snapshot", args.path.display());
        }
        return Ok(1);
    }

    match args.format {
        ReportFormat::Text => {
            if !global.quiet {
                match hash {
                    Some(hash) => println!("hash: {hash}"),
                    None => println!("hash: (none, will register as changed)"),
                }
                for dep in deps.into_iter().flatten() {
                    println!("dep: {}", dep.display());
                }
            }
        }
        ReportFormat::Json => {
            let value = serde_json::json!({
                "path": args.path,
                "hash": hash.map(|h| h.to_string()),
                "dependencies": deps.cloned().unwrap_or_default(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(0)
}
