//! `feria snapshot` - dump the aggregated dashboard as JSON.

use std::io::Write;

/// Fetch, aggregate, and write the snapshot JSON to stdout.
pub async fn run(pretty: bool) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = super::fetch_snapshot().await?;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    if pretty {
        serde_json::to_writer_pretty(&mut handle, &*snapshot)?;
    } else {
        serde_json::to_writer(&mut handle, &*snapshot)?;
    }
    writeln!(handle)?;

    Ok(())
}
