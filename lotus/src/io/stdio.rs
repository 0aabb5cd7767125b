//! Newline-delimited JSON-RPC over stdin/stdout.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::server::McpSession;

/// Serve `session` until `reader` hits EOF.
///
/// One request per line; blank lines are skipped. Each response is written
/// as one line and flushed. Notifications produce no output.
pub fn serve<R, W>(session: &mut McpSession, reader: R, mut writer: W) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    info!("stdio transport ready");
    for line in reader.lines() {
        let line = line.context("read request line")?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let Some(response) = session.handle_line(trimmed) else {
            continue;
        };
        let encoded = serde_json::to_string(&response).context("serialize response")?;
        writeln!(writer, "{encoded}").context("write response")?;
        writer.flush().context("flush response")?;
    }
    debug!("stdin closed");
    Ok(())
}
