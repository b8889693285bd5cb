use std::path::Path;
use crate::error::Result;
use crate::format;
use crate::storage::{config, log, paths};

pub fn run(config_path: &Path, last: Option<usize>, json: bool) -> Result<()> {
    let config = config::read_config(config_path)?;
    let report = log::load_history(&paths::text_log_path(&config.save_path))?;

    if report.history.is_empty() && !json {
        eprintln!("No messages logged yet.");
    }

    let records = match last {
        Some(n) => report.history.tail(n),
        None => report.history.records(),
    };
    for record in records {
        if json {
            println!("{}", serde_json::to_string(record)?);
        } else {
            println!("{}", format::format_record(record));
        }
    }

    for skipped in &report.skipped {
        eprintln!("line {}: {}", skipped.line_no, skipped.reason);
    }
    Ok(())
}
