use std::path::Path;
use crate::error::Result;
use crate::render::{self, RenderOptions};
use crate::storage::{config, log, paths};

pub fn run(config_path: &Path) -> Result<()> {
    let config = config::read_config(config_path)?;
    let report = log::load_history(&paths::text_log_path(&config.save_path))?;
    let html_path = paths::html_path(&config.save_path);

    render::write_document(
        &html_path,
        report.history.records(),
        RenderOptions { escape_html: config.escape_html },
    )?;
    println!(
        "Rendered {} messages to {}.",
        report.history.len(),
        html_path.display()
    );
    if !report.skipped.is_empty() {
        eprintln!("Skipped {} malformed lines.", report.skipped.len());
    }
    Ok(())
}
