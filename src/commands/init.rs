use std::path::{Path, PathBuf};
use crate::error::Result;
use crate::storage::config::{self, Config};

pub fn run(config_path: &Path, target: u64, dir: PathBuf) -> Result<()> {
    if config_path.exists() {
        let existing = config::read_config(config_path)?;
        std::fs::create_dir_all(&existing.save_path)?;
        println!("Config already exists at {}.", config_path.display());
        return Ok(());
    }

    let config = Config::new(target, dir);
    std::fs::create_dir_all(&config.save_path)?;
    config::write_config(config_path, &config)?;
    println!(
        "Initialized {} (logging user {} into {}).",
        config_path.display(),
        config.target_user_id,
        config.save_path.display()
    );
    Ok(())
}
