use anyhow::Result;
use colored::Colorize;

use crate::config::{CONFIG_FILE_NAME, RosterConfig, StorageBackend};
use crate::error::RosterError;

pub fn handle_init(backend: StorageBackend, path: Option<String>, port: Option<u16>) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let config_path = cwd.join(CONFIG_FILE_NAME);

    if config_path.exists() {
        return Err(RosterError::AlreadyInitialized(config_path.display().to_string()).into());
    }

    let mut config = RosterConfig::default();
    config.storage.backend = backend;
    if let Some(p) = path {
        config.storage.path = p;
    }
    if let Some(p) = port {
        config.server.port = p;
    }
    config.validate()?;

    if backend == StorageBackend::File {
        std::fs::create_dir_all(config.data_path(&cwd))?;
    }
    config.save(&config_path)?;

    println!(
        "{} roster project in {}",
        "Initialized".green(),
        cwd.display()
    );
    println!("  Config:  {}", config_path.display());
    match backend {
        StorageBackend::File => println!("  Data:    {}", config.data_path(&cwd).display()),
        StorageBackend::Memory => println!("  Data:    in memory"),
    }

    Ok(())
}
