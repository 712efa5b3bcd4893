use anyhow::{bail, Result};

use scrollie_core::AppConfig;

pub fn run(config: &AppConfig, init: bool) -> Result<()> {
    let path = AppConfig::config_path();

    if init {
        if path.exists() {
            bail!("Config file already exists at {}", path.display());
        }
        AppConfig::default().save()?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    if !path.exists() {
        println!("# No config file at {}, showing defaults", path.display());
    }
    print!("{}", config.to_toml()?);
    Ok(())
}
