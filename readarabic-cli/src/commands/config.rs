use crate::context::AppContext;
use anyhow::{bail, Result};

pub fn config_get(ctx: &AppContext, key: &str) -> Result<()> {
    match ctx.config.get(key) {
        Some(value) => {
            println!("{value}");
            Ok(())
        }
        None => bail!("No value for '{}'", key),
    }
}
