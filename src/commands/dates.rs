use anyhow::{Context, Result};
use calhelper_core::time::{self, DateInput};

use super::Options;

/// Rendered in the configured zone, so naive input keeps its wall time.
pub fn rfc3339(options: &Options, input: &str, all_day: bool, is_end: bool) -> Result<()> {
    let tz = options.load_config()?.google.time_zone()?;

    let formatted = time::str_to_rfc3339_in(DateInput::parse(input), all_day, is_end, tz)
        .with_context(|| format!("Could not read '{}' as a date", input))?;
    println!("{}", formatted);
    Ok(())
}

pub fn rfc2445(input: &str) -> Result<()> {
    let formatted = time::str_to_rfc2445(DateInput::parse(input))
        .with_context(|| format!("Could not read '{}' as a date", input))?;
    println!("{}", formatted);
    Ok(())
}
