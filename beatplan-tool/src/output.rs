use clap::ValueEnum;
use serde::Serialize;

use crate::error::BpError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

pub fn render(value: &impl Serialize, format: OutputFormat) -> Result<String, BpError> {
    Ok(match format {
        OutputFormat::Json => {
            let mut s = serde_json::to_string_pretty(value)?;
            s.push('\n');
            s
        }
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    })
}
