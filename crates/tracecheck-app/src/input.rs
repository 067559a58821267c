//! The resolved syntax model handed over by the host parser.

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use tracecheck_domain::model::SourceFile;
use tracecheck_types::SCHEMA_INPUT_V1;

/// `tracecheck.input.v1` document: one entry per parsed source file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InputBundle {
    pub schema: String,
    #[serde(default)]
    pub files: Vec<SourceFile>,
}

pub fn parse_input_json(text: &str) -> anyhow::Result<Vec<SourceFile>> {
    let bundle: InputBundle = serde_json::from_str(text).context("parse input model json")?;
    if bundle.schema != SCHEMA_INPUT_V1 {
        bail!(
            "unsupported input schema: {} (expected {SCHEMA_INPUT_V1})",
            bundle.schema
        );
    }
    Ok(bundle.files)
}
