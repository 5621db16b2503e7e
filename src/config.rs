use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::Aspect;
use crate::error::ConvertError;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub schema_version: Option<u32>,
    #[serde(default)]
    pub obo: OboSection,
    #[serde(default)]
    pub gaf: GafSection,
    #[serde(default)]
    pub gff: GffSection,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct OboSection {
    #[serde(default)]
    pub flush_at_eof: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GafSection {
    #[serde(default)]
    pub aspects: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub min_columns: Option<usize>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GffSection {
    #[serde(default)]
    pub feature_type: Option<String>,
    #[serde(default)]
    pub id_keys: Option<Vec<String>>,
    #[serde(default)]
    pub name_keys: Option<Vec<String>>,
    #[serde(default)]
    pub description_keys: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexOptions {
    /// Index a final `[Term]` block even when the file lacks a closing blank line.
    pub flush_at_eof: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GafOptions {
    pub aspects: BTreeMap<String, String>,
    pub min_columns: usize,
}

impl Default for GafOptions {
    fn default() -> Self {
        Self {
            aspects: default_aspects(),
            min_columns: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GffOptions {
    pub feature_type: String,
    pub id_keys: Vec<String>,
    pub name_keys: Vec<String>,
    pub description_keys: Vec<String>,
}

impl Default for GffOptions {
    fn default() -> Self {
        Self {
            feature_type: "gene".to_string(),
            id_keys: strings(&["ID", "gene_id"]),
            name_keys: strings(&["Name", "gene_name", "symbol"]),
            description_keys: strings(&["description", "Note", "product"]),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResolvedConfig {
    pub schema_version: u32,
    pub obo: IndexOptions,
    pub gaf: GafOptions,
    pub gff: GffOptions,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads the JSON config at `path`; without a path every option takes its default.
    pub fn resolve(path: Option<&Path>) -> Result<ResolvedConfig, ConvertError> {
        let Some(path) = path else {
            return Self::resolve_config(Config::default());
        };

        let content =
            fs::read_to_string(path).map_err(|_| ConvertError::ConfigRead(path.to_path_buf()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| ConvertError::ConfigParse(err.to_string()))?;

        Self::resolve_config(config)
    }

    pub fn resolve_config(config: Config) -> Result<ResolvedConfig, ConvertError> {
        let schema_version = config.schema_version.unwrap_or(1);
        if schema_version != 1 {
            return Err(ConvertError::ConfigParse(format!(
                "unsupported schema_version {schema_version}"
            )));
        }

        let gaf_defaults = GafOptions::default();
        let min_columns = config.gaf.min_columns.unwrap_or(gaf_defaults.min_columns);
        // Columns 2, 5, 9 and 10 are always read.
        if min_columns < 10 {
            return Err(ConvertError::ConfigParse(format!(
                "gaf.min_columns must be at least 10, got {min_columns}"
            )));
        }
        let gaf = GafOptions {
            aspects: config.gaf.aspects.unwrap_or(gaf_defaults.aspects),
            min_columns,
        };

        let gff_defaults = GffOptions::default();
        let gff = GffOptions {
            feature_type: config.gff.feature_type.unwrap_or(gff_defaults.feature_type),
            id_keys: config.gff.id_keys.unwrap_or(gff_defaults.id_keys),
            name_keys: config.gff.name_keys.unwrap_or(gff_defaults.name_keys),
            description_keys: config
                .gff
                .description_keys
                .unwrap_or(gff_defaults.description_keys),
        };

        Ok(ResolvedConfig {
            schema_version,
            obo: IndexOptions {
                flush_at_eof: config.obo.flush_at_eof.unwrap_or(false),
            },
            gaf,
            gff,
        })
    }
}

pub fn default_aspects() -> BTreeMap<String, String> {
    Aspect::ALL
        .into_iter()
        .map(|aspect| (aspect.code().to_string(), aspect.namespace().to_string()))
        .collect()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}
