use std::collections::HashSet;
use std::fs;

use camino::Utf8PathBuf;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::domain::AlleleRequest;
use crate::error::BeaconError;

pub const BEACON_FILE: &str = "beacon.json";

/// Static description of the beacon, read from `beacon.json`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeaconDescriptor {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub organization: Option<Organization>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub welcome_url: Option<String>,
    #[serde(default)]
    pub alternative_url: Option<String>,
    #[serde(default)]
    pub create_date_time: Option<String>,
    #[serde(default)]
    pub update_date_time: Option<String>,
    #[serde(default)]
    pub datasets: Vec<BeaconDataset>,
    #[serde(default)]
    pub sample_allele_requests: Vec<AlleleRequest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub welcome_url: Option<String>,
    #[serde(default)]
    pub contact_url: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeaconDataset {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub assembly_id: Option<String>,
    #[serde(default)]
    pub create_date_time: Option<String>,
    #[serde(default)]
    pub update_date_time: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub variant_count: Option<u64>,
    #[serde(default)]
    pub sample_count: Option<u64>,
    #[serde(default)]
    pub external_url: Option<String>,
}

/// The `(datasetId, externalUrl, assemblyId)` triple the engine is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetEndpoint {
    pub id: String,
    pub external_url: String,
    pub assembly_id: Option<String>,
}

impl BeaconDescriptor {
    pub fn dataset_endpoints(&self) -> Result<Vec<DatasetEndpoint>, BeaconError> {
        let mut seen = HashSet::new();
        self.datasets
            .iter()
            .map(|dataset| {
                if dataset.id.trim().is_empty() {
                    return Err(BeaconError::InvalidConfig(
                        "dataset with empty id".to_string(),
                    ));
                }
                if !seen.insert(dataset.id.as_str()) {
                    return Err(BeaconError::InvalidConfig(format!(
                        "duplicate dataset id {}",
                        dataset.id
                    )));
                }
                let external_url = dataset
                    .external_url
                    .as_deref()
                    .map(str::trim)
                    .filter(|url| !url.is_empty())
                    .ok_or_else(|| {
                        BeaconError::InvalidConfig(format!(
                            "dataset {} has no externalUrl",
                            dataset.id
                        ))
                    })?;
                Ok(DatasetEndpoint {
                    id: dataset.id.clone(),
                    external_url: external_url.to_string(),
                    assembly_id: dataset.assembly_id.clone(),
                })
            })
            .collect()
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Reads the descriptor from `path`, or from `$HOME/beacon.json`.
    pub fn resolve(path: Option<&str>) -> Result<BeaconDescriptor, BeaconError> {
        let descriptor_path = match path {
            Some(path) => Utf8PathBuf::from(path),
            None => default_descriptor_path()?,
        };

        if !descriptor_path.exists() {
            return Err(BeaconError::MissingConfig(
                descriptor_path.into_std_path_buf(),
            ));
        }

        let content = fs::read_to_string(&descriptor_path)
            .map_err(|_| BeaconError::ConfigRead(descriptor_path.clone().into_std_path_buf()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<BeaconDescriptor, BeaconError> {
        let descriptor: BeaconDescriptor = serde_json::from_str(content)
            .map_err(|err| BeaconError::ConfigParse(err.to_string()))?;
        Self::resolve_descriptor(descriptor)
    }

    pub fn resolve_descriptor(descriptor: BeaconDescriptor) -> Result<BeaconDescriptor, BeaconError> {
        if descriptor.id.trim().is_empty() {
            return Err(BeaconError::InvalidConfig("beacon id is empty".to_string()));
        }
        descriptor.dataset_endpoints()?;
        Ok(descriptor)
    }
}

pub fn default_descriptor_path() -> Result<Utf8PathBuf, BeaconError> {
    let dirs = BaseDirs::new()
        .ok_or_else(|| BeaconError::Generic("cannot determine home directory".to_string()))?;
    let home = Utf8PathBuf::from_path_buf(dirs.home_dir().to_path_buf()).map_err(|path| {
        BeaconError::Generic(format!("home directory is not UTF-8: {}", path.display()))
    })?;
    Ok(home.join(BEACON_FILE))
}
