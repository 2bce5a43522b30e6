use indexmap::{IndexMap, IndexSet};
use tracing::{debug, warn};

use crate::config::DatasetEndpoint;
use crate::error::BeaconError;
use crate::ga4gh::Ga4ghClient;

#[derive(Debug)]
pub struct RegisteredDataset<C> {
    pub endpoint: DatasetEndpoint,
    pub client: C,
}

/// Dataset id to backend client table, fixed at construction.
/// Iteration follows configuration order.
#[derive(Debug)]
pub struct DatasetRegistry<C> {
    datasets: IndexMap<String, RegisteredDataset<C>>,
}

impl<C: Ga4ghClient> DatasetRegistry<C> {
    pub fn new<I>(entries: I) -> Result<Self, BeaconError>
    where
        I: IntoIterator<Item = (DatasetEndpoint, C)>,
    {
        let mut datasets = IndexMap::new();
        for (endpoint, client) in entries {
            let id = endpoint.id.clone();
            if datasets
                .insert(id.clone(), RegisteredDataset { endpoint, client })
                .is_some()
            {
                return Err(BeaconError::InvalidConfig(format!(
                    "duplicate dataset id {id}"
                )));
            }
        }
        Ok(Self { datasets })
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    pub fn contains(&self, dataset_id: &str) -> bool {
        self.datasets.contains_key(dataset_id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.datasets.keys().map(String::as_str)
    }

    pub fn get(&self, dataset_id: &str) -> Option<&RegisteredDataset<C>> {
        self.datasets.get(dataset_id)
    }

    pub fn client(&self, dataset_id: &str) -> Result<&C, BeaconError> {
        self.datasets
            .get(dataset_id)
            .map(|dataset| &dataset.client)
            .ok_or_else(|| BeaconError::UnknownDataset(dataset_id.to_string()))
    }

    /// Returns the dataset ids a query should search, in search order.
    ///
    /// Explicit ids are all checked against the table before anything goes
    /// over the network, so one unknown id aborts the whole query; they are
    /// searched in request order. An empty request asks every configured
    /// backend for the datasets it hosts and searches them in configuration
    /// order.
    pub fn resolve(&self, requested: &[String]) -> Result<Vec<String>, BeaconError> {
        let ids = if requested.is_empty() {
            self.discover()?
        } else {
            requested.iter().cloned().collect::<IndexSet<_>>()
        };

        if let Some(unknown) = ids.iter().find(|id| !self.contains(id)) {
            warn!(dataset_id = %unknown, "dataset has no configured backend");
            return Err(BeaconError::UnknownDataset(unknown.clone()));
        }

        let resolved = if requested.is_empty() {
            self.ids()
                .filter(|id| ids.contains(*id))
                .map(str::to_string)
                .collect::<Vec<_>>()
        } else {
            ids.into_iter().collect()
        };
        debug!(datasets = resolved.len(), "resolved datasets to search");
        Ok(resolved)
    }

    fn discover(&self) -> Result<IndexSet<String>, BeaconError> {
        let mut ids = IndexSet::new();
        for dataset in self.datasets.values() {
            let found = dataset.client.search_datasets().map_err(|err| {
                BeaconError::backend(
                    format!(
                        "could not load all datasets from {}",
                        dataset.endpoint.external_url
                    ),
                    err,
                )
            })?;
            ids.extend(found.into_iter().map(|dataset| dataset.id));
        }
        Ok(ids)
    }
}
