use tracing::{info, info_span, warn};

use crate::aggregate::aggregate_dataset;
use crate::assemble::assemble_response;
use crate::config::{BeaconDescriptor, DatasetEndpoint};
use crate::domain::{AlleleQueryParams, AlleleRequest, AlleleResponse};
use crate::error::{AlleleRequestError, BeaconError};
use crate::ga4gh::{Ga4ghClient, Ga4ghHttpClient};
use crate::registry::DatasetRegistry;

/// The beacon: answers allele queries across every dataset it serves.
pub struct App<C: Ga4ghClient> {
    descriptor: BeaconDescriptor,
    registry: DatasetRegistry<C>,
}

impl App<Ga4ghHttpClient> {
    /// One HTTP client per dataset, pointed at its `externalUrl`.
    pub fn from_descriptor(descriptor: BeaconDescriptor) -> Result<Self, BeaconError> {
        Self::new(descriptor, |endpoint| {
            Ga4ghHttpClient::new(&endpoint.external_url).map_err(|err| {
                BeaconError::InvalidConfig(format!("dataset {}: {err}", endpoint.id))
            })
        })
    }
}

impl<C: Ga4ghClient> App<C> {
    pub fn new<F>(descriptor: BeaconDescriptor, mut make_client: F) -> Result<Self, BeaconError>
    where
        F: FnMut(&DatasetEndpoint) -> Result<C, BeaconError>,
    {
        let entries = descriptor
            .dataset_endpoints()?
            .into_iter()
            .map(|endpoint| {
                let client = make_client(&endpoint)?;
                Ok((endpoint, client))
            })
            .collect::<Result<Vec<_>, BeaconError>>()?;
        let registry = DatasetRegistry::new(entries)?;
        if registry.is_empty() {
            warn!(beacon_id = %descriptor.id, "beacon serves no datasets");
        }
        info!(
            beacon_id = %descriptor.id,
            datasets = registry.len(),
            "beacon initialized"
        );
        Ok(Self {
            descriptor,
            registry,
        })
    }

    pub fn beacon(&self) -> &BeaconDescriptor {
        &self.descriptor
    }

    pub fn registry(&self) -> &DatasetRegistry<C> {
        &self.registry
    }

    /// Validates raw query parameters, then evaluates them.
    pub fn query_allele(
        &self,
        params: AlleleQueryParams,
    ) -> Result<AlleleResponse, AlleleRequestError> {
        let request = params.into_request()?;
        self.evaluate(&request)
    }

    pub fn evaluate(&self, request: &AlleleRequest) -> Result<AlleleResponse, AlleleRequestError> {
        request.validate()?;
        let attach = |error: BeaconError| AlleleRequestError::with_request(error, request.clone());

        let dataset_ids = self.registry.resolve(&request.dataset_ids).map_err(attach)?;

        let mut dataset_responses = Vec::with_capacity(dataset_ids.len());
        for dataset_id in &dataset_ids {
            let span = info_span!("dataset", dataset_id = %dataset_id);
            let _entered = span.enter();
            let client = self.registry.client(dataset_id).map_err(attach)?;
            dataset_responses.push(aggregate_dataset(client, dataset_id, request).map_err(attach)?);
        }

        let response = assemble_response(&self.descriptor.id, request, dataset_responses);
        info!(
            reference = %request.reference_name,
            start = request.start,
            datasets = dataset_ids.len(),
            exists = ?response.exists,
            "evaluated allele query"
        );
        Ok(response)
    }
}
