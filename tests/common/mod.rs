#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::json;

use variants_beacon::app::App;
use variants_beacon::config::{BeaconDataset, BeaconDescriptor};
use variants_beacon::domain::AlleleRequest;
use variants_beacon::error::Ga4ghError;
use variants_beacon::ga4gh::Ga4ghClient;
use variants_beacon::schema::{Call, CallSet, Dataset, ReferenceSet, Variant, VariantSet};

/// In-memory variant store. Clones share the call log.
#[derive(Debug, Clone, Default)]
pub struct MockGa4gh {
    datasets: Vec<Dataset>,
    variant_sets: HashMap<String, Vec<VariantSet>>,
    reference_sets: HashMap<String, ReferenceSet>,
    variants: HashMap<String, Vec<Variant>>,
    call_sets: HashMap<String, CallSet>,
    failing: Option<&'static str>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockGa4gh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset(mut self, id: &str) -> Self {
        self.datasets.push(Dataset {
            id: id.to_string(),
            name: None,
            description: None,
        });
        self
    }

    pub fn with_variant_set(mut self, dataset_id: &str, id: &str, reference_set_id: &str) -> Self {
        self.variant_sets
            .entry(dataset_id.to_string())
            .or_default()
            .push(VariantSet {
                id: id.to_string(),
                name: None,
                dataset_id: Some(dataset_id.to_string()),
                reference_set_id: reference_set_id.to_string(),
            });
        self
    }

    pub fn with_reference_set(mut self, id: &str, assembly_id: &str) -> Self {
        self.reference_sets.insert(
            id.to_string(),
            ReferenceSet {
                id: id.to_string(),
                name: None,
                assembly_id: assembly_id.to_string(),
            },
        );
        self
    }

    pub fn with_variant(mut self, variant_set_id: &str, variant: Variant) -> Self {
        self.variants
            .entry(variant_set_id.to_string())
            .or_default()
            .push(variant);
        self
    }

    pub fn with_call_set(mut self, id: &str, biosample_id: &str) -> Self {
        self.call_sets.insert(
            id.to_string(),
            CallSet {
                id: id.to_string(),
                name: None,
                biosample_id: biosample_id.to_string(),
            },
        );
        self
    }

    /// Makes every call of operation `op` fail with a 503.
    pub fn failing(mut self, op: &'static str) -> Self {
        self.failing = Some(op);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, op: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.split(' ').next() == Some(op))
            .count()
    }

    fn record(&self, op: &'static str, arg: &str) -> Result<(), Ga4ghError> {
        self.calls.lock().unwrap().push(format!("{op} {arg}"));
        if self.failing == Some(op) {
            return Err(Ga4ghError::Status {
                status: 503,
                message: format!("{op} unavailable"),
            });
        }
        Ok(())
    }
}

fn not_found(what: &str) -> Ga4ghError {
    Ga4ghError::Status {
        status: 404,
        message: format!("{what} not found"),
    }
}

impl Ga4ghClient for MockGa4gh {
    fn search_datasets(&self) -> Result<Vec<Dataset>, Ga4ghError> {
        self.record("search_datasets", "")?;
        Ok(self.datasets.clone())
    }

    fn search_variant_sets(&self, dataset_id: &str) -> Result<Vec<VariantSet>, Ga4ghError> {
        self.record("search_variant_sets", dataset_id)?;
        Ok(self.variant_sets.get(dataset_id).cloned().unwrap_or_default())
    }

    fn search_variants(
        &self,
        variant_set_id: &str,
        _reference_name: &str,
        _start: u64,
    ) -> Result<Vec<Variant>, Ga4ghError> {
        self.record("search_variants", variant_set_id)?;
        Ok(self.variants.get(variant_set_id).cloned().unwrap_or_default())
    }

    fn load_reference_set(&self, reference_set_id: &str) -> Result<ReferenceSet, Ga4ghError> {
        self.record("load_reference_set", reference_set_id)?;
        self.reference_sets
            .get(reference_set_id)
            .cloned()
            .ok_or_else(|| not_found(reference_set_id))
    }

    fn load_call_set(&self, call_set_id: &str) -> Result<CallSet, Ga4ghError> {
        self.record("load_call_set", call_set_id)?;
        self.call_sets
            .get(call_set_id)
            .cloned()
            .ok_or_else(|| not_found(call_set_id))
    }
}

/// Variant with one call per `(callSetId, genotype)` pair.
pub fn variant(reference: &str, alternates: &[&str], calls: &[(&str, &[i64])]) -> Variant {
    Variant {
        id: format!("{reference}>{}", alternates.join(",")),
        variant_set_id: String::new(),
        reference_name: "1".to_string(),
        reference_bases: reference.to_string(),
        alternate_bases: alternates.iter().map(|alt| alt.to_string()).collect(),
        calls: calls
            .iter()
            .map(|(call_set_id, genotype)| Call {
                call_set_id: call_set_id.to_string(),
                genotype: genotype.iter().map(|allele| json!(allele)).collect(),
            })
            .collect(),
    }
}

pub fn descriptor(dataset_ids: &[&str]) -> BeaconDescriptor {
    BeaconDescriptor {
        id: "sample-beacon".to_string(),
        name: Some("variant_test_beacon".to_string()),
        api_version: Some("0.3".to_string()),
        organization: None,
        description: None,
        version: None,
        welcome_url: None,
        alternative_url: None,
        create_date_time: None,
        update_date_time: None,
        datasets: dataset_ids
            .iter()
            .map(|id| BeaconDataset {
                id: id.to_string(),
                name: None,
                description: None,
                assembly_id: Some("GRCh37".to_string()),
                create_date_time: None,
                update_date_time: None,
                version: None,
                variant_count: None,
                sample_count: None,
                external_url: Some(format!("http://{id}.example/ga4gh/")),
            })
            .collect(),
        sample_allele_requests: Vec::new(),
    }
}

/// App over `backends`, one mock per configured dataset id.
pub fn app(backends: &[(&str, MockGa4gh)]) -> App<MockGa4gh> {
    let ids = backends.iter().map(|(id, _)| *id).collect::<Vec<_>>();
    let clients = backends
        .iter()
        .map(|(id, mock)| (id.to_string(), mock.clone()))
        .collect::<HashMap<_, _>>();
    App::new(descriptor(&ids), |endpoint| Ok(clients[&endpoint.id].clone())).unwrap()
}

pub fn request(dataset_ids: &[&str], include_dataset_responses: bool) -> AlleleRequest {
    AlleleRequest {
        reference_name: "1".to_string(),
        start: 10176,
        reference_bases: "A".to_string(),
        alternate_bases: "AC".to_string(),
        assembly_id: "GRCh37".to_string(),
        dataset_ids: dataset_ids.iter().map(|id| id.to_string()).collect(),
        include_dataset_responses,
    }
}
