//! Per-dataset evidence: which variants match the query and what they say
//! about the requested allele.

use indexmap::IndexSet;
use tracing::debug;

use crate::domain::{AlleleRequest, DatasetAlleleResponse};
use crate::error::BeaconError;
use crate::ga4gh::Ga4ghClient;
use crate::schema::{Variant, VariantSet};
use crate::selector::select_variant_sets;

/// Exact match on the reference bases, and the requested alternate among the
/// variant's alternates.
pub fn is_matching_variant(variant: &Variant, reference_bases: &str, alternate_bases: &str) -> bool {
    variant.reference_bases == reference_bases
        && variant
            .alternate_bases
            .iter()
            .any(|alternate| alternate == alternate_bases)
}

/// Genotype index of `alternate_bases` in `variant`. Index 0 is the
/// reference allele, so alternates start at 1.
pub fn requested_allele_index(variant: &Variant, alternate_bases: &str) -> Option<u64> {
    variant
        .alternate_bases
        .iter()
        .position(|alternate| alternate == alternate_bases)
        .map(|index| index as u64 + 1)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenotypeCounts {
    /// Genotype entries carrying the requested allele.
    pub matching: u64,
    /// All genotype entries across the calls.
    pub total: u64,
}

impl GenotypeCounts {
    /// `None` when there is nothing to divide by; no observations is not a
    /// frequency of zero.
    pub fn frequency(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.matching as f64 / self.total as f64)
        }
    }
}

pub fn count_genotypes(variants: &[Variant], alternate_bases: &str) -> GenotypeCounts {
    let mut counts = GenotypeCounts::default();
    for variant in variants {
        let requested = requested_allele_index(variant, alternate_bases);
        for call in &variant.calls {
            counts.total += call.genotype.len() as u64;
            if let Some(requested) = requested {
                counts.matching += call
                    .genotype
                    .iter()
                    .filter(|allele| allele.as_f64() == Some(requested as f64))
                    .count() as u64;
            }
        }
    }
    counts
}

/// Distinct biosamples behind the calls of `variants`. Each distinct call set
/// is loaded once.
pub fn count_samples<C>(client: &C, variants: &[Variant]) -> Result<u64, BeaconError>
where
    C: Ga4ghClient + ?Sized,
{
    let call_set_ids = variants
        .iter()
        .flat_map(|variant| variant.calls.iter())
        .map(|call| call.call_set_id.as_str())
        .collect::<IndexSet<_>>();

    let mut biosamples = IndexSet::new();
    for call_set_id in call_set_ids {
        let call_set = client.load_call_set(call_set_id).map_err(|err| {
            BeaconError::backend(format!("could not load call set {call_set_id}"), err)
        })?;
        biosamples.insert(call_set.biosample_id);
    }
    Ok(biosamples.len() as u64)
}

pub fn fetch_matching_variants<C>(
    client: &C,
    variant_sets: &[VariantSet],
    request: &AlleleRequest,
) -> Result<Vec<Variant>, BeaconError>
where
    C: Ga4ghClient + ?Sized,
{
    let mut matching = Vec::new();
    for variant_set in variant_sets {
        let variants = client
            .search_variants(&variant_set.id, &request.reference_name, request.start)
            .map_err(|err| {
                BeaconError::backend(
                    format!(
                        "could not load variants of variant set {} at {}:{}",
                        variant_set.id, request.reference_name, request.start
                    ),
                    err,
                )
            })?;
        matching.extend(variants.into_iter().filter(|variant| {
            is_matching_variant(variant, &request.reference_bases, &request.alternate_bases)
        }));
    }
    Ok(matching)
}

/// Evaluates `request` against a single dataset.
pub fn aggregate_dataset<C>(
    client: &C,
    dataset_id: &str,
    request: &AlleleRequest,
) -> Result<DatasetAlleleResponse, BeaconError>
where
    C: Ga4ghClient + ?Sized,
{
    let variant_sets = select_variant_sets(client, dataset_id, &request.assembly_id)?;
    let variants = fetch_matching_variants(client, &variant_sets, request)?;

    let genotypes = count_genotypes(&variants, &request.alternate_bases);
    let sample_count = count_samples(client, &variants)?;
    let call_count = variants.iter().map(Variant::calls_count).sum::<u64>();
    let variant_count = variants.len() as u64;

    debug!(
        dataset_id,
        variant_sets = variant_sets.len(),
        variant_count,
        call_count,
        sample_count,
        "aggregated dataset"
    );

    Ok(DatasetAlleleResponse {
        dataset_id: dataset_id.to_string(),
        exists: Some(variant_count > 0),
        error: None,
        frequency: genotypes.frequency(),
        variant_count: Some(variant_count),
        call_count: Some(call_count),
        sample_count: Some(sample_count),
    })
}
