use tracing::debug;

use crate::error::BeaconError;
use crate::ga4gh::Ga4ghClient;
use crate::schema::VariantSet;

/// Variant sets of `dataset_id` called against `assembly_id`.
///
/// Costs one reference set lookup per variant set of the dataset.
pub fn select_variant_sets<C>(
    client: &C,
    dataset_id: &str,
    assembly_id: &str,
) -> Result<Vec<VariantSet>, BeaconError>
where
    C: Ga4ghClient + ?Sized,
{
    let variant_sets = client.search_variant_sets(dataset_id).map_err(|err| {
        BeaconError::backend(
            format!("could not load all variant sets for dataset {dataset_id}"),
            err,
        )
    })?;

    let mut selected = Vec::with_capacity(variant_sets.len());
    for variant_set in variant_sets {
        let reference_set = client
            .load_reference_set(&variant_set.reference_set_id)
            .map_err(|err| {
                BeaconError::backend(
                    format!(
                        "could not load reference set {}",
                        variant_set.reference_set_id
                    ),
                    err,
                )
            })?;
        if reference_set.assembly_id == assembly_id {
            selected.push(variant_set);
        } else {
            debug!(
                variant_set = %variant_set.id,
                assembly = %reference_set.assembly_id,
                "skipping variant set on another assembly"
            );
        }
    }
    Ok(selected)
}
