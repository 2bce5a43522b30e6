use crate::domain::{AlleleRequest, AlleleResponse, DatasetAlleleResponse};

/// Folds per-dataset responses, in search order, into the beacon answer.
///
/// Any dataset error leaves `exists` undefined and surfaces the first error
/// encountered. Dataset detail is dropped unless the request asked for it.
pub fn assemble_response(
    beacon_id: &str,
    request: &AlleleRequest,
    dataset_responses: Vec<DatasetAlleleResponse>,
) -> AlleleResponse {
    let error = dataset_responses
        .iter()
        .find_map(|response| response.error.clone());

    let exists = match error {
        Some(_) => None,
        None => Some(
            dataset_responses
                .iter()
                .any(|response| response.exists == Some(true)),
        ),
    };

    AlleleResponse {
        beacon_id: beacon_id.to_string(),
        exists,
        error,
        allele_request: Some(request.clone()),
        dataset_allele_responses: request
            .include_dataset_responses
            .then_some(dataset_responses),
    }
}
