use serde::{Deserialize, Serialize};

use crate::error::BeaconError;

/// Largest accepted 0-based start; the searched interval ends at `start + 1`.
pub const MAX_START: u64 = i64::MAX as u64;

/// Point-variant allele query, validated and ready for evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlleleRequest {
    pub reference_name: String,
    /// 0-based position of the first reference base.
    pub start: u64,
    pub reference_bases: String,
    pub alternate_bases: String,
    pub assembly_id: String,
    /// Datasets to search; empty means every dataset the beacon serves.
    #[serde(default)]
    pub dataset_ids: Vec<String>,
    #[serde(default)]
    pub include_dataset_responses: bool,
}

/// Raw query as bound from a transport layer, every field optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlleleQueryParams {
    #[serde(default)]
    pub reference_name: Option<String>,
    #[serde(default)]
    pub start: Option<i64>,
    #[serde(default)]
    pub reference_bases: Option<String>,
    #[serde(default)]
    pub alternate_bases: Option<String>,
    #[serde(default)]
    pub assembly_id: Option<String>,
    #[serde(default)]
    pub dataset_ids: Option<Vec<String>>,
    #[serde(default)]
    pub include_dataset_responses: Option<bool>,
}

impl AlleleQueryParams {
    /// Checks required fields and turns the params into a request.
    /// `includeDatasetResponses` defaults to false.
    pub fn into_request(self) -> Result<AlleleRequest, BeaconError> {
        let reference_name = required(
            self.reference_name,
            "Reference cannot be null. Please provide an appropriate reference name",
        )?;
        let start = match self.start {
            None => {
                return Err(BeaconError::InvalidRequest(
                    "Start position cannot be null. Please provide a 0-based start position"
                        .to_string(),
                ));
            }
            Some(value) if value < 0 => {
                return Err(BeaconError::InvalidRequest(format!(
                    "Start position must be 0-based and non-negative, got {value}"
                )));
            }
            Some(value) => value as u64,
        };
        let reference_bases = required(self.reference_bases, "Reference bases cannot be null")?;
        let alternate_bases = required(self.alternate_bases, "Alternate bases cannot be null")?;
        let assembly_id = required(
            self.assembly_id,
            "AssemblyId cannot be null. Please define a valid GRCh assembly Id",
        )?;

        let request = AlleleRequest {
            reference_name,
            start,
            reference_bases,
            alternate_bases,
            assembly_id,
            dataset_ids: self.dataset_ids.unwrap_or_default(),
            include_dataset_responses: self.include_dataset_responses.unwrap_or(false),
        };
        request.validate()?;
        Ok(request)
    }
}

fn required(value: Option<String>, message: &str) -> Result<String, BeaconError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(BeaconError::InvalidRequest(message.to_string())),
    }
}

impl AlleleRequest {
    pub fn validate(&self) -> Result<(), BeaconError> {
        if self.start > MAX_START {
            return Err(BeaconError::InvalidRequest(format!(
                "Start position {} is out of range",
                self.start
            )));
        }
        if self.reference_name.trim().is_empty() {
            return Err(BeaconError::InvalidRequest(
                "Reference cannot be empty".to_string(),
            ));
        }
        if self.reference_bases.trim().is_empty() {
            return Err(BeaconError::InvalidRequest(
                "Reference bases cannot be empty".to_string(),
            ));
        }
        if self.alternate_bases.trim().is_empty() {
            return Err(BeaconError::InvalidRequest(
                "Alternate bases cannot be empty".to_string(),
            ));
        }
        if !self.assembly_id.starts_with("GRCh") {
            return Err(BeaconError::InvalidRequest(format!(
                "Invalid assemblyId {}. Assemblies must be from GRCh builds",
                self.assembly_id
            )));
        }
        Ok(())
    }
}

/// `{errorCode, message}` body attached to failed responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error_code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetAlleleResponse {
    pub dataset_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exists: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_count: Option<u64>,
}

impl DatasetAlleleResponse {
    pub fn failed(dataset_id: impl Into<String>, error: ErrorBody) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            exists: None,
            error: Some(error),
            frequency: None,
            variant_count: None,
            call_count: None,
            sample_count: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlleleResponse {
    pub beacon_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exists: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allele_request: Option<AlleleRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_allele_responses: Option<Vec<DatasetAlleleResponse>>,
}

impl AlleleResponse {
    /// Drops per-dataset entries the caller may not see, keyed on `datasetId`.
    pub fn retain_datasets<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        if let Some(responses) = self.dataset_allele_responses.as_mut() {
            responses.retain(|response| keep(&response.dataset_id));
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn params() -> AlleleQueryParams {
        AlleleQueryParams {
            reference_name: Some("1".to_string()),
            start: Some(10176),
            reference_bases: Some("A".to_string()),
            alternate_bases: Some("AC".to_string()),
            assembly_id: Some("GRCh37".to_string()),
            dataset_ids: None,
            include_dataset_responses: None,
        }
    }

    #[test]
    fn params_default_dataset_flags() {
        let request = params().into_request().unwrap();
        assert!(request.dataset_ids.is_empty());
        assert!(!request.include_dataset_responses);
        assert_eq!(request.start, 10176);
    }

    #[test]
    fn missing_start_is_invalid() {
        let mut params = params();
        params.start = None;
        assert_matches!(params.into_request(), Err(BeaconError::InvalidRequest(_)));
    }

    #[test]
    fn negative_start_is_invalid() {
        let mut params = params();
        params.start = Some(-1);
        assert_matches!(params.into_request(), Err(BeaconError::InvalidRequest(_)));
    }

    #[test]
    fn blank_reference_name_is_invalid() {
        let mut params = params();
        params.reference_name = Some("  ".to_string());
        assert_matches!(params.into_request(), Err(BeaconError::InvalidRequest(_)));
    }

    #[test]
    fn non_grch_assembly_is_invalid() {
        let mut params = params();
        params.assembly_id = Some("hg19".to_string());
        let err = params.into_request().unwrap_err();
        assert_matches!(err, BeaconError::InvalidRequest(ref msg) if msg.contains("hg19"));
    }

    #[test]
    fn start_beyond_range_is_invalid() {
        let mut request = params().into_request().unwrap();
        request.start = u64::MAX;
        assert_matches!(
            request.validate(),
            Err(BeaconError::InvalidRequest(ref msg)) if msg.contains("out of range")
        );
        request.start = MAX_START;
        assert!(request.validate().is_ok());
    }

    #[test]
    fn undefined_frequency_is_not_serialized() {
        let response = DatasetAlleleResponse {
            dataset_id: "d1".to_string(),
            exists: Some(true),
            error: None,
            frequency: None,
            variant_count: Some(1),
            call_count: Some(0),
            sample_count: Some(0),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("frequency").is_none());
        assert_eq!(json["datasetId"], "d1");
        assert_eq!(json["callCount"], 0);
    }
}
