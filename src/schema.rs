//! JSON records of the GA4GH variant-store API consumed by the beacon.
//!
//! Only the fields the beacon reads are modelled; everything else a server
//! sends is ignored on deserialization.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request half of a paged search: accepts a continuation token.
pub trait PagedRequest {
    fn set_page_token(&mut self, token: &str);
}

/// Response half of a paged search: carries the token for the next page.
pub trait PagedResponse {
    fn next_page_token(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantSet {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub dataset_id: Option<String>,
    #[serde(default)]
    pub reference_set_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceSet {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub assembly_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub variant_set_id: String,
    #[serde(default)]
    pub reference_name: String,
    #[serde(default)]
    pub reference_bases: String,
    #[serde(default)]
    pub alternate_bases: Vec<String>,
    #[serde(default)]
    pub calls: Vec<Call>,
}

impl Variant {
    pub fn calls_count(&self) -> u64 {
        self.calls.len() as u64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Call {
    #[serde(default)]
    pub call_set_id: String,
    /// Allele indices; 0 is the reference allele, `n` the n-th alternate.
    /// Kept as raw JSON values since servers may emit non-numeric entries
    /// for no-calls.
    #[serde(default)]
    pub genotype: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallSet {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub biosample_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchDatasetsRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub page_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchDatasetsResponse {
    #[serde(default)]
    pub datasets: Vec<Dataset>,
    #[serde(default)]
    pub next_page_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchVariantSetsRequest {
    pub dataset_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub page_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchVariantSetsResponse {
    #[serde(default)]
    pub variant_sets: Vec<VariantSet>,
    #[serde(default)]
    pub next_page_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchVariantsRequest {
    pub variant_set_id: String,
    pub reference_name: String,
    pub start: u64,
    pub end: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub page_token: String,
}

impl SearchVariantsRequest {
    /// Search covering exactly one position, `[start, start + 1)`.
    pub fn at_position(variant_set_id: &str, reference_name: &str, start: u64) -> Self {
        Self {
            variant_set_id: variant_set_id.to_string(),
            reference_name: reference_name.to_string(),
            start,
            end: start.saturating_add(1),
            page_token: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchVariantsResponse {
    #[serde(default)]
    pub variants: Vec<Variant>,
    #[serde(default)]
    pub next_page_token: String,
}

macro_rules! impl_paged {
    ($request:ty, $response:ty) => {
        impl PagedRequest for $request {
            fn set_page_token(&mut self, token: &str) {
                self.page_token = token.to_string();
            }
        }

        impl PagedResponse for $response {
            fn next_page_token(&self) -> &str {
                &self.next_page_token
            }
        }
    };
}

impl_paged!(SearchDatasetsRequest, SearchDatasetsResponse);
impl_paged!(SearchVariantSetsRequest, SearchVariantSetsResponse);
impl_paged!(SearchVariantsRequest, SearchVariantsResponse);
