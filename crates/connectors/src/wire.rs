use model::{
    pagination::{cursor::ContinuationToken, page::Page},
    records::reserved_instance::ReservedInstance,
};
use serde::{Deserialize, Serialize};

/// Response body of DescribeReservedInstances. Fixture files are a JSON
/// array of these.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeReservedInstancesOutput {
    #[serde(default)]
    pub reserved_instances: Vec<ReservedInstance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<ContinuationToken>,
}

impl DescribeReservedInstancesOutput {
    pub fn into_page(self) -> Page<ReservedInstance> {
        Page::new(self.reserved_instances, self.next_token)
    }
}
