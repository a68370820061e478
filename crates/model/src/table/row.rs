use crate::{records::reserved_instance::ReservedInstance, table::column::columns};
use serde::Serialize;
use serde_json::{Map, Value, json};

/// One projected table row, keyed by column name in catalogue order.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(transparent)]
pub struct Row(Map<String, Value>);

impl Row {
    pub fn project(record: &ReservedInstance, region: &str) -> Self {
        let mut map = Map::with_capacity(columns().len());
        for column in columns() {
            map.insert(column.name.to_string(), cell(column.name, record, region));
        }
        Row(map)
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    /// Render a cell for plain-text output. Nulls render empty.
    pub fn display(&self, column: &str) -> String {
        match self.0.get(column) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

fn cell(name: &str, ri: &ReservedInstance, region: &str) -> Value {
    match name {
        "reserved_instance_id" | "title" => json!(ri.reserved_instance_id),
        "reservation_name" => json!(ri.reservation_name),
        "billing_subscription_id" => json!(ri.billing_subscription_id),
        "reserved_instance_offering_id" => json!(ri.reserved_instance_offering_id),
        "instance_type" => json!(ri.instance_type),
        "start_time" => json!(ri.start_time.map(|t| t.to_rfc3339())),
        "duration" => json!(ri.duration),
        "fixed_price" => json!(ri.fixed_price),
        "usage_price" => json!(ri.usage_price),
        "currency_code" => json!(ri.currency_code),
        "instance_count" => json!(ri.instance_count),
        "state" => json!(ri.state),
        "payment_option" => json!(ri.payment_option),
        "recurring_charges" => serde_json::to_value(&ri.recurring_charges).unwrap_or(Value::Null),
        "akas" => json!(ri.id().map(|id| vec![id]).unwrap_or_default()),
        "partition" => json!(partition_for_region(region)),
        "region" => json!(region),
        _ => Value::Null,
    }
}

/// Partition owning a region, derived from the region name prefix.
pub fn partition_for_region(region: &str) -> &'static str {
    if region.starts_with("cn-") {
        "aws-cn"
    } else if region.starts_with("us-gov-") {
        "aws-us-gov"
    } else if region.starts_with("us-isob-") {
        "aws-iso-b"
    } else if region.starts_with("us-iso-") {
        "aws-iso"
    } else {
        "aws"
    }
}
