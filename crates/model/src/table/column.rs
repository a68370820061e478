use serde::Serialize;
use std::fmt;

pub const TABLE_NAME: &str = "aws_opensearch_reserved_instance";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColumnType {
    String,
    Int,
    Timestamp,
    Double,
    Json,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::String => write!(f, "STRING"),
            ColumnType::Int => write!(f, "INT"),
            ColumnType::Timestamp => write!(f, "TIMESTAMP"),
            ColumnType::Double => write!(f, "DOUBLE"),
            ColumnType::Json => write!(f, "JSON"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "type")]
    pub ty: ColumnType,
}

const fn col(name: &'static str, ty: ColumnType, description: &'static str) -> Column {
    Column {
        name,
        description,
        ty,
    }
}

static COLUMNS: &[Column] = &[
    col(
        "reserved_instance_id",
        ColumnType::String,
        "The unique identifier for the reservation.",
    ),
    col(
        "reservation_name",
        ColumnType::String,
        "The customer-specified identifier to track this reservation.",
    ),
    col(
        "billing_subscription_id",
        ColumnType::Int,
        "The unique identifier of the billing subscription.",
    ),
    col(
        "reserved_instance_offering_id",
        ColumnType::String,
        "The unique identifier of the Reserved Instance offering.",
    ),
    col(
        "instance_type",
        ColumnType::String,
        "The OpenSearch instance type offered by the Reserved Instance offering.",
    ),
    col(
        "start_time",
        ColumnType::Timestamp,
        "The date and time when the reservation was purchased.",
    ),
    col(
        "duration",
        ColumnType::Int,
        "The duration, in seconds, for which the OpenSearch instance is reserved.",
    ),
    col(
        "fixed_price",
        ColumnType::Double,
        "The upfront fixed charge you will paid to purchase the specific Reserved Instance offering.",
    ),
    col(
        "usage_price",
        ColumnType::Double,
        "The hourly rate at which you're charged for the domain using this Reserved Instance.",
    ),
    col(
        "currency_code",
        ColumnType::String,
        "The currency code for the offering.",
    ),
    col(
        "instance_count",
        ColumnType::Int,
        "The number of OpenSearch instances that have been reserved.",
    ),
    col("state", ColumnType::String, "The state of the Reserved Instance."),
    col(
        "payment_option",
        ColumnType::String,
        "The payment option as defined in the Reserved Instance offering.",
    ),
    col(
        "recurring_charges",
        ColumnType::Json,
        "The recurring charge to your account, regardless of whether you create any domains using the Reserved Instance offering.",
    ),
    // Standard columns
    col("title", ColumnType::String, "Title of the resource."),
    col(
        "akas",
        ColumnType::Json,
        "Array of globally unique identifier strings (also known as) for the resource.",
    ),
    // Regional columns
    col(
        "partition",
        ColumnType::String,
        "The AWS partition in which the resource is located (aws, aws-cn, or aws-us-gov).",
    ),
    col(
        "region",
        ColumnType::String,
        "The AWS Region in which the resource is located.",
    ),
];

/// Column catalogue in projection order.
pub fn columns() -> &'static [Column] {
    COLUMNS
}

pub fn column(name: &str) -> Option<&'static Column> {
    COLUMNS.iter().find(|c| c.name == name)
}
