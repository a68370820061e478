use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};

/// A reserved capacity record for the managed search service, as the remote
/// API returns it. Every field is optional; the service omits what it
/// does not know.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct ReservedInstance {
    pub reservation_name: Option<String>,
    pub reserved_instance_id: Option<String>,
    pub billing_subscription_id: Option<i64>,
    pub reserved_instance_offering_id: Option<String>,
    pub instance_type: Option<String>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub start_time: Option<DateTime<Utc>>,
    pub duration: Option<i64>,
    pub fixed_price: Option<f64>,
    pub usage_price: Option<f64>,
    pub currency_code: Option<String>,
    pub instance_count: Option<i32>,
    pub state: Option<String>,
    pub payment_option: Option<String>,
    pub recurring_charges: Option<Vec<RecurringCharge>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct RecurringCharge {
    pub recurring_charge_amount: Option<f64>,
    pub recurring_charge_frequency: Option<String>,
}

impl ReservedInstance {
    pub fn with_id(id: impl Into<String>) -> Self {
        ReservedInstance {
            reserved_instance_id: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.reserved_instance_id.as_deref()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    EpochSeconds(f64),
    Text(String),
}

/// The REST JSON protocol sends epoch seconds; hand-written fixtures tend
/// to use RFC 3339. Accept both.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawTimestamp>::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(RawTimestamp::EpochSeconds(secs)) => {
            // Floor keeps the fractional part non-negative before epoch.
            let floor = secs.floor();
            let mut whole = floor as i64;
            let mut nanos = ((secs - floor) * 1_000_000_000.0).round() as u32;
            if nanos >= 1_000_000_000 {
                whole += 1;
                nanos -= 1_000_000_000;
            }
            Utc.timestamp_opt(whole, nanos)
                .single()
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("timestamp out of range: {secs}")))
        }
        Some(RawTimestamp::Text(text)) => DateTime::parse_from_rfc3339(&text)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|e| D::Error::custom(format!("invalid timestamp '{text}': {e}"))),
    }
}
