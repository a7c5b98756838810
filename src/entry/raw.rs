use crate::money::Money;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Raw struct deserilized from yaml
#[skip_serializing_none]
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Default)]
pub struct Entry {
    pub id: Option<String>, // if not specified will be derived from date, type and description
    pub r#type: String,
    pub date: String,
    pub description: String,
    pub amount: Option<Money>,
    #[serde(default)]
    pub confirmed: bool,
    pub repeat: Option<String>, // daily, weekly, monthly or an RRULE
    pub end: Option<String>,
}
