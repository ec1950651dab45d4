pub mod catalog;
pub mod event;
pub mod family;
pub mod receipt;
pub mod registration;
pub mod sacrament;
pub mod session;
pub mod table;
pub mod transaction;

use serde::{Deserialize, Deserializer};

/// Treats an explicit `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Receipt numbers arrive as strings from some endpoints and numbers from others.
pub(crate) fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(s)) if !s.trim().is_empty() => Some(s),
        Some(Raw::Text(_)) | None => None,
        Some(Raw::Int(n)) => Some(n.to_string()),
        Some(Raw::Float(f)) => Some(f.to_string()),
    })
}

/// Formats an amount the way the parish prints money: `Rs. 400`, `Rs. 12.50`.
pub fn rupees(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("Rs. {:.0}", amount)
    } else {
        format!("Rs. {:.2}", amount)
    }
}
