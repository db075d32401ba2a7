//! Exported row type

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One exported row: a postal code and its coordinates
///
/// Serialized with the source table's column names (`cep`, `latitude`,
/// `longitude`), which become the artifact headers. The postal code stays a
/// string so leading zeros survive the round trip through CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRow {
    /// Postal code (CEP)
    #[serde(rename = "cep")]
    pub postal_code: String,

    /// Latitude in decimal degrees
    pub latitude: f64,

    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl BatchRow {
    /// Artifact header, in column order
    pub const HEADERS: [&'static str; 3] = ["cep", "latitude", "longitude"];

    /// Create a new row
    pub fn new(postal_code: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            postal_code: postal_code.into(),
            latitude,
            longitude,
        }
    }

    /// Compare two rows by the export sort key `(postal_code, latitude, longitude)`
    ///
    /// Matches the `ORDER BY` every batch query is issued with. Floats are
    /// compared with `total_cmp` so the order is total.
    pub fn cmp_sort_key(&self, other: &Self) -> Ordering {
        self.postal_code
            .cmp(&other.postal_code)
            .then_with(|| self.latitude.total_cmp(&other.latitude))
            .then_with(|| self.longitude.total_cmp(&other.longitude))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_order() {
        let mut rows = vec![
            BatchRow::new("01001000", -23.5, -46.6),
            BatchRow::new("01001000", -23.6, -46.7),
            BatchRow::new("00100000", 1.0, 1.0),
            BatchRow::new("01001000", -23.5, -46.7),
        ];
        rows.sort_by(BatchRow::cmp_sort_key);

        assert_eq!(rows[0].postal_code, "00100000");
        assert_eq!(rows[1], BatchRow::new("01001000", -23.6, -46.7));
        assert_eq!(rows[2], BatchRow::new("01001000", -23.5, -46.7));
        assert_eq!(rows[3], BatchRow::new("01001000", -23.5, -46.6));
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(BatchRow::new("01001000", -23.55, -46.63)).unwrap();
        assert_eq!(json["cep"], "01001000");
        assert_eq!(json["latitude"], -23.55);
        assert!(json.get("postal_code").is_none());
    }
}
