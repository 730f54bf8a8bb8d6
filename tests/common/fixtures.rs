//! Test fixtures and data builders

use serde_json::{json, Value};

/// Request body for the reference parcel
pub fn plot_a() -> Value {
    parcel("Plot A", "Owner X")
}

/// Request body for a parcel with the given name and owner
pub fn parcel(name: &str, owner: &str) -> Value {
    json!({
        "name": name,
        "owner": owner,
        "location_lat": -17.8,
        "location_lon": 31.0,
        "size_hectares": 5.0
    })
}

/// Request body for an evidence record
pub fn evidence(asset_id: i64, evidence_type: &str, description: &str) -> Value {
    json!({
        "asset_id": asset_id,
        "evidence_type": evidence_type,
        "description": description,
        "gps_lat": -17.8,
        "gps_lon": 31.0
    })
}
