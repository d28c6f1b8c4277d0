//! Wire record exchanged with the shelter API.
//!
//! The API speaks Portuguese field names and carries resources as a single
//! comma-separated string. Available spots are never part of the record.

use crate::error::{Error, Result};
use crate::shelter::{Contact, GeoPoint, Shelter, ShelterId};
use serde::{Deserialize, Deserializer, Serialize};

/// A shelter as it appears on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShelterRecord {
    pub id: ShelterId,

    #[serde(rename = "nome", default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(rename = "endereco", default, deserialize_with = "null_as_default")]
    pub address: String,

    #[serde(rename = "regiao", default, deserialize_with = "null_as_default")]
    pub region: String,

    #[serde(rename = "temperatura", default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Comma-separated resource list
    #[serde(rename = "recursos", default, deserialize_with = "null_as_default")]
    pub resources: String,

    #[serde(rename = "capacidade")]
    pub capacity: u32,

    #[serde(rename = "ocupacao")]
    pub occupancy: u32,

    #[serde(rename = "ativo", default = "default_active", deserialize_with = "null_as_active")]
    pub active: bool,

    #[serde(rename = "responsavel", default, deserialize_with = "null_as_default")]
    pub responsible: String,

    #[serde(rename = "telefone", default, deserialize_with = "null_as_default")]
    pub phone: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

fn default_active() -> bool {
    true
}

/// Explicit `null` reads as the field's default, same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_active<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_else(default_active))
}

/// Split a comma-separated resource string, trimming entries and dropping empties.
pub fn parse_resources(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(String::from)
        .collect()
}

impl TryFrom<ShelterRecord> for Shelter {
    type Error = Error;

    fn try_from(record: ShelterRecord) -> Result<Self> {
        let mut shelter = Shelter::new(record.id, record.name, record.capacity, record.occupancy)?
            .with_address(record.address)
            .with_region(record.region)
            .with_resources(parse_resources(&record.resources))
            .with_active(record.active);
        shelter.temperature = record.temperature;
        shelter.contact = Contact {
            responsible: record.responsible,
            phone: record.phone,
        };
        if let (Some(latitude), Some(longitude)) = (record.latitude, record.longitude) {
            shelter.location = Some(GeoPoint { latitude, longitude });
        }
        Ok(shelter)
    }
}

impl From<&Shelter> for ShelterRecord {
    fn from(shelter: &Shelter) -> Self {
        Self {
            id: shelter.id,
            name: shelter.name.clone(),
            address: shelter.address.clone(),
            region: shelter.region.clone(),
            temperature: shelter.temperature,
            resources: shelter.resources.join(", "),
            capacity: shelter.capacity(),
            occupancy: shelter.occupancy(),
            active: shelter.active,
            responsible: shelter.contact.responsible.clone(),
            phone: shelter.contact.phone.clone(),
            latitude: shelter.location.map(|p| p.latitude),
            longitude: shelter.location.map(|p| p.longitude),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const API_SAMPLE: &str = r#"{
        "id": 7,
        "nome": "Abrigo Central",
        "endereco": "Rua da Consolação, 101",
        "regiao": "Centro",
        "temperatura": 21.5,
        "recursos": "Água, Cobertores ,, Kit Higiene",
        "capacidade": 100,
        "ocupacao": 75,
        "ativo": true,
        "responsavel": "Maria",
        "telefone": "(11) 91234-5678"
    }"#;

    #[test]
    fn parses_api_record() {
        let record: ShelterRecord = serde_json::from_str(API_SAMPLE).unwrap();
        let shelter = Shelter::try_from(record).unwrap();

        assert_eq!(shelter.id, 7);
        assert_eq!(shelter.name, "Abrigo Central");
        assert_eq!(shelter.available_spots(), 25);
        assert_eq!(shelter.resources, vec!["Água", "Cobertores", "Kit Higiene"]);
        assert_eq!(shelter.contact.responsible, "Maria");
        assert_eq!(shelter.location, None);
    }

    #[test]
    fn rejects_record_over_capacity() {
        let mut record: ShelterRecord = serde_json::from_str(API_SAMPLE).unwrap();
        record.occupancy = 101;
        assert!(Shelter::try_from(record).is_err());
    }

    #[test]
    fn null_fields_read_as_defaults() {
        let json = r#"[
            {"id": 1, "nome": "Central", "recursos": "Água", "capacidade": 10, "ocupacao": 2},
            {"id": 2, "nome": null, "endereco": null, "regiao": null, "recursos": null,
             "capacidade": 5, "ocupacao": 1, "ativo": null, "responsavel": null,
             "telefone": null, "temperatura": null}
        ]"#;
        let records: Vec<ShelterRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 2);

        let sparse = Shelter::try_from(records[1].clone()).unwrap();
        assert!(sparse.resources.is_empty());
        assert!(sparse.active);
        assert_eq!(sparse.contact, Contact::default());
        assert_eq!(sparse.temperature, None);
    }

    #[test]
    fn empty_resources() {
        assert!(parse_resources("").is_empty());
        assert!(parse_resources(" , ").is_empty());
    }

    #[test]
    fn record_never_carries_available_spots() {
        let shelter = Shelter::new(1, "A", 10, 3).unwrap().with_location(-23.5, -46.6);
        let json = serde_json::to_value(ShelterRecord::from(&shelter)).unwrap();

        assert!(json.get("availableSpots").is_none());
        assert_eq!(json["ocupacao"], 3);
        assert_eq!(json["latitude"], -23.5);
    }
}
