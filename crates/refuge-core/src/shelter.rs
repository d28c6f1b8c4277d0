//! Shelter model.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Shelter identifier, stable across refreshes.
pub type ShelterId = u64;

/// Contact details for the person responsible for a shelter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Person in charge
    pub responsible: String,

    /// Phone number or e-mail
    pub phone: String,
}

/// A point on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// A shelter with a bounded number of occupant slots.
///
/// `capacity` and `occupancy` are private so the capacity invariant
/// (`0 <= occupancy <= capacity`, `capacity > 0`) can only be changed through
/// checked methods. Available spots are derived on every read.
#[derive(Debug, Clone, PartialEq)]
pub struct Shelter {
    /// Unique identifier
    pub id: ShelterId,

    /// Display name
    pub name: String,

    /// Street address
    pub address: String,

    /// Region or neighbourhood
    pub region: String,

    /// Temperature inside the shelter in °C, if reported
    pub temperature: Option<f64>,

    /// Resources on offer (water, blankets, medical support, ...)
    pub resources: Vec<String>,

    /// Whether the shelter is currently operating
    pub active: bool,

    /// Responsible person and phone
    pub contact: Contact,

    /// Location for the map view
    pub location: Option<GeoPoint>,

    capacity: u32,
    occupancy: u32,
}

impl Shelter {
    /// Create a shelter, validating the capacity invariant.
    pub fn new(
        id: ShelterId,
        name: impl Into<String>,
        capacity: u32,
        occupancy: u32,
    ) -> Result<Self> {
        validate(capacity, occupancy)?;
        Ok(Self {
            id,
            name: name.into(),
            address: String::new(),
            region: String::new(),
            temperature: None,
            resources: Vec::new(),
            active: true,
            contact: Contact::default(),
            location: None,
            capacity,
            occupancy,
        })
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_temperature(mut self, celsius: f64) -> Self {
        self.temperature = Some(celsius);
        self
    }

    pub fn with_resources<I, S>(mut self, resources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resources = resources.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_contact(
        mut self,
        responsible: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        self.contact = Contact {
            responsible: responsible.into(),
            phone: phone.into(),
        };
        self
    }

    pub fn with_location(mut self, latitude: f64, longitude: f64) -> Self {
        self.location = Some(GeoPoint { latitude, longitude });
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Maximum number of occupants.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Current number of occupants.
    pub fn occupancy(&self) -> u32 {
        self.occupancy
    }

    /// Spots left: always `capacity - occupancy`.
    pub fn available_spots(&self) -> u32 {
        self.capacity - self.occupancy
    }

    pub fn is_full(&self) -> bool {
        self.available_spots() == 0
    }

    /// Fraction of capacity in use, in `[0.0, 1.0]`.
    pub fn load_ratio(&self) -> f64 {
        f64::from(self.occupancy) / f64::from(self.capacity)
    }

    /// Overwrite occupancy, keeping the invariant.
    pub fn set_occupancy(&mut self, occupancy: u32) -> Result<()> {
        validate(self.capacity, occupancy)?;
        self.occupancy = occupancy;
        Ok(())
    }

    /// Set occupancy to `occupancy` clamped into `[0, capacity]`.
    pub(crate) fn clamp_occupancy(&mut self, occupancy: i64) {
        self.occupancy = occupancy.clamp(0, i64::from(self.capacity)) as u32;
    }

    /// Reserve one spot.
    pub(crate) fn check_in(&mut self) -> Result<()> {
        if self.is_full() {
            return Err(Error::ShelterFull(self.id));
        }
        self.occupancy += 1;
        Ok(())
    }
}

fn validate(capacity: u32, occupancy: u32) -> Result<()> {
    if capacity == 0 || occupancy > capacity {
        return Err(Error::InvalidCapacity { capacity, occupancy });
    }
    Ok(())
}
