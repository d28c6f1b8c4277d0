//! Persistent storage using RocksDB.
//!
//! Values are JSON. Shelters are stored as wire records under
//! `shelter:{id}` (zero-padded so prefix iteration yields id order); the
//! single local account lives under a constant key.

use crate::auth::AccountRecord;
use crate::error::{Error, Result};
use refuge_core::{mock_shelters, Shelter, ShelterId, ShelterRecord};
use rocksdb::{Options, DB};
use std::path::Path;

/// Key holding the one registered account.
pub const ACCOUNT_KEY: &[u8] = b"account:registered";

const SHELTER_PREFIX: &[u8] = b"shelter:";

fn shelter_key(id: ShelterId) -> String {
    format!("shelter:{:020}", id)
}

/// Storage backend for Refuge data.
pub struct Storage {
    db: DB,
}

impl Storage {
    /// Open or create storage at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        let db = DB::open(&opts, path)?;
        Ok(Self { db })
    }

    // --- Shelters ---

    /// Store a shelter.
    pub fn put_shelter(&self, shelter: &Shelter) -> Result<()> {
        let value = serde_json::to_vec(&ShelterRecord::from(shelter))?;
        self.db.put(shelter_key(shelter.id).as_bytes(), value)?;
        Ok(())
    }

    /// Get a shelter by ID.
    pub fn get_shelter(&self, id: ShelterId) -> Result<Option<Shelter>> {
        match self.db.get(shelter_key(id).as_bytes())? {
            Some(data) => {
                let record: ShelterRecord = serde_json::from_slice(&data)?;
                Ok(Some(Shelter::try_from(record)?))
            }
            None => Ok(None),
        }
    }

    /// List all shelters in id order.
    pub fn list_shelters(&self) -> Result<Vec<Shelter>> {
        let mut shelters = Vec::new();

        for item in self.db.prefix_iterator(SHELTER_PREFIX) {
            let (key, value) = item?;
            if !key.starts_with(SHELTER_PREFIX) {
                break;
            }
            let record: ShelterRecord = serde_json::from_slice(&value)?;
            shelters.push(Shelter::try_from(record)?);
        }

        Ok(shelters)
    }

    /// Seed the built-in shelters when the store holds none.
    ///
    /// Returns how many shelters were written.
    pub fn init_default_shelters(&self) -> Result<usize> {
        if !self.list_shelters()?.is_empty() {
            return Ok(0);
        }
        let seeds = mock_shelters();
        for shelter in &seeds {
            self.put_shelter(shelter)?;
        }
        Ok(seeds.len())
    }

    /// Reserve one spot in a stored shelter.
    ///
    /// Not atomic on its own; callers hold the node's write lock.
    pub fn check_in_shelter(&self, id: ShelterId) -> Result<Shelter> {
        let mut shelter = self
            .get_shelter(id)?
            .ok_or(Error::Core(refuge_core::Error::ShelterNotFound(id)))?;
        if shelter.is_full() {
            return Err(refuge_core::Error::ShelterFull(id).into());
        }
        shelter.set_occupancy(shelter.occupancy() + 1)?;
        self.put_shelter(&shelter)?;
        Ok(shelter)
    }

    // --- Account ---

    /// Store the registered account, replacing any previous one.
    pub fn put_account(&self, account: &AccountRecord) -> Result<()> {
        self.db.put(ACCOUNT_KEY, serde_json::to_vec(account)?)?;
        Ok(())
    }

    /// Get the registered account, if any.
    pub fn get_account(&self) -> Result<Option<AccountRecord>> {
        match self.db.get(ACCOUNT_KEY)? {
            Some(data) => Ok(Some(serde_json::from_slice(&data)?)),
            None => Ok(None),
        }
    }
}
