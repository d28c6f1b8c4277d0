//! View selection and dashboard ordering.
//!
//! The selector only tracks which presentation is active. Switching to a view
//! that renders shelter data before anything is loaded asks the caller for a
//! refresh; nothing else happens here.

use crate::shelter::{Shelter, ShelterId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// The available presentations of the shelter collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Map,
    List,
    Dashboard,
}

impl View {
    /// Whether rendering this view needs a loaded snapshot.
    pub fn needs_data(self) -> bool {
        matches!(self, View::List | View::Dashboard)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            View::Map => "map",
            View::List => "list",
            View::Dashboard => "dashboard",
        })
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "map" => Ok(View::Map),
            "list" => Ok(View::List),
            "dashboard" => Ok(View::Dashboard),
            other => Err(format!("unknown view: {other}")),
        }
    }
}

/// Outcome of a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    pub view: View,
    pub needs_refresh: bool,
}

/// Tracks the active view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewSelector {
    current: View,
}

impl ViewSelector {
    pub fn new(initial: View) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> View {
        self.current
    }

    /// Switch to `target`. `data_loaded` is whether a snapshot exists yet.
    pub fn navigate(&mut self, target: View, data_loaded: bool) -> Navigation {
        self.current = target;
        Navigation {
            view: target,
            needs_refresh: target.needs_data() && !data_loaded,
        }
    }
}

/// One row of the occupancy dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardRow {
    pub id: ShelterId,
    pub name: String,
    pub occupancy: u32,
    pub capacity: u32,
    pub available_spots: u32,
    /// Occupancy as a percentage of capacity
    pub load_percent: f64,
}

/// Dashboard rows, most loaded shelter first. Ties are ordered by id.
pub fn dashboard_rows(shelters: &[Shelter]) -> Vec<DashboardRow> {
    let mut rows: Vec<DashboardRow> = shelters
        .iter()
        .map(|s| DashboardRow {
            id: s.id,
            name: s.name.clone(),
            occupancy: s.occupancy(),
            capacity: s.capacity(),
            available_spots: s.available_spots(),
            load_percent: s.load_ratio() * 100.0,
        })
        .collect();

    rows.sort_by(|a, b| {
        b.load_percent
            .partial_cmp(&a.load_percent)
            .unwrap_or(Ordering::Equal)
            .then(a.id.cmp(&b.id))
    });
    rows
}
