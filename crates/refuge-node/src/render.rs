//! Plain-text rendering for the interactive client.

use crate::session::SessionSnapshot;
use refuge_core::{dashboard_rows, EnvironmentReading, Shelter, Totals, View};
use std::fmt::Write;

/// Resources shown on a list card before collapsing into "+ more".
pub const CARD_RESOURCES: usize = 4;

/// Render whichever view the snapshot is on.
pub fn render(snapshot: &SessionSnapshot) -> String {
    let mut out = match snapshot.view {
        View::Map => render_map(&snapshot.shelters),
        View::List => render_list(&snapshot.shelters),
        View::Dashboard => {
            let mut text = render_dashboard(&snapshot.shelters);
            if !snapshot.shelters.is_empty() {
                text.push_str(&render_totals(&snapshot.totals));
            }
            text
        }
    };
    if snapshot.loading {
        out.push_str("(loading...)\n");
    }
    if let Some(error) = &snapshot.last_error {
        let _ = writeln!(out, "! {error}");
    }
    out
}

/// Shelter markers with coordinates. Works with nothing loaded.
pub fn render_map(shelters: &[Shelter]) -> String {
    let mut out = String::from("== Map ==\n");
    let located: Vec<&Shelter> = shelters.iter().filter(|s| s.location.is_some()).collect();
    if located.is_empty() {
        out.push_str("No shelters on the map yet.\n");
        return out;
    }
    for shelter in located {
        if let Some(point) = shelter.location {
            let _ = writeln!(
                out,
                "[{}] {:<28} ({:.4}, {:.4})  {} spots",
                shelter.id,
                shelter.name,
                point.latitude,
                point.longitude,
                shelter.available_spots()
            );
        }
    }
    out
}

/// One card per shelter.
pub fn render_list(shelters: &[Shelter]) -> String {
    let mut out = String::from("== Shelters ==\n");
    if shelters.is_empty() {
        out.push_str("No shelters found.\n");
        return out;
    }
    for shelter in shelters {
        out.push_str(&render_card(shelter));
    }
    out
}

fn render_card(shelter: &Shelter) -> String {
    let mut card = String::new();
    let status = if !shelter.active {
        "closed"
    } else if shelter.is_full() {
        "full"
    } else {
        "open"
    };

    let _ = writeln!(card, "[{}] {} ({status})", shelter.id, shelter.name);
    if !shelter.address.is_empty() {
        let _ = writeln!(card, "    {}", shelter.address);
    }
    if !shelter.region.is_empty() {
        let _ = writeln!(card, "    Region: {}", shelter.region);
    }
    let _ = writeln!(
        card,
        "    Occupancy: {}/{}  Available: {}",
        shelter.occupancy(),
        shelter.capacity(),
        shelter.available_spots()
    );
    if let Some(temperature) = shelter.temperature {
        let _ = writeln!(card, "    Temperature: {temperature:.1} °C");
    }
    if !shelter.resources.is_empty() {
        let shown: Vec<&str> = shelter
            .resources
            .iter()
            .take(CARD_RESOURCES)
            .map(String::as_str)
            .collect();
        let more = if shelter.resources.len() > CARD_RESOURCES { ", + more" } else { "" };
        let _ = writeln!(card, "    Resources: {}{more}", shown.join(", "));
    }
    if !shelter.contact.responsible.is_empty() {
        let _ = writeln!(
            card,
            "    Contact: {} {}",
            shelter.contact.responsible, shelter.contact.phone
        );
    }
    card
}

/// Occupancy table, most loaded first.
pub fn render_dashboard(shelters: &[Shelter]) -> String {
    let mut out = String::from("== Dashboard ==\n");
    let rows = dashboard_rows(shelters);
    if rows.is_empty() {
        out.push_str("No shelters found.\n");
        return out;
    }

    let _ = writeln!(
        out,
        "{:>4}  {:<28} {:>9} {:>9} {:>6}",
        "id", "name", "occupied", "available", "load"
    );
    for row in rows {
        let _ = writeln!(
            out,
            "{:>4}  {:<28} {:>4}/{:<4} {:>9} {:>5.0}%",
            row.id, row.name, row.occupancy, row.capacity, row.available_spots, row.load_percent
        );
    }
    out
}

/// Summary line across all shelters.
pub fn render_totals(totals: &Totals) -> String {
    format!(
        "Total: {}/{} occupied, {} spots available\n",
        totals.occupancy, totals.capacity, totals.available
    )
}

pub fn render_reading(reading: &EnvironmentReading) -> String {
    format!(
        "temp {:.1} °C | humidity {}% | CO2 {} ppm ({}) | occupancy {}",
        reading.temperature,
        reading.humidity,
        reading.co2_ppm,
        reading.air_quality,
        reading.occupancy
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use refuge_core::{mock_shelters, CapacityTracker};

    #[test]
    fn card_collapses_long_resource_lists() {
        let shelter = Shelter::new(9, "Ginásio", 10, 1)
            .unwrap()
            .with_resources(["a", "b", "c", "d", "e"]);
        let card = render_card(&shelter);
        assert!(card.contains("Resources: a, b, c, d, + more"));
        assert!(!card.contains(", e"));
    }

    #[test]
    fn full_shelter_marked() {
        let list = render_list(&mock_shelters());
        assert!(list.contains("[3] Ponto de Apoio Sul (full)"));
        assert!(list.contains("Occupancy: 75/100  Available: 25"));
    }

    #[test]
    fn dashboard_order() {
        let text = render_dashboard(&mock_shelters());
        let pos = |name: &str| text.find(name).unwrap();
        assert!(pos("Ponto de Apoio Sul") < pos("Refúgio Bem-Estar Norte"));
        assert!(pos("Refúgio Bem-Estar Norte") < pos("Abrigo Central Esperança"));
        assert!(pos("Abrigo Central Esperança") < pos("Casa de Acolhimento Leste"));
    }

    #[test]
    fn dashboard_shows_totals() {
        let mut tracker = CapacityTracker::new();
        tracker.replace_all(mock_shelters());
        let snapshot = SessionSnapshot {
            view: View::Dashboard,
            shelters: tracker.shelters().to_vec(),
            totals: tracker.totals(),
            generation: tracker.generation(),
            loading: false,
            last_error: None,
        };

        let text = render(&snapshot);
        assert!(text.ends_with("Total: 183/250 occupied, 67 spots available\n"));
    }

    #[test]
    fn empty_views() {
        assert!(render_map(&[]).contains("No shelters on the map"));
        assert!(render_list(&[]).contains("No shelters found"));
    }

    #[test]
    fn error_line_appended() {
        let snapshot = SessionSnapshot {
            view: View::Map,
            shelters: Vec::new(),
            totals: Totals::default(),
            generation: 0,
            loading: false,
            last_error: Some("Could not load shelter data.".into()),
        };
        assert!(render(&snapshot).ends_with("! Could not load shelter data.\n"));
    }
}
