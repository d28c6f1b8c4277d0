//! Built-in shelters for offline use and for seeding an empty store.

use crate::shelter::{Shelter, ShelterId};

struct Seed {
    id: ShelterId,
    name: &'static str,
    capacity: u32,
    occupancy: u32,
    address: &'static str,
    region: &'static str,
    temperature: f64,
    resources: &'static [&'static str],
    latitude: f64,
    longitude: f64,
    responsible: &'static str,
    phone: &'static str,
}

const SEEDS: [Seed; 4] = [
    Seed {
        id: 1,
        name: "Abrigo Central Esperança",
        capacity: 100,
        occupancy: 75,
        address: "Rua da Consolação, 101, São Paulo, SP",
        region: "Centro Histórico",
        temperature: 20.0,
        resources: &["Água", "Alimentação Quente", "Cobertores", "Kit Higiene"],
        latitude: -23.550520,
        longitude: -46.633308,
        responsible: "Coordenação Central",
        phone: "(11) 91234-5678",
    },
    Seed {
        id: 2,
        name: "Refúgio Bem-Estar Norte",
        capacity: 50,
        occupancy: 48,
        address: "Av. Cruzeiro do Sul, 2020, São Paulo, SP",
        region: "Zona Norte",
        temperature: 19.0,
        resources: &["Alojamento", "Suporte Médico Básico", "Roupas"],
        latitude: -23.540000,
        longitude: -46.640000,
        responsible: "Equipe Norte",
        phone: "bemestar.norte@example.com",
    },
    Seed {
        id: 3,
        name: "Ponto de Apoio Sul",
        capacity: 30,
        occupancy: 30,
        address: "Rua Vergueiro, 3030, São Paulo, SP",
        region: "Zona Sul",
        temperature: 21.0,
        resources: &["Água", "Lanches Rápidos", "Apoio Psicológico"],
        latitude: -23.561318,
        longitude: -46.656189,
        responsible: "Equipe Sul",
        phone: "",
    },
    Seed {
        id: 4,
        name: "Casa de Acolhimento Leste",
        capacity: 70,
        occupancy: 30,
        address: "Av. Radial Leste, 4040, São Paulo, SP",
        region: "Zona Leste",
        temperature: 20.0,
        resources: &["Alimentação", "Área para crianças", "Wi-Fi"],
        latitude: -23.545000,
        longitude: -46.500000,
        responsible: "Equipe Leste",
        phone: "(11) 98765-4321",
    },
];

/// The four demo shelters in São Paulo.
pub fn mock_shelters() -> Vec<Shelter> {
    SEEDS
        .iter()
        .filter_map(|s| {
            let shelter = Shelter::new(s.id, s.name, s.capacity, s.occupancy).ok()?;
            Some(
                shelter
                    .with_address(s.address)
                    .with_region(s.region)
                    .with_temperature(s.temperature)
                    .with_resources(s.resources.iter().copied())
                    .with_location(s.latitude, s.longitude)
                    .with_contact(s.responsible, s.phone),
            )
        })
        .collect()
}
