use std::collections::HashMap;

/// Static airport metadata keyed by IATA code. Constructed once at startup
/// and handed to each adapter; unknown codes resolve to empty strings,
/// never an error.
pub struct AirportRegistry {
    entries: HashMap<&'static str, AirportInfo>,
}

#[derive(Debug, Clone, Copy)]
pub struct AirportInfo {
    pub name: &'static str,
    pub city: &'static str,
}

impl AirportRegistry {
    pub fn new() -> Self {
        let mut entries = HashMap::new();
        for &(code, name, city) in SEED {
            entries.insert(code, AirportInfo { name, city });
        }
        Self { entries }
    }

    pub fn airport_name(&self, code: &str) -> &'static str {
        self.entries
            .get(code.to_ascii_uppercase().as_str())
            .map(|info| info.name)
            .unwrap_or("")
    }

    pub fn city_name(&self, code: &str) -> &'static str {
        self.entries
            .get(code.to_ascii_uppercase().as_str())
            .map(|info| info.city)
            .unwrap_or("")
    }
}

impl Default for AirportRegistry {
    fn default() -> Self {
        Self::new()
    }
}

const SEED: &[(&str, &str, &str)] = &[
    ("CGK", "Soekarno-Hatta International Airport", "Jakarta"),
    ("HLP", "Halim Perdanakusuma Airport", "Jakarta"),
    ("SBY", "Juanda International Airport", "Surabaya"),
    ("DPS", "I Gusti Ngurah Rai International Airport", "Denpasar"),
    ("JOG", "Yogyakarta International Airport", "Yogyakarta"),
    ("KNO", "Kualanamu International Airport", "Medan"),
    ("UPG", "Sultan Hasanuddin International Airport", "Makassar"),
    ("BPN", "Sultan Aji Muhammad Sulaiman Airport", "Balikpapan"),
    ("PLM", "Sultan Mahmud Badaruddin II Airport", "Palembang"),
    ("SRG", "Jenderal Ahmad Yani Airport", "Semarang"),
    ("PKU", "Sultan Syarif Kasim II Airport", "Pekanbaru"),
    ("BTH", "Hang Nadim International Airport", "Batam"),
    ("LOP", "Lombok International Airport", "Praya"),
    ("PNK", "Supadio Airport", "Pontianak"),
    ("SIN", "Changi Airport", "Singapore"),
    ("KUL", "Kuala Lumpur International Airport", "Kuala Lumpur"),
];
