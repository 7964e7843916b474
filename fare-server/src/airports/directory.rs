//! Airport code lookup.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::Iata;

use super::error::AirportError;

/// Built-in table used when no directory file is available.
const BUILTIN: &[(&str, &str, &str, &str)] = &[
    ("BGY", "Bergamo", "Orio al Serio", "Italia"),
    ("MXP", "Milano", "Malpensa", "Italia"),
    ("LIN", "Milano", "Linate", "Italia"),
    ("FCO", "Roma", "Fiumicino", "Italia"),
    ("CIA", "Roma", "Ciampino", "Italia"),
    ("NAP", "Napoli", "Capodichino", "Italia"),
    ("BLQ", "Bologna", "Guglielmo Marconi", "Italia"),
    ("TSF", "Treviso", "Antonio Canova", "Italia"),
    ("PSA", "Pisa", "Galileo Galilei", "Italia"),
    ("CTA", "Catania", "Fontanarossa", "Italia"),
    ("PMO", "Palermo", "Falcone Borsellino", "Italia"),
    ("BRI", "Bari", "Karol Wojtyla", "Italia"),
    ("BVA", "Parigi", "Beauvais", "Francia"),
    ("STN", "Londra", "Stansted", "Regno Unito"),
    ("DUB", "Dublino", "Dublin Airport", "Irlanda"),
    ("BCN", "Barcellona", "El Prat", "Spagna"),
    ("MAD", "Madrid", "Barajas", "Spagna"),
    ("CRL", "Bruxelles", "Charleroi", "Belgio"),
    ("VLC", "Valencia", "Manises", "Spagna"),
    ("LIS", "Lisbona", "Humberto Delgado", "Portogallo"),
];

/// One airport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airport {
    pub code: Iata,
    pub city: String,
    pub name: String,
    pub country: String,
}

impl Airport {
    /// Human-readable picker label, e.g. "Bergamo - Orio al Serio (BGY)".
    pub fn label(&self) -> String {
        match (self.city.is_empty(), self.name.is_empty()) {
            (false, false) => format!("{} - {} ({})", self.city, self.name, self.code),
            (false, true) => format!("{} ({})", self.city, self.code),
            (true, false) => format!("{} ({})", self.name, self.code),
            (true, true) => self.code.to_string(),
        }
    }

    fn matches(&self, needle: &str) -> bool {
        [
            self.code.as_str(),
            self.city.as_str(),
            self.name.as_str(),
            self.country.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Raw CSV row; the code is validated separately so bad rows can be skipped.
#[derive(Debug, Deserialize)]
struct AirportRow {
    code: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    country: String,
}

/// Read-only airport lookup, cheap to clone.
#[derive(Debug, Clone)]
pub struct AirportDirectory {
    inner: Arc<BTreeMap<Iata, Airport>>,
    builtin: bool,
}

impl AirportDirectory {
    /// The built-in table.
    pub fn builtin() -> Self {
        let map = BUILTIN
            .iter()
            .filter_map(|(code, city, name, country)| {
                let code = Iata::parse(code).ok()?;
                Some((
                    code,
                    Airport {
                        code,
                        city: city.to_string(),
                        name: name.to_string(),
                        country: country.to_string(),
                    },
                ))
            })
            .collect();

        Self {
            inner: Arc::new(map),
            builtin: true,
        }
    }

    /// Parse a `code,city,name,country` CSV. Rows with invalid codes are
    /// skipped.
    pub fn from_reader(reader: impl Read) -> Result<Self, AirportError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut map = BTreeMap::new();
        let mut skipped = 0usize;

        for result in reader.deserialize::<AirportRow>() {
            let row = result?;
            match Iata::parse_normalized(&row.code) {
                Ok(code) => {
                    map.insert(
                        code,
                        Airport {
                            code,
                            city: row.city,
                            name: row.name,
                            country: row.country,
                        },
                    );
                }
                Err(_) => skipped += 1,
            }
        }

        if skipped > 0 {
            warn!(skipped, "skipped airport rows with invalid codes");
        }
        if map.is_empty() {
            return Err(AirportError::Empty);
        }

        Ok(Self {
            inner: Arc::new(map),
            builtin: false,
        })
    }

    /// Load a directory file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AirportError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| AirportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let directory = Self::from_reader(file)?;
        info!(airports = directory.len(), path = %path.display(), "loaded airport directory");
        Ok(directory)
    }

    /// Load `path` if given, falling back to the built-in table on any
    /// failure.
    pub fn load_or_builtin(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::builtin();
        };
        match Self::load(path) {
            Ok(directory) => directory,
            Err(e) => {
                warn!(error = %e, "airport directory unavailable, using built-in table");
                Self::builtin()
            }
        }
    }

    /// Whether this is the built-in fallback table.
    pub fn is_builtin(&self) -> bool {
        self.builtin
    }

    pub fn get(&self, code: &Iata) -> Option<&Airport> {
        self.inner.get(code)
    }

    /// Label for `code`; unknown codes label as themselves.
    pub fn label(&self, code: &Iata) -> String {
        self.get(code)
            .map(Airport::label)
            .unwrap_or_else(|| code.to_string())
    }

    /// Case-insensitive substring search over every field.
    ///
    /// An exact code match comes first, the rest in code order.
    pub fn search(&self, query: &str, limit: usize) -> Vec<Airport> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() || limit == 0 {
            return Vec::new();
        }

        let exact = Iata::parse_normalized(&needle)
            .ok()
            .and_then(|code| self.get(&code));

        exact
            .into_iter()
            .chain(
                self.inner
                    .values()
                    .filter(|a| a.matches(&needle) && Some(a.code) != exact.map(|e| e.code)),
            )
            .take(limit)
            .cloned()
            .collect()
    }

    /// Every airport, in code order.
    pub fn iter(&self) -> impl Iterator<Item = &Airport> {
        self.inner.values()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Default for AirportDirectory {
    fn default() -> Self {
        Self::builtin()
    }
}
