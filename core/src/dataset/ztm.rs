//! Typed views of the ZTM stop and route documents
//!
//! Stop records come as `{"result": [{"values": [{"key": .., "value": ..}, ..]}]}`
//! with string values; coordinates are parsed from those strings. Route
//! records come as `{"result": {line: {direction: {sequence: {..}}}}}` where
//! the sequence keys are decimal strings.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::algorithm::traits::AlgorithmError;
use crate::data_structures::graph::Position;

/// Stop posts numbered at or above this are depot and technical posts
const MAX_PASSENGER_SLUPEK: u32 = 50;

/// Error types for dataset parsing and graph building
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Malformed document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Stop record {index} has no field '{field}'")]
    MissingField { index: usize, field: &'static str },

    #[error("Stop record {index}: field '{field}' is not a coordinate: {value}")]
    InvalidCoordinate {
        index: usize,
        field: &'static str,
        value: String,
    },

    #[error("Line {line}, direction {direction}: sequence key '{key}' is not a number")]
    InvalidSequence {
        line: String,
        direction: String,
        key: String,
    },

    #[error("Unknown stop: {0}")]
    UnknownStop(String),

    #[error("Graph construction failed: {0}")]
    Graph(#[from] AlgorithmError),
}

/// Stop post identifier: stop group (`zespol`) plus post number (`slupek`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StopId {
    pub zespol: String,
    pub slupek: String,
}

impl StopId {
    pub fn new(zespol: impl Into<String>, slupek: impl Into<String>) -> Self {
        Self {
            zespol: zespol.into(),
            slupek: slupek.into(),
        }
    }

    /// Parses the `"{zespol}:{slupek}"` node key form
    pub fn parse_key(key: &str) -> Option<Self> {
        let (zespol, slupek) = key.split_once(':')?;
        if zespol.is_empty() || slupek.is_empty() {
            return None;
        }
        Some(Self::new(zespol, slupek))
    }
}

impl Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.zespol, self.slupek)
    }
}

/// One stop post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZtmStop {
    pub zespol: String,
    pub slupek: String,
    pub nazwa_zespolu: String,
    pub id_ulicy: String,
    /// Latitude
    pub szer_geo: f64,
    /// Longitude
    pub dlug_geo: f64,
    pub kierunek: String,
    pub obowiazuje_od: String,
}

impl ZtmStop {
    pub fn id(&self) -> StopId {
        StopId::new(self.zespol.clone(), self.slupek.clone())
    }

    /// Planar position as `(longitude, latitude)`
    pub fn position(&self) -> Position {
        Position::new(self.dlug_geo, self.szer_geo)
    }

    pub fn label(&self) -> String {
        format!("{} {}", self.nazwa_zespolu, self.slupek)
    }

    /// Whether the post serves passengers.
    ///
    /// Post `00` and posts numbered 50 and above are internal to the operator.
    pub fn is_passenger_stop(&self) -> bool {
        self.slupek != "00"
            && self
                .slupek
                .parse::<u32>()
                .is_ok_and(|n| n < MAX_PASSENGER_SLUPEK)
    }
}

/// Stop reference inside a route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteStop {
    pub sequence: u32,
    pub stop: StopId,
}

/// Routes by line, then by direction; stops ordered by sequence number
pub type Routes = BTreeMap<String, BTreeMap<String, Vec<RouteStop>>>;

#[derive(Deserialize)]
struct StopsDocument {
    result: Vec<StopEntry>,
}

#[derive(Deserialize)]
struct StopEntry {
    values: Vec<KeyValue>,
}

#[derive(Deserialize)]
struct KeyValue {
    key: String,
    #[serde(default)]
    value: Value,
}

#[derive(Deserialize)]
struct RoutesDocument {
    result: BTreeMap<String, BTreeMap<String, BTreeMap<String, RawRouteStop>>>,
}

#[derive(Deserialize)]
struct RawRouteStop {
    nr_zespolu: String,
    nr_przystanku: String,
}

/// Parses every stop record of a stops document
pub fn parse_stops(document: &Value) -> Result<Vec<ZtmStop>, DatasetError> {
    let document = StopsDocument::deserialize(document)?;
    document
        .result
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_stop(index, entry))
        .collect()
}

fn parse_stop(index: usize, entry: &StopEntry) -> Result<ZtmStop, DatasetError> {
    let text = |field: &'static str| -> Result<String, DatasetError> {
        entry
            .values
            .iter()
            .find(|kv| kv.key == field)
            .map(|kv| value_to_string(&kv.value))
            .ok_or(DatasetError::MissingField { index, field })
    };
    let coordinate = |field: &'static str| -> Result<f64, DatasetError> {
        let raw = text(field)?;
        raw.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or(DatasetError::InvalidCoordinate {
                index,
                field,
                value: raw,
            })
    };

    Ok(ZtmStop {
        zespol: text("zespol")?,
        slupek: text("slupek")?,
        nazwa_zespolu: text("nazwa_zespolu")?,
        id_ulicy: text("id_ulicy")?,
        szer_geo: coordinate("szer_geo")?,
        dlug_geo: coordinate("dlug_geo")?,
        kierunek: text("kierunek")?,
        obowiazuje_od: text("obowiazuje_od")?,
    })
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Parses a routes document, ordering each direction by numeric sequence key
pub fn parse_routes(document: &Value) -> Result<Routes, DatasetError> {
    let document = RoutesDocument::deserialize(document)?;
    let mut routes = Routes::new();

    for (line, directions) in document.result {
        let mut parsed = BTreeMap::new();
        for (direction, stops) in directions {
            let mut ordered = stops
                .into_iter()
                .map(|(key, raw)| {
                    let sequence =
                        key.trim()
                            .parse::<u32>()
                            .map_err(|_| DatasetError::InvalidSequence {
                                line: line.clone(),
                                direction: direction.clone(),
                                key: key.clone(),
                            })?;
                    Ok(RouteStop {
                        sequence,
                        stop: StopId::new(raw.nr_zespolu, raw.nr_przystanku),
                    })
                })
                .collect::<Result<Vec<_>, DatasetError>>()?;
            ordered.sort_by_key(|stop| stop.sequence);
            parsed.insert(direction, ordered);
        }
        routes.insert(line, parsed);
    }

    Ok(routes)
}
