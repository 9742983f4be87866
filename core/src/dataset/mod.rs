//! ZTM (Warsaw public transport) data ingestion
//!
//! Stop and route records arrive as the raw JSON documents served by the
//! city API. They are parsed into typed records, cached on disk through
//! [`ResponseCache`], and folded into an undirected stop [`Graph`](crate::data_structures::Graph).
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod builder;
pub mod cache;
pub mod ztm;

pub use self::builder::{build_graph, GraphBuilder};
pub use self::cache::{CacheError, ResponseCache, ROUTES_KEY, STOPS_KEY};
pub use self::ztm::{parse_routes, parse_stops, DatasetError, RouteStop, Routes, StopId, ZtmStop};
