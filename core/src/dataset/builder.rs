//! Stop graph construction from parsed ZTM data
//!
//! Every line/direction is walked in sequence order. A node is created for
//! each passenger stop a route touches, keyed `"{zespol}:{slupek}"`, and an
//! edge labelled with the line joins consecutive known stops. Stops missing
//! from the stop list are skipped; the chain continues from the previous
//! known stop.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::HashMap;

use log::{debug, info, trace, warn};
use serde_json::Value;

use crate::algorithm::traits::{NodeId, SearchGraph};
use crate::data_structures::graph::Graph;
use crate::dataset::ztm::{parse_routes, parse_stops, DatasetError, RouteStop, Routes, StopId, ZtmStop};

/// Incremental graph builder
#[derive(Debug)]
pub struct GraphBuilder {
    lookup: HashMap<StopId, ZtmStop>,
    graph: Graph,
    unknown_stops: usize,
}

impl GraphBuilder {
    /// Creates a builder over the passenger stops in `stops`
    pub fn new(stops: impl IntoIterator<Item = ZtmStop>) -> Self {
        let lookup: HashMap<_, _> = stops
            .into_iter()
            .filter(ZtmStop::is_passenger_stop)
            .map(|stop| (stop.id(), stop))
            .collect();
        debug!("Stop lookup holds {} passenger stops", lookup.len());

        Self {
            graph: Graph::with_capacity(lookup.len()),
            lookup,
            unknown_stops: 0,
        }
    }

    /// Number of route entries that referenced a stop missing from the lookup
    pub fn unknown_stops(&self) -> usize {
        self.unknown_stops
    }

    /// Adds one direction of one line; `stops` must be in sequence order
    pub fn add_route(&mut self, line: &str, stops: &[RouteStop]) -> Result<(), DatasetError> {
        let mut previous: Option<NodeId> = None;

        for route_stop in stops {
            let Some(stop) = self.lookup.get(&route_stop.stop) else {
                warn!("Line {}: stop {} not found in stop lookup", line, route_stop.stop);
                self.unknown_stops += 1;
                continue;
            };

            let node = self
                .graph
                .add_node(stop.id().to_string(), stop.label(), stop.position());

            match previous {
                Some(prev) if prev == node => {
                    trace!("Line {}: repeated stop {}, no edge", line, route_stop.stop);
                }
                Some(prev) => self.graph.add_edge(prev, node, line)?,
                None => {}
            }
            previous = Some(node);
        }

        Ok(())
    }

    /// Adds every line and direction
    pub fn add_routes(&mut self, routes: &Routes) -> Result<(), DatasetError> {
        for (line, directions) in routes {
            for stops in directions.values() {
                self.add_route(line, stops)?;
            }
        }
        Ok(())
    }

    pub fn finish(self) -> Graph {
        info!(
            "Built graph with {} stops and {} connections ({} unknown route stops skipped)",
            self.graph.node_count(),
            self.graph.edge_count(),
            self.unknown_stops
        );
        self.graph
    }
}

/// Builds the stop graph straight from the raw stops and routes documents
pub fn build_graph(stops_document: &Value, routes_document: &Value) -> Result<Graph, DatasetError> {
    let stops = parse_stops(stops_document)?;
    let routes = parse_routes(routes_document)?;

    let mut builder = GraphBuilder::new(stops);
    builder.add_routes(&routes)?;
    Ok(builder.finish())
}
