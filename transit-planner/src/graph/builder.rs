//! Graph construction from a flat station/line catalog.

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::Utc;
use tracing::debug;

use crate::domain::{Line, LineId, Station, StationId, TopologyError};

use super::config::{MAX_HOP_MINUTES, MAX_TRANSFER_PENALTY_MINUTES};
use super::{
    Graph, GraphConfig, LineIdx, Link, LinkKind, Node, NodeIdx, RideEdge, StationIdx,
    TransferEdge,
};

/// Build a graph from a catalog.
///
/// Ride edges join consecutive stations of each line, weighted by the
/// line's per-hop travel times or `config.default_hop_minutes`. Every
/// station served by two or more lines gets one transfer edge per unordered
/// pair of lines, weighted by `config.transfer_penalty_minutes`.
///
/// # Errors
///
/// Returns [`TopologyError`] if the catalog is inconsistent: unknown or
/// duplicated ids, lines with fewer than two stations, a station repeated
/// within a line, membership claims the lines don't back up, or bad
/// travel times.
pub fn build_graph(
    lines: &[Line],
    stations: &[Station],
    config: &GraphConfig,
) -> Result<Graph, TopologyError> {
    if config.transfer_penalty_minutes > MAX_TRANSFER_PENALTY_MINUTES {
        return Err(TopologyError::TransferPenaltyTooLarge {
            minutes: config.transfer_penalty_minutes,
            max: MAX_TRANSFER_PENALTY_MINUTES,
        });
    }

    let mut station_index: HashMap<StationId, StationIdx> = HashMap::with_capacity(stations.len());
    for (i, station) in stations.iter().enumerate() {
        if station_index.insert(station.id.clone(), StationIdx(i)).is_some() {
            return Err(TopologyError::DuplicateStation(station.id.clone()));
        }
    }

    // Sorted so that line index order is line id order.
    let mut lines: Vec<Line> = lines.to_vec();
    lines.sort_by(|a, b| a.id.cmp(&b.id));
    for pair in lines.windows(2) {
        if pair[0].id == pair[1].id {
            return Err(TopologyError::DuplicateLine(pair[0].id.clone()));
        }
    }
    let line_index: HashMap<LineId, LineIdx> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| (line.id.clone(), LineIdx(i)))
        .collect();

    // Resolve each line's sequence and hop times.
    let mut sequences: Vec<Vec<StationIdx>> = Vec::with_capacity(lines.len());
    let mut hop_times: Vec<Vec<u32>> = Vec::with_capacity(lines.len());
    for line in &lines {
        let (sequence, times) = resolve_line(line, &station_index, config)?;
        sequences.push(sequence);
        hop_times.push(times);
    }

    // Membership comes from the sequences; claims must agree with it.
    let mut membership: Vec<BTreeSet<LineIdx>> = vec![BTreeSet::new(); stations.len()];
    for (line_i, sequence) in sequences.iter().enumerate() {
        for station in sequence {
            membership[station.0].insert(LineIdx(line_i));
        }
    }
    for (station_i, station) in stations.iter().enumerate() {
        for claimed in &station.line_ids {
            let line = line_index
                .get(claimed)
                .ok_or_else(|| TopologyError::UnknownLine {
                    station: station.id.clone(),
                    line: claimed.clone(),
                })?;
            if !membership[station_i].contains(line) {
                return Err(TopologyError::MembershipMismatch {
                    station: station.id.clone(),
                    line: claimed.clone(),
                });
            }
        }
    }

    // One node per (station, line) occupancy.
    let mut nodes: Vec<Node> = Vec::new();
    let mut node_index: HashMap<(StationIdx, LineIdx), NodeIdx> = HashMap::new();
    let mut station_nodes: Vec<Vec<NodeIdx>> = vec![Vec::new(); stations.len()];
    for (station_i, lines_here) in membership.iter().enumerate() {
        for &line in lines_here {
            let station = StationIdx(station_i);
            let idx = NodeIdx(nodes.len());
            nodes.push(Node { station, line });
            node_index.insert((station, line), idx);
            station_nodes[station_i].push(idx);
        }
    }

    let mut adjacency: Vec<Vec<Link>> = vec![Vec::new(); nodes.len()];
    let mut ride_edges = Vec::new();
    for (line_i, sequence) in sequences.iter().enumerate() {
        let line = LineIdx(line_i);
        for (hop, pair) in sequence.windows(2).enumerate() {
            let minutes = hop_times[line_i][hop];
            let a = node_index[&(pair[0], line)];
            let b = node_index[&(pair[1], line)];
            let kind = LinkKind::Ride { minutes };
            adjacency[a.0].push(Link { to: b, kind });
            adjacency[b.0].push(Link { to: a, kind });
            ride_edges.push(RideEdge {
                station_a: stations[pair[0].0].id.clone(),
                station_b: stations[pair[1].0].id.clone(),
                line_id: lines[line_i].id.clone(),
                travel_time_minutes: minutes,
            });
        }
    }

    let mut transfer_edges = Vec::new();
    for (station_i, here) in station_nodes.iter().enumerate() {
        for (i, &a) in here.iter().enumerate() {
            for &b in &here[i + 1..] {
                adjacency[a.0].push(Link {
                    to: b,
                    kind: LinkKind::Transfer,
                });
                adjacency[b.0].push(Link {
                    to: a,
                    kind: LinkKind::Transfer,
                });
                transfer_edges.push(TransferEdge {
                    station_id: stations[station_i].id.clone(),
                    line_a: lines[nodes[a.0].line.0].id.clone(),
                    line_b: lines[nodes[b.0].line.0].id.clone(),
                    penalty_minutes: config.transfer_penalty_minutes,
                });
            }
        }
    }

    debug!(
        stations = stations.len(),
        lines = lines.len(),
        ride_edges = ride_edges.len(),
        transfer_edges = transfer_edges.len(),
        "Built network graph"
    );

    Ok(Graph {
        stations: stations.to_vec(),
        lines,
        station_index,
        line_index,
        nodes,
        station_nodes,
        adjacency,
        ride_edges,
        transfer_edges,
        config: config.clone(),
        built_at: Utc::now(),
    })
}

/// Check one line and resolve its stations and per-hop times.
fn resolve_line(
    line: &Line,
    station_index: &HashMap<StationId, StationIdx>,
    config: &GraphConfig,
) -> Result<(Vec<StationIdx>, Vec<u32>), TopologyError> {
    if line.station_ids.len() < 2 {
        return Err(TopologyError::TooFewStations(line.id.clone()));
    }

    let mut seen = HashSet::new();
    let mut sequence = Vec::with_capacity(line.station_ids.len());
    for station in &line.station_ids {
        let idx = station_index
            .get(station)
            .ok_or_else(|| TopologyError::UnknownStation {
                line: line.id.clone(),
                station: station.clone(),
            })?;
        if !seen.insert(*idx) {
            return Err(TopologyError::RepeatedStation {
                line: line.id.clone(),
                station: station.clone(),
            });
        }
        sequence.push(*idx);
    }

    let hops = sequence.len() - 1;
    let times = match &line.travel_times_minutes {
        Some(times) if times.len() != hops => {
            return Err(TopologyError::TravelTimeCount {
                line: line.id.clone(),
                hops,
                times: times.len(),
            });
        }
        Some(times) => times.clone(),
        None => vec![config.default_hop_minutes; hops],
    };

    if let Some(hop) = times.iter().position(|&t| t == 0) {
        return Err(TopologyError::ZeroTravelTime {
            line: line.id.clone(),
            station: line.station_ids[hop].clone(),
        });
    }
    if let Some(hop) = times.iter().position(|&t| t > MAX_HOP_MINUTES) {
        return Err(TopologyError::TravelTimeTooLong {
            line: line.id.clone(),
            station: line.station_ids[hop].clone(),
            minutes: times[hop],
            max: MAX_HOP_MINUTES,
        });
    }

    Ok((sequence, times))
}
