mod common;

use std::collections::HashMap;

use common::*;
use hawkeye::domain::calculation::calculation_mode::CalculationMode;
use hawkeye::domain::calculation::calculation_options::{CalculationOptions, ServiceFunctionChainOptions};
use hawkeye::domain::calculation::sfc_calculation::ServiceFunctionChainCalculation;
use hawkeye::domain::calculation::shortest_path_calculation::ShortestPathCalculation;
use hawkeye::domain::graph::weight_key::WeightKey;
use hawkeye::domain::path::path::ServiceWaypoint;
use hawkeye::domain::utils::id::NodeId;
use hawkeye::error::Error;

/// Firewall on routers 2 and 3, followed by an inspection service on 5 and 6.
fn two_service_chain() -> ServiceFunctionChainOptions {
    let sequences = vec![vec![node(2), node(5)], vec![node(2), node(6)], vec![node(3), node(5)], vec![node(3), node(6)]];
    ServiceFunctionChainOptions { sequences, service_sids: vec![sids(&[2, 3], 0x10), sids(&[5, 6], 0x20)] }
}

fn single_service_chain(routers: &[u32]) -> ServiceFunctionChainOptions {
    ServiceFunctionChainOptions { sequences: routers.iter().map(|n| vec![node(*n)]).collect(), service_sids: vec![sids(routers, 0x10)] }
}

fn sids(routers: &[u32], function: u32) -> HashMap<NodeId, String> {
    routers.iter().map(|n| (node(*n), service_sid(*n, function))).collect()
}

fn igp_options(from: u32, to: u32) -> CalculationOptions {
    CalculationOptions::new(node(from), node(to), vec![WeightKey::IgpMetric], CalculationMode::Sum)
}

#[test]
fn test_every_sequence_is_evaluated() {
    let topology = diamond_topology();
    let options = igp_options(1, 8);
    let sfc = two_service_chain();

    let mut calculation = ServiceFunctionChainCalculation::new(&topology, &options, &sfc);
    calculation.execute().unwrap();

    assert_eq!(calculation.evaluated_sequences(), 2 * 2);
}

#[test]
fn test_cheapest_sequence_is_selected() {
    let topology = diamond_topology();
    let options = igp_options(1, 8);
    let sfc = two_service_chain();

    let mut calculation = ServiceFunctionChainCalculation::new(&topology, &options, &sfc);
    let path = calculation.execute().unwrap();

    // 2,5 costs 7, 2,6 is infeasible, 3,5 costs 8 and 3,6 costs 6.
    assert_eq!(calculation.get_selected_sequence(), Some(&[node(3), node(6)][..]));
    assert_eq!(path.edges, edges(&[(1, 3), (3, 6), (6, 7), (7, 8)]));
    assert_close(path.total_cost, 6.0);
}

#[test]
fn test_selected_sequence_is_no_worse_than_any_other() {
    let topology = diamond_topology();
    let options = igp_options(1, 8);
    let sfc = two_service_chain();

    let best = ServiceFunctionChainCalculation::new(&topology, &options, &sfc).execute().unwrap();

    for sequence in &sfc.sequences {
        let single = ServiceFunctionChainOptions { sequences: vec![sequence.clone()], service_sids: sfc.service_sids.clone() };
        if let Ok(path) = ServiceFunctionChainCalculation::new(&topology, &options, &single).execute() {
            assert!(best.total_cost <= path.total_cost, "{:?} costs {} below {}", sequence, path.total_cost, best.total_cost);
        }
    }
}

#[test]
fn test_totals_cover_the_whole_chain() {
    let topology = diamond_topology();
    let options = igp_options(1, 8);
    let sfc = two_service_chain();

    let path = ServiceFunctionChainCalculation::new(&topology, &options, &sfc).execute().unwrap();

    assert_close(path.total_delay, 20.0 + 10.0 + 5.0 + 20.0);
    assert_close(path.total_jitter, 2.0 + 4.0 + 1.0 + 3.0);
    assert_close(path.total_packet_loss, (1.0 - 0.999 * 0.999 * 0.997 * 0.999) * 100.0);
}

#[test]
fn test_bottleneck_is_the_smallest_across_legs() {
    let topology = diamond_topology();
    let options = igp_options(1, 8);
    let sfc = two_service_chain();

    let path = ServiceFunctionChainCalculation::new(&topology, &options, &sfc).execute().unwrap();

    // Legs 1-3 (80), 3-6 (50) and 6-7-8 (60).
    assert_eq!(path.bottleneck_edge, Some(edge(3, 6)));
    assert_close(path.bottleneck_value, 50.0);
}

#[test]
fn test_services_are_placed_where_their_leg_ends() {
    let topology = diamond_topology();
    let options = igp_options(1, 8);
    let sfc = two_service_chain();

    let path = ServiceFunctionChainCalculation::new(&topology, &options, &sfc).execute().unwrap();

    assert_eq!(
        path.service_waypoints,
        vec![ServiceWaypoint::new(1, node(3), service_sid(3, 0x10)), ServiceWaypoint::new(2, node(6), service_sid(6, 0x20))]
    );
}

#[test]
fn test_two_services_on_one_router() {
    let topology = diamond_topology();
    let options = igp_options(1, 8);
    let sfc = ServiceFunctionChainOptions { sequences: vec![vec![node(5), node(5)]], service_sids: vec![sids(&[3, 5], 0xf), sids(&[5], 0x1)] };

    let path = ServiceFunctionChainCalculation::new(&topology, &options, &sfc).execute().unwrap();

    assert_eq!(path.edges, edges(&[(1, 2), (2, 5), (5, 8)]));
    assert_close(path.total_cost, 7.0);
    assert_eq!(
        path.service_waypoints,
        vec![ServiceWaypoint::new(2, node(5), service_sid(5, 0xf)), ServiceWaypoint::new(2, node(5), service_sid(5, 0x1))]
    );
}

#[test]
fn test_waypoint_revisited_on_a_later_leg() {
    let topology = diamond_topology();
    let options = igp_options(1, 8);
    let sfc = ServiceFunctionChainOptions { sequences: vec![vec![node(7), node(6)]], service_sids: vec![sids(&[7], 0xa), sids(&[6], 0xb)] };

    let path = ServiceFunctionChainCalculation::new(&topology, &options, &sfc).execute().unwrap();

    // The last leg 6 => 8 passes 7 again.
    assert_eq!(path.edges, edges(&[(1, 4), (4, 7), (7, 6), (6, 7), (7, 8)]));
    assert_eq!(
        path.service_waypoints,
        vec![ServiceWaypoint::new(2, node(7), service_sid(7, 0xa)), ServiceWaypoint::new(3, node(6), service_sid(6, 0xb))]
    );
}

#[test]
fn test_waypoint_on_the_source_is_skipped() {
    let topology = diamond_topology();
    let options = igp_options(1, 8);
    let sfc = single_service_chain(&[1]);

    let chained = ServiceFunctionChainCalculation::new(&topology, &options, &sfc).execute().unwrap();
    let direct = ShortestPathCalculation::new(&topology, &options, node(1), node(8)).execute().unwrap();

    assert_eq!(chained.edges, direct.edges);
    assert_close(chained.total_cost, direct.total_cost);
    assert_eq!(chained.service_waypoints, vec![ServiceWaypoint::new(0, node(1), service_sid(1, 0x10))]);
}

#[test]
fn test_waypoint_on_the_destination_is_skipped() {
    let topology = diamond_topology();
    let options = igp_options(1, 8);
    let sfc = single_service_chain(&[8]);

    let path = ServiceFunctionChainCalculation::new(&topology, &options, &sfc).execute().unwrap();
    assert_eq!(path.edges, edges(&[(1, 4), (4, 7), (7, 8)]));
    assert_close(path.total_cost, 6.0);
    assert_eq!(path.service_waypoints, vec![ServiceWaypoint::new(3, node(8), service_sid(8, 0x10))]);
}

#[test]
fn test_no_feasible_sequence() {
    let topology = diamond_topology();
    let options = igp_options(1, 8);
    let sfc = ServiceFunctionChainOptions { sequences: vec![vec![node(2), node(6)], vec![node(5), node(3)]], service_sids: Vec::new() };

    let mut calculation = ServiceFunctionChainCalculation::new(&topology, &options, &sfc);
    let result = calculation.execute();

    assert!(matches!(result, Err(Error::PathNotFound { .. })));
    assert_eq!(calculation.evaluated_sequences(), 2);
    assert!(calculation.get_selected_sequence().is_none());
}

#[test]
fn test_unknown_waypoint_is_an_error() {
    let topology = diamond_topology();
    let options = igp_options(1, 8);
    let sfc = single_service_chain(&[42]);

    let result = ServiceFunctionChainCalculation::new(&topology, &options, &sfc).execute();
    assert!(matches!(result, Err(Error::NodeNotInGraph(_))));
}

#[test]
fn test_max_mode_prefers_the_wider_chain() {
    let topology = diamond_topology();
    let options = CalculationOptions::new(node(1), node(8), vec![WeightKey::AvailableBandwidth], CalculationMode::Max);
    let sfc = single_service_chain(&[2, 3]);

    let mut calculation = ServiceFunctionChainCalculation::new(&topology, &options, &sfc);
    let path = calculation.execute().unwrap();

    // Through 2 the chain is limited by 5-8 (30), through 3 by 3-6 (50).
    assert_eq!(calculation.get_selected_sequence(), Some(&[node(3)][..]));
    assert_close(path.total_cost, 50.0);
}

#[test]
fn test_equal_sequences_keep_the_first() {
    let mut topology = hawkeye::domain::graph::topology::Topology::new();
    for n in 1..=4 {
        add_router(&mut topology, n, &[]);
    }
    for (from, to) in [(1, 2), (2, 4), (1, 3), (3, 4)] {
        add_link(&mut topology, from, to, HashMap::from([(WeightKey::IgpMetric, 1.0)]));
    }

    let options = igp_options(1, 4);
    let sfc = single_service_chain(&[3, 2]);

    let mut calculation = ServiceFunctionChainCalculation::new(&topology, &options, &sfc);
    let path = calculation.execute().unwrap();

    assert_eq!(calculation.get_selected_sequence(), Some(&[node(3)][..]));
    assert_eq!(path.edges, edges(&[(1, 3), (3, 4)]));
}
