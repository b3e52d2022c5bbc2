//! The extended-LTA-inclusion allocation LP.

use fb_core::{Real, ZoneIndex, ZonePair};
use fb_data::{BorderLimits, ConstraintTable, ExchangeTable, NetPositions, RAM_FLOOR};
use fb_lp::{LinExpr, LpModel, LpSolve, Relation, Sense, VarId};

use crate::config::EliConfig;
use crate::error::EliResult;
use crate::result::{
    AllocationResult, CapacityRelaxation, FlowDecomposition, NetPosDecomposition,
};

/// Decompose observed net positions and exchange into flow-based and
/// long-term-allocation components.
///
/// Builds one LP over per-zone net positions, a full zone×zone flow
/// matrix, their FB/LTA components, the split ratio Alpha and bounded
/// slack variables, then maximizes `Alpha·W_alpha − Σ slack·W_slack`
/// with slack penalties dominating: the solver first minimizes slack
/// usage, then pushes the flow-based capacity share as high as the data
/// permits.
pub fn decompose_exchange(
    table: &ConstraintTable,
    lta: &BorderLimits,
    zones: &ZoneIndex,
    mcp: &NetPositions,
    exchange: &ExchangeTable,
    config: &EliConfig,
    solver: &dyn LpSolve,
) -> EliResult<AllocationResult> {
    let mut table = table.clone();
    table.floor_ram(RAM_FLOOR);

    let n = zones.len();
    let rows = table.len();
    let inf = Real::INFINITY;

    let mut model = LpModel::new();
    let netpos = model.add_vector("NetPos", n, -inf, inf);
    let netpos_fb = model.add_vector("NetPosFB", n, -inf, inf);
    let netpos_lta = model.add_vector("NetPosLTA", n, -inf, inf);
    let flow = model.add_matrix("Flow", n, -inf, inf);
    let flow_fb = model.add_matrix("FlowFB", n, 0.0, inf);
    let flow_lta = model.add_matrix("FlowLTA", n, 0.0, inf);
    let alpha = model.add_var("Alpha", 0.0, 1.0);
    let slack_cap = model.add_vector("SlackCap", rows, 0.0, config.capacity_slack_max);
    let slack_np_pos = model.add_vector("SlackNPPos", n, 0.0, config.netpos_slack_max);
    let slack_np_neg = model.add_vector("SlackNPNeg", n, 0.0, config.netpos_slack_max);
    let slack_flow_pos = model.add_matrix("SlackFlowPos", n, 0.0, config.flow_slack_max);
    let slack_flow_neg = model.add_matrix("SlackFlowNeg", n, 0.0, config.flow_slack_max);

    // Composition: NetPos = NetPosFB + NetPosLTA + slack, Flow = FB + LTA.
    for z in 0..n {
        let mut expr = LinExpr::from(netpos[z]);
        expr -= LinExpr::from(netpos_fb[z]);
        expr -= LinExpr::from(netpos_lta[z]);
        expr -= LinExpr::from(slack_np_pos[z]);
        expr += LinExpr::from(slack_np_neg[z]);
        model.add_constraint(expr, Relation::Eq);
        for zz in 0..n {
            let mut expr = LinExpr::from(flow[z][zz]);
            expr -= LinExpr::from(flow_fb[z][zz]);
            expr -= LinExpr::from(flow_lta[z][zz]);
            model.add_constraint(expr, Relation::Eq);
        }
    }

    // Flow conservation, with the matching slack folded into the FB side.
    for z in 0..n {
        let mut fb = LinExpr::from(netpos_fb[z]);
        let mut lta_expr = LinExpr::from(netpos_lta[z]);
        for zz in 0..n {
            if zz == z {
                continue;
            }
            fb -= LinExpr::from(flow_fb[z][zz]);
            fb += LinExpr::from(flow_fb[zz][z]);
            fb -= LinExpr::from(slack_flow_pos[z][zz]);
            fb += LinExpr::from(slack_flow_pos[zz][z]);
            fb += LinExpr::from(slack_flow_neg[z][zz]);
            fb -= LinExpr::from(slack_flow_neg[zz][z]);
            lta_expr -= LinExpr::from(flow_lta[z][zz]);
            lta_expr += LinExpr::from(flow_lta[zz][z]);
        }
        model.add_constraint(fb, Relation::Eq);
        model.add_constraint(lta_expr, Relation::Eq);
    }

    // Capacity: ptdf · NetPosFB <= Alpha·RAM + slack, per row.
    for r in 0..rows {
        let row = table.row(r);
        let mut expr = LinExpr::default();
        for z in 0..n {
            expr.add_term(netpos_fb[z], row.ptdf[z]);
        }
        expr.add_term(alpha, -row.ram);
        expr.add_term(slack_cap[r], -1.0);
        model.add_constraint(expr, Relation::Le);
    }

    // Market balance, globally and per coupled group.
    model.add_constraint(LinExpr::sum(netpos.iter().copied()), Relation::Eq);
    model.add_constraint(LinExpr::sum(netpos_fb.iter().copied()), Relation::Eq);
    model.add_constraint(LinExpr::sum(netpos_lta.iter().copied()), Relation::Eq);
    for group in config.coupled_groups.indices(zones)? {
        model.add_constraint(
            LinExpr::sum(group.iter().map(|&z| netpos[z])),
            Relation::Eq,
        );
        model.add_constraint(
            LinExpr::sum(group.iter().map(|&z| netpos_lta[z])),
            Relation::Eq,
        );
    }

    // LTA bound: FlowLTA <= (1 − Alpha)·limit where defined, else 0.
    for z in 0..n {
        for zz in 0..n {
            if z == zz {
                continue;
            }
            let pair = ZonePair::new(zones.zone(z).clone(), zones.zone(zz).clone());
            let mut expr = LinExpr::from(flow_lta[z][zz]);
            if lta.is_defined(&pair) {
                let limit = lta.limit(&pair);
                expr.add_term(alpha, limit);
                expr.constant -= limit;
            }
            model.add_constraint(expr, Relation::Le);
        }
    }

    // Data matching: net positions fixed to the MCP; flows matched to
    // observations with slack tolerance, unobserved directions <= 0.
    for z in 0..n {
        let mut expr = LinExpr::from(netpos[z]);
        expr.constant -= mcp.value(z);
        model.add_constraint(expr, Relation::Eq);
        for zz in 0..n {
            if z == zz {
                continue;
            }
            let pair = ZonePair::new(zones.zone(z).clone(), zones.zone(zz).clone());
            match exchange.value(&pair) {
                Some(observed) => {
                    let mut expr = LinExpr::from(flow[z][zz]);
                    expr.constant -= observed;
                    expr -= LinExpr::from(slack_flow_pos[z][zz]);
                    expr += LinExpr::from(slack_flow_neg[z][zz]);
                    model.add_constraint(expr, Relation::Ge);
                    // negative slack can never exceed the observation
                    let mut bound = LinExpr::from(slack_flow_neg[z][zz]);
                    bound.constant -= observed;
                    model.add_constraint(bound, Relation::Le);
                }
                None => {
                    model.add_constraint(LinExpr::from(flow[z][zz]), Relation::Le);
                }
            }
        }
    }

    // Objective: slack penalties dominate the alpha reward.
    let mut objective = LinExpr::term(alpha, config.alpha_reward);
    for &s in &slack_cap {
        objective.add_term(s, -config.capacity_slack_weight);
    }
    for z in 0..n {
        objective.add_term(slack_np_pos[z], -config.netpos_slack_weight);
        objective.add_term(slack_np_neg[z], -config.netpos_slack_weight);
        for zz in 0..n {
            objective.add_term(slack_flow_pos[z][zz], -config.flow_slack_weight);
            objective.add_term(slack_flow_neg[z][zz], -config.flow_slack_weight);
        }
    }
    model.set_objective(objective, Sense::Maximize);

    tracing::debug!(
        zones = n,
        rows,
        vars = model.num_vars(),
        constraints = model.num_constraints(),
        "solving allocation LP"
    );
    let solution = solver.solve(&model)?;

    extract_result(
        &solution,
        &table,
        lta,
        zones,
        mcp,
        exchange,
        config,
        Extracted {
            netpos,
            netpos_fb,
            netpos_lta,
            flow,
            flow_fb,
            flow_lta,
            alpha,
            slack_cap,
            slack_np_pos,
            slack_np_neg,
            slack_flow_pos,
            slack_flow_neg,
        },
    )
}

struct Extracted {
    netpos: Vec<VarId>,
    netpos_fb: Vec<VarId>,
    netpos_lta: Vec<VarId>,
    flow: Vec<Vec<VarId>>,
    flow_fb: Vec<Vec<VarId>>,
    flow_lta: Vec<Vec<VarId>>,
    alpha: VarId,
    slack_cap: Vec<VarId>,
    slack_np_pos: Vec<VarId>,
    slack_np_neg: Vec<VarId>,
    slack_flow_pos: Vec<Vec<VarId>>,
    slack_flow_neg: Vec<Vec<VarId>>,
}

#[allow(clippy::too_many_arguments)]
fn extract_result(
    solution: &fb_lp::LpSolution,
    table: &ConstraintTable,
    lta: &BorderLimits,
    zones: &ZoneIndex,
    mcp: &NetPositions,
    exchange: &ExchangeTable,
    config: &EliConfig,
    vars: Extracted,
) -> EliResult<AllocationResult> {
    let alpha = solution.value(vars.alpha);

    let mut flows = Vec::with_capacity(exchange.len());
    for obs in exchange.observations() {
        let pair = obs.pair();
        let (z, zz) = zones
            .pair_indices(&pair)
            .map_err(fb_data::DataError::from)?;
        flows.push(FlowDecomposition {
            observed: obs.value,
            total: solution.value(vars.flow[z][zz]),
            fb: solution.value(vars.flow_fb[z][zz]),
            lta: solution.value(vars.flow_lta[z][zz]),
            lta_limit: lta.limit(&pair),
            slack_pos: solution.value(vars.slack_flow_pos[z][zz]),
            slack_neg: solution.value(vars.slack_flow_neg[z][zz]),
            pair,
        });
    }

    let net_positions = zones
        .iter()
        .map(|(z, zone)| NetPosDecomposition {
            zone: zone.clone(),
            mcp: mcp.value(z),
            total: solution.value(vars.netpos[z]),
            fb: solution.value(vars.netpos_fb[z]),
            lta: solution.value(vars.netpos_lta[z]),
            slack: solution.value(vars.slack_np_pos[z]) - solution.value(vars.slack_np_neg[z]),
        })
        .collect();

    let mut relaxations = Vec::new();
    let mut total_capacity_slack = 0.0;
    for (r, &s) in vars.slack_cap.iter().enumerate() {
        let used = solution.value(s);
        total_capacity_slack += used;
        if used > config.materiality_threshold {
            let row = table.row(r);
            relaxations.push(CapacityRelaxation {
                row: r,
                branch: row.branch.clone(),
                outage: row.outage.clone(),
                slack: used,
                relaxed_ram: row.ram + used,
            });
        }
    }
    if !relaxations.is_empty() {
        tracing::warn!(
            rows = relaxations.len(),
            total_capacity_slack,
            "capacities had to be relaxed to fit the observed outcome"
        );
    }

    Ok(AllocationResult {
        flows,
        net_positions,
        alpha,
        relaxations,
        total_capacity_slack,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EliError;
    use fb_core::Zone;
    use fb_data::{BorderLimit, ConstraintRow, ExchangeObservation};
    use fb_lp::MinilpBackend;
    use std::collections::HashMap;

    fn zone_index() -> ZoneIndex {
        ZoneIndex::from_ordered(vec![Zone::from("A"), Zone::from("B"), Zone::from("C")]).unwrap()
    }

    fn triangle_table(zones: &ZoneIndex, ram: Real) -> ConstraintTable {
        let ptdf = [
            [1.0, -1.0, 0.0],
            [0.0, 1.0, -1.0],
            [-1.0, 0.0, 1.0],
        ];
        let rows = ptdf
            .iter()
            .enumerate()
            .map(|(i, coeffs)| ConstraintRow {
                branch: format!("l{i}"),
                outage: "basecase".into(),
                tso: "TSO".into(),
                ptdf: coeffs.to_vec(),
                ram,
                iva: 0.0,
                iva_adjusted: false,
            })
            .collect();
        ConstraintTable::new(rows, zones).unwrap()
    }

    fn mcp(zones: &ZoneIndex, values: [Real; 3]) -> NetPositions {
        let map: HashMap<Zone, Real> = zones
            .zones()
            .iter()
            .cloned()
            .zip(values)
            .collect();
        NetPositions::new(map, zones).unwrap()
    }

    fn borders(zones: &ZoneIndex, entries: &[(&str, &str, Real)]) -> BorderLimits {
        let entries = entries
            .iter()
            .map(|&(f, t, limit)| BorderLimit {
                from: Zone::from(f),
                to: Zone::from(t),
                limit,
            })
            .collect();
        BorderLimits::new(entries, zones).unwrap()
    }

    fn exchange(zones: &ZoneIndex, entries: &[(&str, &str, Real)]) -> ExchangeTable {
        let entries = entries
            .iter()
            .map(|&(f, t, value)| ExchangeObservation {
                from: Zone::from(f),
                to: Zone::from(t),
                value,
            })
            .collect();
        ExchangeTable::new(entries, zones).unwrap()
    }

    #[test]
    fn exactly_feasible_outcome_gives_alpha_one_and_no_slack() {
        let zones = zone_index();
        // mcp [5, -5, 0] loads row 0 with exactly its RAM at alpha 1
        let table = triangle_table(&zones, 10.0);
        let lta = borders(&zones, &[("A", "B", 100.0)]);
        let mcp = mcp(&zones, [5.0, -5.0, 0.0]);
        let exchange = exchange(&zones, &[("A", "B", 5.0)]);

        let result = decompose_exchange(
            &table,
            &lta,
            &zones,
            &mcp,
            &exchange,
            &EliConfig::default(),
            &MinilpBackend::new(),
        )
        .unwrap();

        assert!((result.alpha - 1.0).abs() < 1e-4, "alpha = {}", result.alpha);
        assert!(result.total_capacity_slack < 1e-4);
        assert!(result.relaxations.is_empty());
        for f in &result.flows {
            assert!(f.slack_pos.abs() < 1e-4);
            assert!(f.slack_neg.abs() < 1e-4);
            assert!((f.fb + f.lta - f.total).abs() < 1e-6);
        }
        for np in &result.net_positions {
            assert!((np.total - np.mcp).abs() < 1e-6);
            assert!((np.fb + np.lta + np.slack - np.total).abs() < 1e-6);
        }
    }

    #[test]
    fn overloaded_outcome_is_split_between_lta_and_capacity_slack() {
        let zones = zone_index();
        // mcp [20, -20, 0] exceeds the 10 MW row-0 capacity; the surplus
        // must come out of the A->B long-term allocation.
        let table = triangle_table(&zones, 10.0);
        let lta = borders(&zones, &[("A", "B", 40.0)]);
        let mcp = mcp(&zones, [20.0, -20.0, 0.0]);
        let exchange = exchange(&zones, &[("A", "B", 20.0)]);

        let result = decompose_exchange(
            &table,
            &lta,
            &zones,
            &mcp,
            &exchange,
            &EliConfig::default(),
            &MinilpBackend::new(),
        )
        .unwrap();

        // binding: 40 - 2L <= 10a with L <= 40(1-a) gives a = 4/7
        assert!((result.alpha - 4.0 / 7.0).abs() < 1e-3, "alpha = {}", result.alpha);
        let ab = &result.flows[0];
        assert!(ab.lta > 1.0, "the LTA must carry part of the exchange");
        assert!(ab.fb + ab.lta >= 20.0 - 1e-3);
        // capacity needs no relaxation: the LTA absorbs the surplus
        assert!(result.total_capacity_slack < 1e-3);
    }

    #[test]
    fn solver_failure_is_surfaced_not_zeroed() {
        let zones = zone_index();
        let table = triangle_table(&zones, 10.0);
        let lta = borders(&zones, &[]);
        // MCP beyond any combination of capacity, LTA and bounded slack
        let mcp = mcp(&zones, [10_000.0, -10_000.0, 0.0]);
        let exchange = exchange(&zones, &[("A", "B", 10_000.0)]);

        let err = decompose_exchange(
            &table,
            &lta,
            &zones,
            &mcp,
            &exchange,
            &EliConfig::default(),
            &MinilpBackend::new(),
        )
        .unwrap_err();
        assert!(matches!(err, EliError::Lp(fb_lp::LpError::Infeasible)));
    }

    #[test]
    fn coupled_group_balance_is_enforced() {
        let zones = ZoneIndex::from_ordered(vec![
            Zone::from("A"),
            Zone::from("B"),
            Zone::from("ALX"),
            Zone::from("ALY"),
        ])
        .unwrap();
        let rows = vec![ConstraintRow {
            branch: "l0".into(),
            outage: "basecase".into(),
            tso: "TSO".into(),
            ptdf: vec![0.5, -0.5, 0.1, -0.1],
            ram: 100.0,
            iva: 0.0,
            iva_adjusted: false,
        }];
        let table = ConstraintTable::new(rows, &zones).unwrap();
        let lta = BorderLimits::new(vec![], &zones).unwrap();
        let map: HashMap<Zone, Real> = [
            (Zone::from("A"), 30.0),
            (Zone::from("B"), -30.0),
            (Zone::from("ALX"), 15.0),
            (Zone::from("ALY"), -15.0),
        ]
        .into_iter()
        .collect();
        let mcp = NetPositions::new(map, &zones).unwrap();
        let exchange = ExchangeTable::new(
            vec![
                ExchangeObservation {
                    from: Zone::from("A"),
                    to: Zone::from("B"),
                    value: 30.0,
                },
                ExchangeObservation {
                    from: Zone::from("ALX"),
                    to: Zone::from("ALY"),
                    value: 15.0,
                },
            ],
            &zones,
        )
        .unwrap();

        let config = EliConfig {
            coupled_groups: fb_data::CoupledGroups::from_prefix(&zones, "AL"),
            ..Default::default()
        };
        let result = decompose_exchange(
            &table,
            &lta,
            &zones,
            &mcp,
            &exchange,
            &config,
            &MinilpBackend::new(),
        )
        .unwrap();

        let group_sum: Real = result
            .net_positions
            .iter()
            .filter(|np| np.zone.as_str().starts_with("AL"))
            .map(|np| np.total)
            .sum();
        assert!(group_sum.abs() < 1e-6);
        assert!((result.alpha - 1.0).abs() < 1e-4);
    }
}
