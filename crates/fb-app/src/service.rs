//! Request orchestration over the geometry and allocation backends.

use fb_core::Real;
use fb_data::ProjectionAxes;
use fb_eli::{
    decompose_exchange, trace_lta_boundary, AllocationResult, EliConfig, TraceConfig,
};
use fb_geom::{build_domain_geometry, DomainConfig, DomainGeometry, LineGenConfig};
use fb_lp::LpSolve;
use rayon::prelude::*;

use crate::error::AppResult;
use crate::snapshot::MarketSnapshot;

/// How the domain's capacities are re-centered onto an operating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorrectionMode {
    /// Plot the raw domain around the zero-exchange point.
    #[default]
    Raw,
    /// Correct for the observed out-of-plane commercial exchange.
    Observed,
    /// Correct for the flow-based component of the exchange, as
    /// decomposed by the allocation model.
    FlowBased,
}

/// Options for one domain request.
#[derive(Debug, Clone, Default)]
pub struct DomainOptions {
    pub correction: CorrectionMode,
    pub lines: LineGenConfig,
    /// Trace the LTA region and overlay it (expands the viewport).
    pub lta_overlay: bool,
    pub trace: TraceConfig,
    pub eli: EliConfig,
}

/// One (axes, options) domain request against a shared snapshot.
#[derive(Debug, Clone)]
pub struct DomainRequest {
    pub axes: ProjectionAxes,
    pub options: DomainOptions,
}

/// Everything one domain request produces.
#[derive(Debug, Clone)]
pub struct DomainResponse {
    pub geometry: DomainGeometry,
    /// Closed LTA overlay polygon, when requested.
    pub overlay: Option<Vec<[Real; 2]>>,
    /// Allocation solve backing the FB-only correction, when one ran.
    pub allocation: Option<AllocationResult>,
}

/// The snapshot's coupled groups override whatever the caller left in
/// the ELI config, so virtual-zone balance always matches the data.
fn effective_eli_config(snapshot: &MarketSnapshot, base: &EliConfig) -> EliConfig {
    EliConfig {
        coupled_groups: snapshot.coupled_groups.clone(),
        ..base.clone()
    }
}

/// Decompose the snapshot's observed outcome into FB and LTA components.
pub fn decompose(
    snapshot: &MarketSnapshot,
    config: &EliConfig,
    solver: &dyn LpSolve,
) -> AppResult<AllocationResult> {
    let config = effective_eli_config(snapshot, config);
    Ok(decompose_exchange(
        &snapshot.constraints,
        &snapshot.lta,
        &snapshot.zones,
        &snapshot.mcp,
        &snapshot.exchange,
        &config,
        solver,
    )?)
}

/// Trace the LTA-only feasible region in the given plane.
pub fn trace_overlay(
    snapshot: &MarketSnapshot,
    axes: &ProjectionAxes,
    config: &TraceConfig,
    solver: &dyn LpSolve,
) -> AppResult<Vec<[Real; 2]>> {
    Ok(trace_lta_boundary(
        &snapshot.lta,
        &snapshot.zones,
        axes,
        config,
        solver,
    )?)
}

/// Compute one complete domain cross-section.
pub fn compute_domain(
    snapshot: &MarketSnapshot,
    request: &DomainRequest,
    solver: &dyn LpSolve,
) -> AppResult<DomainResponse> {
    let options = &request.options;

    let overlay = if options.lta_overlay {
        Some(trace_overlay(snapshot, &request.axes, &options.trace, solver)?)
    } else {
        None
    };

    let mut allocation = None;
    let exchange_view = match options.correction {
        CorrectionMode::Raw => None,
        CorrectionMode::Observed => Some(snapshot.exchange.clone()),
        CorrectionMode::FlowBased => {
            let result = decompose(snapshot, &options.eli, solver)?;
            let fb = result.fb_exchange(&snapshot.zones)?;
            allocation = Some(result);
            Some(fb)
        }
    };

    let config = DomainConfig {
        lines: options.lines,
        overlay: overlay.clone(),
    };
    let geometry = build_domain_geometry(
        &snapshot.constraints,
        &snapshot.zones,
        &request.axes,
        exchange_view.as_ref(),
        &config,
    )?;

    Ok(DomainResponse {
        geometry,
        overlay,
        allocation,
    })
}

/// Compute several independent domain requests against one snapshot.
///
/// Requests run on the rayon pool; each result (or error) is returned in
/// request order, so one degenerate plane does not fail the batch.
pub fn compute_domains(
    snapshot: &MarketSnapshot,
    requests: &[DomainRequest],
    solver: &dyn LpSolve,
) -> Vec<AppResult<DomainResponse>> {
    requests
        .par_iter()
        .map(|request| compute_domain(snapshot, request, solver))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fb_core::ZonePair;
    use fb_lp::MinilpBackend;

    fn snapshot() -> MarketSnapshot {
        MarketSnapshot::from_json_str(
            r#"{
                "mtu": "2026-08-20T10:00:00Z",
                "zones": ["A", "B", "C"],
                "constraints": [
                    {"branch": "l0", "outage": "basecase", "tso": "T",
                     "ptdf": [1.0, -1.0, 0.0], "ram": 10.0},
                    {"branch": "l1", "outage": "basecase", "tso": "T",
                     "ptdf": [0.0, 1.0, -1.0], "ram": 10.0},
                    {"branch": "l2", "outage": "basecase", "tso": "T",
                     "ptdf": [-1.0, 0.0, 1.0], "ram": 10.0}
                ],
                "lta": [{"from": "A", "to": "B", "limit": 100.0}],
                "mcp": {"A": 5.0, "B": -5.0, "C": 0.0},
                "exchange": [{"from": "A", "to": "B", "value": 5.0}]
            }"#,
        )
        .unwrap()
    }

    fn axes() -> ProjectionAxes {
        ProjectionAxes::new(ZonePair::new("A", "B"), ZonePair::new("B", "C"))
    }

    #[test]
    fn raw_domain_has_no_allocation() {
        let response = compute_domain(
            &snapshot(),
            &DomainRequest {
                axes: axes(),
                options: DomainOptions::default(),
            },
            &MinilpBackend::new(),
        )
        .unwrap();
        assert!(response.allocation.is_none());
        assert!(response.overlay.is_none());
        assert_eq!(response.geometry.polygon.len(), 4);
    }

    #[test]
    fn fb_correction_runs_the_allocation() {
        let response = compute_domain(
            &snapshot(),
            &DomainRequest {
                axes: axes(),
                options: DomainOptions {
                    correction: CorrectionMode::FlowBased,
                    ..Default::default()
                },
            },
            &MinilpBackend::new(),
        )
        .unwrap();
        let allocation = response.allocation.as_ref().unwrap();
        assert!(allocation.alpha > 0.99);
        // the A>B exchange lies in the plot plane, so the correction is
        // a no-op on the capacities
        assert!(response.geometry.correction.applied_pairs.is_empty());
    }

    #[test]
    fn batch_keeps_request_order_and_isolates_failures() {
        let snapshot = snapshot();
        let requests = vec![
            DomainRequest {
                axes: axes(),
                options: DomainOptions::default(),
            },
            // an axis naming an unknown zone must fail alone
            DomainRequest {
                axes: ProjectionAxes::new(ZonePair::new("A", "X"), ZonePair::new("B", "C")),
                options: DomainOptions::default(),
            },
        ];
        let results = compute_domains(&snapshot, &requests, &MinilpBackend::new());
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }

    #[test]
    fn overlay_request_returns_closed_polygon() {
        let response = compute_domain(
            &snapshot(),
            &DomainRequest {
                axes: axes(),
                options: DomainOptions {
                    lta_overlay: true,
                    ..Default::default()
                },
            },
            &MinilpBackend::new(),
        )
        .unwrap();
        let overlay = response.overlay.unwrap();
        assert!(!overlay.is_empty());
        assert_eq!(overlay.first(), overlay.last());
    }
}
