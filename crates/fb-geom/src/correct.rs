//! Capacity correction for exchange outside the plot plane.

use fb_core::{Real, ZoneIndex};
use fb_data::{ConstraintTable, ExchangeTable, ProjectionAxes, RAM_FLOOR};

use crate::error::GeomResult;

/// Non-fatal record of what the corrector changed.
#[derive(Debug, Clone, Default)]
pub struct CorrectionReport {
    /// Directed pairs (as `from>to` strings) whose exchange shifted the
    /// capacities.
    pub applied_pairs: Vec<String>,
    /// Rows whose corrected RAM fell below the floor and was clamped.
    pub floored_rows: Vec<usize>,
}

impl CorrectionReport {
    pub fn is_noop(&self) -> bool {
        self.applied_pairs.is_empty() && self.floored_rows.is_empty()
    }
}

/// Re-center each row's RAM for commercial exchange that the chosen 2D
/// plane does not depict.
///
/// For every observed directed pair outside the four pairs covering the
/// axes, each row's capacity is reduced by
/// `(ptdf[from] − ptdf[to]) · exchange`, the loading that exchange
/// already places on the branch. Exchange on the axis pairs themselves
/// is what the plot plots and is left alone, so a table containing only
/// in-plane pairs is an exact no-op.
pub fn correct_for_out_of_plane(
    table: &ConstraintTable,
    exchange: &ExchangeTable,
    axes: &ProjectionAxes,
    zones: &ZoneIndex,
) -> GeomResult<(ConstraintTable, CorrectionReport)> {
    let in_plane = axes.directed_cover();
    let mut report = CorrectionReport::default();
    let mut shift = vec![0.0 as Real; table.len()];

    for obs in exchange.observations() {
        let pair = obs.pair();
        if in_plane.contains(&pair) {
            continue;
        }
        let from = zones.require(&obs.from)?;
        let to = zones.require(&obs.to)?;
        for (r, row) in table.rows().iter().enumerate() {
            shift[r] += (row.ptdf[from] - row.ptdf[to]) * obs.value;
        }
        report.applied_pairs.push(pair.to_string());
    }

    let mut corrected = table.with_ram_shift(&shift);
    report.floored_rows = corrected.floor_ram(RAM_FLOOR);
    if !report.floored_rows.is_empty() {
        tracing::warn!(
            rows = report.floored_rows.len(),
            "out-of-plane correction pushed RAM below the floor"
        );
    }
    Ok((corrected, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fb_core::{Zone, ZonePair};
    use fb_data::{ConstraintRow, ExchangeObservation};

    fn zone_index() -> ZoneIndex {
        ZoneIndex::from_ordered(vec![
            Zone::from("A"),
            Zone::from("B"),
            Zone::from("C"),
            Zone::from("D"),
        ])
        .unwrap()
    }

    fn table(zones: &ZoneIndex) -> ConstraintTable {
        let rows = vec![
            ConstraintRow {
                branch: "l1".into(),
                outage: "basecase".into(),
                tso: "TSO".into(),
                ptdf: vec![0.5, -0.5, 0.2, 0.0],
                ram: 100.0,
                iva: 0.0,
                iva_adjusted: false,
            },
            ConstraintRow {
                branch: "l2".into(),
                outage: "basecase".into(),
                tso: "TSO".into(),
                ptdf: vec![0.0, 0.3, -0.3, 0.1],
                ram: 80.0,
                iva: 0.0,
                iva_adjusted: false,
            },
        ];
        ConstraintTable::new(rows, zones).unwrap()
    }

    fn axes() -> ProjectionAxes {
        ProjectionAxes::new(ZonePair::new("A", "B"), ZonePair::new("B", "C"))
    }

    #[test]
    fn in_plane_exchange_is_a_noop() {
        let zones = zone_index();
        let table = table(&zones);
        let exchange = ExchangeTable::new(
            vec![
                ExchangeObservation {
                    from: Zone::from("A"),
                    to: Zone::from("B"),
                    value: 500.0,
                },
                ExchangeObservation {
                    from: Zone::from("C"),
                    to: Zone::from("B"),
                    value: 200.0,
                },
            ],
            &zones,
        )
        .unwrap();
        let (corrected, report) = correct_for_out_of_plane(&table, &exchange, &axes(), &zones).unwrap();
        assert!(report.is_noop());
        assert_eq!(corrected.row(0).ram, 100.0);
        assert_eq!(corrected.row(1).ram, 80.0);
    }

    #[test]
    fn out_of_plane_exchange_shifts_ram() {
        let zones = zone_index();
        let table = table(&zones);
        let exchange = ExchangeTable::new(
            vec![ExchangeObservation {
                from: Zone::from("C"),
                to: Zone::from("D"),
                value: 100.0,
            }],
            &zones,
        )
        .unwrap();
        let (corrected, report) = correct_for_out_of_plane(&table, &exchange, &axes(), &zones).unwrap();
        assert_eq!(report.applied_pairs, vec!["C>D".to_string()]);
        // row 0: (0.2 - 0.0) * 100 = 20
        assert_eq!(corrected.row(0).ram, 80.0);
        // row 1: (-0.3 - 0.1) * 100 = -40
        assert_eq!(corrected.row(1).ram, 120.0);
    }

    #[test]
    fn floored_rows_are_reported_not_dropped() {
        let zones = zone_index();
        let table = table(&zones);
        let exchange = ExchangeTable::new(
            vec![ExchangeObservation {
                from: Zone::from("C"),
                to: Zone::from("D"),
                value: 1000.0,
            }],
            &zones,
        )
        .unwrap();
        let (corrected, report) = correct_for_out_of_plane(&table, &exchange, &axes(), &zones).unwrap();
        // row 0 shift = 200 > 100, floored
        assert_eq!(report.floored_rows, vec![0]);
        assert_eq!(corrected.row(0).ram, RAM_FLOOR);
        assert_eq!(corrected.len(), table.len());
    }
}
