//! Named coefficients of the allocation model.

use fb_core::Real;
use fb_data::CoupledGroups;

/// Weights and bounds of the ELI LP.
///
/// Slack penalties dominate the alpha reward so the solver
/// lexicographically minimizes slack usage before maximizing the
/// flow-based capacity share.
#[derive(Debug, Clone)]
pub struct EliConfig {
    /// Objective weight on per-row capacity slack.
    pub capacity_slack_weight: Real,
    /// Objective weight on flow-matching slack (both signs).
    pub flow_slack_weight: Real,
    /// Objective weight on net-position balancing slack (both signs).
    pub netpos_slack_weight: Real,
    /// Objective reward on Alpha.
    pub alpha_reward: Real,
    /// Upper bound on per-row capacity slack.
    pub capacity_slack_max: Real,
    /// Upper bound on each sign of the net-position slack.
    pub netpos_slack_max: Real,
    /// Upper bound on each sign of the flow-matching slack.
    pub flow_slack_max: Real,
    /// Capacity slack above this value enters the relaxation record.
    pub materiality_threshold: Real,
    /// Zone groups with their own zero-sum balance (hybrid
    /// interconnector virtual zones).
    pub coupled_groups: CoupledGroups,
}

impl Default for EliConfig {
    fn default() -> Self {
        Self {
            capacity_slack_weight: 1_000.0,
            flow_slack_weight: 1.0,
            netpos_slack_weight: 1.0,
            alpha_reward: 1_000.0,
            capacity_slack_max: 100.0,
            netpos_slack_max: 10.0,
            flow_slack_max: 1e-2,
            materiality_threshold: 1e-2,
            coupled_groups: CoupledGroups::default(),
        }
    }
}
