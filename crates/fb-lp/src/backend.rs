//! Translation of an [`LpModel`] to the `good_lp` minilp backend.

use good_lp::{
    constraint, default_solver, Expression, ProblemVariables, ResolutionError, Solution,
    SolverModel, Variable,
};

use crate::error::{LpError, LpResult};
use crate::model::{LinExpr, LpModel, LpSolution, LpSolve, Relation, Sense, VarId};

/// Pure-Rust simplex backend (minilp via `good_lp`).
///
/// Builds a fresh solver problem per call; no shared solver context.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinilpBackend;

impl MinilpBackend {
    pub fn new() -> Self {
        Self
    }

    fn translate(expr: &LinExpr, vars: &[Variable]) -> Expression {
        let mut out = Expression::from(expr.constant);
        for &(VarId(i), coeff) in &expr.terms {
            out += coeff * vars[i];
        }
        out
    }
}

impl LpSolve for MinilpBackend {
    fn solve(&self, model: &LpModel) -> LpResult<LpSolution> {
        if model.num_vars() == 0 {
            return Err(LpError::InvalidModel {
                what: "model has no variables".into(),
            });
        }
        for spec in &model.vars {
            if spec.lower > spec.upper {
                return Err(LpError::InvalidModel {
                    what: format!(
                        "variable {} has empty bounds [{}, {}]",
                        spec.name, spec.lower, spec.upper
                    ),
                });
            }
        }

        let mut problem = ProblemVariables::new();
        let vars: Vec<Variable> = model
            .vars
            .iter()
            .map(|spec| {
                let mut def = good_lp::variable();
                if spec.lower.is_finite() {
                    def = def.min(spec.lower);
                }
                if spec.upper.is_finite() {
                    def = def.max(spec.upper);
                }
                problem.add(def)
            })
            .collect();

        let objective = Self::translate(&model.objective, &vars);
        let mut solver = match model.sense {
            Sense::Maximize => problem.maximise(objective).using(default_solver),
            Sense::Minimize => problem.minimise(objective).using(default_solver),
        };

        for c in &model.constraints {
            let lhs = Self::translate(&c.expr, &vars);
            let built = match c.relation {
                Relation::Le => constraint::leq(lhs, 0.0),
                Relation::Ge => constraint::geq(lhs, 0.0),
                Relation::Eq => constraint::eq(lhs, 0.0),
            };
            solver = solver.with(built);
        }

        tracing::debug!(
            vars = model.num_vars(),
            constraints = model.num_constraints(),
            "solving LP"
        );
        let solution = solver.solve().map_err(|e| match e {
            ResolutionError::Infeasible => LpError::Infeasible,
            ResolutionError::Unbounded => LpError::Unbounded,
            ResolutionError::Other(what) => LpError::Numerical { what: what.into() },
            ResolutionError::Str(what) => LpError::Numerical { what },
        })?;

        let values: Vec<f64> = vars.iter().map(|&v| solution.value(v)).collect();
        let objective = {
            let mut total = model.objective.constant;
            for &(VarId(i), coeff) in &model.objective.terms {
                total += coeff * values[i];
            }
            total
        };
        Ok(LpSolution { values, objective })
    }
}
