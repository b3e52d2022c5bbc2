//! Solver-agnostic LP model description.

use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use crate::error::LpResult;

/// Handle to a variable of an [`LpModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId(pub(crate) usize);

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Maximize,
    Minimize,
}

/// Constraint relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Le,
    Ge,
    Eq,
}

/// Sparse linear expression `Σ coeff·var + constant`.
#[derive(Debug, Clone, Default)]
pub struct LinExpr {
    pub terms: Vec<(VarId, f64)>,
    pub constant: f64,
}

impl LinExpr {
    pub fn constant(value: f64) -> Self {
        Self {
            terms: Vec::new(),
            constant: value,
        }
    }

    pub fn term(var: VarId, coeff: f64) -> Self {
        Self {
            terms: vec![(var, coeff)],
            constant: 0.0,
        }
    }

    /// Sum of plain variables.
    pub fn sum(vars: impl IntoIterator<Item = VarId>) -> Self {
        Self {
            terms: vars.into_iter().map(|v| (v, 1.0)).collect(),
            constant: 0.0,
        }
    }

    pub fn add_term(&mut self, var: VarId, coeff: f64) {
        self.terms.push((var, coeff));
    }
}

impl From<VarId> for LinExpr {
    fn from(var: VarId) -> Self {
        LinExpr::term(var, 1.0)
    }
}

impl Add for LinExpr {
    type Output = LinExpr;
    fn add(mut self, rhs: LinExpr) -> LinExpr {
        self += rhs;
        self
    }
}

impl AddAssign for LinExpr {
    fn add_assign(&mut self, rhs: LinExpr) {
        self.terms.extend(rhs.terms);
        self.constant += rhs.constant;
    }
}

impl Sub for LinExpr {
    type Output = LinExpr;
    fn sub(mut self, rhs: LinExpr) -> LinExpr {
        self -= rhs;
        self
    }
}

impl SubAssign for LinExpr {
    fn sub_assign(&mut self, rhs: LinExpr) {
        self.terms
            .extend(rhs.terms.into_iter().map(|(v, c)| (v, -c)));
        self.constant -= rhs.constant;
    }
}

impl Neg for LinExpr {
    type Output = LinExpr;
    fn neg(mut self) -> LinExpr {
        for (_, c) in &mut self.terms {
            *c = -*c;
        }
        self.constant = -self.constant;
        self
    }
}

impl Mul<f64> for LinExpr {
    type Output = LinExpr;
    fn mul(mut self, rhs: f64) -> LinExpr {
        for (_, c) in &mut self.terms {
            *c *= rhs;
        }
        self.constant *= rhs;
        self
    }
}

#[derive(Debug, Clone)]
pub(crate) struct VarSpec {
    pub name: String,
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, Clone)]
pub(crate) struct LpConstraint {
    pub expr: LinExpr,
    pub relation: Relation,
}

/// A complete LP: named bounded continuous variables, linear
/// constraints, one linear objective.
#[derive(Debug, Clone)]
pub struct LpModel {
    pub(crate) vars: Vec<VarSpec>,
    pub(crate) constraints: Vec<LpConstraint>,
    pub(crate) objective: LinExpr,
    pub(crate) sense: Sense,
}

impl LpModel {
    pub fn new() -> Self {
        Self {
            vars: Vec::new(),
            constraints: Vec::new(),
            objective: LinExpr::default(),
            sense: Sense::Maximize,
        }
    }

    /// Add one continuous variable; infinite bounds mean free.
    pub fn add_var(&mut self, name: impl Into<String>, lower: f64, upper: f64) -> VarId {
        let id = VarId(self.vars.len());
        self.vars.push(VarSpec {
            name: name.into(),
            lower,
            upper,
        });
        id
    }

    /// Add `count` variables sharing bounds, named `name[i]`.
    pub fn add_vector(
        &mut self,
        name: &str,
        count: usize,
        lower: f64,
        upper: f64,
    ) -> Vec<VarId> {
        (0..count)
            .map(|i| self.add_var(format!("{name}[{i}]"), lower, upper))
            .collect()
    }

    /// Add an n × n matrix of variables sharing bounds, row-major.
    pub fn add_matrix(&mut self, name: &str, n: usize, lower: f64, upper: f64) -> Vec<Vec<VarId>> {
        (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| self.add_var(format!("{name}[{i},{j}]"), lower, upper))
                    .collect()
            })
            .collect()
    }

    /// Constrain `expr relation 0` (fold the right-hand side into the
    /// expression's constant).
    pub fn add_constraint(&mut self, expr: LinExpr, relation: Relation) {
        self.constraints.push(LpConstraint { expr, relation });
    }

    pub fn set_objective(&mut self, objective: LinExpr, sense: Sense) {
        self.objective = objective;
        self.sense = sense;
    }

    pub fn num_vars(&self) -> usize {
        self.vars.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn var_name(&self, var: VarId) -> &str {
        &self.vars[var.0].name
    }
}

impl Default for LpModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Variable values of an optimal solution.
#[derive(Debug, Clone)]
pub struct LpSolution {
    pub(crate) values: Vec<f64>,
    pub(crate) objective: f64,
}

impl LpSolution {
    pub fn value(&self, var: VarId) -> f64 {
        self.values[var.0]
    }

    pub fn objective(&self) -> f64 {
        self.objective
    }
}

/// A concrete LP backend. Implementations must be stateless per call so
/// independent solves can run concurrently.
pub trait LpSolve: Sync {
    fn solve(&self, model: &LpModel) -> LpResult<LpSolution>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expression_algebra() {
        let mut model = LpModel::new();
        let x = model.add_var("x", 0.0, 10.0);
        let y = model.add_var("y", 0.0, 10.0);

        let expr = (LinExpr::from(x) * 2.0 + LinExpr::term(y, -1.0)) - LinExpr::constant(5.0);
        assert_eq!(expr.constant, -5.0);
        assert_eq!(expr.terms, vec![(x, 2.0), (y, -1.0)]);

        let negated = -expr;
        assert_eq!(negated.constant, 5.0);
        assert_eq!(negated.terms, vec![(x, -2.0), (y, 1.0)]);
    }

    #[test]
    fn vector_and_matrix_naming() {
        let mut model = LpModel::new();
        let v = model.add_vector("np", 3, 0.0, 1.0);
        let m = model.add_matrix("flow", 2, 0.0, 1.0);
        assert_eq!(model.var_name(v[2]), "np[2]");
        assert_eq!(model.var_name(m[1][0]), "flow[1,0]");
        assert_eq!(model.num_vars(), 7);
    }
}
