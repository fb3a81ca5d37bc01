//! Univariate functions `ℝ → ℝ` over a bounded domain (spec.md §3
//! "Univariate functions", §4.1).

use crate::{fuzzy_equals, NumericError, Range};

/// How a [`Function::Stacked`] combines its operands' values at a point.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum StackCombinator {
    /// sum of all operand values
    Sum,
    /// sum of `weight[i] * operand[i].value(x)`
    WeightedSum,
    /// product of all operand values
    Product,
}

/// A univariate real function over a bounded `domain`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Function {
    /// `f(x) = value` for all `x` in `domain`
    Constant {
        /// the domain of definition
        domain: Range<f64>,
        /// the constant value
        value: f64,
    },
    /// `f(x) = intercept + slope * x`
    Linear {
        /// the domain of definition
        domain: Range<f64>,
        /// d f / d x
        slope: f64,
        /// f(0)
        intercept: f64,
    },
    /// `f(x) = a + b*x + c*x^2 + d*x^3`
    Polynomial {
        /// the domain of definition
        domain: Range<f64>,
        /// constant coefficient
        a: f64,
        /// linear coefficient
        b: f64,
        /// quadratic coefficient
        c: f64,
        /// cubic coefficient
        d: f64,
    },
    /// concatenation of sub-functions over contiguous sub-domains, sorted by
    /// the sub-domain's lower bound
    Piecewise {
        /// the pieces, each with its own sub-domain
        pieces: Vec<Function>,
    },
    /// element-wise combination of co-domain-compatible functions sharing a
    /// common sub-domain (the intersection of all operand domains)
    Stacked {
        /// how the operand values are combined
        combinator: StackCombinator,
        /// operand functions (must share a common sub-domain)
        operands: Vec<Function>,
        /// weights, only read when `combinator == WeightedSum`, one per operand
        weights: Vec<f64>,
    },
    /// `inner` reparameterised so its domain starts at `offset` instead of 0
    Sectioned {
        /// the wrapped function, defined over `[0, length]`
        inner: Box<Function>,
        /// where the wrapped function's 0 maps to in the new domain
        offset: f64,
    },
}

impl Function {
    /// Builds a line through `(0, a)` and `(length, b)`, i.e.
    /// `slope = (b - a) / length` (spec.md §4.1
    /// `LinearFunction.ofInclusiveInterceptAndPoint`).
    pub fn of_inclusive_intercept_and_point(a: f64, length: f64, b: f64) -> Function {
        let slope = if length.abs() > 0.0 { (b - a) / length } else { 0.0 };
        Function::Linear { domain: Range::closed(0.0, length), slope, intercept: a }
    }

    /// A constant-zero function over `domain`.
    pub fn zero(domain: Range<f64>) -> Function { Function::Constant { domain, value: 0.0 } }

    /// The function's domain of definition.
    pub fn domain(&self) -> Range<f64> {
        match self {
            Function::Constant { domain, .. }
            | Function::Linear { domain, .. }
            | Function::Polynomial { domain, .. } => *domain,
            Function::Piecewise { pieces } => pieces
                .iter()
                .map(|p| p.domain())
                .reduce(|a, b| a.span(&b))
                .unwrap_or_else(|| Range::closed(0.0, 0.0)),
            Function::Stacked { operands, .. } => operands
                .iter()
                .map(|o| o.domain())
                .reduce(|a, b| a.intersection(&b))
                .unwrap_or_else(|| Range::closed(0.0, 0.0)),
            Function::Sectioned { inner, offset } => inner.domain().shift(*offset),
        }
    }

    /// `f(x)`, failing with `OutOfDomain`/`NonFinite`/`InconsistentDomain` per
    /// spec.md §4.1.
    pub fn value(&self, x: f64) -> Result<f64, NumericError> { self.value_impl(x, 0.0) }

    /// `f(x)` accepting `x` within `tol` of the domain (spec.md §3
    /// `valueFuzzy`).
    pub fn value_fuzzy(&self, x: f64, tol: f64) -> Result<f64, NumericError> {
        self.value_impl(x, tol)
    }

    fn value_impl(&self, x: f64, tol: f64) -> Result<f64, NumericError> {
        if !self.domain().fuzzy_contains(x, tol) {
            return Err(NumericError::OutOfDomain { value: x, range: format!("{:?}", self.domain()) });
        }
        let v = match self {
            Function::Constant { value, .. } => *value,
            Function::Linear { slope, intercept, .. } => intercept + slope * x,
            Function::Polynomial { a, b, c, d, .. } => {
                // Horner's method, per spec.md §4.1.
                a + x * (b + x * (c + x * d))
            }
            Function::Piecewise { pieces } => {
                let piece = pieces
                    .iter()
                    .find(|p| p.domain().fuzzy_contains(x, tol))
                    .ok_or_else(|| NumericError::OutOfDomain {
                        value: x,
                        range: "piecewise: no matching piece".into(),
                    })?;
                piece.value_impl(x, tol)?
            }
            Function::Stacked { combinator, operands, weights } => {
                let values: Vec<f64> = operands
                    .iter()
                    .map(|o| o.value_impl(x, tol))
                    .collect::<Result<_, _>>()?;
                match combinator {
                    StackCombinator::Sum => values.iter().sum(),
                    StackCombinator::Product => values.iter().product(),
                    StackCombinator::WeightedSum => {
                        if weights.len() != values.len() {
                            return Err(NumericError::InconsistentDomain {
                                context: "weighted sum: weights/operands length mismatch".into(),
                            });
                        }
                        values.iter().zip(weights).map(|(v, w)| v * w).sum()
                    }
                }
            }
            Function::Sectioned { inner, offset } => inner.value_impl(x - offset, tol)?,
        };
        if !v.is_finite() {
            return Err(NumericError::NonFinite { context: format!("Function::value at x={x}") });
        }
        Ok(v)
    }

    /// `f'(x)` (the derivative).
    pub fn slope(&self, x: f64) -> Result<f64, NumericError> {
        if !self.domain().fuzzy_contains(x, 0.0) {
            return Err(NumericError::OutOfDomain { value: x, range: format!("{:?}", self.domain()) });
        }
        let v = match self {
            Function::Constant { .. } => 0.0,
            Function::Linear { slope, .. } => *slope,
            Function::Polynomial { b, c, d, .. } => b + x * (2.0 * c + x * 3.0 * d),
            Function::Piecewise { pieces } => {
                let piece = pieces
                    .iter()
                    .find(|p| p.domain().fuzzy_contains(x, 1e-9))
                    .ok_or_else(|| NumericError::OutOfDomain {
                        value: x,
                        range: "piecewise: no matching piece".into(),
                    })?;
                piece.slope(x)?
            }
            Function::Stacked { combinator, operands, weights } => match combinator {
                StackCombinator::Sum => {
                    operands.iter().map(|o| o.slope(x)).sum::<Result<f64, _>>()?
                }
                StackCombinator::WeightedSum => operands
                    .iter()
                    .zip(weights)
                    .map(|(o, w)| o.slope(x).map(|s| s * w))
                    .sum::<Result<f64, _>>()?,
                StackCombinator::Product => {
                    // product rule over n factors
                    let values: Vec<f64> =
                        operands.iter().map(|o| o.value(x)).collect::<Result<_, _>>()?;
                    let slopes: Vec<f64> =
                        operands.iter().map(|o| o.slope(x)).collect::<Result<_, _>>()?;
                    (0..operands.len())
                        .map(|i| {
                            values
                                .iter()
                                .enumerate()
                                .map(|(j, v)| if i == j { slopes[i] } else { *v })
                                .product::<f64>()
                        })
                        .sum()
                }
            },
            Function::Sectioned { inner, offset } => inner.slope(x - offset)?,
        };
        Ok(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_from_intercept_and_point() {
        let f = Function::of_inclusive_intercept_and_point(2.0, 4.0, 10.0);
        assert_eq!(f.value(0.0).unwrap(), 2.0);
        assert_eq!(f.value(4.0).unwrap(), 10.0);
    }

    #[test]
    fn polynomial_horner() {
        let f = Function::Polynomial { domain: Range::closed(-5.0, 5.0), a: 1.0, b: 2.0, c: 3.0, d: 4.0 };
        let x = 1.5;
        let expected = 1.0 + 2.0 * x + 3.0 * x * x + 4.0 * x * x * x;
        assert!(fuzzy_equals(f.value(x).unwrap(), expected, 1e-12));
    }

    #[test]
    fn piecewise_dispatches_to_correct_piece() {
        let f = Function::Piecewise {
            pieces: vec![
                Function::Constant { domain: Range::half_open(0.0, 5.0), value: 1.0 },
                Function::Constant { domain: Range::closed(5.0, 10.0), value: 2.0 },
            ],
        };
        assert_eq!(f.value(2.0).unwrap(), 1.0);
        assert_eq!(f.value(7.0).unwrap(), 2.0);
    }

    #[test]
    fn out_of_domain_fails() {
        let f = Function::Constant { domain: Range::closed(0.0, 1.0), value: 1.0 };
        assert!(f.value(2.0).is_err());
        assert!(f.value_fuzzy(1.0000001, 1e-6).is_ok());
    }

    #[test]
    fn sectioned_reparameterises() {
        let inner = Function::Linear { domain: Range::closed(0.0, 5.0), slope: 1.0, intercept: 0.0 };
        let sec = Function::Sectioned { inner: Box::new(inner), offset: 10.0 };
        assert_eq!(sec.value(10.0).unwrap(), 0.0);
        assert_eq!(sec.value(12.0).unwrap(), 2.0);
    }

    #[test]
    fn stacked_sum_combines_operands() {
        let f = Function::Stacked {
            combinator: StackCombinator::Sum,
            operands: vec![
                Function::Constant { domain: Range::closed(0.0, 10.0), value: 1.0 },
                Function::Constant { domain: Range::closed(0.0, 10.0), value: 2.0 },
            ],
            weights: vec![],
        };
        assert_eq!(f.value(5.0).unwrap(), 3.0);
    }
}
