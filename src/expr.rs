use datafusion_common::ScalarValue;

/// Comparison operators the walker understands.
///
/// Only `=`, `<`, `<=`, `>=` and `>` can drive partition selection; `!=` has
/// no ordering strategy and always degrades to the conservative full range.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CmpOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl CmpOp {
    /// Mirror the operator for a `value OP key` comparison rewritten as
    /// `key OP' value`.
    pub fn flip(self) -> Self {
        match self {
            CmpOp::Eq => CmpOp::Eq,
            CmpOp::NotEq => CmpOp::NotEq,
            CmpOp::Lt => CmpOp::Gt,
            CmpOp::LtEq => CmpOp::GtEq,
            CmpOp::Gt => CmpOp::Lt,
            CmpOp::GtEq => CmpOp::LtEq,
        }
    }
}

/// Non-key side of a comparison.
#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    /// A compile-time constant.
    Value(ScalarValue),
    /// A run-time parameter or another column reference. Not prunable, but
    /// still carries a selectivity estimate.
    Param,
}

/// Right-hand side of an IN-list.
#[derive(Clone, Debug, PartialEq)]
pub enum ListOperand {
    /// An array literal.
    Values(Vec<ScalarValue>),
    /// A run-time array parameter. Not prunable.
    Param,
}

/// Filter expression tree evaluated against a partition scheme.
///
/// The node-kind set is closed: anything the host planner cannot express in
/// these terms is wrapped in [`Expr::Unsupported`], which prunes nothing but
/// keeps the tree shape intact for per-partition filter reconstruction.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// A bare key value. Only meaningful when pruning runs with an insert
    /// routing context; elsewhere it selects nothing.
    Const(ScalarValue),
    /// `column OP operand`.
    Cmp {
        column: String,
        op: CmpOp,
        operand: Operand,
    },
    /// `column IN (...)`.
    InList { column: String, list: ListOperand },
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Not(Box<Expr>),
    /// A sub-expression the pruner cannot analyze. The string is a
    /// description for display purposes only.
    Unsupported(String),
}

impl Expr {
    /// Build a comparison expression with an explicit operator.
    pub fn cmp(column: impl Into<String>, op: CmpOp, value: ScalarValue) -> Self {
        Expr::Cmp {
            column: column.into(),
            op,
            operand: Operand::Value(value),
        }
    }

    /// Build an equality expression (`=`).
    pub fn eq(column: impl Into<String>, value: ScalarValue) -> Self {
        Self::cmp(column, CmpOp::Eq, value)
    }

    /// Build a not-equal expression (`!=`).
    pub fn not_eq(column: impl Into<String>, value: ScalarValue) -> Self {
        Self::cmp(column, CmpOp::NotEq, value)
    }

    /// Build a less-than expression (`<`).
    pub fn lt(column: impl Into<String>, value: ScalarValue) -> Self {
        Self::cmp(column, CmpOp::Lt, value)
    }

    /// Build a less-than-or-equal expression (`<=`).
    pub fn lt_eq(column: impl Into<String>, value: ScalarValue) -> Self {
        Self::cmp(column, CmpOp::LtEq, value)
    }

    /// Build a greater-than expression (`>`).
    pub fn gt(column: impl Into<String>, value: ScalarValue) -> Self {
        Self::cmp(column, CmpOp::Gt, value)
    }

    /// Build a greater-than-or-equal expression (`>=`).
    pub fn gt_eq(column: impl Into<String>, value: ScalarValue) -> Self {
        Self::cmp(column, CmpOp::GtEq, value)
    }

    /// Build a comparison against a run-time parameter.
    pub fn cmp_param(column: impl Into<String>, op: CmpOp) -> Self {
        Expr::Cmp {
            column: column.into(),
            op,
            operand: Operand::Param,
        }
    }

    /// Build an IN (...) expression over an array literal.
    pub fn in_list(column: impl Into<String>, values: Vec<ScalarValue>) -> Self {
        Expr::InList {
            column: column.into(),
            list: ListOperand::Values(values),
        }
    }

    /// Build an IN expression over a run-time array parameter.
    pub fn in_list_param(column: impl Into<String>) -> Self {
        Expr::InList {
            column: column.into(),
            list: ListOperand::Param,
        }
    }

    /// Build an AND expression.
    pub fn and(parts: Vec<Expr>) -> Self {
        Expr::And(parts)
    }

    /// Build an OR expression.
    pub fn or(parts: Vec<Expr>) -> Self {
        Expr::Or(parts)
    }

    /// Build a NOT expression.
    pub fn not(expr: Expr) -> Self {
        Expr::Not(Box::new(expr))
    }

    /// Wrap a sub-expression the pruner cannot analyze.
    pub fn unsupported(description: impl Into<String>) -> Self {
        Expr::Unsupported(description.into())
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Const(value) => write!(f, "{:?}", value),
            Expr::Cmp {
                column,
                op,
                operand,
            } => {
                let op_str = match op {
                    CmpOp::Eq => "=",
                    CmpOp::NotEq => "!=",
                    CmpOp::Lt => "<",
                    CmpOp::LtEq => "<=",
                    CmpOp::Gt => ">",
                    CmpOp::GtEq => ">=",
                };
                match operand {
                    Operand::Value(value) => write!(f, "{} {} {:?}", column, op_str, value),
                    Operand::Param => write!(f, "{} {} $param", column, op_str),
                }
            }
            Expr::InList { column, list } => match list {
                ListOperand::Values(values) => {
                    write!(f, "{} IN (", column)?;
                    for (i, v) in values.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{:?}", v)?;
                    }
                    write!(f, ")")
                }
                ListOperand::Param => write!(f, "{} IN $param", column),
            },
            Expr::And(parts) => {
                if parts.is_empty() {
                    write!(f, "TRUE")
                } else if parts.len() == 1 {
                    write!(f, "{}", parts[0])
                } else {
                    write!(f, "(")?;
                    for (i, part) in parts.iter().enumerate() {
                        if i > 0 {
                            write!(f, " AND ")?;
                        }
                        write!(f, "{}", part)?;
                    }
                    write!(f, ")")
                }
            }
            Expr::Or(parts) => {
                if parts.is_empty() {
                    write!(f, "FALSE")
                } else if parts.len() == 1 {
                    write!(f, "{}", parts[0])
                } else {
                    write!(f, "(")?;
                    for (i, part) in parts.iter().enumerate() {
                        if i > 0 {
                            write!(f, " OR ")?;
                        }
                        write!(f, "{}", part)?;
                    }
                    write!(f, ")")
                }
            }
            Expr::Not(inner) => write!(f, "NOT ({})", inner),
            Expr::Unsupported(description) => write!(f, "<{}>", description),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip_mirrors_ordering_ops() {
        assert_eq!(CmpOp::Lt.flip(), CmpOp::Gt);
        assert_eq!(CmpOp::LtEq.flip(), CmpOp::GtEq);
        assert_eq!(CmpOp::Gt.flip(), CmpOp::Lt);
        assert_eq!(CmpOp::GtEq.flip(), CmpOp::LtEq);
        assert_eq!(CmpOp::Eq.flip(), CmpOp::Eq);
        assert_eq!(CmpOp::NotEq.flip(), CmpOp::NotEq);
    }

    #[test]
    fn test_display_formatting() {
        assert_eq!(
            Expr::gt("age", ScalarValue::Int32(Some(18))).to_string(),
            "age > Int32(18)"
        );

        assert_eq!(
            Expr::in_list(
                "status",
                vec![
                    ScalarValue::Utf8(Some("active".to_string())),
                    ScalarValue::Utf8(Some("pending".to_string())),
                ]
            )
            .to_string(),
            "status IN (Utf8(\"active\"), Utf8(\"pending\"))"
        );

        assert_eq!(
            Expr::cmp_param("id", CmpOp::Eq).to_string(),
            "id = $param"
        );

        assert_eq!(Expr::and(vec![]).to_string(), "TRUE");
        assert_eq!(Expr::or(vec![]).to_string(), "FALSE");

        let composite = Expr::or(vec![
            Expr::lt("k", ScalarValue::Int64(Some(5))),
            Expr::gt_eq("k", ScalarValue::Int64(Some(35))),
        ]);
        assert_eq!(
            composite.to_string(),
            "(k < Int64(5) OR k >= Int64(35))"
        );

        assert_eq!(
            Expr::not(Expr::eq("k", ScalarValue::Int64(Some(1)))).to_string(),
            "NOT (k = Int64(1))"
        );

        assert_eq!(Expr::unsupported("f(k)").to_string(), "<f(k)>");
    }
}
