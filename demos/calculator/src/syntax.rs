use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Expr<'source> {
    Num(&'source str),
    Neg(Box<Expr<'source>>),
    Binary {
        op: BinOp,
        lhs: Box<Expr<'source>>,
        rhs: Box<Expr<'source>>,
    },
    Paren(Box<Expr<'source>>),
}

impl Expr<'_> {
    pub fn eval(&self) -> f64 {
        match self {
            Self::Num(num) => num.parse().unwrap_or(f64::NAN),
            Self::Neg(expr) => -expr.eval(),
            Self::Binary { op, lhs, rhs } => {
                let (lhs, rhs) = (lhs.eval(), rhs.eval());
                match op {
                    BinOp::Add => lhs + rhs,
                    BinOp::Sub => lhs - rhs,
                    BinOp::Mul => lhs * rhs,
                    BinOp::Div => lhs / rhs,
                }
            }
            Self::Paren(expr) => expr.eval(),
        }
    }
}

/// Fully parenthesized form.
impl fmt::Display for Expr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(num) => f.write_str(num),
            Self::Neg(expr) => write!(f, "(-{})", expr),
            Self::Binary { op, lhs, rhs } => write!(f, "({} {} {})", lhs, op.symbol(), rhs),
            Self::Paren(expr) => write!(f, "{}", expr),
        }
    }
}
