//! Expression syntax tree.

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(String),
    Number(String),
    Str(String),
    Template(Vec<TemplatePart>),
    Bool(bool),
    /// `null` and `undefined`.
    Nil,
    /// `a.b` and `a?.b`.
    Member {
        object: Box<Expr>,
        property: String,
    },
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    Array(Vec<Expr>),
    Object(Vec<(String, Expr)>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    Text(String),
    Expr(Expr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    NotEq,
    Lt,
    Gt,
    Le,
    Ge,
}

impl BinaryOp {
    pub fn is_comparison(self) -> bool {
        !matches!(
            self,
            Self::Add | Self::Sub | Self::Mul | Self::Div | Self::Rem
        )
    }

    /// Liquid comparison operator or arithmetic filter name.
    pub fn liquid(self) -> &'static str {
        match self {
            Self::Add => "plus",
            Self::Sub => "minus",
            Self::Mul => "times",
            Self::Div => "divided_by",
            Self::Rem => "modulo",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
        }
    }

    /// The comparison that holds exactly when this one does not.
    pub fn negated(self) -> Option<Self> {
        Some(match self {
            Self::Eq => Self::NotEq,
            Self::NotEq => Self::Eq,
            Self::Lt => Self::Ge,
            Self::Ge => Self::Lt,
            Self::Gt => Self::Le,
            Self::Le => Self::Gt,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    /// `||` and `??`.
    Or,
}

impl LogicalOp {
    pub fn liquid(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

impl Expr {
    /// A `.includes(x)` call.
    pub fn as_includes(&self) -> Option<(&Expr, &Expr)> {
        match self {
            Self::Call { callee, args } if args.len() == 1 => match callee.as_ref() {
                Self::Member { object, property } if property == "includes" => {
                    Some((object, &args[0]))
                }
                _ => None,
            },
            _ => None,
        }
    }

    /// Expressions that only make sense as a condition.
    pub fn is_predicate(&self) -> bool {
        match self {
            Self::Binary { op, .. } => op.is_comparison(),
            Self::Unary { op: UnaryOp::Not, .. } => true,
            _ => self.as_includes().is_some(),
        }
    }
}
