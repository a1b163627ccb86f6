use crate::value::Kind;

/// Every operator a rule can name, plus the array literal.
///
/// The arity cap is the maximum number of operands the operator evaluates.
/// Operands beyond the cap are translated and then dropped, so a five-operand
/// `<` compares only its first three operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Eq,
    StrictEq,
    Neq,
    StrictNeq,
    Less,
    Greater,
    Leq,
    Geq,
    Not,
    NotNot,
    And,
    Or,
    If,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Min,
    Max,
    Map,
    Reduce,
    Filter,
    All,
    None,
    Some,
    Merge,
    In,
    Cat,
    Substr,
    Log,
    Var,
    Regex,
    /// `[a, b, c]` in rule text
    Array,
}

/// Operator names accepted as the single key of a rule object.
pub const OPERATORS: &[(&str, OpKind)] = &[
    ("==", OpKind::Eq),
    ("===", OpKind::StrictEq),
    ("!=", OpKind::Neq),
    ("!==", OpKind::StrictNeq),
    ("if", OpKind::If),
    ("!", OpKind::Not),
    ("!!", OpKind::NotNot),
    ("or", OpKind::Or),
    ("and", OpKind::And),
    (">", OpKind::Greater),
    (">=", OpKind::Geq),
    ("<", OpKind::Less),
    ("<=", OpKind::Leq),
    ("max", OpKind::Max),
    ("min", OpKind::Min),
    ("+", OpKind::Add),
    ("-", OpKind::Sub),
    ("*", OpKind::Mul),
    ("/", OpKind::Div),
    ("%", OpKind::Mod),
    ("map", OpKind::Map),
    ("reduce", OpKind::Reduce),
    ("filter", OpKind::Filter),
    ("all", OpKind::All),
    ("none", OpKind::None),
    ("some", OpKind::Some),
    ("merge", OpKind::Merge),
    ("in", OpKind::In),
    ("cat", OpKind::Cat),
    ("substr", OpKind::Substr),
    ("log", OpKind::Log),
    ("var", OpKind::Var),
    // extension
    ("regex", OpKind::Regex),
];

impl OpKind {
    pub fn from_name(name: &str) -> Option<OpKind> {
        OPERATORS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, kind)| *kind)
    }

    /// The key used for this operator in rule text. The array literal has no
    /// key and reports `[]`.
    pub fn name(self) -> &'static str {
        if self == OpKind::Array {
            return "[]";
        }
        OPERATORS
            .iter()
            .find(|(_, kind)| *kind == self)
            .map(|(n, _)| *n)
            .unwrap_or("?")
    }

    /// Maximum number of operands evaluated; `None` means uncapped.
    pub fn arity_cap(self) -> Option<usize> {
        use OpKind as K;
        match self {
            K::Not | K::NotNot | K::Var | K::Log => Some(1),
            K::Eq | K::StrictEq | K::Neq | K::StrictNeq => Some(2),
            K::Sub | K::Div | K::Mod | K::Map | K::Filter | K::Regex => Some(2),
            K::Less | K::Greater | K::Leq | K::Geq => Some(3),
            K::Reduce | K::All | K::None | K::Some | K::Substr => Some(3),
            K::And | K::Or | K::If | K::Add | K::Mul | K::Min | K::Max => None,
            K::Cat | K::In | K::Merge | K::Array => None,
        }
    }

    /// Fewest operands that still form a meaningful expression.
    pub fn min_operands(self) -> usize {
        use OpKind as K;
        match self {
            K::Var | K::If | K::Array => 0,
            K::Not | K::NotNot | K::Log | K::Sub | K::Div | K::Mod | K::Substr => 1,
            K::And | K::Or | K::Add | K::Mul | K::Min | K::Max | K::Cat | K::Merge => 1,
            K::Eq | K::StrictEq | K::Neq | K::StrictNeq => 2,
            K::Less | K::Greater | K::Leq | K::Geq => 2,
            K::In | K::Regex | K::Map | K::Filter | K::Reduce | K::All | K::None | K::Some => 2,
        }
    }
}

/// The closed set of node kinds, collapsed on demand into the two structural
/// categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Operator(OpKind),
    Value(Kind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Operator,
    Value,
}

impl NodeKind {
    pub fn category(self) -> Category {
        match self {
            NodeKind::Operator(_) => Category::Operator,
            NodeKind::Value(_) => Category::Value,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Operator(op) => op.name(),
            NodeKind::Value(kind) => kind.name(),
        }
    }

    pub fn arity_cap(self) -> Option<usize> {
        match self {
            NodeKind::Operator(op) => op.arity_cap(),
            NodeKind::Value(_) => Some(0),
        }
    }
}

/// `!`, `!!` and `log`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    NotNot,
    Log,
}

/// `==`, `===`, `!=` and `!==`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EqualityOp {
    Eq,
    StrictEq,
    Neq,
    StrictNeq,
}

/// Relational chains: `<`, `>`, `<=`, `>=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationalOp {
    Less,
    Greater,
    Leq,
    Geq,
}

/// Binary-only arithmetic: `-`, `/`, `%`. A missing left operand reads as `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Sub,
    Div,
    Mod,
}

/// Left folds over all operands: `+`, `*`, `min`, `max`, `cat`, `merge`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldOp {
    Add,
    Mul,
    Min,
    Max,
    Cat,
    Merge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOp {
    And,
    Or,
}

/// `map` and `filter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayOp {
    Map,
    Filter,
}

/// Short-circuiting array predicates: `all`, `none`, `some`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOp {
    All,
    None,
    Some,
}

impl UnaryOp {
    pub fn kind(self) -> OpKind {
        match self {
            UnaryOp::Not => OpKind::Not,
            UnaryOp::NotNot => OpKind::NotNot,
            UnaryOp::Log => OpKind::Log,
        }
    }
}

impl EqualityOp {
    pub fn kind(self) -> OpKind {
        match self {
            EqualityOp::Eq => OpKind::Eq,
            EqualityOp::StrictEq => OpKind::StrictEq,
            EqualityOp::Neq => OpKind::Neq,
            EqualityOp::StrictNeq => OpKind::StrictNeq,
        }
    }
}

impl RelationalOp {
    pub fn kind(self) -> OpKind {
        match self {
            RelationalOp::Less => OpKind::Less,
            RelationalOp::Greater => OpKind::Greater,
            RelationalOp::Leq => OpKind::Leq,
            RelationalOp::Geq => OpKind::Geq,
        }
    }
}

impl ArithOp {
    pub fn kind(self) -> OpKind {
        match self {
            ArithOp::Sub => OpKind::Sub,
            ArithOp::Div => OpKind::Div,
            ArithOp::Mod => OpKind::Mod,
        }
    }
}

impl FoldOp {
    pub fn kind(self) -> OpKind {
        match self {
            FoldOp::Add => OpKind::Add,
            FoldOp::Mul => OpKind::Mul,
            FoldOp::Min => OpKind::Min,
            FoldOp::Max => OpKind::Max,
            FoldOp::Cat => OpKind::Cat,
            FoldOp::Merge => OpKind::Merge,
        }
    }
}

impl LogicOp {
    pub fn kind(self) -> OpKind {
        match self {
            LogicOp::And => OpKind::And,
            LogicOp::Or => OpKind::Or,
        }
    }
}

impl ArrayOp {
    pub fn kind(self) -> OpKind {
        match self {
            ArrayOp::Map => OpKind::Map,
            ArrayOp::Filter => OpKind::Filter,
        }
    }
}

impl ScanOp {
    pub fn kind(self) -> OpKind {
        match self {
            ScanOp::All => OpKind::All,
            ScanOp::None => OpKind::None,
            ScanOp::Some => OpKind::Some,
        }
    }
}
