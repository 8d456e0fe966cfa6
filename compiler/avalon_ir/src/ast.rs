//! Syntax tree for the source language.
//!
//! The tree mirrors the shape produced by the host's parser for the
//! indentation-structured source language: a module is a list of statements,
//! statements own their sub-blocks, and expressions are boxed trees.
//!
//! Load/store context is not recorded on nodes. The compiler knows from the
//! position of an expression (assignment target, loop target, ...) whether it
//! is being read or written.

use std::fmt;

// ── Syntax kind tag ─────────────────────────────────────────────────

/// Tag identifying the variant of a syntax node without its payload.
///
/// Used for the compiler's parent chain and for error messages.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    Module,
    FunctionDef,
    ClassDef,
    Return,
    Assign,
    AugAssign,
    For,
    While,
    If,
    Try,
    ExceptHandler,
    Raise,
    Import,
    ExprStmt,
    Pass,
    Break,
    Continue,
    With,
    Delete,
    Global,
    Assert,
    Param,
    BoolOp,
    BinOp,
    UnaryOp,
    Compare,
    Call,
    Attribute,
    Subscript,
    Name,
    Num,
    Str,
    List,
    Tuple,
    Dict,
    IfExp,
    Yield,
    Lambda,
    ListComp,
    DictComp,
    GeneratorExp,
    Starred,
    Slice,
}

impl SyntaxKind {
    /// Source-level spelling of the construct.
    pub fn name(self) -> &'static str {
        match self {
            SyntaxKind::Module => "module",
            SyntaxKind::FunctionDef => "def",
            SyntaxKind::ClassDef => "class",
            SyntaxKind::Return => "return",
            SyntaxKind::Assign => "assignment",
            SyntaxKind::AugAssign => "augmented assignment",
            SyntaxKind::For => "for",
            SyntaxKind::While => "while",
            SyntaxKind::If => "if",
            SyntaxKind::Try => "try",
            SyntaxKind::ExceptHandler => "except",
            SyntaxKind::Raise => "raise",
            SyntaxKind::Import => "import",
            SyntaxKind::ExprStmt => "expression statement",
            SyntaxKind::Pass => "pass",
            SyntaxKind::Break => "break",
            SyntaxKind::Continue => "continue",
            SyntaxKind::With => "with",
            SyntaxKind::Delete => "del",
            SyntaxKind::Global => "global",
            SyntaxKind::Assert => "assert",
            SyntaxKind::Param => "parameter",
            SyntaxKind::BoolOp => "boolean operation",
            SyntaxKind::BinOp => "binary operation",
            SyntaxKind::UnaryOp => "unary operation",
            SyntaxKind::Compare => "comparison",
            SyntaxKind::Call => "call",
            SyntaxKind::Attribute => "attribute",
            SyntaxKind::Subscript => "subscript",
            SyntaxKind::Name => "name",
            SyntaxKind::Num => "number",
            SyntaxKind::Str => "string",
            SyntaxKind::List => "list",
            SyntaxKind::Tuple => "tuple",
            SyntaxKind::Dict => "dict",
            SyntaxKind::IfExp => "conditional expression",
            SyntaxKind::Yield => "yield",
            SyntaxKind::Lambda => "lambda",
            SyntaxKind::ListComp => "list comprehension",
            SyntaxKind::DictComp => "dict comprehension",
            SyntaxKind::GeneratorExp => "generator expression",
            SyntaxKind::Starred => "starred expression",
            SyntaxKind::Slice => "slice",
        }
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Operators ───────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BoolOp {
    And,
    Or,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mult,
    Div,
    FloorDiv,
    Mod,
    Pow,
    LShift,
    RShift,
    BitOr,
    BitXor,
    BitAnd,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Invert,
    Not,
    UAdd,
    USub,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CmpOp {
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    Is,
    IsNot,
    In,
    NotIn,
}

// ── Literals ────────────────────────────────────────────────────────

/// Numeric literal.
///
/// Floats are stored as raw bits so the tree keeps `Eq` and `Hash`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Number {
    Int(i64),
    Float(u64),
}

impl Number {
    pub fn float(value: f64) -> Self {
        Number::Float(value.to_bits())
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{n}"),
            Number::Float(bits) => write!(f, "{}", f64::from_bits(*bits)),
        }
    }
}

// ── Module and statements ───────────────────────────────────────────

/// A parsed source unit. Function and class objects are handed to the
/// compiler as a module holding their single definition.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Module {
    pub body: Vec<Stmt>,
}

impl Module {
    pub fn new(body: Vec<Stmt>) -> Self {
        Module { body }
    }
}

/// `def name(params): body`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
    pub decorators: Vec<Expr>,
}

/// A positional parameter with an optional default.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Param {
    pub name: String,
    pub default: Option<Expr>,
}

/// `class name(bases): body`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClassDef {
    pub name: String,
    pub bases: Vec<Expr>,
    pub body: Vec<Stmt>,
    pub decorators: Vec<Expr>,
}

impl ClassDef {
    /// Methods declared directly in the class body, in source order.
    pub fn methods(&self) -> impl Iterator<Item = &FunctionDef> {
        self.body.iter().filter_map(|stmt| match stmt {
            Stmt::FunctionDef(def) => Some(def),
            _ => None,
        })
    }

    /// Whether the class body declares a method with this name.
    pub fn declares(&self, method: &str) -> bool {
        self.methods().any(|def| def.name == method)
    }
}

/// `except class as name: body`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExceptHandler {
    pub class: Option<Expr>,
    pub name: Option<String>,
    pub body: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Stmt {
    FunctionDef(FunctionDef),
    ClassDef(ClassDef),
    Return(Option<Expr>),
    Assign {
        targets: Vec<Expr>,
        value: Expr,
    },
    AugAssign {
        target: Expr,
        op: BinOp,
        value: Expr,
    },
    For {
        target: Expr,
        iter: Expr,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
    },
    While {
        test: Expr,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
    },
    If {
        test: Expr,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
    },
    Try {
        body: Vec<Stmt>,
        handlers: Vec<ExceptHandler>,
        orelse: Vec<Stmt>,
        finalbody: Vec<Stmt>,
    },
    Raise(Option<Expr>),
    /// `import a` / `from a import b`; names are kept for diagnostics only.
    Import(Vec<String>),
    Expr(Expr),
    Pass,
    Break,
    Continue,
    With {
        items: Vec<Expr>,
        body: Vec<Stmt>,
    },
    Delete(Vec<Expr>),
    Global(Vec<String>),
    Assert {
        test: Expr,
        msg: Option<Expr>,
    },
}

impl Stmt {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            Stmt::FunctionDef(_) => SyntaxKind::FunctionDef,
            Stmt::ClassDef(_) => SyntaxKind::ClassDef,
            Stmt::Return(_) => SyntaxKind::Return,
            Stmt::Assign { .. } => SyntaxKind::Assign,
            Stmt::AugAssign { .. } => SyntaxKind::AugAssign,
            Stmt::For { .. } => SyntaxKind::For,
            Stmt::While { .. } => SyntaxKind::While,
            Stmt::If { .. } => SyntaxKind::If,
            Stmt::Try { .. } => SyntaxKind::Try,
            Stmt::Raise(_) => SyntaxKind::Raise,
            Stmt::Import(_) => SyntaxKind::Import,
            Stmt::Expr(_) => SyntaxKind::ExprStmt,
            Stmt::Pass => SyntaxKind::Pass,
            Stmt::Break => SyntaxKind::Break,
            Stmt::Continue => SyntaxKind::Continue,
            Stmt::With { .. } => SyntaxKind::With,
            Stmt::Delete(_) => SyntaxKind::Delete,
            Stmt::Global(_) => SyntaxKind::Global,
            Stmt::Assert { .. } => SyntaxKind::Assert,
        }
    }
}

// ── Expressions ─────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Expr {
    BoolOp {
        op: BoolOp,
        values: Vec<Expr>,
    },
    BinOp {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
    UnaryOp {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Compare {
        left: Box<Expr>,
        ops: Vec<CmpOp>,
        comparators: Vec<Expr>,
    },
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
    },
    Attribute {
        value: Box<Expr>,
        attr: String,
    },
    Subscript {
        value: Box<Expr>,
        index: Box<Expr>,
    },
    Name(String),
    Num(Number),
    Str(String),
    List(Vec<Expr>),
    Tuple(Vec<Expr>),
    Dict {
        keys: Vec<Expr>,
        values: Vec<Expr>,
    },
    IfExp {
        test: Box<Expr>,
        body: Box<Expr>,
        orelse: Box<Expr>,
    },
    Yield(Option<Box<Expr>>),
    Lambda {
        params: Vec<Param>,
        body: Box<Expr>,
    },
    ListComp(Box<Expr>),
    DictComp(Box<Expr>),
    GeneratorExp(Box<Expr>),
    Starred(Box<Expr>),
    Slice {
        lower: Option<Box<Expr>>,
        upper: Option<Box<Expr>>,
    },
}

impl Expr {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            Expr::BoolOp { .. } => SyntaxKind::BoolOp,
            Expr::BinOp { .. } => SyntaxKind::BinOp,
            Expr::UnaryOp { .. } => SyntaxKind::UnaryOp,
            Expr::Compare { .. } => SyntaxKind::Compare,
            Expr::Call { .. } => SyntaxKind::Call,
            Expr::Attribute { .. } => SyntaxKind::Attribute,
            Expr::Subscript { .. } => SyntaxKind::Subscript,
            Expr::Name(_) => SyntaxKind::Name,
            Expr::Num(_) => SyntaxKind::Num,
            Expr::Str(_) => SyntaxKind::Str,
            Expr::List(_) => SyntaxKind::List,
            Expr::Tuple(_) => SyntaxKind::Tuple,
            Expr::Dict { .. } => SyntaxKind::Dict,
            Expr::IfExp { .. } => SyntaxKind::IfExp,
            Expr::Yield(_) => SyntaxKind::Yield,
            Expr::Lambda { .. } => SyntaxKind::Lambda,
            Expr::ListComp(_) => SyntaxKind::ListComp,
            Expr::DictComp(_) => SyntaxKind::DictComp,
            Expr::GeneratorExp(_) => SyntaxKind::GeneratorExp,
            Expr::Starred(_) => SyntaxKind::Starred,
            Expr::Slice { .. } => SyntaxKind::Slice,
        }
    }

    /// The identifier of a bare `Name`.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Expr::Name(id) => Some(id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests;
