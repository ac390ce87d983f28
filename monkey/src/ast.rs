//! Syntax tree produced by [`crate::parser`] and walked by [`crate::eval`].
//!
//! Every node renders back to canonical source through [`fmt::Display`];
//! expressions come out fully parenthesized, e.g. `a + b * c` renders as
//! `(a + (b * c))`.

use crate::prelude::*;
use std::{fmt, rc::Rc};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Let(LetStatement),
    Return(ReturnStatement),
    Expression(ExpressionStatement),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetStatement {
    pub name: Identifier,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnStatement {
    /// `None` for a bare `return;`
    pub value: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionStatement {
    pub expression: Expression,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(pub String);

impl Identifier {
    pub fn new(name: &str) -> Self {
        Self(name.to_owned())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Identifier(Identifier),
    Integer(i64),
    String(String),
    Boolean(bool),
    Prefix(PrefixExpression),
    Infix(InfixExpression),
    If(IfExpression),
    Function(FunctionLiteral),
    Call(CallExpression),
    Array(ArrayLiteral),
    Index(IndexExpression),
    Hash(HashLiteral),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PrefixOperator {
    /// `!`
    Not,
    /// unary `-`
    Negate,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InfixOperator {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Gt,
    Eq,
    NotEq,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixExpression {
    pub operator: PrefixOperator,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfixExpression {
    pub left: Box<Expression>,
    pub operator: InfixOperator,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfExpression {
    pub condition: Box<Expression>,
    pub consequence: BlockStatement,
    pub alternative: Option<BlockStatement>,
}

/// The body sits behind an [`Rc`] so function objects can share it with the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionLiteral {
    pub parameters: Vec<Identifier>,
    pub body: Rc<BlockStatement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallExpression {
    pub function: Box<Expression>,
    pub arguments: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayLiteral {
    pub elements: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexExpression {
    pub left: Box<Expression>,
    pub index: Box<Expression>,
}

/// Pairs are kept in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashLiteral {
    pub pairs: Vec<(Expression, Expression)>,
}

// constructors used by the parser and by tests

impl Expression {
    pub fn ident(name: &str) -> Self {
        Self::Identifier(Identifier::new(name))
    }

    pub fn prefix(operator: PrefixOperator, right: Expression) -> Self {
        Self::Prefix(PrefixExpression {
            operator,
            right: Box::new(right),
        })
    }

    pub fn infix(left: Expression, operator: InfixOperator, right: Expression) -> Self {
        Self::Infix(InfixExpression {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        })
    }
}

impl From<Expression> for Statement {
    fn from(expression: Expression) -> Self {
        Self::Expression(ExpressionStatement { expression })
    }
}

// canonical rendering

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.statements.iter().try_for_each(|s| write!(f, "{s}"))
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Let(LetStatement { name, value }) => write!(f, "let {name} = {value};"),
            Self::Return(ReturnStatement { value: Some(value) }) => write!(f, "return {value};"),
            Self::Return(ReturnStatement { value: None }) => f.write_str("return;"),
            Self::Expression(ExpressionStatement { expression }) => write!(f, "{expression}"),
        }
    }
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.statements.is_empty() {
            return f.write_str("{ }");
        }
        write!(f, "{{ {} }}", self.statements.iter().join(" "))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for PrefixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Not => "!",
            Self::Negate => "-",
        })
    }
}

impl fmt::Display for InfixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Eq => "==",
            Self::NotEq => "!=",
        })
    }
}

impl fmt::Display for FunctionLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn({}) {}", self.parameters.iter().join(", "), self.body)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier(ident) => write!(f, "{ident}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::String(s) => write!(f, "\"{}\"", escape(s)),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Prefix(PrefixExpression { operator, right }) => write!(f, "({operator}{right})"),
            Self::Infix(InfixExpression {
                left,
                operator,
                right,
            }) => write!(f, "({left} {operator} {right})"),
            Self::If(IfExpression {
                condition,
                consequence,
                alternative,
            }) => {
                write!(f, "if {condition} {consequence}")?;
                if let Some(alt) = alternative {
                    write!(f, " else {alt}")?;
                }
                Ok(())
            }
            Self::Function(func) => write!(f, "{func}"),
            Self::Call(CallExpression {
                function,
                arguments,
            }) => write!(f, "{function}({})", arguments.iter().join(", ")),
            Self::Array(ArrayLiteral { elements }) => {
                write!(f, "[{}]", elements.iter().join(", "))
            }
            Self::Index(IndexExpression { left, index }) => write!(f, "({left}[{index}])"),
            Self::Hash(HashLiteral { pairs }) => write!(
                f,
                "{{{}}}",
                pairs.iter().map(|(k, v)| format!("{k}: {v}")).join(", ")
            ),
        }
    }
}

fn escape(s: &str) -> String {
    s.chars().fold(String::with_capacity(s.len()), |mut out, c| {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
        out
    })
}
