//! Tree-walking evaluator.
//!
//! Runtime errors are ordinary [`Object::Error`] values. Together with
//! [`Object::ReturnValue`] they form the two control signals: every rule that
//! consumes a sub-result checks it with [`propagate!`] and hands a signal
//! straight back up instead of evaluating anything else.
use crate::{
    ast::*,
    builtins,
    env::Env,
    object::{new_error, Call, Function, HashPair, HashPairs, Object},
    prelude::*,
};
use std::{cell::RefCell, rc::Rc};
use thiserror::Error;
use tracing::trace;

/// An [`Object::Error`] that reached the top of a program.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("ERROR: {message}")]
pub struct EvalError {
    pub message: String,
}

/// Any syntax tree node the evaluator accepts.
#[derive(Debug, Copy, Clone)]
pub enum Node<'a> {
    Program(&'a Program),
    Statement(&'a Statement),
    Block(&'a BlockStatement),
    Expression(&'a Expression),
}

impl<'a> From<&'a Program> for Node<'a> {
    fn from(value: &'a Program) -> Self {
        Self::Program(value)
    }
}

impl<'a> From<&'a Statement> for Node<'a> {
    fn from(value: &'a Statement) -> Self {
        Self::Statement(value)
    }
}

impl<'a> From<&'a BlockStatement> for Node<'a> {
    fn from(value: &'a BlockStatement) -> Self {
        Self::Block(value)
    }
}

impl<'a> From<&'a Expression> for Node<'a> {
    fn from(value: &'a Expression) -> Self {
        Self::Expression(value)
    }
}

/// `Err` for the two control signals, `Ok` for plain values.
fn checked(obj: Object) -> Result<Object, Object> {
    if matches!(obj, Object::Error(_) | Object::ReturnValue(_)) {
        Err(obj)
    } else {
        Ok(obj)
    }
}

/// Re-returns a control signal from the enclosing function, yields plain values.
macro_rules! propagate {
    ($obj:expr) => {
        match checked($obj) {
            Ok(obj) => obj,
            Err(signal) => return signal,
        }
    };
}

pub fn eval<'a>(node: impl Into<Node<'a>>, env: &Rc<RefCell<Env>>) -> Object {
    match node.into() {
        Node::Program(program) => eval_program(program, env),
        Node::Statement(stmt) => eval_statement(stmt, env),
        Node::Block(block) => eval_block(block, env),
        Node::Expression(expr) => eval_expression(expr, env),
    }
}

#[tracing::instrument(level = "debug", skip_all, fields(statements = program.statements.len()))]
fn eval_program(program: &Program, env: &Rc<RefCell<Env>>) -> Object {
    let mut result = Object::Null;
    for stmt in &program.statements {
        match eval_statement(stmt, env) {
            Object::ReturnValue(inner) => return *inner,
            err @ Object::Error(_) => return err,
            obj => result = obj,
        }
    }
    result
}

/// Unlike [`eval_program`] a `return` stays wrapped, so the caller can tell it apart.
fn eval_block(block: &BlockStatement, env: &Rc<RefCell<Env>>) -> Object {
    let mut result = Object::Null;
    for stmt in &block.statements {
        result = propagate!(eval_statement(stmt, env));
    }
    result
}

fn eval_statement(stmt: &Statement, env: &Rc<RefCell<Env>>) -> Object {
    match stmt {
        Statement::Let(LetStatement { name, value }) => {
            let val = propagate!(eval_expression(value, env));
            env.borrow_mut().set(name.name(), val.clone());
            val
        }
        Statement::Return(ReturnStatement { value }) => {
            let val = match value {
                Some(expr) => propagate!(eval_expression(expr, env)),
                None => Object::Null,
            };
            Object::ReturnValue(Box::new(val))
        }
        Statement::Expression(ExpressionStatement { expression }) => {
            eval_expression(expression, env)
        }
    }
}

fn eval_expression(expr: &Expression, env: &Rc<RefCell<Env>>) -> Object {
    match expr {
        Expression::Identifier(ident) => eval_identifier(ident, env),
        Expression::Integer(i) => Object::Integer(*i),
        Expression::String(s) => Object::from(s.as_str()),
        Expression::Boolean(b) => Object::Boolean(*b),
        Expression::Prefix(PrefixExpression { operator, right }) => {
            let right = propagate!(eval_expression(right, env));
            eval_prefix(*operator, right)
        }
        Expression::Infix(InfixExpression {
            left,
            operator,
            right,
        }) => {
            let left = propagate!(eval_expression(left, env));
            let right = propagate!(eval_expression(right, env));
            eval_infix(*operator, left, right)
        }
        Expression::If(if_expr) => eval_if(if_expr, env),
        Expression::Function(FunctionLiteral { parameters, body }) => {
            Object::Function(Rc::new(Function {
                parameters: parameters.clone(),
                body: body.clone(),
                env: env.clone(),
            }))
        }
        Expression::Call(CallExpression {
            function,
            arguments,
        }) => {
            let callee = propagate!(eval_expression(function, env));
            match eval_expressions(arguments, env) {
                Ok(args) => apply_function(callee, args),
                Err(signal) => signal,
            }
        }
        Expression::Array(ArrayLiteral { elements }) => match eval_expressions(elements, env) {
            Ok(elements) => Object::new_array(elements),
            Err(signal) => signal,
        },
        Expression::Index(IndexExpression { left, index }) => {
            let left = propagate!(eval_expression(left, env));
            let index = propagate!(eval_expression(index, env));
            eval_index(left, index)
        }
        Expression::Hash(hash) => eval_hash_literal(hash, env),
    }
}

/// Left to right, stopping at the first signal.
fn eval_expressions(exprs: &[Expression], env: &Rc<RefCell<Env>>) -> Result<Vec<Object>, Object> {
    exprs
        .iter()
        .map(|expr| eval_expression(expr, env).pipe(checked))
        .collect()
}

fn eval_identifier(ident: &Identifier, env: &Rc<RefCell<Env>>) -> Object {
    if let Some(val) = env.borrow().get(ident.name()) {
        return val;
    }
    builtins::lookup(ident.name())
        .map(Object::Builtin)
        .unwrap_or_else(|| new_error!("identifier not found: {ident}"))
}

fn eval_prefix(operator: PrefixOperator, right: Object) -> Object {
    match operator {
        PrefixOperator::Not => Object::Boolean(!right.is_truthy()),
        PrefixOperator::Negate => match right {
            Object::Integer(i) => Object::Integer(i.wrapping_neg()),
            other => new_error!("unknown operator: -{}", other.kind()),
        },
    }
}

fn eval_infix(operator: InfixOperator, left: Object, right: Object) -> Object {
    use InfixOperator::*;
    match (&left, &right) {
        (Object::Integer(l), Object::Integer(r)) => eval_integer_infix(operator, *l, *r),
        (Object::Boolean(l), Object::Boolean(r)) if operator == Eq => (l == r).into(),
        (Object::Boolean(l), Object::Boolean(r)) if operator == NotEq => (l != r).into(),
        (Object::String(l), Object::String(r)) if operator == Add => format!("{l}{r}").into(),
        _ if left.kind() != right.kind() => {
            new_error!("type mismatch: {} {operator} {}", left.kind(), right.kind())
        }
        _ => new_error!("unknown operator: {} {operator} {}", left.kind(), right.kind()),
    }
}

/// Arithmetic wraps on overflow.
fn eval_integer_infix(operator: InfixOperator, l: i64, r: i64) -> Object {
    use InfixOperator::*;
    match operator {
        Add => l.wrapping_add(r).into(),
        Sub => l.wrapping_sub(r).into(),
        Mul => l.wrapping_mul(r).into(),
        Div if r == 0 => new_error!("division by zero: {l} / {r}"),
        Div => l.wrapping_div(r).into(),
        Lt => (l < r).into(),
        Gt => (l > r).into(),
        Eq => (l == r).into(),
        NotEq => (l != r).into(),
    }
}

fn eval_if(if_expr: &IfExpression, env: &Rc<RefCell<Env>>) -> Object {
    let condition = propagate!(eval_expression(&if_expr.condition, env));
    if condition.is_truthy() {
        eval_block(&if_expr.consequence, env)
    } else if let Some(alternative) = &if_expr.alternative {
        eval_block(alternative, env)
    } else {
        Object::Null
    }
}

fn apply_function(callee: Object, args: Vec<Object>) -> Object {
    trace!(callee = %callee.kind(), args = args.len(), "apply");
    match callee {
        Object::Function(func) => func.call(args),
        Object::Builtin(builtin) => builtin.call(args),
        other => new_error!("not a function: {}", other.kind()),
    }
}

/// Out of range array indices give `null`, never an error.
fn eval_index(left: Object, index: Object) -> Object {
    match (&left, &index) {
        (Object::Array(elements), Object::Integer(i)) => usize::try_from(*i)
            .ok()
            .and_then(|i| elements.get(i))
            .cloned()
            .unwrap_or(Object::Null),
        (Object::Hash(pairs), key) => match key.hash_key() {
            Some(hash_key) => pairs
                .get(&hash_key)
                .map(|pair| pair.value.clone())
                .unwrap_or(Object::Null),
            None => new_error!("unusable as hash key: {}", key.kind()),
        },
        _ => new_error!("index operator not supported: {}", left.kind()),
    }
}

/// Later duplicates of a key overwrite earlier ones.
fn eval_hash_literal(hash: &HashLiteral, env: &Rc<RefCell<Env>>) -> Object {
    let mut pairs = HashPairs::default();
    for (key_expr, value_expr) in &hash.pairs {
        let key = propagate!(eval_expression(key_expr, env));
        let Some(hash_key) = key.hash_key() else {
            return new_error!("unusable as hash key: {}", key.kind());
        };
        let value = propagate!(eval_expression(value_expr, env));
        pairs.insert(hash_key, HashPair { key, value });
    }
    Object::Hash(Rc::new(pairs))
}
