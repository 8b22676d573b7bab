use std::{cell::RefCell, rc::Rc};

use log::debug;
use monkey_syntax::ast::{BinOp, Block, Expr, Ident, Program, Stmt, UnaryOp};

use crate::{
    environment::Env,
    error::{ErrorMsg, Exception},
    types::{Func, Value},
};

#[derive(Debug)]
pub struct Interpreter {
    pub(crate) env: Rc<RefCell<Env>>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self { env: Env::new() }
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_env(env: Rc<RefCell<Env>>) -> Self {
        Self { env }
    }

    /// Evaluates every statement of `program` in order and returns the
    /// value of the last one. A top-level `return` ends the program with
    /// its value, and a runtime error ends it with an error value. Programs
    /// that are empty or end in a `let` produce no value.
    pub fn eval_program(&mut self, program: &Program) -> Option<Value> {
        match self.interpret_all(&program.statements) {
            Ok(value) => value,
            Err(Exception::Return(value)) => Some(value),
            Err(Exception::Error(msg)) => Some(Value::Error(msg)),
        }
    }

    fn interpret_all(&mut self, stmts: &[Stmt]) -> Result<Option<Value>, Exception> {
        let mut last = None;
        for stmt in stmts {
            last = self.interpret_stmt(stmt)?;
        }
        Ok(last)
    }

    fn interpret_stmt(&mut self, stmt: &Stmt) -> Result<Option<Value>, Exception> {
        match stmt {
            Stmt::Expr(expr) => self.interpret_expr(expr).map(Some),
            Stmt::Let { name, value } => self.interpret_let_stmt(name, value).map(|_| None),
            Stmt::Return(expr) => Err(Exception::Return(self.interpret_expr(expr)?)),
        }
    }

    fn interpret_let_stmt(&mut self, name: &Ident, init: &Expr) -> Result<(), Exception> {
        let value = self.interpret_expr(init)?;
        self.env.borrow_mut().set(&name.name, value);
        Ok(())
    }

    // Blocks share the enclosing env, only function calls open a scope
    fn interpret_block(&mut self, block: &Block) -> Result<Value, Exception> {
        Ok(self
            .interpret_all(&block.statements)?
            .unwrap_or(Value::NULL))
    }

    fn interpret_expr(&mut self, expr: &Expr) -> Result<Value, Exception> {
        match expr {
            Expr::Ident(ident) => self.interpret_ident(ident),
            Expr::Integer(n) => Ok(Value::Integer(*n)),
            Expr::Boolean(b) => Ok(Value::from(*b)),
            Expr::Prefix { op, expr } => self.interpret_unary(op, expr),
            Expr::Infix { lhs, op, rhs } => self.interpret_binary(lhs, op, rhs),
            Expr::If {
                condition,
                consequence,
                alternative,
            } => self.interpret_if(condition, consequence, alternative.as_ref()),
            Expr::Function { params, body } => Ok(Value::Function(Rc::new(Func {
                params: params.clone(),
                body: body.clone(),
                env: Rc::clone(&self.env),
            }))),
            Expr::Call { func, args } => self.interpret_func_call(func, args),
        }
    }

    fn interpret_ident(&mut self, ident: &Ident) -> Result<Value, Exception> {
        self.env
            .borrow()
            .get(&ident.name)
            .ok_or_else(|| ErrorMsg::UndefinedIdent(ident.name.clone()).into())
    }

    fn interpret_if(
        &mut self,
        condition: &Expr,
        consequence: &Block,
        alternative: Option<&Block>,
    ) -> Result<Value, Exception> {
        if self.interpret_expr(condition)?.is_truthy() {
            self.interpret_block(consequence)
        } else if let Some(block) = alternative {
            self.interpret_block(block)
        } else {
            Ok(Value::NULL)
        }
    }

    fn interpret_unary(&mut self, op: &UnaryOp, expr: &Expr) -> Result<Value, Exception> {
        let operand = self.interpret_expr(expr)?;
        match op {
            UnaryOp::Bang => Ok(Value::from(!operand.is_truthy())),
            UnaryOp::Minus => match operand {
                Value::Integer(n) => Ok(Value::Integer(n.wrapping_neg())),
                _ => Err(ErrorMsg::UnknownPrefixOp {
                    op: op.clone(),
                    operand: operand.type_name(),
                }
                .into()),
            },
        }
    }

    fn interpret_binary(&mut self, lhs: &Expr, op: &BinOp, rhs: &Expr) -> Result<Value, Exception> {
        let left = self.interpret_expr(lhs)?;
        let right = self.interpret_expr(rhs)?;

        if let (Value::Integer(m), Value::Integer(n)) = (&left, &right) {
            return integer_binary(*m, op, *n);
        }

        // Anything that isn't a pair of integers can only be
        // compared for identity
        match op {
            BinOp::EqualEqual => Ok(Value::from(left.is_identical(&right))),
            BinOp::BangEqual => Ok(Value::from(!left.is_identical(&right))),
            _ if left.type_name() != right.type_name() => Err(ErrorMsg::TypeMismatch {
                lhs: left.type_name(),
                op: op.clone(),
                rhs: right.type_name(),
            }
            .into()),
            _ => Err(ErrorMsg::UnknownInfixOp {
                lhs: left.type_name(),
                op: op.clone(),
                rhs: right.type_name(),
            }
            .into()),
        }
    }

    fn interpret_func_call(&mut self, fn_expr: &Expr, arg_exprs: &[Expr]) -> Result<Value, Exception> {
        let callee = self.interpret_expr(fn_expr)?;
        let args = arg_exprs
            .iter()
            .map(|arg| self.interpret_expr(arg))
            .collect::<Result<Vec<_>, _>>()?;
        match callee {
            Value::Function(func) => self.call_func(&func, args),
            _ => Err(ErrorMsg::NotAFunction(callee.type_name()).into()),
        }
    }

    pub(crate) fn call_func(&mut self, func: &Func, args: Vec<Value>) -> Result<Value, Exception> {
        if func.params.len() != args.len() {
            return Err(ErrorMsg::WrongArgCount {
                want: func.params.len(),
                got: args.len(),
            }
            .into());
        }
        debug!("Call {func} with {} argument(s)", args.len());

        // Parameters live in a fresh scope on top of the captured env
        let func_env = Env::with_parent(Rc::clone(&func.env));
        for (param, value) in func.params.iter().zip(args) {
            func_env.borrow_mut().set(&param.name, value);
        }
        let old_env = std::mem::replace(&mut self.env, func_env);
        let res = self.interpret_block(&func.body);
        // Restore the env
        self.env = old_env;

        // A return stops at the call it was made in, errors keep unwinding
        match res {
            Err(Exception::Return(val)) => Ok(val),
            _ => res,
        }
    }
}

fn integer_binary(m: i64, op: &BinOp, n: i64) -> Result<Value, Exception> {
    Ok(match op {
        BinOp::Plus => Value::Integer(m.wrapping_add(n)),
        BinOp::Minus => Value::Integer(m.wrapping_sub(n)),
        BinOp::Star => Value::Integer(m.wrapping_mul(n)),
        BinOp::Slash => {
            if n == 0 {
                return Err(ErrorMsg::DivisionByZero.into());
            }
            Value::Integer(m.wrapping_div(n))
        }
        BinOp::Less => Value::from(m < n),
        BinOp::Greater => Value::from(m > n),
        BinOp::EqualEqual => Value::from(m == n),
        BinOp::BangEqual => Value::from(m != n),
    })
}
