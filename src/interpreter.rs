use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Write};
use std::rc::Rc;

use rust_decimal::Decimal;

use crate::class::{Class, Instance};
use crate::environment::Environment;
use crate::error::RuntimeError;
use crate::expr::Expr;
use crate::function::{Function, NativeFunction};
use crate::literal::Literal;
use crate::object::{Callable, Object};
use crate::stmt::{FunctionKind, Stmt};
use crate::token::{Token, Type};

/// What a statement's execution produced besides its side effects: either
/// nothing unusual, a `break` unwinding to the nearest loop, or a `return`
/// carrying its value up to the nearest call. Propagated through `Result`
/// rather than by exceptions, so it never escapes past the call boundary
/// that is supposed to catch it (spec 9: "signal enum threaded through
/// `Result`, not an exception").
#[derive(Debug, Clone)]
pub enum Signal {
    Normal,
    Break,
    Return(Object),
}

/// Tree-walking evaluator. Owns the global environment and the current
/// environment pointer, plus the resolver's node-identity → depth map used
/// to resolve variable references without re-walking scopes at runtime.
pub struct Interpreter {
    pub globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: HashMap<u64, usize>,
    stdout: Rc<RefCell<dyn Write>>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_writer(Rc::new(RefCell::new(io::stdout())))
    }

    /// Builds an interpreter that writes `print` output to `stdout` instead
    /// of the process's real stdout, so tests can capture it without
    /// spawning a subprocess.
    pub fn with_writer(stdout: Rc<RefCell<dyn Write>>) -> Self {
        let globals = Rc::new(RefCell::new(Environment::new(None)));
        for native in NativeFunction::globals() {
            globals.borrow_mut().define(native.name, Object::NativeFunction(Rc::new(native)));
        }

        Interpreter {
            environment: Rc::clone(&globals),
            globals,
            locals: HashMap::new(),
            stdout,
        }
    }

    pub fn resolve(&mut self, locals: HashMap<u64, usize>) {
        self.locals = locals;
    }

    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        for statement in statements {
            self.execute(statement)?;
        }
        Ok(())
    }

    fn execute(&mut self, stmt: &Stmt) -> Result<Signal, RuntimeError> {
        match stmt {
            Stmt::Expression { expr } => {
                self.evaluate(expr)?;
                Ok(Signal::Normal)
            },

            Stmt::Print { expr } => {
                let value = self.evaluate(expr)?;
                let _ = writeln!(self.stdout.borrow_mut(), "{value}");
                Ok(Signal::Normal)
            },

            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(initializer) => self.evaluate(initializer)?,
                    None => Object::from(Literal::Nil),
                };
                self.environment.borrow_mut().define(&name.lexeme, value);
                Ok(Signal::Normal)
            },

            Stmt::Block { statements } => {
                let scope = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&self.environment)))));
                self.execute_block(statements, scope)
            },

            Stmt::If { condition, then_branch, else_branch } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(Signal::Normal)
                }
            },

            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    match self.execute(body)? {
                        Signal::Normal => {},
                        Signal::Break => break,
                        signal @ Signal::Return(_) => return Ok(signal),
                    }
                }
                Ok(Signal::Normal)
            },

            Stmt::Break { .. } => Ok(Signal::Break),

            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(value) => self.evaluate(value)?,
                    None => Object::from(Literal::Nil),
                };
                Ok(Signal::Return(value))
            },

            Stmt::Function { name, params, body, kind } => {
                let function = Function::new(
                    name.clone(),
                    params.clone(),
                    Rc::new(body.clone()),
                    Rc::clone(&self.environment),
                    *kind == FunctionKind::Method && name.lexeme == "init",
                );
                self.environment.borrow_mut().define(&name.lexeme, Object::Function(Rc::new(function)));
                Ok(Signal::Normal)
            },

            Stmt::Class { name, superclass, methods } => self.execute_class(name, superclass, methods),
        }
    }

    /// Runs `statements` inside `environment`, restoring the previous
    /// environment afterward regardless of how execution ends — a block's
    /// scope must not leak into the caller even when a `return`/`break`
    /// propagates out of it.
    pub fn execute_block(&mut self, statements: &[Stmt], environment: Rc<RefCell<Environment>>) -> Result<Signal, RuntimeError> {
        let previous = std::mem::replace(&mut self.environment, environment);

        let mut result = Ok(Signal::Normal);
        for statement in statements {
            match self.execute(statement) {
                Ok(Signal::Normal) => continue,
                other => {
                    result = other;
                    break;
                },
            }
        }

        self.environment = previous;
        result
    }

    fn execute_class(&mut self, name: &Token, superclass_expr: &Option<Expr>, methods: &[Stmt]) -> Result<Signal, RuntimeError> {
        let superclass = match superclass_expr {
            Some(expr) => match self.evaluate(expr)? {
                Object::Class(class) => Some(class),
                _ => {
                    let Expr::Variable { name: superclass_name, .. } = expr else {
                        unreachable!("parser only ever produces a Variable superclass expression")
                    };
                    return Err(RuntimeError::new(superclass_name.clone(), "Superclass must be a class."));
                },
            },
            None => None,
        };

        self.environment.borrow_mut().define(&name.lexeme, Object::from(Literal::Nil));

        let method_scope = if let Some(superclass) = &superclass {
            let scope = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&self.environment)))));
            scope.borrow_mut().define("super", Object::Class(Rc::clone(superclass)));
            Some(scope)
        } else {
            None
        };

        let closure = method_scope.clone().unwrap_or_else(|| Rc::clone(&self.environment));

        let mut method_table = HashMap::new();
        for method in methods {
            let Stmt::Function { name: method_name, params, body, .. } = method else {
                unreachable!("class body only contains Function statements")
            };
            let function = Function::new(
                method_name.clone(),
                params.clone(),
                Rc::new(body.clone()),
                Rc::clone(&closure),
                method_name.lexeme == "init",
            );
            method_table.insert(method_name.lexeme.clone(), Rc::new(function));
        }

        let class = Class::new(name.lexeme.clone(), superclass, method_table);
        let class = Object::Class(Rc::new(RefCell::new(class)));

        self.environment.borrow_mut().assign(name, class).expect("class name was just defined in this scope");

        Ok(Signal::Normal)
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        match expr {
            Expr::Literal { value, .. } => Ok(Object::from(value.clone())),

            Expr::Grouping { expr, .. } => self.evaluate(expr),

            Expr::Unary { operator, right, .. } => {
                let right = self.evaluate(right)?;
                match operator.kind {
                    Type::Minus => Ok(Object::from(Literal::Number(-as_number(operator, &right)?))),
                    Type::Bang => Ok(Object::from(Literal::Bool(!right.is_truthy()))),
                    _ => unreachable!("scanner never produces another unary operator"),
                }
            },

            Expr::Binary { left, operator, right, .. } => self.evaluate_binary(left, operator, right),

            Expr::Logical { left, operator, right, .. } => {
                let left = self.evaluate(left)?;
                let left_truthy = left.is_truthy();

                if operator.kind == Type::Or && left_truthy {
                    return Ok(left);
                }
                if operator.kind == Type::And && !left_truthy {
                    return Ok(left);
                }

                self.evaluate(right)
            },

            Expr::Variable { id, name } => self.look_up_variable(*id, name),

            Expr::Assign { id, name, value } => {
                let value = self.evaluate(value)?;
                match self.locals.get(id) {
                    Some(&depth) => Environment::assign_at(&self.environment, depth, name, value.clone())?,
                    None => self.globals.borrow_mut().assign(name, value.clone())?,
                }
                Ok(value)
            },

            Expr::Call { callee, paren, arguments } => self.evaluate_call(callee, paren, arguments),

            Expr::Get { object, name } => {
                match self.evaluate(object)? {
                    Object::Instance(instance) => Instance::get(&instance, name),
                    _ => Err(RuntimeError::new(name.clone(), "Only instances have properties.")),
                }
            },

            Expr::Set { object, name, value } => {
                match self.evaluate(object)? {
                    Object::Instance(instance) => {
                        let value = self.evaluate(value)?;
                        instance.borrow_mut().set(name, value.clone());
                        Ok(value)
                    },
                    _ => Err(RuntimeError::new(name.clone(), "Only instances have properties.")),
                }
            },

            Expr::This { id, keyword } => self.look_up_variable(*id, keyword),

            Expr::Super { id, keyword, method } => {
                let depth = *self.locals.get(id).expect("resolver to have bound every 'super' reference");
                let superclass = match Environment::get_at(&self.environment, depth, keyword)? {
                    Object::Class(class) => class,
                    _ => unreachable!("'super' always resolves to a class"),
                };

                let this_token = Token::new(Type::This, "this", None, keyword.line);
                let instance = match Environment::get_at(&self.environment, depth - 1, &this_token)? {
                    Object::Instance(instance) => instance,
                    _ => unreachable!("'this' always resolves to an instance"),
                };

                let found = superclass.borrow().find_method(&method.lexeme);
                match found {
                    Some(found) => Ok(Object::Function(Rc::new(found.bind(Object::Instance(instance))))),
                    None => Err(RuntimeError::new(method.clone(), format!("Undefined property '{}'.", method.lexeme))),
                }
            },
        }
    }

    fn look_up_variable(&self, id: u64, name: &Token) -> Result<Object, RuntimeError> {
        match self.locals.get(&id) {
            Some(&depth) => Environment::get_at(&self.environment, depth, name),
            None => self.globals.borrow().get(name),
        }
    }

    fn evaluate_binary(&mut self, left: &Expr, operator: &Token, right: &Expr) -> Result<Object, RuntimeError> {
        let left = self.evaluate(left)?;
        let right = self.evaluate(right)?;

        match operator.kind {
            Type::Plus => match (&left, &right) {
                (Object::Literal(Literal::Number(l)), Object::Literal(Literal::Number(r))) => {
                    Ok(Object::from(Literal::Number(l + r)))
                },
                (Object::Literal(Literal::String(l)), Object::Literal(Literal::String(r))) => {
                    Ok(Object::from(Literal::String(format!("{l}{r}"))))
                },
                _ => Err(RuntimeError::new(operator.clone(), "Operands must be two numbers or two strings.")),
            },
            Type::Minus => Ok(Object::from(Literal::Number(as_number(operator, &left)? - as_number(operator, &right)?))),
            Type::Star => Ok(Object::from(Literal::Number(as_number(operator, &left)? * as_number(operator, &right)?))),
            Type::Slash => {
                let divisor = as_number(operator, &right)?;
                if divisor.is_zero() {
                    return Err(RuntimeError::new(operator.clone(), "Division by zero."));
                }
                Ok(Object::from(Literal::Number(as_number(operator, &left)? / divisor)))
            },
            Type::Greater => Ok(Object::from(Literal::Bool(as_number(operator, &left)? > as_number(operator, &right)?))),
            Type::GreaterEqual => Ok(Object::from(Literal::Bool(as_number(operator, &left)? >= as_number(operator, &right)?))),
            Type::Less => Ok(Object::from(Literal::Bool(as_number(operator, &left)? < as_number(operator, &right)?))),
            Type::LessEqual => Ok(Object::from(Literal::Bool(as_number(operator, &left)? <= as_number(operator, &right)?))),
            Type::EqualEqual => Ok(Object::from(Literal::Bool(left == right))),
            Type::BangEqual => Ok(Object::from(Literal::Bool(left != right))),
            _ => unreachable!("scanner never produces another binary operator"),
        }
    }

    fn evaluate_call(&mut self, callee: &Expr, paren: &Token, arguments: &[Expr]) -> Result<Object, RuntimeError> {
        let callee = self.evaluate(callee)?;

        let mut evaluated = Vec::with_capacity(arguments.len());
        for argument in arguments {
            evaluated.push(self.evaluate(argument)?);
        }

        let callable: &dyn Callable = match &callee {
            Object::Function(function) => function.as_ref(),
            Object::NativeFunction(function) => function.as_ref(),
            Object::Class(class) => return self.call_class(class, paren, evaluated),
            _ => return Err(RuntimeError::new(paren.clone(), "Can only call functions and classes.")),
        };

        if evaluated.len() != callable.arity() {
            return Err(RuntimeError::new(
                paren.clone(),
                format!("Expected {} arguments but got {}.", callable.arity(), evaluated.len()),
            ));
        }

        callable.call(self, evaluated)
    }

    fn call_class(&mut self, class: &Rc<RefCell<Class>>, paren: &Token, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        let arity = class.borrow().arity();
        if arguments.len() != arity {
            return Err(RuntimeError::new(paren.clone(), format!("Expected {} arguments but got {}.", arity, arguments.len())));
        }
        class.borrow().call(self, arguments)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn as_number(operator: &Token, object: &Object) -> Result<Decimal, RuntimeError> {
    match object {
        Object::Literal(Literal::Number(n)) => Ok(*n),
        _ => Err(RuntimeError::new(operator.clone(), "Operand must be a number.")),
    }
}
