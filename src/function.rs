use std::cell::RefCell;
use std::fmt::{self, Debug, Display};
use std::rc::Rc;

use crate::environment::Environment;
use crate::error::RuntimeError;
use crate::interpreter::{Interpreter, Signal};
use crate::literal::Literal;
use crate::object::{Callable, Object};
use crate::stmt::Stmt;
use crate::token::Token;

/// A user-declared function or method: the `fun`/method body plus the
/// environment it closed over when declared. Methods carry `is_initializer`
/// so `init` can force its call to return the bound instance (spec:
/// "class initializers always evaluate to the instance").
#[derive(Debug)]
pub struct Function {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: Rc<Vec<Stmt>>,
    pub closure: Rc<RefCell<Environment>>,
    pub is_initializer: bool,
}

impl Function {
    pub fn new(name: Token, params: Vec<Token>, body: Rc<Vec<Stmt>>, closure: Rc<RefCell<Environment>>, is_initializer: bool) -> Self {
        Function { name, params, body, closure, is_initializer }
    }

    /// Produces a copy of this function whose closure is a fresh scope
    /// binding `this` to `instance`, used when a method is retrieved off an
    /// instance (spec 4.5: "methods retrieved from an instance carry a
    /// closure environment with `this` bound at depth 0").
    pub fn bind(&self, instance: Object) -> Function {
        let environment = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&self.closure)))));
        environment.borrow_mut().define("this", instance);

        Function {
            name: self.name.clone(),
            params: self.params.clone(),
            body: Rc::clone(&self.body),
            closure: environment,
            is_initializer: self.is_initializer,
        }
    }
}

impl Callable for Function {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        let environment = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&self.closure)))));
        for (param, argument) in self.params.iter().zip(arguments.into_iter()) {
            environment.borrow_mut().define(&param.lexeme, argument);
        }

        let signal = interpreter.execute_block(&self.body, environment)?;

        if self.is_initializer {
            return Environment::get_at(&self.closure, 0, &this_token(&self.name));
        }

        Ok(match signal {
            Signal::Return(value) => value,
            _ => Object::from(Literal::Nil),
        })
    }

    fn arity(&self) -> usize {
        self.params.len()
    }
}

fn this_token(near: &Token) -> Token {
    Token::new(crate::token::Type::This, "this", None, near.line)
}

impl Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.name.lexeme)
    }
}

/// A built-in implemented in Rust rather than Lox, identified only by name
/// for error messages and printing.
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub function: fn(Vec<Object>) -> Object,
}

impl NativeFunction {
    pub fn globals() -> Vec<NativeFunction> {
        vec![
            NativeFunction {
                name: "clock",
                arity: 0,
                function: |_| {
                    let seconds = std::time::SystemTime::now()
                        .duration_since(std::time::UNIX_EPOCH)
                        .expect("system clock to be after the epoch")
                        .as_secs();
                    Object::from(Literal::Number(seconds.into()))
                },
            },
            NativeFunction {
                name: "str",
                arity: 1,
                function: |arguments| Object::from(Literal::String(arguments[0].to_string())),
            },
            NativeFunction {
                name: "type",
                arity: 1,
                function: |arguments| Object::from(Literal::String(arguments[0].type_name().to_string())),
            },
        ]
    }
}

impl Callable for NativeFunction {
    fn call(&self, _interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        Ok((self.function)(arguments))
    }

    fn arity(&self) -> usize {
        self.arity
    }
}

impl Display for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}

impl Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}
