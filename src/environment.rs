use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::object::Object;
use crate::token::Token;

/// One lexical scope's variable table, chained to its enclosing scope. The
/// chain models closures: a function's environment keeps its defining
/// environment alive via `enclosing` for as long as the function value is
/// reachable.
#[derive(Debug)]
pub struct Environment {
    pub enclosing: Option<Rc<RefCell<Environment>>>,
    values: HashMap<String, Object>,
}

impl Environment {
    pub fn new(enclosing: Option<Rc<RefCell<Environment>>>) -> Self {
        Environment { enclosing, values: HashMap::new() }
    }

    /// Writes unconditionally into the current scope, shadowing any outer
    /// binding of the same name.
    pub fn define(&mut self, name: &str, value: Object) {
        self.values.insert(name.to_string(), value);
    }

    fn ancestor(this: &Rc<RefCell<Environment>>, distance: usize) -> Rc<RefCell<Environment>> {
        let mut environment = Rc::clone(this);
        for _ in 0..distance {
            let parent = environment
                .borrow()
                .enclosing
                .clone()
                .expect("resolved distance to stay within the environment chain");
            environment = parent;
        }
        environment
    }

    pub fn get(&self, name: &Token) -> Result<Object, RuntimeError> {
        if let Some(value) = self.values.get(&name.lexeme) {
            return Ok(value.clone());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow().get(name);
        }

        Err(undefined_variable(name))
    }

    pub fn assign(&mut self, name: &Token, value: Object) -> Result<(), RuntimeError> {
        if self.values.contains_key(&name.lexeme) {
            self.values.insert(name.lexeme.clone(), value);
            return Ok(());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow_mut().assign(name, value);
        }

        Err(undefined_variable(name))
    }

    pub fn get_at(this: &Rc<RefCell<Environment>>, distance: usize, name: &Token) -> Result<Object, RuntimeError> {
        let target = Self::ancestor(this, distance);
        let value = target.borrow().values.get(&name.lexeme).cloned();
        value.ok_or_else(|| undefined_variable(name))
    }

    pub fn assign_at(
        this: &Rc<RefCell<Environment>>,
        distance: usize,
        name: &Token,
        value: Object,
    ) -> Result<(), RuntimeError> {
        let target = Self::ancestor(this, distance);
        target.borrow_mut().values.insert(name.lexeme.clone(), value);
        Ok(())
    }
}

fn undefined_variable(name: &Token) -> RuntimeError {
    RuntimeError::new(name.clone(), format!("Undefined variable '{}'.", name.lexeme))
}
