use std::collections::HashMap;
use std::mem;

use crate::error::Diagnostics;
use crate::expr::Expr;
use crate::stmt::{FunctionKind, Stmt};
use crate::token::Token;

#[derive(Clone, Copy, PartialEq, Eq)]
enum FunctionType {
    None,
    Function,
    Initializer,
    Method,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ClassType {
    None,
    Class,
    Subclass,
}

/// Whether a name is merely *declared* (reserved, not yet initialized) or
/// fully *defined* in its scope — used to catch `var x = x;` at the same
/// scope (spec 4.3 rule 2).
type Scope = HashMap<String, bool>;

/// Single pre-execution pass resolving every variable reference to a lexical
/// depth, recorded by [`crate::expr::NodeId`] in `locals`. Also enforces the
/// static rules in spec 4.3 that have no meaning at parse time (top-level
/// `return`, `this` outside a method, and so on).
pub struct Resolver<'d> {
    scopes: Vec<Scope>,
    locals: HashMap<u64, usize>,
    current_function: FunctionType,
    current_class: ClassType,
    loop_depth: usize,
    diagnostics: &'d Diagnostics,
}

impl<'d> Resolver<'d> {
    pub fn new(diagnostics: &'d Diagnostics) -> Self {
        Resolver {
            scopes: Vec::new(),
            locals: HashMap::new(),
            current_function: FunctionType::None,
            current_class: ClassType::None,
            loop_depth: 0,
            diagnostics,
        }
    }

    pub fn resolve(mut self, statements: &[Stmt]) -> HashMap<u64, usize> {
        self.resolve_statements(statements);
        self.locals
    }

    fn resolve_statements(&mut self, statements: &[Stmt]) {
        for statement in statements {
            self.resolve_stmt(statement);
        }
    }

    fn begin_scope(&mut self) {
        self.scopes.push(Scope::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, name: &Token) {
        let Some(scope) = self.scopes.last_mut() else { return };

        if scope.contains_key(&name.lexeme) {
            self.diagnostics.resolve_error(name, format!(
                "A variable with name '{}' exists in this scope already.", name.lexeme
            ));
        }
        scope.insert(name.lexeme.clone(), false);
    }

    fn define(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme.clone(), true);
        }
    }

    fn resolve_local(&mut self, id: u64, name: &Token) {
        for (depth, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(&name.lexeme) {
                self.locals.insert(id, depth);
                return;
            }
        }
    }

    fn resolve_function(&mut self, params: &[Token], body: &[Stmt], kind: FunctionType) {
        let enclosing_function = mem::replace(&mut self.current_function, kind);
        let enclosing_loop_depth = mem::replace(&mut self.loop_depth, 0);

        self.begin_scope();
        for param in params {
            self.declare(param);
            self.define(param);
        }
        self.resolve_statements(body);
        self.end_scope();

        self.current_function = enclosing_function;
        self.loop_depth = enclosing_loop_depth;
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expression { expr } => self.resolve_expr(expr),
            Stmt::Print { expr } => self.resolve_expr(expr),

            Stmt::Var { name, initializer } => {
                self.declare(name);
                if let Some(initializer) = initializer {
                    self.resolve_expr(initializer);
                }
                self.define(name);
            },

            Stmt::Block { statements } => {
                self.begin_scope();
                self.resolve_statements(statements);
                self.end_scope();
            },

            Stmt::If { condition, then_branch, else_branch } => {
                self.resolve_expr(condition);
                self.resolve_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.resolve_stmt(else_branch);
                }
            },

            Stmt::While { condition, body } => {
                self.resolve_expr(condition);
                self.loop_depth += 1;
                self.resolve_stmt(body);
                self.loop_depth -= 1;
            },

            Stmt::Break { keyword } => {
                if self.loop_depth == 0 {
                    self.diagnostics.resolve_error(keyword, "Cannot break outside loop.");
                }
            },

            Stmt::Return { keyword, value } => {
                if self.current_function == FunctionType::None {
                    self.diagnostics.resolve_error(keyword, "Cannot return from top-level code.");
                }

                if let Some(value) = value {
                    if self.current_function == FunctionType::Initializer {
                        self.diagnostics.resolve_error(keyword, "Cannot return value from 'init'.");
                    } else {
                        self.resolve_expr(value);
                    }
                }
            },

            Stmt::Function { name, params, body, kind } => {
                self.declare(name);
                self.define(name);

                let function_type = match kind {
                    FunctionKind::Function => FunctionType::Function,
                    FunctionKind::Method if name.lexeme == "init" => FunctionType::Initializer,
                    FunctionKind::Method => FunctionType::Method,
                };
                self.resolve_function(params, body, function_type);
            },

            Stmt::Class { name, superclass, methods } => {
                let enclosing_class = mem::replace(&mut self.current_class, ClassType::Class);

                self.declare(name);
                self.define(name);

                if let Some(superclass_expr) = superclass {
                    let Expr::Variable { id, name: superclass_name } = superclass_expr else {
                        unreachable!("parser only ever produces a Variable superclass expression")
                    };

                    if superclass_name.lexeme == name.lexeme {
                        self.diagnostics.resolve_error(superclass_name, "Class cannot inherit from itself.");
                    }

                    self.current_class = ClassType::Subclass;
                    self.resolve_local(*id, superclass_name);

                    self.begin_scope();
                    self.scopes.last_mut().expect("scope just pushed").insert("super".to_string(), true);
                }

                self.begin_scope();
                self.scopes.last_mut().expect("scope just pushed").insert("this".to_string(), true);

                for method in methods {
                    let Stmt::Function { name, params, body, .. } = method else {
                        unreachable!("class body only contains Function statements")
                    };
                    let function_type = if name.lexeme == "init" { FunctionType::Initializer } else { FunctionType::Method };
                    self.resolve_function(params, body, function_type);
                }

                self.end_scope();
                if superclass.is_some() {
                    self.end_scope();
                }

                self.current_class = enclosing_class;
            },
        }
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal { .. } => {},

            Expr::Grouping { expr, .. } => self.resolve_expr(expr),

            Expr::Unary { right, .. } => self.resolve_expr(right),

            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            },

            Expr::Variable { id, name } => {
                if let Some(scope) = self.scopes.last() {
                    if scope.get(&name.lexeme) == Some(&false) {
                        self.diagnostics.resolve_error(name, "Cannot read local variable in its own initializer.");
                    }
                }
                self.resolve_local(*id, name);
            },

            Expr::Assign { id, name, value } => {
                self.resolve_expr(value);
                self.resolve_local(*id, name);
            },

            Expr::Call { callee, arguments, .. } => {
                self.resolve_expr(callee);
                for argument in arguments {
                    self.resolve_expr(argument);
                }
            },

            Expr::Get { object, .. } => self.resolve_expr(object),

            Expr::Set { object, value, .. } => {
                self.resolve_expr(value);
                self.resolve_expr(object);
            },

            Expr::This { id, keyword } => {
                if self.current_class == ClassType::None {
                    self.diagnostics.resolve_error(keyword, "Cannot use 'this' outside method.");
                    return;
                }
                self.resolve_local(*id, keyword);
            },

            Expr::Super { id, keyword, .. } => {
                match self.current_class {
                    ClassType::Subclass => {},
                    ClassType::None => self.diagnostics.resolve_error(keyword, "Cannot use 'super' outside class."),
                    ClassType::Class => self.diagnostics.resolve_error(keyword, "Cannot use 'super' in a class with no superclass."),
                }
                self.resolve_local(*id, keyword);
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::scanner::Scanner;

    fn resolve_errors(source: &str) -> bool {
        let diagnostics = Diagnostics::new();
        let tokens = Scanner::new(source).scan_tokens(&diagnostics);
        let statements = Parser::new(tokens, &diagnostics).parse();
        Resolver::new(&diagnostics).resolve(&statements);
        diagnostics.had_error()
    }

    #[test]
    fn break_outside_loop_is_an_error() {
        assert!(resolve_errors("break;"));
    }

    #[test]
    fn break_inside_loop_is_fine() {
        assert!(!resolve_errors("while (true) { break; }"));
    }

    #[test]
    fn break_inside_function_inside_loop_does_not_bind_to_outer_loop() {
        assert!(resolve_errors("while (true) { fun f() { break; } }"));
    }

    #[test]
    fn return_at_top_level_is_an_error() {
        assert!(resolve_errors("return 1;"));
    }

    #[test]
    fn return_value_from_init_is_an_error() {
        assert!(resolve_errors("class C { init() { return 1; } }"));
    }

    #[test]
    fn this_outside_method_is_an_error() {
        assert!(resolve_errors("print this;"));
    }

    #[test]
    fn class_inheriting_itself_is_an_error() {
        assert!(resolve_errors("class C < C {}"));
    }

    #[test]
    fn redeclaring_local_name_is_an_error() {
        assert!(resolve_errors("{ var a = 1; var a = 2; }"));
    }

    #[test]
    fn reading_own_initializer_is_an_error() {
        assert!(resolve_errors("{ var a = a; }"));
    }
}
