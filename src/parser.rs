use crate::error::Diagnostics;
use crate::expr::{Expr, NodeId};
use crate::literal::Literal;
use crate::stmt::{FunctionKind, Stmt};
use crate::token::{Token, Type};

const MAX_ARGS: usize = 255;

/// Thrown internally when a production cannot complete; carries the token
/// and message the diagnostics sink will report. Parsing recovers from this
/// via [`Parser::synchronize`] at declaration granularity.
struct ParseError;

type ParseResult<T> = Result<T, ParseError>;

/// Recursive-descent parser. Builds a `Vec<Stmt>` from a token sequence,
/// reporting syntax errors through `diagnostics` and recovering via
/// synchronization so later, well-formed declarations still parse.
///
/// ```text
/// program      = declaration* EOF
/// declaration  = funDecl | classDecl | varDecl | statement
/// funDecl      = "fun" function("function")
/// classDecl    = "class" IDENT ( "<" IDENT )? "{" function("method")* "}"
/// varDecl      = "var" IDENT ( "=" expression )? ";"
/// statement    = exprStmt | forStmt | ifStmt | printStmt
///              | returnStmt | whileStmt | breakStmt | block
/// block        = "{" declaration* "}"
/// expression   = assignment
/// assignment   = ( call "." )? IDENT "=" assignment | logic_or
/// logic_or     = logic_and ( "or" logic_and )*
/// logic_and    = equality  ( "and" equality )*
/// equality     = comparison ( ("!="|"==") comparison )*
/// comparison   = term ( (">"|">="|"<"|"<=") term )*
/// term         = factor ( ("-"|"+") factor )*
/// factor       = unary  ( ("/"|"*") unary )*
/// unary        = ("!"|"-") unary | call
/// call         = primary ( "(" arguments? ")" | "." IDENT )*
/// primary      = "true"|"false"|"nil"|NUMBER|STRING
///              | "this" | "super" "." IDENT
///              | IDENT | "(" expression ")"
/// ```
pub struct Parser<'d> {
    tokens: Vec<Token>,
    current: usize,
    next_id: NodeId,
    diagnostics: &'d Diagnostics,
}

impl<'d> Parser<'d> {
    pub fn new(tokens: Vec<Token>, diagnostics: &'d Diagnostics) -> Self {
        Parser { tokens, current: 0, next_id: 0, diagnostics }
    }

    pub fn parse(&mut self) -> Vec<Stmt> {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }
        statements
    }

    fn fresh_id(&mut self) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // --- token stream primitives ---------------------------------------

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == Type::Eof
    }

    fn check(&self, kind: Type) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn matches(&mut self, kinds: &[Type]) -> bool {
        if kinds.iter().any(|k| self.check(*k)) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume(&mut self, kind: Type, message: &str) -> ParseResult<&Token> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        self.error(self.peek().clone(), message)
    }

    fn error<T>(&self, token: Token, message: &str) -> ParseResult<T> {
        self.diagnostics.parse_error(&token, message);
        Err(ParseError)
    }

    fn synchronize(&mut self) {
        self.advance();
        while !self.is_at_end() {
            if self.previous().kind == Type::Semicolon {
                return;
            }
            match self.peek().kind {
                Type::Class | Type::Fun | Type::Var | Type::For
                | Type::If | Type::While | Type::Print | Type::Return | Type::Break => return,
                _ => { self.advance(); },
            }
        }
    }

    // --- declarations ----------------------------------------------------

    fn declaration(&mut self) -> Option<Stmt> {
        let result = if self.matches(&[Type::Class]) {
            self.class_declaration()
        } else if self.matches(&[Type::Fun]) {
            self.function(FunctionKind::Function)
        } else if self.matches(&[Type::Var]) {
            self.var_declaration()
        } else {
            self.statement()
        };

        match result {
            Ok(stmt) => Some(stmt),
            Err(ParseError) => {
                self.synchronize();
                None
            }
        }
    }

    fn class_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume(Type::Identifier, "Expect class name.")?.clone();

        let superclass = if self.matches(&[Type::Less]) {
            self.consume(Type::Identifier, "Expect superclass name.")?;
            let id = self.fresh_id();
            Some(Expr::Variable { id, name: self.previous().clone() })
        } else {
            None
        };

        self.consume(Type::LeftBrace, "Expect '{' before class body.")?;

        let mut methods = Vec::new();
        while !self.check(Type::RightBrace) && !self.is_at_end() {
            methods.push(self.function(FunctionKind::Method)?);
        }

        self.consume(Type::RightBrace, "Expect '}' after class body.")?;

        Ok(Stmt::Class { name, superclass, methods })
    }

    fn function(&mut self, kind: FunctionKind) -> ParseResult<Stmt> {
        let kind_name = match kind { FunctionKind::Function => "function", FunctionKind::Method => "method" };
        let name = self.consume(Type::Identifier, &format!("Expect {kind_name} name."))?.clone();

        self.consume(Type::LeftParen, &format!("Expect '(' after {kind_name} name."))?;
        let mut params = Vec::new();
        if !self.check(Type::RightParen) {
            loop {
                if params.len() >= MAX_ARGS {
                    self.diagnostics.parse_error(self.peek(), "Can't have more than 255 parameters.");
                }
                params.push(self.consume(Type::Identifier, "Expect parameter name.")?.clone());
                if !self.matches(&[Type::Comma]) {
                    break;
                }
            }
        }
        self.consume(Type::RightParen, "Expect ')' after parameters.")?;

        self.consume(Type::LeftBrace, &format!("Expect '{{' before {kind_name} body."))?;
        let body = self.block()?;

        Ok(Stmt::Function { name, params, body, kind })
    }

    fn var_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume(Type::Identifier, "Expect variable name.")?.clone();

        let initializer = if self.matches(&[Type::Equal]) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(Type::Semicolon, "Expect ';' after variable declaration.")?;
        Ok(Stmt::Var { name, initializer })
    }

    // --- statements --------------------------------------------------------

    fn statement(&mut self) -> ParseResult<Stmt> {
        if self.matches(&[Type::For]) {
            return self.for_statement();
        }
        if self.matches(&[Type::If]) {
            return self.if_statement();
        }
        if self.matches(&[Type::Print]) {
            return self.print_statement();
        }
        if self.matches(&[Type::Return]) {
            return self.return_statement();
        }
        if self.matches(&[Type::While]) {
            return self.while_statement();
        }
        if self.matches(&[Type::Break]) {
            return self.break_statement();
        }
        if self.matches(&[Type::LeftBrace]) {
            return Ok(Stmt::Block { statements: self.block()? });
        }
        self.expression_statement()
    }

    fn for_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(Type::LeftParen, "Expect '(' after 'for'.")?;

        let initializer = if self.matches(&[Type::Semicolon]) {
            None
        } else if self.matches(&[Type::Var]) {
            Some(self.var_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };

        let condition = if !self.check(Type::Semicolon) {
            Some(self.expression()?)
        } else {
            None
        };
        self.consume(Type::Semicolon, "Expect ';' after loop condition.")?;

        let increment = if !self.check(Type::RightParen) {
            Some(self.expression()?)
        } else {
            None
        };
        self.consume(Type::RightParen, "Expect ')' after for clauses.")?;

        let mut body = self.statement()?;

        if let Some(increment) = increment {
            body = Stmt::Block { statements: vec![body, Stmt::Expression { expr: increment }] };
        }

        let id = self.fresh_id();
        let condition = condition.unwrap_or(Expr::Literal { id, value: Literal::Bool(true) });
        body = Stmt::While { condition, body: Box::new(body) };

        if let Some(initializer) = initializer {
            body = Stmt::Block { statements: vec![initializer, body] };
        }

        Ok(body)
    }

    fn if_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(Type::LeftParen, "Expect '(' after 'if'.")?;
        let condition = self.expression()?;
        self.consume(Type::RightParen, "Expect ')' after if condition.")?;

        let then_branch = Box::new(self.statement()?);
        let else_branch = if self.matches(&[Type::Else]) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        Ok(Stmt::If { condition, then_branch, else_branch })
    }

    fn print_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        self.consume(Type::Semicolon, "Expect ';' after value.")?;
        Ok(Stmt::Print { expr })
    }

    fn return_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();
        let value = if !self.check(Type::Semicolon) {
            Some(self.expression()?)
        } else {
            None
        };
        self.consume(Type::Semicolon, "Expect ';' after return value.")?;
        Ok(Stmt::Return { keyword, value })
    }

    fn break_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();
        self.consume(Type::Semicolon, "Expect ';' after 'break'.")?;
        Ok(Stmt::Break { keyword })
    }

    fn while_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(Type::LeftParen, "Expect '(' after 'while'.")?;
        let condition = self.expression()?;
        self.consume(Type::RightParen, "Expect ')' after condition.")?;
        let body = Box::new(self.statement()?);
        Ok(Stmt::While { condition, body })
    }

    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        self.consume(Type::Semicolon, "Expect ';' after expression.")?;
        Ok(Stmt::Expression { expr })
    }

    fn block(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();
        while !self.check(Type::RightBrace) && !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }
        self.consume(Type::RightBrace, "Expect '}' after block.")?;
        Ok(statements)
    }

    // --- expressions -------------------------------------------------------

    fn expression(&mut self) -> ParseResult<Expr> {
        self.assignment()
    }

    fn assignment(&mut self) -> ParseResult<Expr> {
        let expr = self.or()?;

        if self.matches(&[Type::Equal]) {
            let equals = self.previous().clone();
            let value = self.assignment()?;
            let id = self.fresh_id();

            return match expr {
                Expr::Variable { name, .. } => Ok(Expr::Assign { id, name, value: Box::new(value) }),
                Expr::Get { object, name, .. } => Ok(Expr::Set { id, object, name, value: Box::new(value) }),
                other => {
                    self.diagnostics.parse_error(&equals, "Invalid assignment target.");
                    Ok(other)
                }
            };
        }

        Ok(expr)
    }

    fn or(&mut self) -> ParseResult<Expr> {
        let mut expr = self.and()?;
        while self.matches(&[Type::Or]) {
            let operator = self.previous().clone();
            let right = self.and()?;
            let id = self.fresh_id();
            expr = Expr::Logical { id, left: Box::new(expr), operator, right: Box::new(right) };
        }
        Ok(expr)
    }

    fn and(&mut self) -> ParseResult<Expr> {
        let mut expr = self.equality()?;
        while self.matches(&[Type::And]) {
            let operator = self.previous().clone();
            let right = self.equality()?;
            let id = self.fresh_id();
            expr = Expr::Logical { id, left: Box::new(expr), operator, right: Box::new(right) };
        }
        Ok(expr)
    }

    fn equality(&mut self) -> ParseResult<Expr> {
        let mut expr = self.comparison()?;
        while self.matches(&[Type::BangEqual, Type::EqualEqual]) {
            let operator = self.previous().clone();
            let right = self.comparison()?;
            let id = self.fresh_id();
            expr = Expr::Binary { id, left: Box::new(expr), operator, right: Box::new(right) };
        }
        Ok(expr)
    }

    fn comparison(&mut self) -> ParseResult<Expr> {
        let mut expr = self.term()?;
        while self.matches(&[Type::Greater, Type::GreaterEqual, Type::Less, Type::LessEqual]) {
            let operator = self.previous().clone();
            let right = self.term()?;
            let id = self.fresh_id();
            expr = Expr::Binary { id, left: Box::new(expr), operator, right: Box::new(right) };
        }
        Ok(expr)
    }

    fn term(&mut self) -> ParseResult<Expr> {
        let mut expr = self.factor()?;
        while self.matches(&[Type::Minus, Type::Plus]) {
            let operator = self.previous().clone();
            let right = self.factor()?;
            let id = self.fresh_id();
            expr = Expr::Binary { id, left: Box::new(expr), operator, right: Box::new(right) };
        }
        Ok(expr)
    }

    fn factor(&mut self) -> ParseResult<Expr> {
        let mut expr = self.unary()?;
        while self.matches(&[Type::Slash, Type::Star]) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            let id = self.fresh_id();
            expr = Expr::Binary { id, left: Box::new(expr), operator, right: Box::new(right) };
        }
        Ok(expr)
    }

    fn unary(&mut self) -> ParseResult<Expr> {
        if self.matches(&[Type::Bang, Type::Minus]) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            let id = self.fresh_id();
            return Ok(Expr::Unary { id, operator, right: Box::new(right) });
        }
        self.call()
    }

    fn call(&mut self) -> ParseResult<Expr> {
        let mut expr = self.primary()?;

        loop {
            if self.matches(&[Type::LeftParen]) {
                expr = self.finish_call(expr)?;
            } else if self.matches(&[Type::Dot]) {
                let name = self.consume(Type::Identifier, "Expect property name after '.'.")?.clone();
                let id = self.fresh_id();
                expr = Expr::Get { id, object: Box::new(expr), name };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        let mut arguments = Vec::new();
        if !self.check(Type::RightParen) {
            loop {
                if arguments.len() >= MAX_ARGS {
                    self.diagnostics.parse_error(self.peek(), "Can't have more than 255 arguments.");
                }
                arguments.push(self.expression()?);
                if !self.matches(&[Type::Comma]) {
                    break;
                }
            }
        }

        let paren = self.consume(Type::RightParen, "Expect ')' after arguments.")?.clone();
        let id = self.fresh_id();
        Ok(Expr::Call { id, callee: Box::new(callee), paren, arguments })
    }

    fn primary(&mut self) -> ParseResult<Expr> {
        if self.matches(&[Type::False]) {
            let id = self.fresh_id();
            return Ok(Expr::Literal { id, value: Literal::Bool(false) });
        }
        if self.matches(&[Type::True]) {
            let id = self.fresh_id();
            return Ok(Expr::Literal { id, value: Literal::Bool(true) });
        }
        if self.matches(&[Type::Nil]) {
            let id = self.fresh_id();
            return Ok(Expr::Literal { id, value: Literal::Nil });
        }
        if self.matches(&[Type::Number, Type::String]) {
            let value = self.previous().literal.clone().expect("number/string token to carry a literal");
            let id = self.fresh_id();
            return Ok(Expr::Literal { id, value });
        }
        if self.matches(&[Type::Super]) {
            let keyword = self.previous().clone();
            self.consume(Type::Dot, "Expect '.' after 'super'.")?;
            let method = self.consume(Type::Identifier, "Expect superclass method name.")?.clone();
            let id = self.fresh_id();
            return Ok(Expr::Super { id, keyword, method });
        }
        if self.matches(&[Type::This]) {
            let keyword = self.previous().clone();
            let id = self.fresh_id();
            return Ok(Expr::This { id, keyword });
        }
        if self.matches(&[Type::Identifier]) {
            let name = self.previous().clone();
            let id = self.fresh_id();
            return Ok(Expr::Variable { id, name });
        }
        if self.matches(&[Type::LeftParen]) {
            let expr = self.expression()?;
            self.consume(Type::RightParen, "Expect ')' after expression.")?;
            let id = self.fresh_id();
            return Ok(Expr::Grouping { id, expr: Box::new(expr) });
        }

        self.error(self.peek().clone(), "Expect expression.")
    }
}
