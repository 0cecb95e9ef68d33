// Recursive-descent parser: one function per production rule, over a
// peekable token queue. Two tokens of lookahead are enough to tell a
// function call from an expression.
//
// Parsing checks syntax and builds the program graph in one pass.
// if/elif/else chains are syntax-checked but lowered to Pass: the
// evaluator has no conditional semantics, while the grammar still
// admits them.

use std::fmt;
use std::io::BufRead;

use crate::ast::*;
use crate::scanner::{self, ScanError, Token, TokenKind};


// The first syntax error wins; Display produces the exact diagnostic
// line written to the console.
#[derive(Clone, Debug, PartialEq)]
pub struct SyntaxError {
    pub expected: String,
    pub found: String,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "**SYNTAX ERROR @ ({},{}): expected {}, found '{}'",
            self.line, self.col, self.expected, self.found
        )
    }
}

impl From<ScanError> for SyntaxError {
    fn from(e: ScanError) -> SyntaxError {
        SyntaxError {
            expected: String::from("a valid token"),
            found: e.text,
            line: e.line,
            col: e.col,
        }
    }
}

pub type ParseResult<T> = Result<T, SyntaxError>;


// A peekable queue over the scanned tokens. The scanner guarantees
// the final token is Eos, so peeking past the end just sees Eos.
struct TokenQueue {
    tokens: Seq<Token>,
    pos: usize,
}

impl TokenQueue {
    fn new(tokens: Seq<Token>) -> TokenQueue {
        TokenQueue { tokens, pos: 0 }
    }

    fn at(&self, offset: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + offset).min(last)]
    }

    fn peek(&self) -> &Token {
        self.at(0)
    }

    fn peek2(&self) -> &Token {
        self.at(1)
    }

    fn next(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }
}


pub struct Parser {
    tokens: TokenQueue,
}


// Scan and parse a whole program from the given source.
pub fn parse(input: &mut impl BufRead) -> ParseResult<Program> {
    let tokens = scanner::scan(input)?;
    Parser::new(tokens).parse_program()
}


impl Parser {
    pub fn new(tokens: Seq<Token>) -> Parser {
        Parser { tokens: TokenQueue::new(tokens) }
    }

    fn error(&self, expected: &str) -> SyntaxError {
        let found = self.tokens.peek();
        SyntaxError {
            expected: String::from(expected),
            found: found.text.clone(),
            line: found.line,
            col: found.col,
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> ParseResult<Token> {
        if self.tokens.peek().kind != kind {
            return Err(self.error(what));
        }
        Ok(self.tokens.next())
    }

    // Consume the token if it has the given kind.
    fn accept(&mut self, kind: TokenKind) -> Option<Token> {
        if self.tokens.peek().kind == kind {
            Some(self.tokens.next())
        } else {
            None
        }
    }

    fn skip_blank_lines(&mut self) {
        while self.accept(TokenKind::Eoln).is_some() {}
    }

    fn is_statement_start(&self) -> bool {
        matches!(
            self.tokens.peek().kind,
            TokenKind::Identifier
                | TokenKind::KeywPass
                | TokenKind::KeywWhile
                | TokenKind::KeywIf
        )
    }

    pub fn parse_program(&mut self) -> ParseResult<Program> {
        let program = self.parse_statement_list()?;
        self.expect(TokenKind::Eos, "$")?;
        Ok(program)
    }

    fn parse_statement_list(&mut self) -> ParseResult<Seq<Stmt>> {
        let mut stmts = Vec::new();
        self.skip_blank_lines();
        stmts.push(self.parse_statement()?);
        loop {
            self.skip_blank_lines();
            if self.is_statement_start() {
                stmts.push(self.parse_statement()?);
            } else {
                return Ok(stmts);
            }
        }
    }

    fn parse_statement(&mut self) -> ParseResult<Stmt> {
        match self.tokens.peek().kind {
            TokenKind::Identifier => {
                if self.tokens.peek2().kind == TokenKind::LeftParen {
                    self.parse_call_statement()
                } else {
                    self.parse_assignment()
                }
            }
            TokenKind::KeywPass => {
                let token = self.tokens.next();
                self.expect(TokenKind::Eoln, "EOLN")?;
                Ok(Stmt { line: token.line, kind: StmtKind::Pass })
            }
            TokenKind::KeywWhile => self.parse_while_loop(),
            TokenKind::KeywIf => self.parse_if_statement(),
            _ => Err(self.error("a statement")),
        }
    }

    fn parse_assignment(&mut self) -> ParseResult<Stmt> {
        let name = self.expect(TokenKind::Identifier, "IDENTIFIER")?;
        self.expect(TokenKind::Equal, "=")?;
        let rhs = self.parse_value()?;
        self.expect(TokenKind::Eoln, "EOLN")?;
        Ok(Stmt {
            line: name.line,
            kind: StmtKind::Assignment { var_name: name.text, rhs },
        })
    }

    fn parse_value(&mut self) -> ParseResult<RValue> {
        if self.tokens.peek().kind == TokenKind::Identifier
            && self.tokens.peek2().kind == TokenKind::LeftParen
        {
            Ok(RValue::Call(self.parse_function_call()?))
        } else {
            Ok(RValue::Expr(self.parse_expression()?))
        }
    }

    fn parse_function_call(&mut self) -> ParseResult<FunctionCall> {
        let name = self.expect(TokenKind::Identifier, "IDENTIFIER")?;
        self.expect(TokenKind::LeftParen, "(")?;
        let parameter = if self.tokens.peek().kind == TokenKind::RightParen {
            None
        } else {
            Some(self.parse_element()?)
        };
        self.expect(TokenKind::RightParen, ")")?;
        Ok(FunctionCall { name: name.text, parameter })
    }

    fn parse_call_statement(&mut self) -> ParseResult<Stmt> {
        let line = self.tokens.peek().line;
        let call = self.parse_function_call()?;
        self.expect(TokenKind::Eoln, "EOLN")?;
        Ok(Stmt { line, kind: StmtKind::FunctionCall(call) })
    }

    fn parse_expression(&mut self) -> ParseResult<Expr> {
        let lhs = self.parse_unary_expression()?;
        match self.parse_operator() {
            Some(op) => {
                let rhs = self.parse_unary_expression()?;
                Ok(Expr::Binary(lhs, op, rhs))
            }
            None => Ok(Expr::Unary(lhs)),
        }
    }

    // A leading sign is only allowed on a numeric literal, and folds
    // into the literal text so the evaluator never sees a prefix
    // operator.
    fn parse_unary_expression(&mut self) -> ParseResult<Element> {
        let sign = match self.tokens.peek().kind {
            TokenKind::Plus | TokenKind::Minus => self.tokens.next().text,
            _ => return self.parse_element(),
        };
        let literal = self.tokens.next();
        match literal.kind {
            TokenKind::IntLiteral => {
                Ok(Element::IntLiteral(sign + &literal.text))
            }
            TokenKind::RealLiteral => {
                Ok(Element::RealLiteral(sign + &literal.text))
            }
            _ => Err(SyntaxError {
                expected: String::from("a numeric literal"),
                found: literal.text,
                line: literal.line,
                col: literal.col,
            }),
        }
    }

    fn parse_element(&mut self) -> ParseResult<Element> {
        let token = self.tokens.peek().clone();
        let element = match token.kind {
            TokenKind::Identifier => Element::Identifier(token.text),
            TokenKind::IntLiteral => Element::IntLiteral(token.text),
            TokenKind::RealLiteral => Element::RealLiteral(token.text),
            TokenKind::StrLiteral => Element::StrLiteral(token.text),
            TokenKind::KeywTrue => Element::True,
            TokenKind::KeywFalse => Element::False,
            TokenKind::KeywNone => Element::None,
            _ => return Err(self.error("an element")),
        };
        self.tokens.next();
        Ok(element)
    }

    fn parse_operator(&mut self) -> Option<Operator> {
        let op = match self.tokens.peek().kind {
            TokenKind::Plus => Operator::Plus,
            TokenKind::Minus => Operator::Minus,
            TokenKind::Asterisk => Operator::Asterisk,
            TokenKind::Power => Operator::Power,
            TokenKind::Percent => Operator::Mod,
            TokenKind::Slash => Operator::Div,
            TokenKind::EqualEqual => Operator::Equal,
            TokenKind::NotEqual => Operator::NotEqual,
            TokenKind::Lt => Operator::Lt,
            TokenKind::Lte => Operator::Lte,
            TokenKind::Gt => Operator::Gt,
            TokenKind::Gte => Operator::Gte,
            TokenKind::KeywIs => Operator::Is,
            TokenKind::KeywIn => Operator::In,
            _ => return None,
        };
        self.tokens.next();
        Some(op)
    }

    fn parse_while_loop(&mut self) -> ParseResult<Stmt> {
        let keyword = self.expect(TokenKind::KeywWhile, "while")?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::Colon, ":")?;
        self.expect(TokenKind::Eoln, "EOLN")?;
        let body = self.parse_block()?;
        Ok(Stmt {
            line: keyword.line,
            kind: StmtKind::WhileLoop { condition, body },
        })
    }

    fn parse_block(&mut self) -> ParseResult<Seq<Stmt>> {
        self.expect(TokenKind::LeftBrace, "{")?;
        self.expect(TokenKind::Eoln, "EOLN")?;
        let body = self.parse_statement_list()?;
        self.expect(TokenKind::RightBrace, "}")?;
        self.accept(TokenKind::Eoln);
        Ok(body)
    }

    // Conditionals parse fully, then vanish from the graph.
    fn parse_if_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.expect(TokenKind::KeywIf, "if")?;
        self.parse_expression()?;
        self.expect(TokenKind::Colon, ":")?;
        self.expect(TokenKind::Eoln, "EOLN")?;
        self.parse_block()?;
        while self.accept(TokenKind::KeywElif).is_some() {
            self.parse_expression()?;
            self.expect(TokenKind::Colon, ":")?;
            self.expect(TokenKind::Eoln, "EOLN")?;
            self.parse_block()?;
        }
        if self.accept(TokenKind::KeywElse).is_some() {
            self.expect(TokenKind::Colon, ":")?;
            self.expect(TokenKind::Eoln, "EOLN")?;
            self.parse_block()?;
        }
        Ok(Stmt { line: keyword.line, kind: StmtKind::Pass })
    }
}
