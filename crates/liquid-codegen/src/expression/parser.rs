//! Recursive descent parser for template expressions.

use super::ast::{BinaryOp, Expr, LogicalOp, TemplatePart, UnaryOp};
use super::lexer::{tokenize, Spanned, TemplateChunk, Token};
use super::SyntaxError;

/// Parse a complete expression.
pub fn parse_expression(source: &str) -> Result<Expr, SyntaxError> {
    let tokens = tokenize(source)?;
    if tokens.is_empty() {
        return Err(SyntaxError::new("empty expression", 0));
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        end: source.len(),
    };
    let expr = parser.ternary()?;
    match parser.tokens.get(parser.pos) {
        Some(stray) => Err(SyntaxError::new(
            format!("unexpected {}", describe(&stray.token)),
            stray.offset,
        )),
        None => Ok(expr),
    }
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|s| &s.token)
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.end, |s| s.offset)
    }

    fn next(&mut self) -> Option<Spanned> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, punct: &'static str) -> bool {
        if self.peek() == Some(&Token::Punct(punct)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, punct: &'static str) -> Result<(), SyntaxError> {
        if self.eat(punct) {
            return Ok(());
        }
        let found = self.peek().map_or("end of expression".to_string(), describe);
        Err(SyntaxError::new(
            format!("expected `{}`, found {}", punct, found),
            self.offset(),
        ))
    }

    fn ternary(&mut self) -> Result<Expr, SyntaxError> {
        let test = self.logical_or()?;
        if !self.eat("?") {
            return Ok(test);
        }
        let consequent = self.ternary()?;
        self.expect(":")?;
        let alternate = self.ternary()?;
        Ok(Expr::Conditional {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        })
    }

    fn logical_or(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.logical_and()?;
        while self.eat("||") || self.eat("??") {
            let right = self.logical_and()?;
            left = logical(LogicalOp::Or, left, right);
        }
        Ok(left)
    }

    fn logical_and(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.equality()?;
        while self.eat("&&") {
            let right = self.equality()?;
            left = logical(LogicalOp::And, left, right);
        }
        Ok(left)
    }

    fn equality(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.relational()?;
        loop {
            let op = if self.eat("===") || self.eat("==") {
                BinaryOp::Eq
            } else if self.eat("!==") || self.eat("!=") {
                BinaryOp::NotEq
            } else {
                return Ok(left);
            };
            let right = self.relational()?;
            left = binary(op, left, right);
        }
    }

    fn relational(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.additive()?;
        loop {
            let op = if self.eat("<=") {
                BinaryOp::Le
            } else if self.eat(">=") {
                BinaryOp::Ge
            } else if self.eat("<") {
                BinaryOp::Lt
            } else if self.eat(">") {
                BinaryOp::Gt
            } else {
                return Ok(left);
            };
            let right = self.additive()?;
            left = binary(op, left, right);
        }
    }

    fn additive(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.multiplicative()?;
        loop {
            let op = if self.eat("+") {
                BinaryOp::Add
            } else if self.eat("-") {
                BinaryOp::Sub
            } else {
                return Ok(left);
            };
            let right = self.multiplicative()?;
            left = binary(op, left, right);
        }
    }

    fn multiplicative(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.unary()?;
        loop {
            let op = if self.eat("*") {
                BinaryOp::Mul
            } else if self.eat("/") {
                BinaryOp::Div
            } else if self.eat("%") {
                BinaryOp::Rem
            } else {
                return Ok(left);
            };
            let right = self.unary()?;
            left = binary(op, left, right);
        }
    }

    fn unary(&mut self) -> Result<Expr, SyntaxError> {
        if self.eat("!") {
            let operand = self.unary()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
            });
        }
        if self.eat("-") {
            return Ok(match self.unary()? {
                Expr::Number(n) => Expr::Number(format!("-{}", n)),
                operand => Expr::Unary {
                    op: UnaryOp::Neg,
                    operand: Box::new(operand),
                },
            });
        }
        if self.eat("+") {
            return self.unary();
        }
        self.postfix()
    }

    fn postfix(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.primary()?;
        loop {
            if self.eat("?.") {
                expr = if self.eat("(") {
                    self.call(expr)?
                } else if self.eat("[") {
                    self.index(expr)?
                } else {
                    self.member(expr)?
                };
            } else if self.eat(".") {
                expr = self.member(expr)?;
            } else if self.eat("[") {
                expr = self.index(expr)?;
            } else if self.eat("(") {
                expr = self.call(expr)?;
            } else {
                return Ok(expr);
            }
        }
    }

    fn member(&mut self, object: Expr) -> Result<Expr, SyntaxError> {
        let offset = self.offset();
        match self.next().map(|s| s.token) {
            Some(Token::Ident(property)) => Ok(Expr::Member {
                object: Box::new(object),
                property,
            }),
            other => Err(SyntaxError::new(
                format!(
                    "expected property name, found {}",
                    other.as_ref().map_or("end of expression".to_string(), describe)
                ),
                offset,
            )),
        }
    }

    fn index(&mut self, object: Expr) -> Result<Expr, SyntaxError> {
        let index = self.ternary()?;
        self.expect("]")?;
        Ok(Expr::Index {
            object: Box::new(object),
            index: Box::new(index),
        })
    }

    fn call(&mut self, callee: Expr) -> Result<Expr, SyntaxError> {
        let args = self.list(")")?;
        Ok(Expr::Call {
            callee: Box::new(callee),
            args,
        })
    }

    /// Comma separated expressions up to `close`, which is consumed.
    fn list(&mut self, close: &'static str) -> Result<Vec<Expr>, SyntaxError> {
        let mut items = Vec::new();
        while !self.eat(close) {
            items.push(self.ternary()?);
            if !self.eat(",") {
                self.expect(close)?;
                break;
            }
        }
        Ok(items)
    }

    fn primary(&mut self) -> Result<Expr, SyntaxError> {
        let offset = self.offset();
        let Some(spanned) = self.next() else {
            return Err(SyntaxError::new("unexpected end of expression", offset));
        };
        match spanned.token {
            Token::Ident(name) => Ok(match name.as_str() {
                "true" => Expr::Bool(true),
                "false" => Expr::Bool(false),
                "null" | "undefined" => Expr::Nil,
                _ => Expr::Ident(name),
            }),
            Token::Number(n) => Ok(Expr::Number(n)),
            Token::Str(s) => Ok(Expr::Str(s)),
            Token::Template(chunks) => template(chunks),
            Token::Punct("(") => {
                let inner = self.ternary()?;
                self.expect(")")?;
                Ok(inner)
            }
            Token::Punct("[") => Ok(Expr::Array(self.list("]")?)),
            Token::Punct("{") => self.object(),
            token => Err(SyntaxError::new(
                format!("unexpected {}", describe(&token)),
                offset,
            )),
        }
    }

    fn object(&mut self) -> Result<Expr, SyntaxError> {
        let mut entries = Vec::new();
        while !self.eat("}") {
            let offset = self.offset();
            let key = match self.next().map(|s| s.token) {
                Some(Token::Ident(key)) | Some(Token::Str(key)) | Some(Token::Number(key)) => key,
                other => {
                    return Err(SyntaxError::new(
                        format!(
                            "expected object key, found {}",
                            other.as_ref().map_or("end of expression".to_string(), describe)
                        ),
                        offset,
                    ))
                }
            };
            let value = if self.eat(":") {
                self.ternary()?
            } else {
                Expr::Ident(key.clone())
            };
            entries.push((key, value));
            if !self.eat(",") {
                self.expect("}")?;
                break;
            }
        }
        Ok(Expr::Object(entries))
    }
}

fn template(chunks: Vec<TemplateChunk>) -> Result<Expr, SyntaxError> {
    chunks
        .into_iter()
        .map(|chunk| match chunk {
            TemplateChunk::Text(text) => Ok(TemplatePart::Text(text)),
            TemplateChunk::Expr(source, offset) => parse_expression(&source)
                .map(TemplatePart::Expr)
                .map_err(|e| e.shifted(offset)),
        })
        .collect::<Result<_, _>>()
        .map(Expr::Template)
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn logical(op: LogicalOp, left: Expr, right: Expr) -> Expr {
    Expr::Logical {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Ident(name) => format!("`{}`", name),
        Token::Number(n) => format!("`{}`", n),
        Token::Str(_) => "string literal".to_string(),
        Token::Template(_) => "template literal".to_string(),
        Token::Punct(p) => format!("`{}`", p),
    }
}
