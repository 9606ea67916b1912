//! Tokenizer for embedded template expressions.

use super::SyntaxError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    Number(String),
    /// String literal contents, escapes resolved.
    Str(String),
    Template(Vec<TemplateChunk>),
    Punct(&'static str),
}

/// A piece of a template literal.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateChunk {
    Text(String),
    /// Source of a `${…}` hole and its offset in the expression.
    Expr(String, usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub offset: usize,
}

/// Longest first.
const PUNCTUATORS: &[&str] = &[
    "===", "!==", "...", "=>", "==", "!=", "<=", ">=", "&&", "||", "??", "?.", "(", ")", "[", "]",
    "{", "}", ",", ":", "?", ".", "!", "+", "-", "*", "/", "%", "<", ">", "=",
];

pub fn tokenize(source: &str) -> Result<Vec<Spanned>, SyntaxError> {
    Lexer { source, pos: 0 }.run()
}

struct Lexer<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn run(mut self) -> Result<Vec<Spanned>, SyntaxError> {
        let mut tokens = Vec::new();
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
                continue;
            }
            let offset = self.pos;
            let token = if c.is_ascii_digit() {
                Token::Number(self.read_while(|c| c.is_ascii_digit() || c == '.').to_string())
            } else if c.is_alphabetic() || c == '_' || c == '$' {
                Token::Ident(
                    self.read_while(|c| c.is_alphanumeric() || c == '_' || c == '$')
                        .to_string(),
                )
            } else if c == '\'' || c == '"' {
                Token::Str(self.read_string(c)?)
            } else if c == '`' {
                Token::Template(self.read_template()?)
            } else {
                let rest = &self.source[self.pos..];
                let Some(&punct) = PUNCTUATORS.iter().find(|p| rest.starts_with(**p)) else {
                    return Err(SyntaxError::new(format!("unexpected character `{}`", c), offset));
                };
                self.pos += punct.len();
                Token::Punct(punct)
            };
            tokens.push(Spanned { token, offset });
        }
        Ok(tokens)
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn read_while<F: Fn(char) -> bool>(&mut self, pred: F) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.advance();
        }
        &self.source[start..self.pos]
    }

    fn read_string(&mut self, quote: char) -> Result<String, SyntaxError> {
        let start = self.pos;
        self.advance();
        let mut value = String::new();
        loop {
            match self.advance() {
                Some(c) if c == quote => return Ok(value),
                Some('\\') => match self.advance() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some(c) => value.push(c),
                    None => break,
                },
                Some(c) => value.push(c),
                None => break,
            }
        }
        Err(SyntaxError::new("unterminated string literal", start))
    }

    fn read_template(&mut self) -> Result<Vec<TemplateChunk>, SyntaxError> {
        let start = self.pos;
        self.advance();
        let mut chunks = Vec::new();
        let mut text = String::new();
        loop {
            match self.advance() {
                Some('`') => {
                    if !text.is_empty() {
                        chunks.push(TemplateChunk::Text(text));
                    }
                    return Ok(chunks);
                }
                Some('\\') => match self.advance() {
                    Some(c) => text.push(c),
                    None => break,
                },
                Some('$') if self.peek() == Some('{') => {
                    self.advance();
                    if !text.is_empty() {
                        chunks.push(TemplateChunk::Text(std::mem::take(&mut text)));
                    }
                    let hole_start = self.pos;
                    let hole_end = self.skip_hole()?;
                    chunks.push(TemplateChunk::Expr(
                        self.source[hole_start..hole_end].to_string(),
                        hole_start,
                    ));
                }
                Some(c) => text.push(c),
                None => break,
            }
        }
        Err(SyntaxError::new("unterminated template literal", start))
    }

    /// Skip to the `}` closing a `${` hole; returns its offset.
    fn skip_hole(&mut self) -> Result<usize, SyntaxError> {
        let start = self.pos;
        let mut depth = 0usize;
        while let Some(c) = self.peek() {
            match c {
                '\'' | '"' => {
                    self.read_string(c)?;
                    continue;
                }
                '`' => {
                    self.read_template()?;
                    continue;
                }
                '{' => depth += 1,
                '}' if depth == 0 => {
                    let end = self.pos;
                    self.advance();
                    return Ok(end);
                }
                '}' => depth -= 1,
                _ => {}
            }
            self.advance();
        }
        Err(SyntaxError::new("unterminated `${` in template literal", start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokens(source: &str) -> Vec<Token> {
        tokenize(source).unwrap().into_iter().map(|s| s.token).collect()
    }

    #[test]
    fn test_operators_take_longest_match() {
        assert_eq!(
            tokens("a?.b !== c"),
            vec![
                Token::Ident("a".into()),
                Token::Punct("?."),
                Token::Ident("b".into()),
                Token::Punct("!=="),
                Token::Ident("c".into()),
            ]
        );
    }

    #[test]
    fn test_strings_and_numbers() {
        assert_eq!(
            tokens(r#"'it\'s' + "x" + 1.5"#),
            vec![
                Token::Str("it's".into()),
                Token::Punct("+"),
                Token::Str("x".into()),
                Token::Punct("+"),
                Token::Number("1.5".into()),
            ]
        );
    }

    #[test]
    fn test_template_literal() {
        assert_eq!(
            tokens("`Hi ${user.name}!`"),
            vec![Token::Template(vec![
                TemplateChunk::Text("Hi ".into()),
                TemplateChunk::Expr("user.name".into(), 6),
                TemplateChunk::Text("!".into()),
            ])]
        );
    }

    #[test]
    fn test_template_hole_with_braces() {
        let result = tokens("`${ {a: 1}.a }`");
        assert_eq!(
            result,
            vec![Token::Template(vec![TemplateChunk::Expr(" {a: 1}.a ".into(), 3)])]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("'abc").unwrap_err();
        assert_eq!(err.offset, 0);
        assert!(err.message.contains("unterminated"));
    }

    #[test]
    fn test_unexpected_character() {
        assert!(tokenize("a # b").is_err());
    }
}
