//! Parser for one-line call expressions typed at the console
//!
//! ```text
//! line  := expr
//! expr  := NAME '.' NAME [ '(' [ expr { ',' expr } [','] ] ')' ]
//!        | INT | STRING | 'True' | 'False' | 'None'
//!        | '(' [ expr { ',' expr } [','] ] ')'
//!        | '[' [ expr { ',' expr } [','] ] ']'
//! ```

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::error::BadgeError;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    Tuple(Vec<Expr>),
    List(Vec<Expr>),
    Attr {
        module: String,
        name: String,
    },
    Call {
        module: String,
        name: String,
        args: Vec<Expr>,
    },
}

/// Parse a full line; trailing input is an error.
pub fn parse(line: &str) -> Result<Expr, BadgeError> {
    let mut parser = Parser::new(line);
    parser.skip_ws();
    if parser.at_end() {
        return Err(parser.error("empty input"));
    }
    let expr = parser.expr()?;
    parser.skip_ws();
    if !parser.at_end() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(expr)
}

/// Bracket nesting accepted before the parser gives up.
const MAX_DEPTH: usize = 16;

struct Parser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(line: &str) -> Self {
        Self {
            chars: line.chars().collect(),
            pos: 0,
            depth: 0,
        }
    }

    fn error(&self, message: impl Into<String>) -> BadgeError {
        BadgeError::Parse {
            column: self.pos + 1,
            message: message.into(),
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn expr(&mut self) -> Result<Expr, BadgeError> {
        self.skip_ws();
        match self.peek() {
            Some('(') => {
                self.pos += 1;
                let (items, trailing_comma) = self.items(')')?;
                if items.len() == 1 && !trailing_comma {
                    let mut items = items;
                    return items.pop().ok_or_else(|| self.error("empty group"));
                }
                Ok(Expr::Tuple(items))
            }
            Some('[') => {
                self.pos += 1;
                Ok(Expr::List(self.items(']')?.0))
            }
            Some('\'') | Some('"') => Ok(Expr::Literal(Value::Str(self.string()?))),
            Some(ch) if ch == '-' || ch.is_ascii_digit() => Ok(Expr::Literal(Value::Int(self.int()?))),
            Some(ch) if ch.is_alphabetic() || ch == '_' => self.name_expr(),
            Some(ch) => Err(self.error(format!("unexpected '{}'", ch))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    /// Comma separated items up to `close`; reports a trailing comma.
    fn items(&mut self, close: char) -> Result<(Vec<Expr>, bool), BadgeError> {
        if self.depth == MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        self.depth += 1;
        let result = self.items_inner(close);
        self.depth -= 1;
        result
    }

    fn items_inner(&mut self, close: char) -> Result<(Vec<Expr>, bool), BadgeError> {
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.pos += 1;
                let trailing_comma = !items.is_empty();
                return Ok((items, trailing_comma));
            }
            items.push(self.expr()?);
            self.skip_ws();
            match self.bump() {
                Some(',') => {}
                Some(ch) if ch == close => return Ok((items, false)),
                Some(ch) => {
                    self.pos -= 1;
                    return Err(self.error(format!("expected ',' or '{}', found '{}'", close, ch)));
                }
                None => return Err(self.error(format!("missing '{}'", close))),
            }
        }
    }

    fn ident(&mut self) -> Result<String, BadgeError> {
        self.skip_ws();
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|ch| ch.is_alphanumeric() || ch == '_')
        {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.error("expected a name"));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn name_expr(&mut self) -> Result<Expr, BadgeError> {
        let start = self.pos;
        let module = self.ident()?;
        match module.as_str() {
            "True" => return Ok(Expr::Literal(Value::Bool(true))),
            "False" => return Ok(Expr::Literal(Value::Bool(false))),
            "None" => return Ok(Expr::Literal(Value::None)),
            _ => {}
        }
        if self.peek() != Some('.') {
            self.pos = start;
            return Err(self.error(format!("bare name '{}', expected module.name", module)));
        }
        self.pos += 1;
        let name = self.ident()?;
        self.skip_ws();
        if self.peek() == Some('(') {
            self.pos += 1;
            let (args, _) = self.items(')')?;
            return Ok(Expr::Call { module, name, args });
        }
        Ok(Expr::Attr { module, name })
    }

    fn int(&mut self) -> Result<i64, BadgeError> {
        let start = self.pos;
        let negative = self.peek() == Some('-');
        if negative {
            self.pos += 1;
        }
        let radix = if self.peek() == Some('0')
            && matches!(self.chars.get(self.pos + 1), Some('x') | Some('X'))
        {
            self.pos += 2;
            16
        } else {
            10
        };
        let digits_start = self.pos;
        while self.peek().is_some_and(|ch| ch.is_digit(radix) || ch == '_') {
            self.pos += 1;
        }
        let digits: String = self.chars[digits_start..self.pos]
            .iter()
            .filter(|ch| **ch != '_')
            .collect();
        if digits.is_empty() {
            return Err(self.error("expected digits"));
        }
        let magnitude = i64::from_str_radix(&digits, radix).map_err(|_| BadgeError::Parse {
            column: start + 1,
            message: String::from("integer literal too large"),
        })?;
        Ok(if negative { -magnitude } else { magnitude })
    }

    fn string(&mut self) -> Result<String, BadgeError> {
        let start = self.pos;
        let quote = self.bump().ok_or_else(|| self.error("expected a string"))?;
        let mut out = String::new();
        loop {
            let ch = match self.bump() {
                Some(ch) => ch,
                None => {
                    return Err(BadgeError::Parse {
                        column: start + 1,
                        message: String::from("unterminated string"),
                    })
                }
            };
            if ch == quote {
                return Ok(out);
            }
            if ch != '\\' {
                out.push(ch);
                continue;
            }
            match self.bump() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some('0') => out.push('\0'),
                Some('x') => out.push(self.hex_escape()?),
                Some(c @ ('\\' | '\'' | '"')) => out.push(c),
                Some(c) => {
                    out.push('\\');
                    out.push(c);
                }
                None => return Err(self.error("unterminated escape")),
            }
        }
    }

    fn hex_escape(&mut self) -> Result<char, BadgeError> {
        let hi = self.bump().and_then(|c| c.to_digit(16));
        let lo = self.bump().and_then(|c| c.to_digit(16));
        match (hi, lo) {
            (Some(hi), Some(lo)) => char::from_u32(hi * 16 + lo).ok_or_else(|| self.error("bad escape")),
            _ => Err(self.error("invalid \\x escape")),
        }
    }
}

impl Expr {
    pub fn call(module: &str, name: &str, args: Vec<Expr>) -> Self {
        Expr::Call {
            module: String::from(module),
            name: String::from(name),
            args,
        }
    }
}
