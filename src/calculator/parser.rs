//! Recursive-descent evaluator for calculator expressions.
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | power
//! power   := primary ('**' unary)?
//! primary := number | '(' expr ')'
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("Unexpected character '{0}' at {1}")]
    UnexpectedChar(char, usize),

    #[error("Invalid number '{0}'")]
    InvalidNumber(String),

    #[error("Unexpected end of expression")]
    UnexpectedEnd,

    #[error("Unexpected token at {0}")]
    UnexpectedToken(usize),

    #[error("Result is not a finite number")]
    NotFinite,

    #[error("Unknown key '{0}'")]
    UnknownKey(String),

    #[error("Unknown function '{0}'")]
    UnknownFunction(String),
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Power,
    Open,
    Close,
}

fn tokenize(input: &str) -> Result<Vec<(Token, usize)>, CalcError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let start = i;

        let token = match c {
            ' ' | '\t' | '\n' => {
                i += 1;
                continue;
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '/' | '÷' => Token::Slash,
            '*' | '×' if chars.get(i + 1) == Some(&'*') => {
                i += 1;
                Token::Power
            }
            '*' | '×' => Token::Star,
            '(' => Token::Open,
            ')' => Token::Close,
            '0'..='9' | '.' => {
                while i + 1 < chars.len() && (chars[i + 1].is_ascii_digit() || chars[i + 1] == '.')
                {
                    i += 1;
                }
                // Exponent part, as produced by the result formatter.
                if i + 1 < chars.len() && matches!(chars[i + 1], 'e' | 'E') {
                    let mut j = i + 2;
                    if j < chars.len() && matches!(chars[j], '+' | '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        while j + 1 < chars.len() && chars[j + 1].is_ascii_digit() {
                            j += 1;
                        }
                        i = j;
                    }
                }

                let text: String = chars[start..=i].iter().collect();
                let value = text
                    .parse::<f64>()
                    .map_err(|_| CalcError::InvalidNumber(text.clone()))?;
                Token::Number(value)
            }
            other => return Err(CalcError::UnexpectedChar(other, start)),
        };

        tokens.push((token, start));
        i += 1;
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(t, _)| t.clone());
        self.pos += 1;
        token
    }

    fn error_here(&self) -> CalcError {
        match self.tokens.get(self.pos) {
            Some((_, offset)) => CalcError::UnexpectedToken(*offset),
            None => CalcError::UnexpectedEnd,
        }
    }

    fn expr(&mut self) -> Result<f64, CalcError> {
        let mut value = self.term()?;

        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    value += self.term()?;
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<f64, CalcError> {
        let mut value = self.unary()?;

        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    value *= self.unary()?;
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    value /= self.unary()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn unary(&mut self) -> Result<f64, CalcError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(-self.unary()?)
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<f64, CalcError> {
        let base = self.primary()?;

        if let Some(Token::Power) = self.peek() {
            self.pos += 1;
            let exponent = self.unary()?;
            return Ok(base.powf(exponent));
        }

        Ok(base)
    }

    fn primary(&mut self) -> Result<f64, CalcError> {
        match self.peek() {
            Some(Token::Number(_)) => match self.next() {
                Some(Token::Number(value)) => Ok(value),
                _ => Err(CalcError::UnexpectedEnd),
            },
            Some(Token::Open) => {
                self.pos += 1;
                let value = self.expr()?;
                match self.peek() {
                    Some(Token::Close) => {
                        self.pos += 1;
                        Ok(value)
                    }
                    _ => Err(self.error_here()),
                }
            }
            _ => Err(self.error_here()),
        }
    }
}

/// Evaluates `input`. Division by zero and other non-finite results are
/// errors.
pub fn evaluate(input: &str) -> Result<f64, CalcError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser { tokens, pos: 0 };

    let value = parser.expr()?;
    if parser.pos < parser.tokens.len() {
        return Err(parser.error_here());
    }

    if !value.is_finite() {
        return Err(CalcError::NotFinite);
    }

    Ok(value)
}
