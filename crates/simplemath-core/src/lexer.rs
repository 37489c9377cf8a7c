//! Equation lexer.
//!
//! Splits an equation into classified tokens. Words are resolved against
//! the declared variable list here, so an unknown name fails before
//! parsing starts.

use std::f64::consts::PI;
use std::fmt;

use crate::error::MathError;

/// Built-in functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Atan2,
    Exp,
    Log,
    Abs,
    Mod,
    If,
}

impl Function {
    pub const ALL: [Function; 12] = [
        Function::Sin,
        Function::Cos,
        Function::Tan,
        Function::Asin,
        Function::Acos,
        Function::Atan,
        Function::Atan2,
        Function::Exp,
        Function::Log,
        Function::Abs,
        Function::Mod,
        Function::If,
    ];

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Asin => "asin",
            Self::Acos => "acos",
            Self::Atan => "atan",
            Self::Atan2 => "atan2",
            Self::Exp => "exp",
            Self::Log => "log",
            Self::Abs => "abs",
            Self::Mod => "mod",
            Self::If => "if",
        }
    }

    /// Number of arguments the function consumes.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::Atan2 | Self::Mod => 2,
            Self::If => 3,
            _ => 1,
        }
    }
}

/// Infix operators, arithmetic and logical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    And,
    Or,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl BinaryOp {
    const ALL: [BinaryOp; 13] = [
        BinaryOp::Add,
        BinaryOp::Sub,
        BinaryOp::Mul,
        BinaryOp::Div,
        BinaryOp::Pow,
        BinaryOp::And,
        BinaryOp::Or,
        BinaryOp::Eq,
        BinaryOp::Ne,
        BinaryOp::Lt,
        BinaryOp::Gt,
        BinaryOp::Le,
        BinaryOp::Ge,
    ];

    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == symbol)
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "^",
            Self::And => "&&",
            Self::Or => "||",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
        }
    }

    /// Binding strength; higher binds tighter. Prefix operators sit at
    /// [`UNARY_PRECEDENCE`], between `^` and `*`.
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Pow => 7,
            Self::Mul | Self::Div => 5,
            Self::Add | Self::Sub => 4,
            Self::Eq | Self::Ne | Self::Lt | Self::Gt | Self::Le | Self::Ge => 3,
            Self::And => 2,
            Self::Or => 1,
        }
    }

    #[must_use]
    pub const fn right_associative(self) -> bool {
        matches!(self, Self::Pow)
    }
}

/// Precedence of prefix `+` / `-`.
pub const UNARY_PRECEDENCE: u8 = 6;

/// Prefix sign operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Plus,
    Minus,
}

impl UnaryOp {
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    /// Literal or named constant (`pi`).
    Number(f64),
    /// Index into the declared variable list.
    Variable(usize),
    Unary(UnaryOp),
    Binary(BinaryOp),
    Function(Function),
    LParen,
    RParen,
    Comma,
}

impl Token {
    fn kind(&self) -> TokenKind {
        match self {
            Self::Number(_) | Self::Variable(_) => TokenKind::Operand,
            Self::Unary(_) => TokenKind::Unary,
            Self::Binary(_) => TokenKind::Binary,
            Self::Function(_) => TokenKind::Function,
            Self::LParen | Self::RParen => TokenKind::Paren,
            Self::Comma => TokenKind::Comma,
        }
    }

    /// True when a following `+`/`-` is an infix operator.
    fn ends_operand(&self) -> bool {
        matches!(self, Self::Number(_) | Self::Variable(_) | Self::RParen)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{v}"),
            Self::Variable(idx) => write!(f, "${idx}"),
            Self::Unary(op) => f.write_str(op.symbol()),
            Self::Binary(op) => f.write_str(op.symbol()),
            Self::Function(func) => f.write_str(func.name()),
            Self::LParen => f.write_str("("),
            Self::RParen => f.write_str(")"),
            Self::Comma => f.write_str(","),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Operand,
    Unary,
    Binary,
    Function,
    Paren,
    Comma,
}

/// Words that may not be used as variable names.
#[must_use]
pub fn is_reserved(word: &str) -> bool {
    word == "pi" || Function::from_name(word).is_some()
}

/// Returns true if `word` lexes as a single word token.
#[must_use]
pub fn is_identifier(word: &str) -> bool {
    let mut chars = word.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

/// Tokenize `equation`, resolving words against `variables`.
pub fn tokenize(equation: &str, variables: &[String]) -> Result<Vec<Token>, MathError> {
    let chars: Vec<char> = equation.chars().collect();
    let mut tokens: Vec<Token> = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let start = i;
        let token = if c.is_ascii_digit() || c == '.' {
            i = scan_number(&chars, i);
            let literal: String = chars[start..i].iter().collect();
            Token::Number(parse_number(&literal)?)
        } else if c.is_ascii_alphabetic() {
            while i < chars.len() && chars[i].is_ascii_alphanumeric() {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            classify_word(&word, variables)?
        } else if let Some(sep) = separator(c) {
            i += 1;
            sep
        } else if (c == '+' || c == '-') && !tokens.last().is_some_and(Token::ends_operand) {
            i += 1;
            Token::Unary(if c == '+' { UnaryOp::Plus } else { UnaryOp::Minus })
        } else if c.is_ascii_punctuation() {
            i += 1;
            // A sign after the first character starts a new (unary) token.
            while i < chars.len()
                && is_operator_char(chars[i])
                && chars[i] != '+'
                && chars[i] != '-'
            {
                i += 1;
            }
            let symbol: String = chars[start..i].iter().collect();
            match BinaryOp::from_symbol(&symbol) {
                Some(op) => Token::Binary(op),
                None => return Err(MathError::UnknownToken { token: symbol }),
            }
        } else {
            return Err(MathError::UnknownToken {
                token: c.to_string(),
            });
        };

        if let Some(prev) = tokens.last()
            && prev.kind() == token.kind()
            && token.kind() != TokenKind::Paren
        {
            return Err(MathError::UnexpectedToken {
                token: chars[start..i].iter().collect(),
            });
        }
        tokens.push(token);
    }

    if tokens.is_empty() {
        return Err(MathError::EmptyEquation);
    }
    Ok(tokens)
}

fn separator(c: char) -> Option<Token> {
    match c {
        '(' => Some(Token::LParen),
        ')' => Some(Token::RParen),
        ',' => Some(Token::Comma),
        _ => None,
    }
}

fn is_operator_char(c: char) -> bool {
    c.is_ascii_punctuation() && !matches!(c, '(' | ')' | ',' | '.')
}

/// Advance over a numeric literal: digits and dots, then an optional
/// `e`/`d` exponent with an optional sign.
fn scan_number(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
        i += 1;
    }
    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'd') {
        i += 1;
        if i < chars.len() && (chars[i] == '+' || chars[i] == '-') {
            i += 1;
        }
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
    }
    i
}

fn parse_number(literal: &str) -> Result<f64, MathError> {
    let normalized = literal.replace('d', "e");
    // Reject forms Rust accepts but the equation grammar does not ("inf", "1e").
    let valid_tail = normalized
        .rsplit('e')
        .next()
        .is_some_and(|tail| tail.chars().any(|c| c.is_ascii_digit()));
    match normalized.parse::<f64>() {
        Ok(value) if valid_tail => Ok(value),
        _ => Err(MathError::InvalidNumber {
            literal: literal.to_string(),
        }),
    }
}

fn classify_word(word: &str, variables: &[String]) -> Result<Token, MathError> {
    if let Some(func) = Function::from_name(word) {
        return Ok(Token::Function(func));
    }
    if word == "pi" {
        return Ok(Token::Number(PI));
    }
    variables
        .iter()
        .position(|v| v == word)
        .map(Token::Variable)
        .ok_or_else(|| MathError::UnknownToken {
            token: word.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(eq: &str) -> Result<Vec<Token>, MathError> {
        tokenize(eq, &["x".to_string(), "y2".to_string()])
    }

    #[test]
    fn numbers_with_exponents() {
        assert_eq!(lex("1.5").unwrap(), vec![Token::Number(1.5)]);
        assert_eq!(lex("1e2").unwrap(), vec![Token::Number(100.0)]);
        assert_eq!(lex("2.5d-1").unwrap(), vec![Token::Number(0.25)]);
        assert_eq!(lex("5e+1").unwrap(), vec![Token::Number(50.0)]);
        assert_eq!(lex(".5").unwrap(), vec![Token::Number(0.5)]);
    }

    #[test]
    fn invalid_numbers() {
        assert_eq!(
            lex("1.2.3"),
            Err(MathError::InvalidNumber {
                literal: "1.2.3".into()
            })
        );
        assert_eq!(
            lex("1e"),
            Err(MathError::InvalidNumber {
                literal: "1e".into()
            })
        );
        assert!(matches!(lex("."), Err(MathError::InvalidNumber { .. })));
    }

    #[test]
    fn unary_vs_binary_sign() {
        assert_eq!(
            lex("-x - 1").unwrap(),
            vec![
                Token::Unary(UnaryOp::Minus),
                Token::Variable(0),
                Token::Binary(BinaryOp::Sub),
                Token::Number(1.0),
            ]
        );
        assert_eq!(
            lex("2 * -3").unwrap(),
            vec![
                Token::Number(2.0),
                Token::Binary(BinaryOp::Mul),
                Token::Unary(UnaryOp::Minus),
                Token::Number(3.0),
            ]
        );
        assert_eq!(
            lex("(1)-2").unwrap()[3],
            Token::Binary(BinaryOp::Sub),
            "sign after ')' is infix"
        );
    }

    #[test]
    fn multi_char_operators() {
        let toks = lex("x<=1&&y2!=2||x>=0").unwrap();
        let ops: Vec<BinaryOp> = toks
            .iter()
            .filter_map(|t| match t {
                Token::Binary(op) => Some(*op),
                _ => None,
            })
            .collect();
        assert_eq!(
            ops,
            vec![
                BinaryOp::Le,
                BinaryOp::And,
                BinaryOp::Ne,
                BinaryOp::Or,
                BinaryOp::Ge
            ]
        );
        assert_eq!(lex("x<-1").unwrap()[2], Token::Unary(UnaryOp::Minus));
    }

    #[test]
    fn words_resolve() {
        assert_eq!(
            lex("atan2(y2, pi)").unwrap(),
            vec![
                Token::Function(Function::Atan2),
                Token::LParen,
                Token::Variable(1),
                Token::Comma,
                Token::Number(PI),
                Token::RParen,
            ]
        );
        assert_eq!(
            lex("z"),
            Err(MathError::UnknownToken { token: "z".into() })
        );
    }

    #[test]
    fn unknown_operators() {
        assert_eq!(
            lex("1 ** 2"),
            Err(MathError::UnknownToken { token: "**".into() })
        );
        assert_eq!(
            lex("1 <> 2"),
            Err(MathError::UnknownToken { token: "<>".into() })
        );
        assert_eq!(
            lex("x_1"),
            Err(MathError::UnknownToken { token: "_".into() })
        );
    }

    #[test]
    fn adjacent_tokens_of_same_kind_rejected() {
        assert!(matches!(lex("1 2"), Err(MathError::UnexpectedToken { .. })));
        assert!(matches!(lex("--1"), Err(MathError::UnexpectedToken { .. })));
        assert!(matches!(
            lex("sin cos(1)"),
            Err(MathError::UnexpectedToken { .. })
        ));
        assert!(lex("((1))").is_ok());
    }

    #[test]
    fn empty_input() {
        assert_eq!(lex(""), Err(MathError::EmptyEquation));
        assert_eq!(lex("   \t"), Err(MathError::EmptyEquation));
    }

    #[test]
    fn reserved_and_identifier_rules() {
        assert!(is_reserved("pi"));
        assert!(is_reserved("if"));
        assert!(is_reserved("atan2"));
        assert!(!is_reserved("x"));
        assert!(is_identifier("x1"));
        assert!(!is_identifier("1x"));
        assert!(!is_identifier("x_y"));
        assert!(!is_identifier(""));
    }
}
