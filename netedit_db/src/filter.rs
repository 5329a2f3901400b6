//! Property filter expressions.
//!
//! Grammar:
//!
//! ```text
//! expr  := and ( "||" and )*
//! and   := unary ( "&&" unary )*
//! unary := "!" unary | "(" expr ")" | KEY [ op value ]
//! op    := "==" | "!=" | "=~" | "!~" | "<" | "<=" | ">" | ">="
//! value := WORD | "quoted string"
//! ```
//!
//! A bare `KEY` holds when the property is set and truthy. `=~` and `!~` are
//! glob matches. Ordering operators compare integers and are false otherwise.

use lazy_static::lazy_static;
use netedit_common::{NamePattern, PropertyKey, PropertyValue};
use regex::Regex;

use crate::DbError;

lazy_static! {
    static ref TOKEN_RE: Regex = Regex::new(
        r#"^\s*(?:(?P<op>==|!=|=~|!~|<=|>=|<|>|&&|\|\||!|\(|\))|"(?P<str>(?:[^"\\]|\\.)*)"|(?P<word>[^\s()!=<>&|"]+))"#
    )
    .unwrap();
}

/// Comparison operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CmpOp {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `=~`
    Glob,
    /// `!~`
    NotGlob,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Token {
    And,
    Or,
    Not,
    LParen,
    RParen,
    Cmp(CmpOp),
    Str(String),
    Word(String),
}

/// A parsed filter expression.
#[derive(Clone, Debug)]
pub enum Filter {
    /// Both sides hold.
    And(Box<Filter>, Box<Filter>),
    /// Either side holds.
    Or(Box<Filter>, Box<Filter>),
    /// The inner expression does not hold.
    Not(Box<Filter>),
    /// The property is set and truthy.
    Test(PropertyKey),
    /// The property compares against a literal.
    Compare {
        /// Property read from the object.
        key: PropertyKey,
        /// Comparison.
        op: CmpOp,
        /// Literal right-hand side.
        value: String,
        /// Compiled glob for `=~` / `!~`.
        glob: Option<NamePattern>,
    },
}

impl Filter {
    /// Parses a filter expression.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::InvalidFilter`] describing the first syntax error.
    pub fn parse(text: &str, nocase: bool) -> Result<Self, DbError> {
        let tokens = tokenize(text)?;
        if tokens.is_empty() {
            return Err(DbError::invalid_filter("empty filter expression"));
        }
        let mut parser = Parser {
            tokens,
            pos: 0,
            nocase,
        };
        let expr = parser.or_expr()?;
        if let Some(tok) = parser.peek() {
            return Err(DbError::invalid_filter(format!(
                "unexpected {tok:?} after complete expression in '{text}'"
            )));
        }
        Ok(expr)
    }

    /// Evaluates the filter against an object's properties.
    pub fn eval<F>(&self, lookup: &F, nocase: bool) -> bool
    where
        F: Fn(&PropertyKey) -> Option<PropertyValue>,
    {
        match self {
            Self::And(a, b) => a.eval(lookup, nocase) && b.eval(lookup, nocase),
            Self::Or(a, b) => a.eval(lookup, nocase) || b.eval(lookup, nocase),
            Self::Not(inner) => !inner.eval(lookup, nocase),
            Self::Test(key) => lookup(key).is_some_and(|v| v.is_truthy()),
            Self::Compare { key, op, value, glob } => {
                compare(lookup(key).as_ref(), *op, value, glob.as_ref(), nocase)
            }
        }
    }
}

fn compare(actual: Option<&PropertyValue>, op: CmpOp, expected: &str, glob: Option<&NamePattern>, nocase: bool) -> bool {
    let Some(actual) = actual else {
        return matches!(op, CmpOp::Ne | CmpOp::NotGlob);
    };
    match op {
        CmpOp::Eq => values_equal(actual, expected, nocase),
        CmpOp::Ne => !values_equal(actual, expected, nocase),
        CmpOp::Glob => glob.is_some_and(|g| g.matches(&actual.to_string())),
        CmpOp::NotGlob => !glob.is_some_and(|g| g.matches(&actual.to_string())),
        CmpOp::Lt | CmpOp::Le | CmpOp::Gt | CmpOp::Ge => {
            let (Some(lhs), Ok(rhs)) = (actual.as_int(), expected.trim().parse::<i64>()) else {
                return false;
            };
            match op {
                CmpOp::Lt => lhs < rhs,
                CmpOp::Le => lhs <= rhs,
                CmpOp::Gt => lhs > rhs,
                _ => lhs >= rhs,
            }
        }
    }
}

fn values_equal(actual: &PropertyValue, expected: &str, nocase: bool) -> bool {
    match actual {
        PropertyValue::Bool(b) => match expected.to_ascii_lowercase().as_str() {
            "true" | "1" => *b,
            "false" | "0" => !*b,
            _ => false,
        },
        PropertyValue::Int(n) => expected.trim().parse::<i64>().is_ok_and(|e| e == *n),
        PropertyValue::Str(s) if nocase => s.eq_ignore_ascii_case(expected),
        PropertyValue::Str(s) => s == expected,
    }
}

fn tokenize(text: &str) -> Result<Vec<Token>, DbError> {
    let mut tokens = Vec::new();
    let mut rest = text;
    while !rest.trim_start().is_empty() {
        let caps = TOKEN_RE.captures(rest).ok_or_else(|| {
            let offset = text.len() - rest.trim_start().len();
            DbError::invalid_filter(format!("unexpected character at offset {offset} in '{text}'"))
        })?;
        let token = if let Some(op) = caps.name("op") {
            match op.as_str() {
                "&&" => Token::And,
                "||" => Token::Or,
                "!" => Token::Not,
                "(" => Token::LParen,
                ")" => Token::RParen,
                "==" => Token::Cmp(CmpOp::Eq),
                "!=" => Token::Cmp(CmpOp::Ne),
                "=~" => Token::Cmp(CmpOp::Glob),
                "!~" => Token::Cmp(CmpOp::NotGlob),
                "<" => Token::Cmp(CmpOp::Lt),
                "<=" => Token::Cmp(CmpOp::Le),
                ">" => Token::Cmp(CmpOp::Gt),
                _ => Token::Cmp(CmpOp::Ge),
            }
        } else if let Some(s) = caps.name("str") {
            Token::Str(s.as_str().replace("\\\"", "\"").replace("\\\\", "\\"))
        } else {
            Token::Word(caps["word"].to_string())
        };
        tokens.push(token);
        let consumed = caps.get(0).map_or(rest.len(), |m| m.end());
        rest = &rest[consumed..];
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    nocase: bool,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        tok
    }

    fn or_expr(&mut self) -> Result<Filter, DbError> {
        let mut lhs = self.and_expr()?;
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            let rhs = self.and_expr()?;
            lhs = Filter::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn and_expr(&mut self) -> Result<Filter, DbError> {
        let mut lhs = self.unary()?;
        while self.peek() == Some(&Token::And) {
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Filter::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Filter, DbError> {
        match self.next() {
            Some(Token::Not) => Ok(Filter::Not(Box::new(self.unary()?))),
            Some(Token::LParen) => {
                let inner = self.or_expr()?;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    other => Err(DbError::invalid_filter(format!("expected ')', found {other:?}"))),
                }
            }
            Some(Token::Word(key)) => self.comparison(PropertyKey::parse(&key)),
            other => Err(DbError::invalid_filter(format!("expected property name, found {other:?}"))),
        }
    }

    fn comparison(&mut self, key: PropertyKey) -> Result<Filter, DbError> {
        let Some(Token::Cmp(op)) = self.peek().cloned() else {
            return Ok(Filter::Test(key));
        };
        self.pos += 1;
        let value = match self.next() {
            Some(Token::Word(v) | Token::Str(v)) => v,
            other => {
                return Err(DbError::invalid_filter(format!(
                    "expected value after {key} {op:?}, found {other:?}"
                )));
            }
        };
        let glob = match op {
            CmpOp::Glob | CmpOp::NotGlob => Some(NamePattern::glob(&value, self.nocase)?),
            _ => None,
        };
        Ok(Filter::Compare { key, op, value, glob })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netedit_common::PropertyMap;
    use rstest::rstest;

    fn props() -> PropertyMap {
        [
            ("REF_NAME", PropertyValue::from("LUT2")),
            ("IS_PRIMITIVE", PropertyValue::Bool(true)),
            ("IS_BEL_FIXED", PropertyValue::Bool(false)),
            ("INIT", PropertyValue::Int(6)),
            ("COMMENT", PropertyValue::from("")),
        ]
        .into_iter()
        .collect()
    }

    fn holds(expr: &str) -> bool {
        let map = props();
        Filter::parse(expr, false)
            .unwrap()
            .eval(&|k: &PropertyKey| map.get(k).cloned(), false)
    }

    #[rstest]
    #[case::bare_true("IS_PRIMITIVE", true)]
    #[case::bare_false("IS_BEL_FIXED", false)]
    #[case::bare_empty("COMMENT", false)]
    #[case::bare_unset("LOC", false)]
    #[case::eq_string("REF_NAME == LUT2", true)]
    #[case::eq_quoted(r#"REF_NAME == "LUT2""#, true)]
    #[case::ne_unset("LOC != X0Y0", true)]
    #[case::glob("REF_NAME =~ LUT*", true)]
    #[case::not_glob("REF_NAME !~ FD*", true)]
    #[case::bool_eq("IS_PRIMITIVE == true", true)]
    #[case::int_lt("INIT < 7", true)]
    #[case::int_ge("INIT >= 7", false)]
    #[case::and_or("REF_NAME == FDRE || IS_PRIMITIVE && INIT == 6", true)]
    #[case::not_paren("!(REF_NAME == LUT2 && IS_PRIMITIVE)", false)]
    #[case::lower_case_key("ref_name == LUT2", true)]
    fn evaluates(#[case] expr: &str, #[case] expected: bool) {
        assert_eq!(holds(expr), expected, "{expr}");
    }

    #[rstest]
    #[case::empty("")]
    #[case::dangling_and("IS_PRIMITIVE &&")]
    #[case::missing_value("REF_NAME ==")]
    #[case::unbalanced("(IS_PRIMITIVE")]
    #[case::extra_paren("IS_PRIMITIVE)")]
    #[case::unterminated_string(r#"REF_NAME == "LUT"#)]
    #[case::operator_first("== LUT2")]
    fn rejects_malformed(#[case] expr: &str) {
        assert!(matches!(Filter::parse(expr, false), Err(DbError::InvalidFilter(_))), "{expr}");
    }

    #[test]
    fn nocase_equality() {
        let map = props();
        let f = Filter::parse("REF_NAME == lut2", true).unwrap();
        assert!(f.eval(&|k: &PropertyKey| map.get(k).cloned(), true));
        assert!(!f.eval(&|k: &PropertyKey| map.get(k).cloned(), false));
    }
}
