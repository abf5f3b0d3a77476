//! Go build constraints
//!
//! Parses the `//go:build` expression and the older `// +build` lines that
//! may precede a file's package clause. A file with a `//go:build` line is
//! judged by that line alone; otherwise every `// +build` line must hold.

use thiserror::Error;

/// A parsed build constraint expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    Tag(String),
    Not(Box<Constraint>),
    And(Box<Constraint>, Box<Constraint>),
    Or(Box<Constraint>, Box<Constraint>),
}

impl Constraint {
    /// Evaluate with `has_tag` deciding each tag
    pub fn eval(&self, has_tag: &dyn Fn(&str) -> bool) -> bool {
        match self {
            Constraint::Tag(tag) => has_tag(tag),
            Constraint::Not(inner) => !inner.eval(has_tag),
            Constraint::And(left, right) => left.eval(has_tag) && right.eval(has_tag),
            Constraint::Or(left, right) => left.eval(has_tag) || right.eval(has_tag),
        }
    }

    fn and(left: Constraint, right: Constraint) -> Constraint {
        Constraint::And(Box::new(left), Box::new(right))
    }

    fn or(left: Constraint, right: Constraint) -> Constraint {
        Constraint::Or(Box::new(left), Box::new(right))
    }
}

/// A constraint line that could not be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid build constraint {line:?}: {message}")]
pub struct ConstraintError {
    pub line: String,
    pub message: String,
}

impl ConstraintError {
    fn new(line: &str, message: impl Into<String>) -> Self {
        Self {
            line: line.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Tag(String),
    Not,
    And,
    Or,
    Open,
    Close,
}

fn is_tag_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

fn tokenize(expr: &str) -> Result<Vec<Token>, ConstraintError> {
    let mut tokens = Vec::new();
    let mut chars = expr.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            '!' => tokens.push(Token::Not),
            '(' => tokens.push(Token::Open),
            ')' => tokens.push(Token::Close),
            '&' | '|' => {
                if chars.next().map(|(_, next)| next) != Some(c) {
                    return Err(ConstraintError::new(expr, format!("expected {c}{c}")));
                }
                tokens.push(if c == '&' { Token::And } else { Token::Or });
            }
            c if is_tag_char(c) => {
                let mut end = start + c.len_utf8();
                while let Some(&(index, next)) = chars.peek() {
                    if !is_tag_char(next) {
                        break;
                    }
                    end = index + next.len_utf8();
                    chars.next();
                }
                tokens.push(Token::Tag(expr[start..end].to_string()));
            }
            other => {
                return Err(ConstraintError::new(expr, format!("unexpected character {other:?}")));
            }
        }
    }

    Ok(tokens)
}

/// Recursive descent over `||`, `&&`, `!` and parentheses, loosest first
struct Parser<'a> {
    line: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn or(&mut self) -> Result<Constraint, ConstraintError> {
        let mut expr = self.and()?;
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            expr = Constraint::or(expr, self.and()?);
        }
        Ok(expr)
    }

    fn and(&mut self) -> Result<Constraint, ConstraintError> {
        let mut expr = self.not()?;
        while self.peek() == Some(&Token::And) {
            self.pos += 1;
            expr = Constraint::and(expr, self.not()?);
        }
        Ok(expr)
    }

    fn not(&mut self) -> Result<Constraint, ConstraintError> {
        if self.peek() == Some(&Token::Not) {
            self.pos += 1;
            return Ok(Constraint::Not(Box::new(self.not()?)));
        }
        self.atom()
    }

    fn atom(&mut self) -> Result<Constraint, ConstraintError> {
        match self.next() {
            Some(Token::Tag(tag)) => Ok(Constraint::Tag(tag)),
            Some(Token::Open) => {
                let expr = self.or()?;
                match self.next() {
                    Some(Token::Close) => Ok(expr),
                    _ => Err(ConstraintError::new(self.line, "missing )")),
                }
            }
            Some(token) => Err(ConstraintError::new(self.line, format!("unexpected {token:?}"))),
            None => Err(ConstraintError::new(self.line, "unexpected end of expression")),
        }
    }
}

/// Parse the expression after `//go:build`
pub fn parse_go_build(expr: &str) -> Result<Constraint, ConstraintError> {
    let mut parser = Parser {
        line: expr,
        tokens: tokenize(expr)?,
        pos: 0,
    };
    let constraint = parser.or()?;
    if parser.pos < parser.tokens.len() {
        return Err(ConstraintError::new(expr, "unexpected trailing tokens"));
    }
    Ok(constraint)
}

/// Parse the options after `// +build`: space-separated options are OR'd,
/// comma-separated terms within one option are AND'd, `!` negates a term
pub fn parse_plus_build(line: &str) -> Result<Constraint, ConstraintError> {
    let mut options = Vec::new();

    for option in line.split_whitespace() {
        let mut terms = Vec::new();
        for term in option.split(',') {
            let (negated, tag) = match term.strip_prefix('!') {
                Some(tag) => (true, tag),
                None => (false, term),
            };
            if tag.is_empty() || tag.starts_with('!') || !tag.chars().all(is_tag_char) {
                return Err(ConstraintError::new(line, format!("invalid term {term:?}")));
            }
            let tag = Constraint::Tag(tag.to_string());
            terms.push(if negated { Constraint::Not(Box::new(tag)) } else { tag });
        }
        options.extend(terms.into_iter().reduce(Constraint::and));
    }

    options
        .into_iter()
        .reduce(Constraint::or)
        .ok_or_else(|| ConstraintError::new(line, "empty +build line"))
}

/// The constraint governing a source file, if it has one.
///
/// Only `//` comment lines before the package clause are considered.
pub fn file_constraint(source: &str) -> Result<Option<Constraint>, ConstraintError> {
    let mut go_build = None;
    let mut plus_build = Vec::new();

    for line in source.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some(comment) = line.strip_prefix("//") else {
            break;
        };

        if let Some(expr) = comment.strip_prefix("go:build") {
            if go_build.is_none() && expr.starts_with(char::is_whitespace) {
                go_build = Some(parse_go_build(expr)?);
            }
        } else if let Some(options) = comment.trim_start().strip_prefix("+build") {
            if options.starts_with(char::is_whitespace) {
                plus_build.push(parse_plus_build(options)?);
            }
        }
    }

    if go_build.is_some() {
        return Ok(go_build);
    }
    Ok(plus_build.into_iter().reduce(Constraint::and))
}
