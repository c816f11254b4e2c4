//! Query parser for converting string queries to structured query objects.
//!
//! Supported syntax:
//! - Simple terms against the default field: `hello`
//! - Field-specific terms: `title:hello`
//! - Phrases: `"hello world"`
//! - Modifiers: `+required -forbidden optional`, `NOT forbidden`, `!forbidden`
//! - Conjunctions: `a AND b`, `a OR b`, `a && b`, `a || b`
//! - Grouping: `(title:hello OR body:world)`, `title:(hello world)`
//! - Boosts: `hello^2`
//! - Wildcards: `hel*`, `h?llo`; `*:*` matches every document
//!
//! `AND` makes both neighbours required, `-` and `NOT` prohibit, and a clause
//! without either follows the default operator.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;
use std::sync::Arc;

use log::warn;

use crate::analysis::analyzer::Analyzer;
use crate::error::{FieldprobeError, Result};
use crate::index::config::IndexConfig;
use crate::query::{
    BooleanClause, BooleanQuery, MatchAllQuery, Occur, PhraseQuery, Query, TermQuery,
    WildcardQuery,
};

/// Deepest group nesting a query string may use.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Operator applied between clauses that carry no explicit conjunction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Operator {
    /// `a b` means `a OR b`.
    #[default]
    Or,
    /// `a b` means `a AND b`.
    And,
}

/// Parses query strings, analyzing terms with the index analyzer.
#[derive(Clone)]
pub struct QueryParser {
    /// Analyzer for query terms; must match the one used at indexing.
    analyzer: Arc<dyn Analyzer>,
    /// Default field to search in when no field is specified.
    default_field: Option<String>,
    /// Whether a wildcard term may start with `*` or `?`.
    allow_leading_wildcard: bool,
    /// Operator between clauses without a conjunction.
    default_operator: Operator,
}

impl fmt::Debug for QueryParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryParser")
            .field("analyzer", &self.analyzer.name())
            .field("default_field", &self.default_field)
            .field("allow_leading_wildcard", &self.allow_leading_wildcard)
            .field("default_operator", &self.default_operator)
            .finish()
    }
}

impl QueryParser {
    /// Create a new query parser.
    pub fn new(analyzer: Arc<dyn Analyzer>) -> Self {
        QueryParser {
            analyzer,
            default_field: None,
            allow_leading_wildcard: false,
            default_operator: Operator::Or,
        }
    }

    /// Create a parser with the analyzer and wildcard policy of an index
    /// configuration.
    pub fn from_config(config: &IndexConfig) -> Self {
        QueryParser::new(config.build_analyzer())
            .with_allow_leading_wildcard(config.allow_leading_wildcard)
    }

    /// Set the default field to search in when no field is specified.
    pub fn with_default_field<S: Into<String>>(mut self, field: S) -> Self {
        self.default_field = Some(field.into());
        self
    }

    /// Allow or reject wildcard terms starting with `*` or `?`.
    pub fn with_allow_leading_wildcard(mut self, allow: bool) -> Self {
        self.allow_leading_wildcard = allow;
        self
    }

    /// Set the operator used between clauses without a conjunction.
    pub fn with_default_operator(mut self, operator: Operator) -> Self {
        self.default_operator = operator;
        self
    }

    /// Get the default field.
    pub fn default_field(&self) -> Option<&str> {
        self.default_field.as_deref()
    }

    /// Whether leading wildcards are accepted.
    pub fn allow_leading_wildcard(&self) -> bool {
        self.allow_leading_wildcard
    }

    /// Get the default operator.
    pub fn default_operator(&self) -> Operator {
        self.default_operator
    }

    /// Parse a query string into a Query object.
    ///
    /// An empty query string yields an empty boolean query, which matches
    /// nothing.
    pub fn parse(&self, query_str: &str) -> Result<Box<dyn Query>> {
        let tokens = Lexer::new(query_str).tokenize()?;
        let mut parser = QueryStringParser {
            settings: self,
            tokens,
            pos: 0,
        };
        parser.parse()
    }

    /// Parse a query string for a specific field.
    pub fn parse_field(&self, field: &str, query_str: &str) -> Result<Box<dyn Query>> {
        self.clone().with_default_field(field).parse(query_str)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    LParen,
    RParen,
    Colon,
    Plus,
    Minus,
    Not,
    And,
    Or,
    Caret(f32),
    /// `~N` after a group: at least N optional clauses must match.
    Tilde(usize),
    Quoted(String),
    /// A bare word, escapes kept as written.
    Word(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::Colon => write!(f, "':'"),
            Token::Plus => write!(f, "'+'"),
            Token::Minus => write!(f, "'-'"),
            Token::Not => write!(f, "NOT"),
            Token::And => write!(f, "AND"),
            Token::Or => write!(f, "OR"),
            Token::Caret(boost) => write!(f, "'^{boost}'"),
            Token::Tilde(minimum) => write!(f, "'~{minimum}'"),
            Token::Quoted(text) => write!(f, "\"{text}\""),
            Token::Word(word) => write!(f, "'{word}'"),
        }
    }
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Lexer {
            chars: input.chars().peekable(),
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();

        while let Some(ch) = self.chars.next() {
            let token = match ch {
                c if c.is_whitespace() => continue,
                '(' => Token::LParen,
                ')' => Token::RParen,
                ':' => Token::Colon,
                '+' => Token::Plus,
                '-' => Token::Minus,
                '!' => Token::Not,
                '&' if self.chars.peek() == Some(&'&') => {
                    self.chars.next();
                    Token::And
                }
                '|' if self.chars.peek() == Some(&'|') => {
                    self.chars.next();
                    Token::Or
                }
                '^' => Token::Caret(self.boost()?),
                '~' if tokens.last() == Some(&Token::RParen) => Token::Tilde(self.minimum()?),
                '"' => Token::Quoted(self.quoted()?),
                c => {
                    let word = self.word(c)?;
                    match word.as_str() {
                        "AND" => Some(Token::And),
                        "OR" => Some(Token::Or),
                        "NOT" => Some(Token::Not),
                        _ => None,
                    }
                    .unwrap_or_else(|| Token::Word(word))
                }
            };
            tokens.push(token);
        }

        Ok(tokens)
    }

    fn boost(&mut self) -> Result<f32> {
        let mut number = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() || c == '.' {
                number.push(c);
                self.chars.next();
            } else {
                break;
            }
        }

        number
            .parse::<f32>()
            .map_err(|_| FieldprobeError::parse(format!("invalid boost '^{number}'")))
    }

    fn minimum(&mut self) -> Result<usize> {
        let mut number = String::new();
        while let Some(&c) = self.chars.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            number.push(c);
            self.chars.next();
        }

        number
            .parse::<usize>()
            .map_err(|_| FieldprobeError::parse(format!("invalid minimum match '~{number}'")))
    }

    fn quoted(&mut self) -> Result<String> {
        let mut text = String::new();
        loop {
            match self.chars.next() {
                Some('"') => return Ok(text),
                Some('\\') => match self.chars.next() {
                    Some(escaped) => text.push(escaped),
                    None => break,
                },
                Some(c) => text.push(c),
                None => break,
            }
        }
        Err(FieldprobeError::parse(format!(
            "unterminated phrase \"{text}"
        )))
    }

    fn word(&mut self, first: char) -> Result<String> {
        let mut word = String::new();
        let mut next = Some(first);

        while let Some(c) = next {
            if c == '\\' {
                match self.chars.next() {
                    Some(escaped) => {
                        word.push('\\');
                        word.push(escaped);
                    }
                    None => {
                        return Err(FieldprobeError::parse(format!(
                            "term '{word}' ends with an escape character"
                        )));
                    }
                }
            } else {
                word.push(c);
            }

            next = match self.chars.peek() {
                Some(&c) if !is_word_boundary(c) => self.chars.next(),
                _ => None,
            };
        }

        Ok(word)
    }
}

fn is_word_boundary(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | ':' | '^' | '"')
}

/// Whether a raw word contains an unescaped `*` or `?`.
fn has_wildcard(word: &str) -> bool {
    let mut chars = word.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '*' | '?' => return true,
            _ => {}
        }
    }
    false
}

fn unescape(word: &str) -> String {
    let mut result = String::with_capacity(word.len());
    let mut chars = word.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                result.push(escaped);
            }
        } else {
            result.push(c);
        }
    }
    result
}

/// Apply `~N` to a parsed group. A group that collapsed to a single query is
/// wrapped as its only optional clause.
fn require_should(query: Box<dyn Query>, minimum: usize) -> BooleanQuery {
    if let Some(boolean) = query.as_any().downcast_ref::<BooleanQuery>() {
        return boolean.clone().with_minimum_should_match(minimum);
    }
    let mut boolean = BooleanQuery::new();
    boolean.add_clause(BooleanClause::new(query, Occur::Should));
    boolean.with_minimum_should_match(minimum)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conjunction {
    None,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Modifier {
    None,
    Required,
    Prohibited,
}

/// Internal recursive-descent parser over lexed tokens.
struct QueryStringParser<'a> {
    settings: &'a QueryParser,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> QueryStringParser<'a> {
    fn parse(&mut self) -> Result<Box<dyn Query>> {
        let field = self.settings.default_field.clone();
        let query = self.parse_query(field.as_deref(), 0)?;

        if let Some(token) = self.peek() {
            return Err(FieldprobeError::parse(format!("unexpected {token}")));
        }
        Ok(query)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_second(&self) -> Option<&Token> {
        self.tokens.get(self.pos + 1)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Parse a sequence of clauses up to the end of input or a closing
    /// parenthesis.
    fn parse_query(&mut self, field: Option<&str>, depth: usize) -> Result<Box<dyn Query>> {
        let mut clauses: Vec<BooleanClause> = Vec::new();
        let mut parsed_any = false;
        let mut first_plain = false;

        loop {
            match self.peek() {
                None => break,
                Some(Token::RParen) if depth > 0 => break,
                Some(Token::RParen) => return Err(FieldprobeError::parse("unexpected ')'")),
                _ => {}
            }

            let conjunction = self.parse_conjunction();
            if conjunction != Conjunction::None && !parsed_any {
                return Err(FieldprobeError::parse(
                    "query cannot start with AND or OR",
                ));
            }
            let modifier = self.parse_modifier();

            match self.peek() {
                None | Some(Token::RParen) | Some(Token::And) | Some(Token::Or) => {
                    return Err(FieldprobeError::parse(
                        "operator or modifier is missing its operand",
                    ));
                }
                _ => {}
            }

            let query = self.parse_clause(field, depth)?;
            if !parsed_any && modifier == Modifier::None && query.is_some() {
                first_plain = true;
            }
            parsed_any = true;
            self.add_clause(&mut clauses, conjunction, modifier, query);
        }

        if clauses.len() == 1 && first_plain {
            if let Some(clause) = clauses.pop() {
                return Ok(clause.query);
            }
        }

        let mut boolean = BooleanQuery::new();
        for clause in clauses {
            boolean.add_clause(clause);
        }
        Ok(Box::new(boolean))
    }

    fn parse_conjunction(&mut self) -> Conjunction {
        match self.peek() {
            Some(Token::And) => {
                self.next();
                Conjunction::And
            }
            Some(Token::Or) => {
                self.next();
                Conjunction::Or
            }
            _ => Conjunction::None,
        }
    }

    fn parse_modifier(&mut self) -> Modifier {
        match self.peek() {
            Some(Token::Plus) => {
                self.next();
                Modifier::Required
            }
            Some(Token::Minus) | Some(Token::Not) => {
                self.next();
                Modifier::Prohibited
            }
            _ => Modifier::None,
        }
    }

    /// Combine a new clause with those already parsed.
    ///
    /// A conjunction also rewrites the previous clause, and does so even when
    /// the new clause analyzed away to nothing.
    fn add_clause(
        &self,
        clauses: &mut Vec<BooleanClause>,
        conjunction: Conjunction,
        modifier: Modifier,
        query: Option<Box<dyn Query>>,
    ) {
        let operator = self.settings.default_operator;

        if let Some(previous) = clauses.last_mut() {
            if previous.occur != Occur::MustNot {
                if conjunction == Conjunction::And {
                    previous.occur = Occur::Must;
                } else if conjunction == Conjunction::Or && operator == Operator::And {
                    previous.occur = Occur::Should;
                }
            }
        }

        let Some(query) = query else {
            return;
        };

        let prohibited = modifier == Modifier::Prohibited;
        let required = match operator {
            Operator::Or => {
                modifier == Modifier::Required || (conjunction == Conjunction::And && !prohibited)
            }
            Operator::And => !prohibited && conjunction != Conjunction::Or,
        };

        let occur = if prohibited {
            Occur::MustNot
        } else if required {
            Occur::Must
        } else {
            Occur::Should
        };
        clauses.push(BooleanClause::new(query, occur));
    }

    /// Parse one clause: an optional `field:` prefix, then a group, phrase or
    /// term, then an optional boost.
    fn parse_clause(&mut self, field: Option<&str>, depth: usize) -> Result<Option<Box<dyn Query>>> {
        let mut field = field.map(str::to_string);
        if let (Some(Token::Word(name)), Some(Token::Colon)) = (self.peek(), self.peek_second()) {
            field = Some(unescape(name));
            self.pos += 2;
        }

        let mut query = match self.next() {
            Some(Token::LParen) => {
                if self.peek() == Some(&Token::RParen) {
                    return Err(FieldprobeError::parse("empty group '()'"));
                }
                if depth >= MAX_NESTING_DEPTH {
                    return Err(FieldprobeError::parse(format!(
                        "query nested too deeply (more than {MAX_NESTING_DEPTH} groups)"
                    )));
                }
                let inner = self.parse_query(field.as_deref(), depth + 1)?;
                match self.next() {
                    Some(Token::RParen) => {}
                    _ => return Err(FieldprobeError::parse("missing ')'")),
                }
                if let Some(Token::Tilde(minimum)) = self.peek() {
                    let minimum = *minimum;
                    self.next();
                    Some(Box::new(require_should(inner, minimum)) as Box<dyn Query>)
                } else {
                    Some(inner)
                }
            }
            Some(Token::Quoted(text)) => self.phrase_query(field.as_deref(), &text)?,
            Some(Token::Word(word)) => self.term_query(field.as_deref(), &word)?,
            Some(token) => return Err(FieldprobeError::parse(format!("unexpected {token}"))),
            None => return Err(FieldprobeError::parse("unexpected end of query")),
        };

        if let Some(Token::Caret(boost)) = self.peek() {
            let boost = *boost;
            self.next();
            if let Some(query) = query.as_mut() {
                query.set_boost(boost);
            }
        }

        Ok(query)
    }

    fn require_field<'f>(&self, field: Option<&'f str>) -> Result<&'f str> {
        field.ok_or_else(|| {
            FieldprobeError::parse("No default field specified and no field prefix found")
        })
    }

    fn term_query(&self, field: Option<&str>, word: &str) -> Result<Option<Box<dyn Query>>> {
        if field == Some("*") && word == "*" {
            return Ok(Some(Box::new(MatchAllQuery::new())));
        }
        let field = self.require_field(field)?;

        if has_wildcard(word) {
            if word.starts_with(['*', '?']) && !self.settings.allow_leading_wildcard {
                return Err(FieldprobeError::parse(
                    "'*' or '?' not allowed as first character in wildcard query",
                ));
            }
            let pattern = self.settings.analyzer.normalize_field(field, word)?;
            return Ok(Some(Box::new(WildcardQuery::new(field, pattern)?)));
        }

        let terms = self.analyze(field, &unescape(word))?;
        match terms.len() {
            0 => {
                warn!("Term '{word}' produced no tokens for field '{field}'; clause dropped");
                Ok(None)
            }
            1 => Ok(terms
                .into_iter()
                .next()
                .map(|term| Box::new(TermQuery::new(field, term)) as Box<dyn Query>)),
            _ => {
                let occur = match self.settings.default_operator {
                    Operator::Or => Occur::Should,
                    Operator::And => Occur::Must,
                };
                let mut boolean = BooleanQuery::new();
                for term in terms {
                    boolean.add_clause(BooleanClause::new(
                        Box::new(TermQuery::new(field, term)),
                        occur,
                    ));
                }
                Ok(Some(Box::new(boolean)))
            }
        }
    }

    fn phrase_query(&self, field: Option<&str>, text: &str) -> Result<Option<Box<dyn Query>>> {
        let field = self.require_field(field)?;
        let mut terms = self.analyze(field, text)?;

        match terms.len() {
            0 => {
                warn!("Phrase \"{text}\" produced no tokens for field '{field}'; clause dropped");
                Ok(None)
            }
            1 => Ok(terms
                .pop()
                .map(|term| Box::new(TermQuery::new(field, term)) as Box<dyn Query>)),
            _ => Ok(Some(Box::new(PhraseQuery::new(field, terms)))),
        }
    }

    fn analyze(&self, field: &str, text: &str) -> Result<Vec<String>> {
        Ok(self
            .settings
            .analyzer
            .analyze_field(field, text)?
            .map(|token| token.text)
            .collect())
    }
}
