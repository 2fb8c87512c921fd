//! Static evaluation of script-style (`php`, `php5`, `inc`) config files.
//!
//! Nothing is executed. The file is tokenized and parsed into a small
//! expression tree covering what config files actually contain: array
//! literals, string concatenation, `define()`d constants and a handful of
//! path helpers. The value of the `return` statement becomes the config.

use crate::context::ToolContext;
use crate::error::{TrellisError, TrellisResult};
use crate::options::is_truthy;
use indexmap::IndexMap;
use log::debug;
use serde_json::{Map, Number, Value};
use std::fs;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Str(String),
    Int(i64),
    Float(f64),
    Ident(String),
    LBracket,
    RBracket,
    LParen,
    RParen,
    Comma,
    Semi,
    Arrow,
    Dot,
    Question,
    Colon,
    OrOr,
    AndAnd,
    Bang,
    Minus,
    Eof,
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
}

impl Lexer {
    fn new(source: &str) -> Self {
        // Anything before the open tag is inline output and never part of the config
        let body = match source.find("<?php") {
            Some(idx) => &source[idx + 5..],
            None => source,
        };
        Self { chars: body.chars().collect(), pos: 0, line: 1 }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn error(&self, message: &str) -> TrellisError {
        TrellisError::ConfigError(format!("line {}: {}", self.line, message))
    }

    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek() {
            match c {
                c if c.is_whitespace() => {
                    self.bump();
                }
                '#' => self.skip_line(),
                '/' if self.peek_next() == Some('/') => self.skip_line(),
                '/' if self.peek_next() == Some('*') => {
                    self.pos += 2;
                    while let Some(c) = self.bump() {
                        if c == '*' && self.peek() == Some('/') {
                            self.bump();
                            break;
                        }
                    }
                }
                _ => break,
            }
        }
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
    }

    fn tokenize(mut self) -> TrellisResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia();
            let Some(c) = self.peek() else {
                tokens.push(Token::Eof);
                return Ok(tokens);
            };

            let token = match c {
                '?' if self.peek_next() == Some('>') => {
                    tokens.push(Token::Eof);
                    return Ok(tokens);
                }
                '\'' => self.single_quoted()?,
                '"' => self.double_quoted()?,
                c if c.is_ascii_digit() => self.number()?,
                c if c.is_alphabetic() || c == '_' || c == '\\' => self.ident(),
                '$' => return Err(self.error("variables are not supported in config scripts")),
                _ => self.punct(c)?,
            };
            tokens.push(token);
        }
    }

    fn punct(&mut self, c: char) -> TrellisResult<Token> {
        let next = self.peek_next();
        let (token, width) = match (c, next) {
            ('=', Some('>')) => (Token::Arrow, 2),
            ('|', Some('|')) => (Token::OrOr, 2),
            ('&', Some('&')) => (Token::AndAnd, 2),
            ('[', _) => (Token::LBracket, 1),
            (']', _) => (Token::RBracket, 1),
            ('(', _) => (Token::LParen, 1),
            (')', _) => (Token::RParen, 1),
            (',', _) => (Token::Comma, 1),
            (';', _) => (Token::Semi, 1),
            ('.', _) => (Token::Dot, 1),
            ('?', _) => (Token::Question, 1),
            (':', Some(':')) => return Err(self.error("static access is not supported")),
            (':', _) => (Token::Colon, 1),
            ('!', _) => (Token::Bang, 1),
            ('-', _) => (Token::Minus, 1),
            _ => return Err(self.error(&format!("unexpected character '{c}'"))),
        };
        for _ in 0..width {
            self.bump();
        }
        Ok(token)
    }

    fn single_quoted(&mut self) -> TrellisResult<Token> {
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string")),
                Some('\'') => return Ok(Token::Str(out)),
                Some('\\') => match self.peek() {
                    Some(e @ ('\'' | '\\')) => {
                        self.bump();
                        out.push(e);
                    }
                    _ => out.push('\\'),
                },
                Some(c) => out.push(c),
            }
        }
    }

    /// Double-quoted strings get the usual escapes; `$` is kept literally.
    fn double_quoted(&mut self) -> TrellisResult<Token> {
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string")),
                Some('"') => return Ok(Token::Str(out)),
                Some('\\') => {
                    let escaped = match self.peek() {
                        Some('n') => Some('\n'),
                        Some('t') => Some('\t'),
                        Some('r') => Some('\r'),
                        Some('0') => Some('\0'),
                        Some(e @ ('\\' | '"' | '$')) => Some(e),
                        _ => None,
                    };
                    match escaped {
                        Some(e) => {
                            self.bump();
                            out.push(e);
                        }
                        None => out.push('\\'),
                    }
                }
                Some(c) => out.push(c),
            }
        }
    }

    fn number(&mut self) -> TrellisResult<Token> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        let is_float = self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit());
        if is_float {
            self.bump();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        if is_float {
            text.parse().map(Token::Float).map_err(|_| self.error("invalid number"))
        } else {
            text.parse().map(Token::Int).map_err(|_| self.error("invalid number"))
        }
    }

    fn ident(&mut self) -> Token {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '\\') {
            self.bump();
        }
        Token::Ident(self.chars[start..self.pos].iter().collect())
    }
}

#[derive(Debug, Clone)]
enum Expr {
    Literal(Value),
    Array(Vec<(Option<Expr>, Expr)>),
    Concat(Box<Expr>, Box<Expr>),
    Ternary(Box<Expr>, Option<Box<Expr>>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    Neg(Box<Expr>),
    Constant(String),
    Call(String, Vec<Expr>),
    New(Vec<Expr>),
}

#[derive(Debug)]
enum Stmt {
    Expr(Expr),
    Return(Expr),
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

fn keyword(name: &str) -> String {
    name.trim_start_matches('\\').to_lowercase()
}

impl Parser {
    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: Token) -> TrellisResult<()> {
        if self.eat(&expected) {
            Ok(())
        } else {
            Err(TrellisError::ConfigError(format!(
                "expected {:?}, found {:?}",
                expected,
                self.peek()
            )))
        }
    }

    fn program(&mut self) -> TrellisResult<Vec<Stmt>> {
        let mut statements = Vec::new();
        while self.peek() != &Token::Eof {
            if self.eat(&Token::Semi) {
                continue;
            }
            if let Token::Ident(name) = self.peek() {
                match keyword(name).as_str() {
                    "declare" | "namespace" | "use" => {
                        while !matches!(self.peek(), Token::Semi | Token::Eof) {
                            self.advance();
                        }
                        continue;
                    }
                    "return" => {
                        self.advance();
                        statements.push(Stmt::Return(self.expr()?));
                        self.end_of_statement()?;
                        continue;
                    }
                    _ => {}
                }
            }
            statements.push(Stmt::Expr(self.expr()?));
            self.end_of_statement()?;
        }
        Ok(statements)
    }

    fn end_of_statement(&mut self) -> TrellisResult<()> {
        if self.peek() == &Token::Eof {
            Ok(())
        } else {
            self.expect(Token::Semi)
        }
    }

    fn expr(&mut self) -> TrellisResult<Expr> {
        let condition = self.or()?;
        if !self.eat(&Token::Question) {
            return Ok(condition);
        }
        let then = if self.eat(&Token::Colon) {
            None
        } else {
            let then = self.expr()?;
            self.expect(Token::Colon)?;
            Some(Box::new(then))
        };
        let otherwise = self.expr()?;
        Ok(Expr::Ternary(Box::new(condition), then, Box::new(otherwise)))
    }

    fn or(&mut self) -> TrellisResult<Expr> {
        let mut left = self.and()?;
        while self.eat(&Token::OrOr) {
            left = Expr::Or(Box::new(left), Box::new(self.and()?));
        }
        Ok(left)
    }

    fn and(&mut self) -> TrellisResult<Expr> {
        let mut left = self.concat()?;
        while self.eat(&Token::AndAnd) {
            left = Expr::And(Box::new(left), Box::new(self.concat()?));
        }
        Ok(left)
    }

    fn concat(&mut self) -> TrellisResult<Expr> {
        let mut left = self.unary()?;
        while self.eat(&Token::Dot) {
            left = Expr::Concat(Box::new(left), Box::new(self.unary()?));
        }
        Ok(left)
    }

    fn unary(&mut self) -> TrellisResult<Expr> {
        if self.eat(&Token::Bang) {
            return Ok(Expr::Not(Box::new(self.unary()?)));
        }
        if self.eat(&Token::Minus) {
            return Ok(Expr::Neg(Box::new(self.unary()?)));
        }
        self.primary()
    }

    fn primary(&mut self) -> TrellisResult<Expr> {
        match self.advance() {
            Token::Str(s) => Ok(Expr::Literal(Value::String(s))),
            Token::Int(i) => Ok(Expr::Literal(Value::from(i))),
            Token::Float(f) => Ok(Expr::Literal(float_value(f))),
            Token::LBracket => Ok(Expr::Array(self.items(Token::RBracket)?)),
            Token::LParen => {
                let inner = self.expr()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Token::Ident(name) => self.named(name),
            other => Err(TrellisError::ConfigError(format!("unexpected token {other:?}"))),
        }
    }

    fn named(&mut self, name: String) -> TrellisResult<Expr> {
        match keyword(&name).as_str() {
            "true" => return Ok(Expr::Literal(Value::Bool(true))),
            "false" => return Ok(Expr::Literal(Value::Bool(false))),
            "null" => return Ok(Expr::Literal(Value::Null)),
            "array" if self.peek() == &Token::LParen => {
                self.advance();
                return Ok(Expr::Array(self.items(Token::RParen)?));
            }
            "new" => {
                match self.advance() {
                    Token::Ident(_) => {}
                    other => {
                        return Err(TrellisError::ConfigError(format!(
                            "expected class name after 'new', found {other:?}"
                        )))
                    }
                }
                let args = if self.eat(&Token::LParen) { self.args()? } else { Vec::new() };
                return Ok(Expr::New(args));
            }
            _ => {}
        }

        if self.eat(&Token::LParen) {
            Ok(Expr::Call(keyword(&name), self.args()?))
        } else {
            Ok(Expr::Constant(name.trim_start_matches('\\').to_string()))
        }
    }

    fn args(&mut self) -> TrellisResult<Vec<Expr>> {
        let mut args = Vec::new();
        while !self.eat(&Token::RParen) {
            args.push(self.expr()?);
            if !self.eat(&Token::Comma) {
                self.expect(Token::RParen)?;
                break;
            }
        }
        Ok(args)
    }

    fn items(&mut self, close: Token) -> TrellisResult<Vec<(Option<Expr>, Expr)>> {
        let mut items = Vec::new();
        while !self.eat(&close) {
            let first = self.expr()?;
            let item = if self.eat(&Token::Arrow) { (Some(first), self.expr()?) } else { (None, first) };
            items.push(item);
            if !self.eat(&Token::Comma) {
                self.expect(close.clone())?;
                break;
            }
        }
        Ok(items)
    }
}

fn float_value(f: f64) -> Value {
    Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
}

/// String conversion following the host language's rules for scalars.
fn to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) | Value::Null => String::new(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.is_finite() => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Value::Array(_) | Value::Object(_) => "Array".to_string(),
    }
}

fn array_key(value: &Value) -> String {
    match value {
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => "0".to_string(),
        Value::Number(n) => match n.as_i64() {
            Some(i) => i.to_string(),
            None => format!("{}", n.as_f64().unwrap_or_default() as i64),
        },
        other => to_text(other),
    }
}

struct Evaluator {
    file: PathBuf,
    constants: IndexMap<String, Value>,
}

impl Evaluator {
    fn new(file: &Path, ctx: &ToolContext) -> Self {
        let mut constants: IndexMap<String, Value> = ctx
            .constants()
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        constants.insert("DIRECTORY_SEPARATOR".to_string(), Value::String(MAIN_SEPARATOR.to_string()));
        constants.insert("PHP_EOL".to_string(), Value::String("\n".to_string()));
        Self { file: file.to_path_buf(), constants }
    }

    fn constant(&self, name: &str) -> TrellisResult<Value> {
        match name {
            "__FILE__" => Ok(Value::String(self.file.display().to_string())),
            "__DIR__" => Ok(Value::String(
                self.file.parent().map(|p| p.display().to_string()).unwrap_or_default(),
            )),
            _ => self
                .constants
                .get(name)
                .cloned()
                .ok_or_else(|| TrellisError::ConfigError(format!("undefined constant {name}"))),
        }
    }

    fn eval(&mut self, expr: &Expr) -> TrellisResult<Value> {
        match expr {
            Expr::Literal(v) => Ok(v.clone()),
            Expr::Array(items) => self.array(items),
            Expr::Concat(l, r) => {
                let left = to_text(&self.eval(l)?);
                let right = to_text(&self.eval(r)?);
                Ok(Value::String(left + &right))
            }
            Expr::Ternary(cond, then, otherwise) => {
                let value = self.eval(cond)?;
                if is_truthy(&value) {
                    match then {
                        Some(then) => self.eval(then),
                        None => Ok(value),
                    }
                } else {
                    self.eval(otherwise)
                }
            }
            Expr::Or(l, r) => {
                let left = is_truthy(&self.eval(l)?);
                Ok(Value::Bool(left || is_truthy(&self.eval(r)?)))
            }
            Expr::And(l, r) => {
                let left = is_truthy(&self.eval(l)?);
                Ok(Value::Bool(left && is_truthy(&self.eval(r)?)))
            }
            Expr::Not(inner) => Ok(Value::Bool(!is_truthy(&self.eval(inner)?))),
            Expr::Neg(inner) => match self.eval(inner)? {
                Value::Number(n) => match n.as_i64() {
                    Some(i) => Ok(Value::from(-i)),
                    None => Ok(float_value(-n.as_f64().unwrap_or_default())),
                },
                other => Err(TrellisError::ConfigError(format!("cannot negate {other}"))),
            },
            Expr::Constant(name) => self.constant(name),
            Expr::Call(name, args) => self.call(name, args),
            // A config object constructed inline is represented by its data
            Expr::New(args) => match args.first() {
                Some(first) => self.eval(first),
                None => Ok(Value::Object(Map::new())),
            },
        }
    }

    fn array(&mut self, items: &[(Option<Expr>, Expr)]) -> TrellisResult<Value> {
        let mut entries: IndexMap<String, Value> = IndexMap::new();
        // None once the largest integer key has been used
        let mut next_index: Option<i64> = Some(0);
        for (key, value) in items {
            let key = match key {
                Some(key) => {
                    let key = self.eval(key)?;
                    if let (Some(i), Some(next)) = (key.as_i64(), next_index) {
                        if i >= next {
                            next_index = i.checked_add(1);
                        }
                    }
                    array_key(&key)
                }
                None => {
                    let index = next_index.ok_or_else(|| {
                        TrellisError::ConfigError(
                            "cannot append to an array whose next index is out of range".to_string(),
                        )
                    })?;
                    next_index = index.checked_add(1);
                    index.to_string()
                }
            };
            let value = self.eval(value)?;
            entries.insert(key, value);
        }

        let is_list = entries.keys().enumerate().all(|(i, k)| *k == i.to_string());
        if is_list {
            Ok(Value::Array(entries.into_values().collect()))
        } else {
            Ok(Value::Object(entries.into_iter().collect()))
        }
    }

    fn call(&mut self, name: &str, args: &[Expr]) -> TrellisResult<Value> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval(arg)?);
        }
        let arg = |i: usize| values.get(i).map(to_text).unwrap_or_default();

        match name {
            "define" => {
                let constant = arg(0);
                if self.constants.contains_key(&constant) {
                    return Ok(Value::Bool(false));
                }
                let value = values.get(1).cloned().unwrap_or(Value::Null);
                debug!("Defining constant {} = {}", constant, value);
                self.constants.insert(constant, value);
                Ok(Value::Bool(true))
            }
            "defined" => Ok(Value::Bool(self.constants.contains_key(&arg(0)))),
            "constant" => self.constant(&arg(0)),
            "getenv" => Ok(std::env::var(arg(0)).map(Value::String).unwrap_or(Value::Bool(false))),
            "realpath" => Ok(fs::canonicalize(arg(0))
                .map(|p| Value::String(p.display().to_string()))
                .unwrap_or(Value::Bool(false))),
            "dirname" => {
                let levels = values.get(1).and_then(Value::as_u64).unwrap_or(1);
                let mut path = arg(0);
                for _ in 0..levels {
                    path = dirname(&path);
                }
                Ok(Value::String(path))
            }
            other => Err(TrellisError::ConfigError(format!("unsupported function {other}()"))),
        }
    }
}

fn dirname(path: &str) -> String {
    match Path::new(path).parent() {
        None => path.to_string(),
        Some(parent) if parent.as_os_str().is_empty() => ".".to_string(),
        Some(parent) => parent.display().to_string(),
    }
}

/// Evaluates script-style config source.
///
/// # Arguments
/// * `source` - Script text
/// * `file` - Path the script was read from, used for `__FILE__` and `__DIR__`
/// * `ctx` - Context providing predefined constants
///
/// # Errors
/// * `TrellisError::ConfigError` on unsupported syntax, undefined constants or a missing `return`
pub fn evaluate(source: &str, file: &Path, ctx: &ToolContext) -> TrellisResult<Value> {
    let tokens = Lexer::new(source).tokenize()?;
    let statements = Parser { tokens, pos: 0 }.program()?;
    let mut evaluator = Evaluator::new(file, ctx);

    for statement in &statements {
        match statement {
            Stmt::Expr(expr) => {
                evaluator.eval(expr)?;
            }
            Stmt::Return(expr) => return evaluator.eval(expr),
        }
    }

    Err(TrellisError::ConfigError(format!("{} does not return a value", file.display())))
}

/// Reads and evaluates a script-style config file.
pub fn evaluate_file(path: &Path, ctx: &ToolContext) -> TrellisResult<Value> {
    let source = fs::read_to_string(path)?;
    evaluate(&source, path, ctx).map_err(|e| match e {
        TrellisError::ConfigError(msg) => {
            TrellisError::ConfigError(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn eval(source: &str) -> TrellisResult<Value> {
        let ctx = ToolContext::new("/work", "/templates").with_constant("BASE_PATH", "/srv/blog");
        evaluate(source, Path::new("/srv/blog/app/config/config.php"), &ctx)
    }

    #[test]
    fn test_short_and_long_arrays() {
        let value = eval("<?php return ['a' => 1, 'b' => array(true, null, 'x'), 'c' => -2.5];").unwrap();
        assert_eq!(value, json!({"a": 1, "b": [true, null, "x"], "c": -2.5}));
    }

    #[test]
    fn test_define_and_concat() {
        let source = r#"<?php
            // application paths
            defined('BASE_PATH') || define('BASE_PATH', '/elsewhere');
            defined('APP_PATH') || define('APP_PATH', BASE_PATH . '/app');

            return new \Phalcon\Config\Config([
                'application' => [
                    'appDir'  => APP_PATH . '/',
                    'baseUri' => "/blog/",
                ],
            ]);
        "#;
        let value = eval(source).unwrap();
        assert_eq!(value, json!({"application": {"appDir": "/srv/blog/app/", "baseUri": "/blog/"}}));
    }

    #[test]
    fn test_magic_constants_and_dirname() {
        let value = eval("<?php return ['dir' => __DIR__, 'root' => dirname(__DIR__, 2)];").unwrap();
        assert_eq!(value, json!({"dir": "/srv/blog/app/config", "root": "/srv/blog"}));
    }

    #[test]
    fn test_elvis() {
        let value = eval("<?php return ['x' => getenv('TRELLIS_SURELY_UNSET_VAR') ?: 'fallback'];").unwrap();
        assert_eq!(value, json!({"x": "fallback"}));
    }

    #[test]
    fn test_largest_integer_key() {
        let value = eval("<?php return [9223372036854775807 => 'a'];").unwrap();
        assert_eq!(value, json!({"9223372036854775807": "a"}));

        let value = eval("<?php return [5 => 'a', 'b', 2 => 'c', 'd'];").unwrap();
        assert_eq!(value, json!({"5": "a", "6": "b", "2": "c", "7": "d"}));

        let err = eval("<?php return [9223372036854775807 => 'a', 'b'];").unwrap_err();
        assert!(matches!(err, TrellisError::ConfigError(_)));
    }

    #[test]
    fn test_unsupported_input() {
        assert!(eval("<?php $config = [];").is_err());
        assert!(eval("<?php return [UNKNOWN_CONST];").is_err());
        assert!(eval("<?php echo_all();").is_err());
        assert!(eval("<?php define('X', 1);").is_err());
    }
}
