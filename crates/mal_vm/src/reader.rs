//! Text to `MalValue`: a tokenizer plus a recursive reader over the tokens.

use std::{collections::BTreeMap, iter::Peekable, str::Chars};

use crate::{
    error::{MalError, MalResult},
    types::MalValue,
};

const DELIMITERS: &[char] = &['(', ')', '[', ']', '{', '}'];

/// Deepest collection nesting the reader accepts.
pub const MAX_READ_DEPTH: usize = 200;

/// Read the first form of `input`. Trailing forms are ignored.
pub fn read_str(input: &str) -> MalResult {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(MalError::EmptyLine);
    }
    let mut reader = Reader {
        tokens,
        position: 0,
        depth: 0,
    };
    reader.read_form()
}

fn tokenize(input: &str) -> Result<Vec<String>, MalError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    while let Some(&ch) = chars.peek() {
        if ch.is_whitespace() || ch == ',' {
            chars.next();
        } else if ch == ';' {
            for skipped in chars.by_ref() {
                if skipped == '\n' {
                    break;
                }
            }
        } else if DELIMITERS.contains(&ch) {
            chars.next();
            tokens.push(ch.to_string());
        } else if ch == '"' {
            tokens.push(string_token(&mut chars)?);
        } else {
            let mut token = String::new();
            while let Some(&next) = chars.peek() {
                if next.is_whitespace() || matches!(next, ',' | ';' | '"') || DELIMITERS.contains(&next) {
                    break;
                }
                token.push(next);
                chars.next();
            }
            tokens.push(token);
        }
    }
    Ok(tokens)
}

// Keeps the surrounding quotes and escapes as written; `read_atom` unescapes.
fn string_token(chars: &mut Peekable<Chars<'_>>) -> Result<String, MalError> {
    let mut token = String::new();
    if let Some(open) = chars.next() {
        token.push(open);
    }
    let mut escaped = false;
    for ch in chars.by_ref() {
        token.push(ch);
        if escaped {
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if ch == '"' {
            return Ok(token);
        }
    }
    Err(MalError::UnexpectedEof('"'))
}

struct Reader {
    tokens: Vec<String>,
    position: usize,
    depth: usize,
}

impl Reader {
    fn advance(&mut self) -> Option<&str> {
        let token = self.tokens.get(self.position).map(String::as_str);
        self.position += 1;
        token
    }

    fn peek(&self) -> Option<&str> {
        self.tokens.get(self.position).map(String::as_str)
    }

    fn read_form(&mut self) -> MalResult {
        match self.peek() {
            Some("(") => self.read_seq(')').map(MalValue::List),
            Some("[") => self.read_seq(']').map(MalValue::Vector),
            Some("{") => self.read_map(),
            Some(")") => Err(MalError::UnexpectedDelimiter(')')),
            Some("]") => Err(MalError::UnexpectedDelimiter(']')),
            Some("}") => Err(MalError::UnexpectedDelimiter('}')),
            Some(_) => self.read_atom(),
            None => Err(MalError::msg("unexpected end of input")),
        }
    }

    fn read_seq(&mut self, end: char) -> Result<Vec<MalValue>, MalError> {
        if self.depth >= MAX_READ_DEPTH {
            return Err(MalError::msg("nesting too deep"));
        }
        self.depth += 1;
        self.advance();
        let end_token = end.to_string();
        let mut items = Vec::new();
        loop {
            match self.peek() {
                Some(token) if token == end_token => break,
                None => return Err(MalError::UnexpectedEof(end)),
                Some(_) => items.push(self.read_form()?),
            }
        }
        self.advance();
        self.depth -= 1;
        Ok(items)
    }

    fn read_map(&mut self) -> MalResult {
        let items = self.read_seq('}')?;
        if items.len() % 2 != 0 {
            return Err(MalError::msg("unbalanced hash map (key with no value)"));
        }
        let mut map = BTreeMap::new();
        let mut items = items.into_iter();
        while let (Some(key), Some(value)) = (items.next(), items.next()) {
            let MalValue::Str(key) = key else {
                return Err(MalError::msg("expected str key for hash map"));
            };
            map.insert(key, value);
        }
        Ok(MalValue::Map(map))
    }

    fn read_atom(&mut self) -> MalResult {
        let Some(token) = self.advance() else {
            return Err(MalError::msg("unexpected end of input"));
        };
        let value = match token {
            "nil" => MalValue::Nil,
            "true" => MalValue::Bool(true),
            "false" => MalValue::Bool(false),
            _ if token.starts_with('"') => MalValue::Str(unescape(&token[1..token.len() - 1])),
            _ if is_integer(token) => MalValue::Integer(
                token
                    .parse()
                    .map_err(|_| MalError::msg(format!("integer literal out of range: {token}")))?,
            ),
            _ => MalValue::symbol(token),
        };
        Ok(value)
    }
}

fn is_integer(token: &str) -> bool {
    let digits = token.strip_prefix(['+', '-']).unwrap_or(token);
    !digits.is_empty() && digits.chars().all(|ch| ch.is_ascii_digit())
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
