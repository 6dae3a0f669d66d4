//! Tokenizer for the analyzed language's surface syntax, built with `nom`.
//!
//! Lexing is kept as a distinct pass from parsing (see `grammar.rs`) so the
//! recursive-descent parser can thread a `NodeId` counter through plain
//! index-based state instead of fighting `nom`'s combinator signatures for
//! a side-effect it wasn't designed to carry.

use nom::branch::alt;
use nom::bytes::complete::{tag, take_while, take_while1};
use nom::character::complete::{char, digit1, multispace0};
use nom::combinator::{map, recognize, value};
use nom::multi::many0;
use nom::sequence::{delimited, pair};
use nom::IResult;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    IntLiteral(i64),
    StringLiteral(String),
    BoolLiteral(bool),
    Keyword(&'static str),
    Symbol(&'static str),
}

const KEYWORDS: &[&str] = &[
    "class", "static", "public", "private", "protected", "internal", "return", "if", "else",
    "var", "true", "false",
];

const MULTI_CHAR_SYMBOLS: &[&str] = &["==", "!=", "<=", ">=", "&&", "||"];
const SINGLE_CHAR_SYMBOLS: &[char] = &[
    '{', '}', '(', ')', ';', ',', '.', '+', '-', '*', '/', '=', '<', '>', '!',
];

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn line_comment(input: &str) -> IResult<&str, ()> {
    value((), pair(tag("//"), take_while(|c| c != '\n')))(input)
}

fn block_comment(input: &str) -> IResult<&str, ()> {
    value((), delimited(tag("/*"), take_while(|c| c != '*'), tag("*/")))(input)
        .or_else(|_: nom::Err<nom::error::Error<&str>>| {
            // Fallback for block comments containing '*' that isn't the closer.
            let mut rest = &input[2..];
            loop {
                if let Some(pos) = rest.find("*/") {
                    return Ok((&rest[pos + 2..], ()));
                }
                if rest.is_empty() {
                    return Err(nom::Err::Error(nom::error::Error::new(
                        input,
                        nom::error::ErrorKind::Eof,
                    )));
                }
                rest = &rest[1..];
            }
        })
}

fn skip_trivia(input: &str) -> IResult<&str, ()> {
    value((), many0(alt((value((), multispace0), line_comment, block_comment))))(input)
}

fn ident_or_keyword(input: &str) -> IResult<&str, Token> {
    let (rest, text) = recognize(pair(
        take_while1(is_ident_start),
        take_while(is_ident_continue),
    ))(input)?;
    let token = match text {
        "true" => Token::BoolLiteral(true),
        "false" => Token::BoolLiteral(false),
        kw if KEYWORDS.contains(&kw) => Token::Keyword(KEYWORDS.iter().find(|k| **k == kw).unwrap()),
        other => Token::Ident(other.to_string()),
    };
    Ok((rest, token))
}

fn int_literal(input: &str) -> IResult<&str, Token> {
    map(digit1, |d: &str| Token::IntLiteral(d.parse().unwrap_or(0)))(input)
}

fn string_literal(input: &str) -> IResult<&str, Token> {
    let (mut rest, _) = char('"')(input)?;
    let mut s = String::new();
    loop {
        match rest.chars().next() {
            None => {
                return Err(nom::Err::Error(nom::error::Error::new(
                    input,
                    nom::error::ErrorKind::Eof,
                )))
            }
            Some('"') => {
                rest = &rest[1..];
                break;
            }
            Some('\\') => {
                let mut chars = rest.char_indices();
                chars.next();
                if let Some((i, escaped)) = chars.next() {
                    s.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        other => other,
                    });
                    rest = &rest[i + escaped.len_utf8()..];
                } else {
                    rest = &rest[1..];
                }
            }
            Some(c) => {
                s.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    Ok((rest, Token::StringLiteral(s)))
}

fn symbol(input: &str) -> IResult<&str, Token> {
    for sym in MULTI_CHAR_SYMBOLS {
        if let Ok((rest, _)) = tag::<_, _, nom::error::Error<&str>>(*sym)(input) {
            return Ok((rest, Token::Symbol(sym)));
        }
    }
    let (rest, c) = nom::character::complete::one_of(SINGLE_CHAR_SYMBOLS)(input)?;
    let sym = SINGLE_CHAR_SYMBOLS
        .iter()
        .find(|s| **s == c)
        .map(|s| match s {
            '{' => "{",
            '}' => "}",
            '(' => "(",
            ')' => ")",
            ';' => ";",
            ',' => ",",
            '.' => ".",
            '+' => "+",
            '-' => "-",
            '*' => "*",
            '/' => "/",
            '=' => "=",
            '<' => "<",
            '>' => ">",
            '!' => "!",
            _ => unreachable!(),
        })
        .unwrap();
    Ok((rest, Token::Symbol(sym)))
}

fn one_token(input: &str) -> IResult<&str, Token> {
    alt((string_literal, ident_or_keyword, int_literal, symbol))(input)
}

/// Tokenize the full source string.
pub fn tokenize(mut input: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    loop {
        let (rest, _) = skip_trivia(input).map_err(|e| format!("trivia error: {e}"))?;
        input = rest;
        if input.is_empty() {
            break;
        }
        let (rest, tok) = one_token(input)
            .map_err(|_| format!("unexpected character near: {:?}", &input[..input.len().min(20)]))?;
        tokens.push(tok);
        input = rest;
    }
    Ok(tokens)
}
