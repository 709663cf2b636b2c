//! Edge-case tests for the lexer: inputs at the boundaries of the token
//! rules, plus property tests over generated token streams.

use proptest::prelude::*;
use skai_util::FileId;

use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

fn lex(source: &str) -> Vec<Token> {
    Lexer::new(source, FileId::DUMMY)
        .tokenize()
        .expect("lex failure")
}

fn kinds(source: &str) -> Vec<TokenKind> {
    lex(source).into_iter().map(|t| t.kind).collect()
}

#[test]
fn apostrophes_are_identifier_characters() {
    let toks = lex("let x' = f'2;");
    assert_eq!(toks[1].kind, TokenKind::Ident);
    assert_eq!(toks[1].lexeme, "x'");
    assert_eq!(toks[3].kind, TokenKind::Ident);
    assert_eq!(toks[3].lexeme, "f'2");
}

#[test]
fn leading_apostrophe_identifier() {
    let toks = lex("'tmp");
    assert_eq!(toks[0].kind, TokenKind::Ident);
    assert_eq!(toks[0].lexeme, "'tmp");
}

#[test]
fn unknown_characters_are_skipped_silently() {
    // `#`, `@` and `~` are not part of the language; the lexer makes no
    // token for them and keeps going.
    assert_eq!(
        kinds("1 # 2 @ 3 ~"),
        [
            TokenKind::Integer,
            TokenKind::Integer,
            TokenKind::Integer,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn crlf_input_counts_lines() {
    let toks = lex("1\r\n2");
    assert_eq!(toks[1].span.line, 2);
    assert_eq!(toks[1].span.column, 1);
}

#[test]
fn multiline_string_spans_start_at_open_quote() {
    let toks = lex("\"a\nb\" x");
    assert_eq!(toks[0].kind, TokenKind::Str);
    assert_eq!(toks[0].lexeme, "a\nb");
    assert_eq!((toks[0].span.line, toks[0].span.column), (1, 1));
    assert_eq!(toks[1].span.line, 2);
}

#[test]
fn adjacent_operators_do_not_merge() {
    // `=- ` is assignment followed by unary minus, not a compound form.
    assert_eq!(
        kinds("x =- 1;"),
        [
            TokenKind::Ident,
            TokenKind::Eq,
            TokenKind::Minus,
            TokenKind::Integer,
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn shift_then_compare() {
    assert_eq!(
        kinds("a << b <= c"),
        [
            TokenKind::Ident,
            TokenKind::Shl,
            TokenKind::Ident,
            TokenKind::LtEq,
            TokenKind::Ident,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn float_then_member_access() {
    let toks = lex("1.5.abs");
    assert_eq!(toks[0].kind, TokenKind::Float);
    assert_eq!(toks[0].lexeme, "1.5");
    assert_eq!(toks[1].kind, TokenKind::Dot);
    assert_eq!(toks[2].lexeme, "abs");
}

#[test]
fn comment_only_input() {
    assert_eq!(kinds("// nothing here"), [TokenKind::Eof]);
}

#[test]
fn keywords_next_to_punctuation() {
    assert_eq!(
        kinds("if(true){return;}"),
        [
            TokenKind::If,
            TokenKind::LParen,
            TokenKind::True,
            TokenKind::RParen,
            TokenKind::LBrace,
            TokenKind::Return,
            TokenKind::Semicolon,
            TokenKind::RBrace,
            TokenKind::Eof,
        ]
    );
}

proptest! {
    /// Any decimal integer lexes to a single Integer token whose lexeme is
    /// the digits themselves.
    #[test]
    fn integers_roundtrip(n in 0u64..=u64::from(u32::MAX)) {
        let source = n.to_string();
        let toks = lex(&source);
        prop_assert_eq!(toks.len(), 2);
        prop_assert_eq!(toks[0].kind, TokenKind::Integer);
        prop_assert_eq!(&toks[0].lexeme, &source);
    }

    /// Joining the emitted lexemes with spaces and re-lexing reproduces the
    /// same kinds and lexemes: the token stream is a fixed point of its own
    /// textual rendering.
    #[test]
    fn lexemes_are_a_fixed_point(source in "[a-z_][a-z0-9_]{0,6}( [a-z_][a-z0-9_]{0,6}| [0-9]{1,6}| \\+| -| \\*| ==| <=| ;){0,12}") {
        let first = lex(&source);
        let rendered = first
            .iter()
            .filter(|t| t.kind != TokenKind::Eof)
            .map(|t| t.lexeme.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let second = lex(&rendered);
        let strip = |toks: &[Token]| {
            toks.iter()
                .filter(|t| t.kind != TokenKind::Eof)
                .map(|t| (t.kind, t.lexeme.clone()))
                .collect::<Vec<_>>()
        };
        prop_assert_eq!(strip(&first), strip(&second));
    }
}
