//! Unit tests for the lexer.

use super::lexer::{LineIndex, Tok, lex, token_text};

fn kinds(src: &str) -> Vec<Tok> {
    lex(src).expect("lexes").iter().map(|t| t.kind).collect()
}

#[test]
fn keywords_are_not_identifiers() {
    assert_eq!(
        kinds("int interest if iffy"),
        vec![Tok::Int, Tok::Id, Tok::If, Tok::Id]
    );
}

#[test]
fn compound_operators_win_over_prefixes() {
    assert_eq!(
        kinds("<= < == = ++ + >> >"),
        vec![
            Tok::LessEq,
            Tok::Less,
            Tok::Equals,
            Tok::Assign,
            Tok::PlusPlus,
            Tok::Plus,
            Tok::ReadOp,
            Tok::Greater,
        ]
    );
}

#[test]
fn comments_and_whitespace_are_skipped() {
    assert_eq!(
        kinds("x // trailing\n# whole line\ny"),
        vec![Tok::Id, Tok::Id]
    );
}

#[test]
fn string_literal_keeps_escapes_in_source() {
    let src = r#"cout << "a\n";"#;
    let tokens = lex(src).expect("lexes");
    let lit = tokens.iter().find(|t| t.kind == Tok::StrLit).unwrap();
    assert_eq!(token_text(src, lit), r#""a\n""#);
}

#[test]
fn unterminated_string_aborts() {
    let err = lex("cout << \"oops;").unwrap_err();
    assert!(err.message.contains("unterminated string literal"));
}

#[test]
fn unrecognized_character_aborts_with_position() {
    let err = lex("int x;\n@").unwrap_err();
    assert!(err.message.contains("unrecognized character"));
    assert_eq!((err.pos.line, err.pos.col), (2, 1));
}

#[test]
fn line_index_is_one_based() {
    let index = LineIndex::new("ab\ncd\n");
    assert_eq!((index.pos(0).line, index.pos(0).col), (1, 1));
    assert_eq!((index.pos(1).line, index.pos(1).col), (1, 2));
    assert_eq!((index.pos(3).line, index.pos(3).col), (2, 1));
    assert_eq!((index.pos(4).line, index.pos(4).col), (2, 2));
}

#[test]
fn token_positions_track_lines() {
    let src = "int x;\nint y;";
    let index = LineIndex::new(src);
    let tokens = lex(src).expect("lexes");
    // `y` is the fifth token.
    let y = tokens[4];
    assert_eq!(token_text(src, &y), "y");
    let pos = index.pos(y.span.start);
    assert_eq!((pos.line, pos.col), (2, 5));
}
