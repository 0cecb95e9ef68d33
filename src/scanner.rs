// Line-oriented tokenizer.
//
// The scanner pulls one line at a time from its source, so keyboard
// input works: scanning stops at the `$` sentinel without waiting
// for end-of-file. End-of-line is a token in its own right, because
// the grammar terminates statements with it.

use std::io::BufRead;

use regex::Regex;

use crate::ast::Seq;


#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TokenKind {
    Identifier,
    IntLiteral,
    RealLiteral,
    StrLiteral,
    KeywTrue,
    KeywFalse,
    KeywNone,
    KeywPass,
    KeywIf,
    KeywWhile,
    KeywElif,
    KeywElse,
    KeywIs,
    KeywIn,
    Asterisk,
    Ampersand,
    Plus,
    Minus,
    Power,
    Percent,
    Slash,
    EqualEqual,
    NotEqual,
    Lt,
    Lte,
    Gt,
    Gte,
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Colon,
    Equal,
    Eoln,
    Eos,
}


// A token plus its source position. `text` is the matched lexeme;
// string literals keep only the body, without the quotes.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: u32,
    pub col: u32,
}


// A character the language has no use for, and where it was found.
#[derive(Clone, Debug, PartialEq)]
pub struct ScanError {
    pub text: String,
    pub line: u32,
    pub col: u32,
}


lazy_static! {
    static ref STR_LITERAL: Regex = Regex::new(
        r#"^("[^"]*"|'[^']*')"#
    ).unwrap();

    static ref REAL_LITERAL: Regex = Regex::new(
        r"^([0-9]+\.[0-9]*|\.[0-9]+)"
    ).unwrap();

    static ref INT_LITERAL: Regex = Regex::new(
        r"^[0-9]+"
    ).unwrap();

    static ref IDENTIFIER: Regex = Regex::new(
        r"^[A-Za-z_][A-Za-z0-9_]*"
    ).unwrap();
}


fn keyword_or_identifier(text: &str) -> TokenKind {
    match text {
        "True" => TokenKind::KeywTrue,
        "False" => TokenKind::KeywFalse,
        "None" => TokenKind::KeywNone,
        "pass" => TokenKind::KeywPass,
        "if" => TokenKind::KeywIf,
        "while" => TokenKind::KeywWhile,
        "elif" => TokenKind::KeywElif,
        "else" => TokenKind::KeywElse,
        "is" => TokenKind::KeywIs,
        "in" => TokenKind::KeywIn,
        _ => TokenKind::Identifier,
    }
}


// Tokenize the whole source. The final token is always Eos, emitted
// for the `$` sentinel or at end-of-input.
pub fn scan(input: &mut impl BufRead) -> Result<Seq<Token>, ScanError> {
    let mut tokens = Vec::new();
    let mut line_no: u32 = 0;
    let mut buf = String::new();

    loop {
        buf.clear();
        let n = input.read_line(&mut buf).unwrap_or(0);
        if n == 0 {
            break;
        }
        line_no += 1;
        let line = buf.trim_end_matches('\n').trim_end_matches('\r');
        if scan_line(line, line_no, &mut tokens)? {
            return Ok(tokens);
        }
    }

    tokens.push(Token {
        kind: TokenKind::Eos,
        text: String::from("$"),
        line: line_no + 1,
        col: 1,
    });
    Ok(tokens)
}


// Tokenize one line, appending an Eoln at its end. Yields true when
// the `$` sentinel terminated the scan.
fn scan_line(
    line: &str,
    line_no: u32,
    tokens: &mut Seq<Token>
) -> Result<bool, ScanError> {
    let mut pos = 0;

    while pos < line.len() {
        let rest = &line[pos..];
        let col = (pos + 1) as u32;
        let c = rest.chars().next().unwrap();

        if c == ' ' || c == '\t' {
            pos += 1;
            continue;
        }

        if c == '$' {
            tokens.push(Token {
                kind: TokenKind::Eos,
                text: String::from("$"),
                line: line_no,
                col,
            });
            return Ok(true);
        }

        if let Some(m) = STR_LITERAL.find(rest) {
            tokens.push(Token {
                kind: TokenKind::StrLiteral,
                text: String::from(&rest[1..m.end() - 1]),
                line: line_no,
                col,
            });
            pos += m.end();
            continue;
        }

        // Maximal munch: a real literal wins over an int literal.
        if let Some(m) = REAL_LITERAL.find(rest) {
            tokens.push(Token {
                kind: TokenKind::RealLiteral,
                text: String::from(m.as_str()),
                line: line_no,
                col,
            });
            pos += m.end();
            continue;
        }

        if let Some(m) = INT_LITERAL.find(rest) {
            tokens.push(Token {
                kind: TokenKind::IntLiteral,
                text: String::from(m.as_str()),
                line: line_no,
                col,
            });
            pos += m.end();
            continue;
        }

        if let Some(m) = IDENTIFIER.find(rest) {
            let text = m.as_str();
            tokens.push(Token {
                kind: keyword_or_identifier(text),
                text: String::from(text),
                line: line_no,
                col,
            });
            pos += m.end();
            continue;
        }

        // Two-character operators win over their one-character
        // prefixes.
        if let Some(two) = rest.get(..2) {
            let kind = match two {
                "**" => Some(TokenKind::Power),
                "==" => Some(TokenKind::EqualEqual),
                "!=" => Some(TokenKind::NotEqual),
                "<=" => Some(TokenKind::Lte),
                ">=" => Some(TokenKind::Gte),
                _ => None,
            };
            if let Some(kind) = kind {
                tokens.push(Token {
                    kind,
                    text: String::from(two),
                    line: line_no,
                    col,
                });
                pos += 2;
                continue;
            }
        }

        let kind = match c {
            '*' => TokenKind::Asterisk,
            '&' => TokenKind::Ampersand,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '%' => TokenKind::Percent,
            '/' => TokenKind::Slash,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            ':' => TokenKind::Colon,
            '=' => TokenKind::Equal,
            _ => {
                return Err(ScanError {
                    text: c.to_string(),
                    line: line_no,
                    col,
                });
            }
        };
        tokens.push(Token {
            kind,
            text: c.to_string(),
            line: line_no,
            col,
        });
        pos += c.len_utf8();
    }

    tokens.push(Token {
        kind: TokenKind::Eoln,
        text: String::new(),
        line: line_no,
        col: (line.len() + 1) as u32,
    });
    Ok(false)
}


#[cfg(test)]
mod tests {
    use super::*;
    use TokenKind::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut bytes = source.as_bytes();
        scan(&mut bytes)
            .unwrap()
            .iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_assignment_line() {
        assert_eq!(
            kinds("x = 5\n"),
            vec! {Identifier, Equal, IntLiteral, Eoln, Eos}
        );
    }

    #[test]
    fn test_operators_munch() {
        assert_eq!(
            kinds("a ** b == c <= d != e\n"),
            vec! {
                Identifier, Power, Identifier, EqualEqual, Identifier,
                Lte, Identifier, NotEqual, Identifier, Eoln, Eos
            }
        );
        assert_eq!(
            kinds("a * b < c = d\n"),
            vec! {
                Identifier, Asterisk, Identifier, Lt, Identifier,
                Equal, Identifier, Eoln, Eos
            }
        );
    }

    #[test]
    fn test_literals() {
        let mut bytes = "x = 3.14 'hi' \"yo\" 42\n".as_bytes();
        let tokens = scan(&mut bytes).unwrap();
        assert_eq!(tokens[2].kind, RealLiteral);
        assert_eq!(tokens[2].text, "3.14");
        assert_eq!(tokens[3].kind, StrLiteral);
        assert_eq!(tokens[3].text, "hi");
        assert_eq!(tokens[4].kind, StrLiteral);
        assert_eq!(tokens[4].text, "yo");
        assert_eq!(tokens[5].kind, IntLiteral);
        assert_eq!(tokens[5].text, "42");
    }

    #[test]
    fn test_real_without_trailing_digits() {
        assert_eq!(kinds("x = 5.\n"), vec! {Identifier, Equal, RealLiteral, Eoln, Eos});
        assert_eq!(kinds("x = .5\n"), vec! {Identifier, Equal, RealLiteral, Eoln, Eos});
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            kinds("while True:\n"),
            vec! {KeywWhile, KeywTrue, Colon, Eoln, Eos}
        );
        assert_eq!(kinds("pass\n"), vec! {KeywPass, Eoln, Eos});
        // Keywords only match whole words.
        assert_eq!(kinds("iffy\n"), vec! {Identifier, Eoln, Eos});
    }

    #[test]
    fn test_positions() {
        let mut bytes = "x = 1\ny = 2\n".as_bytes();
        let tokens = scan(&mut bytes).unwrap();
        assert_eq!((tokens[0].line, tokens[0].col), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].col), (1, 3));
        assert_eq!((tokens[2].line, tokens[2].col), (1, 5));
        assert_eq!((tokens[4].line, tokens[4].col), (2, 1));
    }

    #[test]
    fn test_sentinel_stops_scan() {
        let mut bytes = "x = 1\n$\nthis is never scanned\n".as_bytes();
        let tokens = scan(&mut bytes).unwrap();
        assert_eq!(tokens.last().unwrap().kind, Eos);
        assert_eq!(tokens.len(), 5);
    }

    #[test]
    fn test_eos_at_eof() {
        assert_eq!(kinds("x = 1\n"), vec! {Identifier, Equal, IntLiteral, Eoln, Eos});
    }

    #[test]
    fn test_bad_character() {
        let mut bytes = "x = 1 @ 2\n".as_bytes();
        let err = scan(&mut bytes).unwrap_err();
        assert_eq!(err, ScanError {
            text: String::from("@"),
            line: 1,
            col: 7
        });
    }
}
