use itertools::{Itertools, PeekingNext};

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum Token {
    Colon,
    Or,
    // Any other character; the parser decides whether it is a valid symbol
    Char(char),
}

impl Token {
    pub fn as_char(&self) -> char {
        match self {
            Token::Colon => ':',
            Token::Or => '|',
            Token::Char(c) => *c,
        }
    }
}

// Consumes a run of symbol characters, stopping at whitespace or a separator
pub fn lex_symbols(line: &mut impl PeekingNext<Item = char>) -> Vec<Token> {
    line.peeking_take_while(|&c| c != ':' && c != '|' && !c.is_whitespace())
        .map(Token::Char)
        .collect()
}

pub fn lex_line(line: &str) -> Vec<Token> {
    let mut tokens = Vec::new();

    let mut line_chars = line.chars().peekable();

    while let Some(c) = line_chars.peek() {
        if *c == ':' {
            line_chars.next();
            tokens.push(Token::Colon);
        } else if *c == '|' {
            line_chars.next();
            tokens.push(Token::Or);
        } else if !c.is_whitespace() {
            tokens.extend(lex_symbols(&mut line_chars));
        } else {
            line_chars.next();
        }
    }

    return tokens;
}
