//!
//! # Library-Definition Reading Module
//!
//! Facilities for reading lib-defs content from file or string.
//! Includes the core Lexer and Parser classes.
//!

// Std-Lib
use std::io::Read;
use std::path::Path;
use std::str::Chars;

// Local imports
use super::data::*;

/// Parse lib-defs content from file `fname`
pub fn parse_file(fname: impl AsRef<Path>) -> LibDefsResult<LibDefs> {
    let mut file = std::fs::File::open(fname)?;
    let mut src = String::new();
    file.read_to_string(&mut src)?;
    parse_str(&src)
}
/// Parse lib-defs content `src` from string
pub fn parse_str(src: &str) -> LibDefsResult<LibDefs> {
    let mut parser = LibDefsParser::new(src)?;
    parser.parse_lib_defs()
}

/// # Lib-Defs Lexer / Tokenizer
///
/// Breaks input string `src` into an iteration of [Token]s:
/// whitespace-delimited words, newlines, whitespace runs, and comments.
/// The format is line-oriented, so - unlike semicolon-delimited cousins -
/// newline tokens are semantic and survive to the parser.
///
pub struct LibDefsLexer<'src> {
    /// Source-string character iterator
    chars: Chars<'src>,
    /// Peekable next character
    next_char: Option<char>,
    /// Peekable next Token
    next_tok: Option<Token>,
    /// Current Position
    start: usize,
    /// Active character index
    pos: usize,
    /// Active line number
    line: usize,
}
impl<'src> LibDefsLexer<'src> {
    pub(crate) fn new(src: &'src str) -> LibDefsResult<Self> {
        let mut chars = src.chars();
        let next_char = chars.next();
        let mut lex = Self {
            chars,
            next_char,
            next_tok: None,
            start: 0,
            pos: 0,
            line: 1,
        };
        // Read the first token into our `next_tok` field
        lex.next_tok = lex.advance()?;
        Ok(lex)
    }
    /// Get and return our next character, updating our position along the way
    fn next_char(&mut self) -> Option<char> {
        if self.next_char.is_none() {
            return None;
        }
        self.pos += 1;
        let mut rv = self.chars.next();
        std::mem::swap(&mut rv, &mut self.next_char);
        rv
    }
    /// Peek at our next character, without advancing
    fn peek_char(&self) -> &Option<char> {
        &self.next_char
    }
    /// Get an immutable reference to our next [Token], without advancing
    #[allow(dead_code)]
    fn peek_token(&self) -> &Option<Token> {
        &self.next_tok
    }
    /// Get and return our next token, updating internal state along the way
    fn next_token(&mut self) -> LibDefsResult<Option<Token>> {
        if self.next_tok.is_none() {
            return Ok(None);
        }
        let mut tok = self.advance()?;
        std::mem::swap(&mut tok, &mut self.next_tok);
        Ok(tok)
    }
    /// Pull our next semantic [Token], skipping whitespace and comments.
    /// Newlines are *not* skipped; they delimit statements.
    fn advance(&mut self) -> LibDefsResult<Option<Token>> {
        use TokenType::{Comment, WhiteSpace};
        loop {
            match self.lex_one()? {
                None => return Ok(None),
                Some(t) if t.ttype == WhiteSpace || t.ttype == Comment => continue,
                Some(t) => return Ok(Some(t)),
            }
        }
    }
    /// Emit a [Token] of [TokenType] `ttype`,
    /// spanning from the last emission to the current position.
    fn emit(&mut self, ttype: TokenType) -> Token {
        let loc = SourceLocation {
            start: self.start,
            stop: self.pos,
            line: self.line,
        };
        let tok = Token { loc, ttype };
        self.start = self.pos;
        tok
    }
    /// Accept a character if it meets predicate-function `f`
    fn accept(&mut self, f: impl Fn(char) -> bool) -> bool {
        match self.peek_char() {
            Some(ref ch) if f(*ch) => {
                self.next_char();
                true
            }
            _ => false,
        }
    }
    /// Accept a single-character match
    fn accept_char(&mut self, c: char) -> bool {
        self.accept(|a| a == c)
    }
    /// Lex the next [Token]
    fn lex_one(&mut self) -> LibDefsResult<Option<Token>> {
        if self.peek_char().is_none() {
            return Ok(None); // End of input
        }
        if self.accept_char('\n') {
            let tok = self.emit(TokenType::NewLine);
            self.line += 1;
            return Ok(Some(tok));
        }
        if self.accept(|c| c.is_whitespace() && c != '\n') {
            while self.accept(|c| c.is_whitespace() && c != '\n') {
                continue;
            }
            return Ok(Some(self.emit(TokenType::WhiteSpace)));
        }
        if self.accept_char('#') {
            // Comment, through end-of-line (the newline itself is left un-lexed)
            while self.accept(|c| c != '\n') {
                continue;
            }
            return Ok(Some(self.emit(TokenType::Comment)));
        }
        // Everything else is a word: keyword, library name, or path
        if self.accept(|c| !c.is_whitespace() && c != '#') {
            while self.accept(|c| !c.is_whitespace() && c != '#') {
                continue;
            }
            return Ok(Some(self.emit(TokenType::Word)));
        }
        self.fail()
    }
    /// Error-Generation Helper
    fn fail(&self) -> LibDefsResult<Option<Token>> {
        Err(LibDefsError::Lex {
            next_char: *self.peek_char(),
            line: self.line,
            pos: self.pos,
        })
    }
}
impl<'s> Iterator for LibDefsLexer<'s> {
    type Item = Token;
    /// Iterator Implementation, panicking on lexer errors
    fn next(&mut self) -> Option<Token> {
        self.next_token().unwrap()
    }
}

/// Location of a [Token] in the source string
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    /// Start character index (inclusive)
    start: usize,
    /// End character index (exclusive)
    stop: usize,
    /// Line number
    line: usize,
}
/// Lexer Token
/// Provides indices into the source string for the (character) start and end
/// of the source text, as well as the line number and type-tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// Source Location
    loc: SourceLocation,
    /// Token Type
    ttype: TokenType,
}
impl Token {
    /// Return a sub-string of input-string `src` over our locations
    pub(crate) fn substr<'me, 'src>(&'me self, src: &'src str) -> &'src str {
        &src[self.loc.start..self.loc.stop]
    }
}
/// Token Types Enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    Word,
    NewLine,
    WhiteSpace,
    Comment,
}

/// # Lib-Defs Parser
///
/// Transforms input string of lifetime 'src into a [LibDefs] statement list.
pub struct LibDefsParser<'src> {
    /// Source string
    src: &'src str,
    /// Lexer
    lex: LibDefsLexer<'src>,
}
impl<'src> LibDefsParser<'src> {
    /// Construct a [LibDefsParser] of input-text `src`
    pub(crate) fn new(src: &'src str) -> LibDefsResult<Self> {
        let lex = LibDefsLexer::new(src)?;
        Ok(Self { src, lex })
    }
    /// Parse the full statement list
    pub(crate) fn parse_lib_defs(&mut self) -> LibDefsResult<LibDefs> {
        let mut statements = Vec::new();
        while let Some(tok) = self.lex.next_token()? {
            match tok.ttype {
                TokenType::NewLine => continue, // Blank line
                TokenType::Word => {
                    let txt = tok.substr(self.src);
                    let key = match LibDefsKey::parse(txt) {
                        Some(key) => key,
                        None => return self.fail(tok, "Invalid keyword"),
                    };
                    let stmt = match key {
                        LibDefsKey::Define => {
                            let name = self.expect_word("Expected library name")?;
                            let path = self.expect_word("Expected library path")?;
                            LibDefsStmt::Define(LibDef::new(name, path))
                        }
                        LibDefsKey::Include => LibDefsStmt::Include {
                            path: self.expect_word("Expected include path")?.into(),
                            soft: false,
                        },
                        LibDefsKey::SoftInclude => LibDefsStmt::Include {
                            path: self.expect_word("Expected include path")?.into(),
                            soft: true,
                        },
                        LibDefsKey::Undefine => {
                            LibDefsStmt::Undefine(self.expect_word("Expected library name")?)
                        }
                    };
                    self.expect_end_of_line()?;
                    statements.push(stmt);
                }
                // Whitespace and comments are filtered by the lexer
                _ => return self.fail(tok, "Unexpected token"),
            }
        }
        Ok(LibDefs { statements })
    }
    /// Grab the next token, requiring it be a [TokenType::Word],
    /// and return its source text as a [String].
    fn expect_word(&mut self, msg: &str) -> LibDefsResult<String> {
        match self.lex.next_token()? {
            Some(tok) if tok.ttype == TokenType::Word => Ok(tok.substr(self.src).to_string()),
            Some(tok) => self.fail(tok, msg),
            None => Err(LibDefsError::Parse {
                message: msg.to_string(),
                line: self.lex.line,
                token: "<end-of-input>".to_string(),
            }),
        }
    }
    /// Require the current statement end here: next is a newline, or end-of-input
    fn expect_end_of_line(&mut self) -> LibDefsResult<()> {
        match self.lex.next_token()? {
            None => Ok(()),
            Some(tok) if tok.ttype == TokenType::NewLine => Ok(()),
            Some(tok) => self.fail(tok, "Expected end of line"),
        }
    }
    /// Error-Generation Helper.
    /// Reports the offending token's source text and line number.
    fn fail<T>(&self, tok: Token, msg: &str) -> LibDefsResult<T> {
        Err(LibDefsError::Parse {
            message: msg.to_string(),
            line: tok.loc.line,
            token: tok.substr(self.src).to_string(),
        })
    }
}
