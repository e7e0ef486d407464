//! Streaming lexer for VCD text.
//!
//! Reads the input one line at a time and splits it on ASCII whitespace, so
//! tokens may share a line or be spread across many. Header words are passed
//! through as [`TokenKind::Word`]; once `$enddefinitions` has been emitted the
//! lexer switches to body mode, where words are classified as time markers and
//! value-change records and `$comment` blocks are skipped.

use std::collections::VecDeque;
use std::io::BufRead;

use crate::error::{VcdError, VcdResult};
use crate::token::{ChangeKind, Keyword, Position, Token, TokenKind};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Mode {
    Header,
    Body,
}

/// A lazy tokenizer over a buffered reader.
///
/// Implements [`Iterator`] with `VcdResult<Token>` items; [`Lexer::next_token`]
/// is the same operation in `Result<Option<_>>` form.
pub struct Lexer<R> {
    reader: R,
    line_buf: Vec<u8>,
    words: VecDeque<(Position, String)>,
    line: usize,
    eof: bool,
    mode: Mode,
    in_block: bool,
}

impl<R: BufRead> Lexer<R> {
    /// Creates a lexer positioned at the start of the header.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_buf: Vec::new(),
            words: VecDeque::new(),
            line: 0,
            eof: false,
            mode: Mode::Header,
            in_block: false,
        }
    }

    /// Returns `true` once `$enddefinitions` has been lexed.
    pub fn in_body(&self) -> bool {
        self.mode == Mode::Body
    }

    /// Returns the number of input lines read so far.
    pub fn lines_read(&self) -> usize {
        self.line
    }

    /// Returns the next token, or `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns [`VcdError::Io`] if reading fails and
    /// [`VcdError::MalformedToken`] for body words that are not valid time
    /// markers or value changes, or for an unterminated skipped block.
    pub fn next_token(&mut self) -> VcdResult<Option<Token>> {
        loop {
            let Some((position, word)) = self.next_word()? else {
                return Ok(None);
            };

            if word.strip_prefix('$').is_some_and(is_keyword_name) {
                if word == "$end" {
                    self.in_block = false;
                    return Ok(Some(Token {
                        kind: TokenKind::End,
                        position,
                    }));
                }
                // Inside a header block only `$end` is special: identifier
                // codes such as `$a` are plain words there.
                if self.mode == Mode::Header && self.in_block {
                    return Ok(Some(Token {
                        kind: TokenKind::Word(word),
                        position,
                    }));
                }
                let keyword = Keyword::from_name(&word[1..]);
                if self.mode == Mode::Body && !keyword.is_dump_command() {
                    self.skip_block(&keyword, position)?;
                    continue;
                }
                if self.mode == Mode::Header {
                    self.in_block = true;
                }
                if keyword == Keyword::EndDefinitions {
                    self.mode = Mode::Body;
                }
                return Ok(Some(Token {
                    kind: TokenKind::Keyword(keyword),
                    position,
                }));
            }

            let kind = match self.mode {
                Mode::Header => TokenKind::Word(word),
                Mode::Body => self.lex_body_word(word, position)?,
            };
            return Ok(Some(Token { kind, position }));
        }
    }

    fn next_word(&mut self) -> VcdResult<Option<(Position, String)>> {
        loop {
            if let Some(word) = self.words.pop_front() {
                return Ok(Some(word));
            }
            if self.eof {
                return Ok(None);
            }
            self.fill_line()?;
        }
    }

    fn fill_line(&mut self) -> VcdResult<()> {
        self.line_buf.clear();
        if self.reader.read_until(b'\n', &mut self.line_buf)? == 0 {
            self.eof = true;
            return Ok(());
        }
        self.line += 1;

        let text = String::from_utf8_lossy(&self.line_buf);
        for (offset, word) in split_words(&text) {
            self.words
                .push_back((Position::new(self.line, offset + 1), word.to_string()));
        }
        Ok(())
    }

    fn skip_block(&mut self, keyword: &Keyword, start: Position) -> VcdResult<()> {
        loop {
            match self.next_word()? {
                Some((_, word)) if word == "$end" => return Ok(()),
                Some(_) => {}
                None => {
                    return Err(VcdError::malformed(
                        start,
                        format!("unterminated {keyword} block"),
                    ))
                }
            }
        }
    }

    fn lex_body_word(&mut self, word: String, position: Position) -> VcdResult<TokenKind> {
        // Words are never empty and every prefix below is ASCII, so slicing at 1 is safe.
        let kind = match word.as_bytes()[0] {
            b'#' => {
                return word[1..]
                    .parse::<u64>()
                    .map(TokenKind::Time)
                    .map_err(|_| {
                        VcdError::malformed(position, format!("invalid time marker `{word}`"))
                    });
            }
            b'0' | b'1' | b'x' | b'X' | b'z' | b'Z' => {
                if word.len() == 1 {
                    return Err(VcdError::malformed(
                        position,
                        format!("scalar value change `{word}` has no identifier code"),
                    ));
                }
                return Ok(TokenKind::Change {
                    kind: ChangeKind::Scalar,
                    value: word[..1].to_string(),
                    code: word[1..].to_string(),
                });
            }
            b'b' | b'B' => ChangeKind::Vector,
            b'r' | b'R' => ChangeKind::Real,
            b's' | b'S' => ChangeKind::String,
            _ => {
                return Err(VcdError::malformed(
                    position,
                    format!("unexpected token `{word}` in value-change section"),
                ))
            }
        };

        match self.next_word()? {
            Some((_, code)) if code != "$end" => Ok(TokenKind::Change {
                kind,
                value: word[1..].to_string(),
                code,
            }),
            Some(_) => Err(VcdError::malformed(
                position,
                format!("value change `{word}` is followed by `$end` instead of an identifier code"),
            )),
            None => Err(VcdError::malformed(
                position,
                format!("input ends before the identifier code of value change `{word}`"),
            )),
        }
    }
}

impl<R: BufRead> Iterator for Lexer<R> {
    type Item = VcdResult<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

/// `$` followed by letters or underscores opens a keyword; anything else is a
/// plain word, so identifier codes such as `$` or `$#` survive.
fn is_keyword_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphabetic() || b == b'_')
}

/// Splits a line into whitespace-separated words with their byte offsets.
fn split_words(line: &str) -> impl Iterator<Item = (usize, &str)> {
    let base = line.as_ptr() as usize;
    line.split(|c: char| c.is_ascii_whitespace())
        .filter(|w| !w.is_empty())
        .map(move |w| (w.as_ptr() as usize - base, w))
}
