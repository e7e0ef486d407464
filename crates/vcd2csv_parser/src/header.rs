//! Header parsing and the signal table.
//!
//! [`parse_header`] consumes declarations up to `$enddefinitions` and returns
//! a [`Header`] whose [`SignalTable`] is frozen: the table has no public
//! mutators, so the body processor and sinks only ever see it by `&`.

use std::collections::HashMap;
use std::fmt;
use std::io::BufRead;

use serde::{Deserialize, Serialize};

use crate::error::{VcdError, VcdResult};
use crate::lexer::Lexer;
use crate::time::Timescale;
use crate::token::{Keyword, Position, Token, TokenKind};

/// Opaque index of a declaration in a [`SignalTable`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct SignalId(u32);

impl SignalId {
    /// Creates a `SignalId` from a raw index.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index.
    pub fn as_raw(self) -> u32 {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// The VCD variable type from a `$var` declaration.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum VarType {
    /// `wire`
    Wire,
    /// `reg`
    Reg,
    /// `integer`
    Integer,
    /// `real`
    Real,
    /// `parameter`
    Parameter,
    /// `string`
    String,
    /// `event`
    Event,
    /// Any other net or variable keyword (`tri`, `supply0`, `logic`, ...).
    Other(String),
}

impl VarType {
    /// Maps a `$var` type keyword to a variable type.
    pub fn from_keyword(word: &str) -> Self {
        match word {
            "wire" => Self::Wire,
            "reg" => Self::Reg,
            "integer" => Self::Integer,
            "real" => Self::Real,
            "parameter" => Self::Parameter,
            "string" => Self::String,
            "event" => Self::Event,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wire => f.write_str("wire"),
            Self::Reg => f.write_str("reg"),
            Self::Integer => f.write_str("integer"),
            Self::Real => f.write_str("real"),
            Self::Parameter => f.write_str("parameter"),
            Self::String => f.write_str("string"),
            Self::Event => f.write_str("event"),
            Self::Other(word) => f.write_str(word),
        }
    }
}

/// One identifier code and every reference name declared for it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignalDeclaration {
    /// The identifier code used in value-change records.
    pub code: String,
    /// Bit width, always positive.
    pub width: u32,
    /// The variable type.
    pub var_type: VarType,
    /// Hierarchical reference names, first declaration first.
    pub references: Vec<String>,
}

impl SignalDeclaration {
    /// The first reference name declared for this code.
    pub fn primary_reference(&self) -> &str {
        &self.references[0]
    }

    fn describe(width: u32, var_type: &VarType) -> String {
        format!("{width}-bit {var_type}")
    }
}

/// The identifier table built from the header.
#[derive(Clone, Debug, Default)]
pub struct SignalTable {
    declarations: Vec<SignalDeclaration>,
    by_code: HashMap<String, SignalId>,
    by_reference: HashMap<String, Vec<SignalId>>,
    reference_order: Vec<String>,
}

impl SignalTable {
    /// Number of distinct identifier codes.
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Returns `true` if no `$var` was declared.
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// All declarations, indexed by [`SignalId`].
    pub fn declarations(&self) -> &[SignalDeclaration] {
        &self.declarations
    }

    /// Iterates over `(id, declaration)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (SignalId, &SignalDeclaration)> {
        self.declarations
            .iter()
            .enumerate()
            .map(|(i, d)| (SignalId(i as u32), d))
    }

    /// Returns the declaration for an ID produced by this table.
    ///
    /// # Panics
    ///
    /// Panics if `id` belongs to a different table.
    pub fn get(&self, id: SignalId) -> &SignalDeclaration {
        &self.declarations[id.index()]
    }

    /// Resolves an identifier code.
    pub fn lookup_code(&self, code: &str) -> Option<SignalId> {
        self.by_code.get(code).copied()
    }

    /// Every identifier declared under a reference name.
    ///
    /// Usually one; several when the same name was declared for different codes.
    pub fn ids_for_reference(&self, reference: &str) -> &[SignalId] {
        self.by_reference
            .get(reference)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All reference names in declaration order, aliases included.
    pub fn references(&self) -> &[String] {
        &self.reference_order
    }

    fn declare(
        &mut self,
        code: String,
        width: u32,
        var_type: VarType,
        reference: String,
        position: Position,
    ) -> VcdResult<SignalId> {
        let id = match self.by_code.get(&code) {
            Some(&id) => {
                let existing = &mut self.declarations[id.index()];
                if existing.width != width || existing.var_type != var_type {
                    return Err(VcdError::DuplicateIdentifier {
                        position,
                        code,
                        reference,
                        expected: SignalDeclaration::describe(existing.width, &existing.var_type),
                        found: SignalDeclaration::describe(width, &var_type),
                    });
                }
                if existing.references.contains(&reference) {
                    return Ok(id);
                }
                existing.references.push(reference.clone());
                id
            }
            None => {
                let id = SignalId(self.declarations.len() as u32);
                self.declarations.push(SignalDeclaration {
                    code: code.clone(),
                    width,
                    var_type,
                    references: vec![reference.clone()],
                });
                self.by_code.insert(code, id);
                id
            }
        };

        let ids = self.by_reference.entry(reference.clone()).or_default();
        if !ids.contains(&id) {
            ids.push(id);
        }
        self.reference_order.push(reference);
        Ok(id)
    }
}

/// Everything declared before `$enddefinitions`.
#[derive(Clone, Debug, Default)]
pub struct Header {
    /// Body of `$date`, if present.
    pub date: Option<String>,
    /// Body of `$version`, if present.
    pub version: Option<String>,
    /// The parsed `$timescale`, if present.
    pub timescale: Option<Timescale>,
    /// The frozen identifier table.
    pub signals: SignalTable,
}

/// Parses declarations until `$enddefinitions $end`.
///
/// On return the lexer is in body mode, positioned at the first body token.
///
/// # Errors
///
/// Returns [`VcdError::DuplicateIdentifier`] when a code is re-declared with a
/// different width or type, and [`VcdError::MalformedToken`] for unterminated
/// blocks, invalid `$var` or `$timescale` bodies, words outside a block, or
/// input that ends before `$enddefinitions`.
pub fn parse_header<R: BufRead>(lexer: &mut Lexer<R>) -> VcdResult<Header> {
    let mut header = Header::default();
    let mut scopes: Vec<String> = Vec::new();

    loop {
        let Some(token) = lexer.next_token()? else {
            return Err(VcdError::malformed(
                Position::new(lexer.lines_read().max(1), 1),
                "input ends before $enddefinitions",
            ));
        };

        let keyword = match token.kind {
            TokenKind::Keyword(keyword) => keyword,
            TokenKind::End => {
                return Err(VcdError::malformed(token.position, "unexpected $end"));
            }
            TokenKind::Word(word) => {
                return Err(VcdError::malformed(
                    token.position,
                    format!("unexpected `{word}` outside a declaration"),
                ));
            }
            TokenKind::Time(_) | TokenKind::Change { .. } => {
                unreachable!("lexer only emits body tokens after $enddefinitions")
            }
        };

        let words = read_block(lexer, &keyword, token.position)?;
        match keyword {
            Keyword::EndDefinitions => break,
            Keyword::Date => header.date = Some(words.join(" ")),
            Keyword::Version => header.version = Some(words.join(" ")),
            Keyword::Timescale => {
                let ts = Timescale::parse(&words.join(" "))
                    .map_err(|message| VcdError::malformed(token.position, message))?;
                header.timescale = Some(ts);
            }
            Keyword::Scope => {
                // `$scope module top $end`; tolerate a missing scope type.
                if let Some(name) = words.get(1).or(words.first()) {
                    scopes.push(name.clone());
                }
            }
            Keyword::Upscope => {
                scopes.pop();
            }
            Keyword::Var => declare_var(&mut header.signals, &scopes, words, token.position)?,
            _ => {}
        }
    }

    log::debug!(
        "header: {} identifier codes, {} reference names, timescale {}",
        header.signals.len(),
        header.signals.references().len(),
        header
            .timescale
            .map(|ts| ts.to_string())
            .unwrap_or_else(|| "unspecified".to_string()),
    );
    Ok(header)
}

fn read_block<R: BufRead>(
    lexer: &mut Lexer<R>,
    keyword: &Keyword,
    start: Position,
) -> VcdResult<Vec<String>> {
    let mut words = Vec::new();
    loop {
        match lexer.next_token()? {
            Some(Token {
                kind: TokenKind::End,
                ..
            }) => return Ok(words),
            Some(Token {
                kind: TokenKind::Word(word),
                position,
            }) => {
                if let Some(inner) = stray_keyword(keyword, words.len(), &word) {
                    return Err(VcdError::malformed(
                        position,
                        format!("{inner} inside unterminated {keyword} block starting at {start}"),
                    ));
                }
                words.push(word);
            }
            Some(Token { position, .. }) => {
                return Err(VcdError::malformed(
                    position,
                    format!("unexpected token inside {keyword} block starting at {start}"),
                ));
            }
            None => {
                return Err(VcdError::malformed(
                    start,
                    format!("unterminated {keyword} block"),
                ));
            }
        }
    }
}

/// A declaration keyword found where a block's `$end` was missing.
///
/// Free-text blocks never have one, and neither does the identifier code
/// slot of `$var`, where `$scope` is a legal code.
fn stray_keyword(block: &Keyword, slot: usize, word: &str) -> Option<Keyword> {
    if matches!(
        block,
        Keyword::Comment | Keyword::Date | Keyword::Version | Keyword::Other(_)
    ) || (*block == Keyword::Var && slot == 2)
    {
        return None;
    }
    let keyword = Keyword::from_name(word.strip_prefix('$')?);
    (!matches!(keyword, Keyword::Other(_))).then_some(keyword)
}

fn declare_var(
    table: &mut SignalTable,
    scopes: &[String],
    words: Vec<String>,
    position: Position,
) -> VcdResult<()> {
    // `$var <type> <width> <code> <reference> [<bit range>] $end`
    if words.len() < 4 {
        return Err(VcdError::malformed(
            position,
            format!("$var needs type, width, code and reference, got `{}`", words.join(" ")),
        ));
    }
    let width = match words[1].parse::<u32>() {
        Ok(w) if w > 0 => w,
        _ => {
            return Err(VcdError::malformed(
                position,
                format!("invalid width `{}` in $var", words[1]),
            ))
        }
    };
    let var_type = VarType::from_keyword(&words[0]);
    let mut words = words.into_iter().skip(2);
    let code = words.next().unwrap_or_default();
    let local: String = words.collect();

    let reference = if scopes.is_empty() {
        local
    } else {
        format!("{}.{}", scopes.join("."), local)
    };
    table.declare(code, width, var_type, reference, position)?;
    Ok(())
}
