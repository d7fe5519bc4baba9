//! Parser for the scenario DSL.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use super::ast::*;
use super::lexer::{parse_value, Lexer, Token, TokenKind};
use crate::captable::ValuationType;
use crate::error::{DilutionError, Result};

/// Parser for scenario DSL.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given lexer.
    pub fn new(mut lexer: Lexer<'a>) -> Result<Self> {
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    /// Parse the entire scenario description.
    pub fn parse(&mut self) -> Result<ScenarioAst> {
        let mut ast = ScenarioAst::new();

        while self.current.kind != TokenKind::Eof {
            match self.current.kind {
                TokenKind::Newline => {
                    self.advance()?;
                    continue;
                }
                TokenKind::Directive => self.parse_directive(&mut ast)?,
                TokenKind::Identifier => {
                    let entry = self.parse_entry()?;
                    ast.entries.push(entry);
                }
                _ => {
                    return Err(DilutionError::parse(
                        self.current.line,
                        format!("unexpected token: {:?}", self.current.text),
                    ));
                }
            }

            // Every statement ends the line
            match self.current.kind {
                TokenKind::Newline => self.advance()?,
                TokenKind::Eof => {}
                _ => {
                    return Err(DilutionError::parse(
                        self.current.line,
                        format!("expected end of line, got {:?}", self.current.text),
                    ));
                }
            }
        }

        Ok(ast)
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn at_line_end(&self) -> bool {
        matches!(self.current.kind, TokenKind::Newline | TokenKind::Eof)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.current.kind == kind {
            let tok = self.current.clone();
            self.advance()?;
            Ok(tok)
        } else {
            Err(DilutionError::parse(
                self.current.line,
                format!("expected {:?}, got {:?}", kind, self.current.kind),
            ))
        }
    }

    fn expect_value(&mut self) -> Result<f64> {
        let tok = self.expect(TokenKind::Number)?;
        parse_value(&tok.text)
            .ok_or_else(|| DilutionError::parse(tok.line, format!("invalid number: {}", tok.text)))
    }

    /// Parse `name=value`.
    fn parse_param(&mut self) -> Result<(String, f64)> {
        let name = self.expect(TokenKind::Identifier)?.text;
        self.expect(TokenKind::Equals)?;
        let value = self.expect_value()?;
        Ok((name.to_lowercase(), value))
    }

    fn parse_directive(&mut self, ast: &mut ScenarioAst) -> Result<()> {
        let directive = self.current.text.to_lowercase();
        let line = self.current.line;
        self.advance()?;

        match directive.as_str() {
            ".captable" => {
                if ast.cap_table.is_some() {
                    return Err(DilutionError::DuplicateDirective {
                        directive: directive.clone(),
                        line,
                    });
                }
                let mut params = HashMap::new();
                while !self.at_line_end() {
                    let (name, value) = self.parse_param()?;
                    insert_param(&mut params, ".captable", name, value)?;
                }
                ast.cap_table = Some(CapTableDef { params, line });
            }
            ".round" => {
                if ast.round.is_some() {
                    return Err(DilutionError::DuplicateDirective {
                        directive: directive.clone(),
                        line,
                    });
                }
                ast.round = Some(self.parse_round(line)?);
            }
            _ => {
                return Err(DilutionError::parse(
                    line,
                    format!("unknown directive: {}", directive),
                ));
            }
        }

        Ok(())
    }

    /// `.round` takes a valuation and an optional type keyword, in either order.
    fn parse_round(&mut self, line: usize) -> Result<RoundDef> {
        let mut valuation = None;
        let mut valuation_type = None;

        while !self.at_line_end() {
            match self.current.kind {
                TokenKind::Number if valuation.is_none() => {
                    valuation = Some(self.expect_value()?);
                }
                TokenKind::Identifier if valuation_type.is_none() => {
                    let word = self.current.text.clone();
                    valuation_type = Some(ValuationType::from_keyword(&word).ok_or_else(|| {
                        DilutionError::parse(line, format!("unknown valuation type: {}", word))
                    })?);
                    self.advance()?;
                }
                _ => {
                    return Err(DilutionError::parse(
                        line,
                        format!("unexpected {:?} in .round", self.current.text),
                    ));
                }
            }
        }

        let valuation =
            valuation.ok_or_else(|| DilutionError::parse(line, ".round needs a valuation"))?;

        Ok(RoundDef {
            valuation,
            valuation_type,
            line,
        })
    }

    fn parse_entry(&mut self) -> Result<EntryDef> {
        let keyword = self.current.text.clone();
        let line = self.current.line;
        self.advance()?;

        let kind = EntryKind::from_keyword(&keyword).ok_or_else(|| {
            DilutionError::UnknownEntryKind {
                kind: keyword.clone(),
                line,
            }
        })?;

        if self.current.kind != TokenKind::Identifier {
            return Err(DilutionError::parse(
                line,
                format!("expected holder id after {}", keyword),
            ));
        }
        let id = self.expect(TokenKind::Identifier)?.text;

        let name = if self.current.kind == TokenKind::Str {
            Some(self.expect(TokenKind::Str)?.text)
        } else {
            None
        };

        let mut principal = None;
        let mut params = HashMap::new();
        let mut valuation_type = None;

        while !self.at_line_end() {
            match self.current.kind {
                TokenKind::Number => {
                    if principal.is_some() {
                        return Err(DilutionError::invalid_entry(
                            &id,
                            line,
                            format!("unexpected extra value {}", self.current.text),
                        ));
                    }
                    principal = Some(self.expect_value()?);
                }
                TokenKind::Identifier => {
                    let word = self.current.text.clone();
                    self.advance()?;

                    // Check for param=value syntax
                    if self.current.kind == TokenKind::Equals {
                        self.advance()?;
                        let value = self.expect_value()?;
                        insert_param(&mut params, &id, word.to_lowercase(), value)?;
                        continue;
                    }

                    match ValuationType::from_keyword(&word) {
                        Some(vt) if valuation_type.is_none() => valuation_type = Some(vt),
                        Some(_) => {
                            return Err(DilutionError::invalid_entry(
                                &id,
                                line,
                                "valuation type given twice",
                            ));
                        }
                        None => {
                            return Err(DilutionError::invalid_entry(
                                &id,
                                line,
                                format!("unexpected word '{}'", word),
                            ));
                        }
                    }
                }
                _ => {
                    return Err(DilutionError::invalid_entry(
                        &id,
                        line,
                        format!("unexpected {:?}", self.current.text),
                    ));
                }
            }
        }

        Ok(EntryDef {
            kind,
            id,
            name,
            principal,
            params,
            valuation_type,
            line,
        })
    }
}

/// Record a parameter, rejecting a key given twice on one line.
fn insert_param(
    params: &mut HashMap<String, f64>,
    owner: &str,
    name: String,
    value: f64,
) -> Result<()> {
    match params.entry(name) {
        Entry::Occupied(slot) => Err(DilutionError::invalid_parameter(
            owner,
            slot.key().as_str(),
            "given more than once",
        )),
        Entry::Vacant(slot) => {
            slot.insert(value);
            Ok(())
        }
    }
}
