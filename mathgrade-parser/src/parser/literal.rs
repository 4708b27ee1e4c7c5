use crate::{
    parser::{
        error::{kind, Error},
        names,
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

/// A number literal, such as `2` or `3.14159`. The digits are kept exactly as written so that the
/// value can be read without rounding.
#[derive(Debug, Clone, PartialEq)]
pub struct LitNum {
    /// The digits of the number literal.
    pub value: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl Parse for LitNum {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.expect(&[TokenKind::Number])?;
        Ok(Self {
            value: token.lexeme.to_owned(),
            span: token.span,
        })
    }
}

impl fmt::Display for LitNum {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// A symbol literal: a variable such as `x`, `x_1` or `theta`, or the constant `pi`.
#[derive(Debug, Clone, PartialEq)]
pub struct LitSym {
    /// The name of the symbol.
    pub name: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl Parse for LitSym {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.expect(&[TokenKind::Name])?;
        let span = token.span.clone();

        if names::is_function(token.lexeme) {
            return Err(Error::new_fatal(vec![span], kind::MissingCallParens {
                name: token.lexeme.to_owned(),
            }));
        }

        if !names::is_symbol_name(token.lexeme) {
            return Err(Error::new_fatal(vec![span], kind::UnrecognizedWord {
                word: token.lexeme.to_owned(),
                suggestions: names::suggestions(token.lexeme),
            }));
        }

        Ok(Self {
            name: token.lexeme.to_owned(),
            span,
        })
    }
}

impl fmt::Display for LitSym {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Represents a literal value in a step.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(LitNum),
    Symbol(LitSym),
}

impl Literal {
    /// Returns the span of the literal.
    pub fn span(&self) -> Range<usize> {
        match self {
            Literal::Number(num) => num.span.clone(),
            Literal::Symbol(sym) => sym.span.clone(),
        }
    }
}

impl Parse for Literal {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let err = crate::try_parse_catch_fatal!(
            input.try_parse::<LitNum>().map(Literal::Number),
            input.try_parse::<LitSym>().map(Literal::Symbol),
        );
        Err(err)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Literal::Number(num) => num.fmt(f),
            Literal::Symbol(sym) => sym.fmt(f),
        }
    }
}
