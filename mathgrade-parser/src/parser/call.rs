use crate::{
    parser::{
        error::{kind, Error},
        expr::Expr,
        literal::LitSym,
        names,
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

/// A call to a known function, such as `sqrt(x + 1)` or `log(8, 2)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    /// The name of the function to call.
    pub name: LitSym,

    /// The arguments to the function.
    pub args: Vec<Expr>,

    /// The region of the source code that this function call was parsed from.
    pub span: Range<usize>,

    /// The span of the parentheses that surround the arguments.
    pub paren_span: Range<usize>,
}

impl Parse for Call {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let name = input.expect(&[TokenKind::Name])?;
        if !names::is_function(name.lexeme) {
            return Err(Error::new(vec![name.span.clone()], kind::UnexpectedToken {
                expected: &[TokenKind::Name],
                found: name.kind,
            }));
        }

        let open = input.expect(&[TokenKind::OpenParen])?;
        if input.peek_kind() == Some(TokenKind::CloseParen) {
            let close = input.next_token()?;
            return Err(Error::new_fatal(vec![open.span.start..close.span.end], kind::EmptyParenthesis));
        }

        // past `name(`, no other alternative can match
        let mut args = Vec::new();
        input.nested(|input| {
            args.push(input.try_parse::<Expr>()?);
            while input.peek_kind() == Some(TokenKind::Comma) {
                input.next_token()?;
                args.push(input.try_parse::<Expr>()?);
            }
            Ok(())
        }).map_err(Error::into_fatal)?;

        let close = input.expect(&[TokenKind::CloseParen])
            .map_err(|_| Error::new_fatal(vec![open.span.clone()], kind::UnclosedParenthesis {
                opening: true,
            }))?;

        Ok(Self {
            name: LitSym {
                name: name.lexeme.to_owned(),
                span: name.span.clone(),
            },
            args,
            span: name.span.start..close.span.end,
            paren_span: open.span.start..close.span.end,
        })
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", arg)?;
        }
        f.write_str(")")
    }
}
