use ariadne::Fmt;
use mathgrade_error::{ErrorKind, EXPR};
use crate::tokenizer::TokenKind;

/// The step contained nothing to parse.
#[derive(Debug, Clone, PartialEq)]
pub struct EmptyStep;

impl ErrorKind for EmptyStep {
    fn message(&self) -> String {
        "the step contains no mathematical content".to_string()
    }

    fn labels(&self) -> Vec<String> {
        vec![format!("I expected an {} or an equation here", "expression".fg(EXPR))]
    }
}

/// The end of the source code was reached unexpectedly.
#[derive(Debug, Clone, PartialEq)]
pub struct UnexpectedEof;

impl ErrorKind for UnexpectedEof {
    fn message(&self) -> String {
        "unexpected end of step".to_string()
    }

    fn labels(&self) -> Vec<String> {
        vec![format!("you might need to add another {} here", "expression".fg(EXPR))]
    }
}

/// The end of the source code was expected, but something else was found.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectedEof;

impl ErrorKind for ExpectedEof {
    fn message(&self) -> String {
        "expected end of step".to_string()
    }

    fn labels(&self) -> Vec<String> {
        vec![format!("I could not understand the remaining {} here", "expression".fg(EXPR))]
    }
}

/// An unexpected token was encountered.
#[derive(Debug, Clone, PartialEq)]
pub struct UnexpectedToken {
    /// The token(s) that were expected.
    pub expected: &'static [TokenKind],

    /// The token that was found.
    pub found: TokenKind,
}

impl ErrorKind for UnexpectedToken {
    fn message(&self) -> String {
        "unexpected token".to_string()
    }

    fn labels(&self) -> Vec<String> {
        vec![format!(
            "expected one of: {}",
            self.expected.iter().map(|t| format!("{:?}", t)).collect::<Vec<_>>().join(", "),
        )]
    }

    fn help(&self) -> Option<String> {
        Some(format!("found {:?}", self.found))
    }
}

/// A parenthesis was not closed.
#[derive(Debug, Clone, PartialEq)]
pub struct UnclosedParenthesis {
    /// Whether the parenthesis was an opening parenthesis `(`. Otherwise, the parenthesis was a
    /// closing parenthesis `)`.
    pub opening: bool,
}

impl ErrorKind for UnclosedParenthesis {
    fn message(&self) -> String {
        "unclosed parenthesis".to_string()
    }

    fn labels(&self) -> Vec<String> {
        vec!["this parenthesis is not closed".to_string()]
    }

    fn help(&self) -> Option<String> {
        Some(if self.opening {
            "add a closing parenthesis `)` somewhere after this"
        } else {
            "add an opening parenthesis `(` somewhere before this"
        }.to_string())
    }
}

/// There was no expression inside a pair of parentheses.
#[derive(Debug, Clone, PartialEq)]
pub struct EmptyParenthesis;

impl ErrorKind for EmptyParenthesis {
    fn message(&self) -> String {
        "missing expression inside parenthesis".to_string()
    }

    fn labels(&self) -> Vec<String> {
        vec!["add an expression here".to_string()]
    }
}

/// A word that is neither a variable, a constant, nor a known function. Steps made of prose end
/// up here.
#[derive(Debug, Clone, PartialEq)]
pub struct UnrecognizedWord {
    /// The word that was found.
    pub word: String,

    /// Known names that are spelled similarly to the word.
    pub suggestions: Vec<String>,
}

impl ErrorKind for UnrecognizedWord {
    fn message(&self) -> String {
        format!("unrecognized word `{}`", self.word)
    }

    fn labels(&self) -> Vec<String> {
        vec!["this is not a variable or a known function".to_string()]
    }

    fn help(&self) -> Option<String> {
        if self.suggestions.is_empty() {
            return Some("write each step as an expression or an equation".to_string());
        }

        let list = self.suggestions
            .iter()
            .map(|name| format!("`{}`", name.as_str().fg(EXPR)))
            .collect::<Vec<_>>()
            .join(", ");
        Some(format!("did you mean {}?", list))
    }
}

/// A known function name was used without an argument list.
#[derive(Debug, Clone, PartialEq)]
pub struct MissingCallParens {
    /// The name of the function.
    pub name: String,
}

impl ErrorKind for MissingCallParens {
    fn message(&self) -> String {
        format!("missing arguments for `{}`", self.name)
    }

    fn labels(&self) -> Vec<String> {
        vec!["this function needs an argument list".to_string()]
    }

    fn help(&self) -> Option<String> {
        Some(format!("write the argument in parentheses: {}", format!("{}(...)", self.name).fg(EXPR)))
    }
}

/// More than one `=` in a single clause, as in `a = b = c`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainedEquation;

impl ErrorKind for ChainedEquation {
    fn message(&self) -> String {
        "a step can only contain one `=` per equation".to_string()
    }

    fn labels(&self) -> Vec<String> {
        vec!["this is the first `=`".to_string(), "this is another `=`".to_string()]
    }

    fn help(&self) -> Option<String> {
        Some("split the chain into separate steps".to_string())
    }
}

/// The step nests parentheses, calls, negations or operators deeper than the parser allows.
#[derive(Debug, Clone, PartialEq)]
pub struct TooDeeplyNested {
    /// The deepest nesting allowed.
    pub limit: usize,
}

impl ErrorKind for TooDeeplyNested {
    fn message(&self) -> String {
        "the step is nested too deeply".to_string()
    }

    fn labels(&self) -> Vec<String> {
        vec![format!("this goes past {} levels of nesting", self.limit)]
    }

    fn help(&self) -> Option<String> {
        Some("split the step into simpler steps".to_string())
    }
}
