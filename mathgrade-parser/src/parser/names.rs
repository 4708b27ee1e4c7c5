//! The names a step may use: functions, constants, and Greek letters spelled out.

use crate::tokenizer::{Token, TokenKind};

/// Functions that can be called with an argument list.
pub const FUNCTIONS: [&str; 8] = ["sqrt", "sin", "cos", "tan", "ln", "log", "exp", "abs"];

/// Named constants.
pub const CONSTANTS: [&str; 1] = ["pi"];

/// Greek letters that can be used as variable names.
pub const GREEK: [&str; 14] = [
    "alpha", "beta", "gamma", "delta", "epsilon", "theta", "lambda",
    "mu", "rho", "sigma", "tau", "phi", "omega", "psi",
];

/// Unknown words up to this many letters are read as a product of single-letter variables.
pub const MAX_IMPLICIT_WORD: usize = 3;

/// Returns true if the name is a function that can be called.
pub fn is_function(name: &str) -> bool {
    FUNCTIONS.contains(&name)
}

/// Returns true if the name can be used directly as a variable or constant.
pub fn is_symbol_name(name: &str) -> bool {
    name.chars().count() == 1
        || name.contains('_')
        || CONSTANTS.contains(&name)
        || GREEK.contains(&name)
}

/// Returns known names that are spelled similarly to the given word, closest first.
pub fn suggestions(word: &str) -> Vec<String> {
    let mut candidates = FUNCTIONS.iter()
        .chain(CONSTANTS.iter())
        .chain(GREEK.iter())
        .map(|name| (levenshtein::levenshtein(word, name), *name))
        .filter(|(distance, _)| *distance <= 2)
        .collect::<Vec<_>>();
    candidates.sort();
    candidates.into_iter()
        .take(3)
        .map(|(_, name)| name.to_string())
        .collect()
}

/// Returns true if the token is a word of several letters that is not a known name.
fn is_unknown_word(token: &Token<'_>) -> bool {
    token.kind == TokenKind::Name
        && token.lexeme.len() > 1
        && !is_function(token.lexeme)
        && !is_symbol_name(token.lexeme)
}

/// Returns the first word of a run of two or more unknown words separated only by whitespace, as
/// in `it is ok`. Such a run is prose, even when each word is short enough to read as a product of
/// variables.
pub fn find_prose<'a, 'source>(tokens: &'a [Token<'source>]) -> Option<&'a Token<'source>> {
    let mut previous = None;
    for token in tokens.iter().filter(|token| !token.is_whitespace()) {
        if !is_unknown_word(token) {
            previous = None;
        } else if previous.is_some() {
            return previous;
        } else {
            previous = Some(token);
        }
    }
    None
}

/// Splits a short unknown word token into one token per letter. Any other token is returned as
/// is.
pub fn split_implicit_product(token: Token<'_>) -> Vec<Token<'_>> {
    let splittable = token.kind == TokenKind::Name
        && !is_function(token.lexeme)
        && !is_symbol_name(token.lexeme)
        && token.lexeme.len() <= MAX_IMPLICIT_WORD;
    if !splittable {
        return vec![token];
    }

    // `Name` lexemes are ASCII, so byte offsets are character offsets
    (0..token.lexeme.len())
        .map(|i| Token {
            span: token.span.start + i..token.span.start + i + 1,
            kind: TokenKind::Name,
            lexeme: &token.lexeme[i..i + 1],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;
    use crate::tokenizer::tokenize_complete;

    #[test]
    fn symbol_names() {
        assert!(is_symbol_name("x"));
        assert!(is_symbol_name("x_1"));
        assert!(is_symbol_name("theta"));
        assert!(is_symbol_name("pi"));
        assert!(!is_symbol_name("xy"));
        assert!(!is_symbol_name("sqrt"));
    }

    #[test]
    fn suggest_close_names() {
        assert_eq!(suggestions("sqroot"), vec!["sqrt".to_string()]);
        assert!(suggestions("cosine").is_empty());
        assert_eq!(suggestions("thetta"), vec!["theta".to_string()]);
    }

    #[test]
    fn prose_runs() {
        let words = |source: &str| find_prose(&tokenize_complete(source)).map(|token| token.lexeme.to_string());
        assert_eq!(words("I do not get it"), Some("do".to_string()));
        assert_eq!(words("x = 2 so it is ok"), Some("so".to_string()));
        assert_eq!(words("2xy + ab"), None);
        assert_eq!(words("x y z"), None);
        assert_eq!(words("theta pi"), None);
        assert_eq!(words("ab + cd"), None);
    }

    #[test]
    fn split_short_words() {
        let token = Token { span: 4..6, kind: TokenKind::Name, lexeme: "xy" };
        let split = split_implicit_product(token);
        assert_eq!(split, vec![
            Token { span: 4..5, kind: TokenKind::Name, lexeme: "x" },
            Token { span: 5..6, kind: TokenKind::Name, lexeme: "y" },
        ]);

        let word = Token { span: 0..5, kind: TokenKind::Name, lexeme: "think" };
        assert_eq!(split_implicit_product(word.clone()), vec![word]);
    }
}
