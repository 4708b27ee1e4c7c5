//! Canonicalizes the surface notation of a step before it is compared or parsed.
//!
//! Normalization never fails: anything it does not recognize is passed through untouched and left
//! for the parser to report.

use std::borrow::Cow;

/// Characters that never need surrounding whitespace.
const OPERATORS: &str = "+-*/^=(),";

/// Words that only introduce a step, such as `therefore x = 2`.
const LEADING_WORDS: [&str; 7] = ["therefore", "thus", "hence", "then", "so", "answer", "ans"];

/// Arrows and symbols that only introduce a step.
const LEADING_ARROWS: [&str; 4] = ["=>", "⇒", "∴", "→"];

/// Normalizes a raw step: maps operator variants to canonical ASCII forms, strips step labels and
/// trailing punctuation, and collapses whitespace.
///
/// Implicit multiplication is kept as written: `3x` and `3*x` normalize differently.
pub fn normalize(raw: &str) -> String {
    let mapped = map_symbols(raw);
    let stripped = strip_prefixes(&mapped);
    let collapsed = collapse_whitespace(stripped);
    collapsed
        .trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | ':') || c.is_whitespace())
        .to_owned()
}

/// Returns the ASCII digit for a superscript digit.
fn superscript_digit(c: char) -> Option<char> {
    match c {
        '⁰' => Some('0'),
        '¹' => Some('1'),
        '²' => Some('2'),
        '³' => Some('3'),
        '⁴' => Some('4'),
        '⁵' => Some('5'),
        '⁶' => Some('6'),
        '⁷' => Some('7'),
        '⁸' => Some('8'),
        '⁹' => Some('9'),
        _ => None,
    }
}

/// Returns the spelled-out name of a Greek letter.
fn greek_name(c: char) -> Option<&'static str> {
    Some(match c {
        'α' => "alpha",
        'β' => "beta",
        'γ' => "gamma",
        'δ' => "delta",
        'ε' => "epsilon",
        'θ' => "theta",
        'λ' => "lambda",
        'μ' => "mu",
        'π' => "pi",
        'ρ' => "rho",
        'σ' => "sigma",
        'τ' => "tau",
        'φ' => "phi",
        'ψ' => "psi",
        'ω' => "omega",
        _ => return None,
    })
}

/// Maps every operator variant, superscript, radical and Greek letter to its canonical ASCII
/// spelling.
fn map_symbols(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                out.push('^');
            },
            '=' if chars.peek() == Some(&'=') => {
                chars.next();
                out.push('=');
            },
            '×' | '·' | '⋅' | '∙' | '∗' => out.push('*'),
            '÷' | '∕' => out.push('/'),
            '−' | '–' | '—' => out.push('-'),
            '[' | '{' => out.push('('),
            ']' | '}' => out.push(')'),
            '\u{a0}' => out.push(' '),
            '√' => {
                out.push_str("sqrt");
                if chars.peek() != Some(&'(') {
                    out.push('(');
                    while let Some(&next) = chars.peek() {
                        if !next.is_ascii_alphanumeric() && next != '.' {
                            break;
                        }
                        out.push(next);
                        chars.next();
                    }
                    out.push(')');
                }
            },
            '⁻' => {
                let digits = superscript_run(&mut chars);
                out.push_str(&format!("^(-{})", digits));
            },
            c if superscript_digit(c).is_some() => {
                let run = superscript_run(&mut chars);
                out.push('^');
                out.extend(superscript_digit(c).into_iter().chain(run.chars()));
            },
            '\\' => {
                let mut command = String::new();
                while let Some(&next) = chars.peek() {
                    if !next.is_ascii_alphabetic() {
                        break;
                    }
                    command.push(next);
                    chars.next();
                }
                match command.as_str() {
                    "cdot" | "times" => out.push('*'),
                    "div" => out.push('/'),
                    "sqrt" => out.push_str("sqrt"),
                    "left" | "right" => (),
                    name if greek_name_of_word(name) => {
                        out.push(' ');
                        out.push_str(name);
                        out.push(' ');
                    },
                    _ => {
                        out.push('\\');
                        out.push_str(&command);
                    },
                }
            },
            c => match greek_name(c) {
                Some(name) => {
                    out.push(' ');
                    out.push_str(name);
                    out.push(' ');
                },
                None => out.push(c),
            },
        }
    }

    out
}

/// Returns true if the LaTeX command is a Greek letter this crate knows by name.
fn greek_name_of_word(name: &str) -> bool {
    "αβγδεθλμπρστφψω".chars().filter_map(greek_name).any(|greek| greek == name)
}

/// Consumes a run of superscript digits, returning them as ASCII digits.
fn superscript_run(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(digit) = chars.peek().copied().and_then(superscript_digit) {
        digits.push(digit);
        chars.next();
    }
    digits
}

/// Returns true if `s` starts with `word` (ignoring ASCII case) followed by a word boundary.
fn starts_with_word(s: &str, word: &str) -> bool {
    let head_matches = s.get(..word.len()).is_some_and(|head| head.eq_ignore_ascii_case(word));
    head_matches && s[word.len()..].chars().next().map_or(true, |c| !c.is_alphanumeric() && c != '_')
}

/// Strips a step label such as `Step 2:`, `2.`, `2)`, `(b)` or `b)`.
fn strip_label(s: &str) -> Option<&str> {
    if s.get(..4).is_some_and(|head| head.eq_ignore_ascii_case("step")) {
        let rest = s[4..].trim_start();
        let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        let after = rest[digits..].trim_start();
        if let Some(rest) = after.strip_prefix(|c: char| matches!(c, ':' | '.' | ')' | '-')) {
            return Some(rest);
        }
        return (digits > 0).then_some(after);
    }

    let digits = s.len() - s.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits > 0 {
        let after = &s[digits..];
        if let Some(rest) = after.strip_prefix(')') {
            return Some(rest);
        }
        return after.strip_prefix('.')
            .filter(|rest| rest.starts_with(char::is_whitespace));
    }

    // `(b) ...` and `b) ...`
    let inner = s.strip_prefix('(').unwrap_or(s);
    let mut chars = inner.chars();
    let is_label = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.next() == Some(')')
        && chars.next().is_some_and(char::is_whitespace);
    if !is_label {
        return None;
    }

    let rest = inner[2..].trim_start();
    let continues_expression = rest.is_empty() || rest.starts_with(|c: char| OPERATORS.contains(c));
    (!continues_expression).then_some(rest)
}

/// Strips a word or arrow that only introduces the step, or a leading `=`.
fn strip_leading_word(s: &str) -> Option<&str> {
    if let Some(word) = LEADING_WORDS.iter().find(|word| starts_with_word(s, word)) {
        return Some(s[word.len()..].trim_start_matches(|c: char| matches!(c, ',' | ':')));
    }

    if let Some(rest) = LEADING_ARROWS.iter().find_map(|arrow| s.strip_prefix(*arrow)) {
        return Some(rest);
    }

    s.strip_prefix('=').filter(|rest| !rest.starts_with('='))
}

/// Strips every label and introductory word at the start of the step.
fn strip_prefixes(s: &str) -> &str {
    let mut s = s.trim();
    while let Some(rest) = strip_label(s).or_else(|| strip_leading_word(s)) {
        let rest = rest.trim_start();
        if rest.len() >= s.len() {
            break;
        }
        s = rest;
    }
    s
}

/// Returns true if the word joins the clauses of a step.
fn is_connective(word: &str) -> bool {
    word.eq_ignore_ascii_case("or") || word.eq_ignore_ascii_case("and")
}

/// Returns true if the two adjacent words must stay separated by a space.
fn needs_space(prev: &str, next: &str) -> bool {
    if is_connective(prev) || is_connective(next) {
        return true;
    }

    let (Some(last), Some(first)) = (prev.chars().last(), next.chars().next()) else {
        return false;
    };
    if OPERATORS.contains(last) || OPERATORS.contains(first) {
        return false;
    }

    // `2 x` is the product `2x`
    !(last.is_ascii_digit() && first.is_alphabetic())
}

/// Collapses runs of whitespace, drops whitespace that separates nothing, and lowercases
/// connectives.
fn collapse_whitespace(s: &str) -> String {
    let words = s.split_whitespace().collect::<Vec<_>>();
    let mut out = String::with_capacity(s.len());

    for (i, word) in words.iter().enumerate() {
        if i > 0 && needs_space(words[i - 1], word) {
            out.push(' ');
        }

        let word: Cow<str> = if is_connective(word) {
            Cow::Owned(word.to_ascii_lowercase())
        } else {
            Cow::Borrowed(word)
        };
        out.push_str(&word);
    }

    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn whitespace() {
        assert_eq!(normalize("  x^2   +  3x  "), "x^2+3x");
        assert_eq!(normalize("x = 2 OR x = 3"), "x=2 or x=3");
        assert_eq!(normalize("2 x + 3 y"), "2x+3y");
        assert_eq!(normalize("sqrt (x + 1)"), "sqrt(x+1)");
        assert_eq!(normalize("x y"), "x y");
    }

    #[test]
    fn operator_variants() {
        assert_eq!(normalize("x**2 + 3*x"), "x^2+3*x");
        assert_eq!(normalize("6 ÷ 2 × 3"), "6/2*3");
        assert_eq!(normalize("x − 1 == 0"), "x-1=0");
        assert_eq!(normalize("x² − 5x + 6 = 0"), "x^2-5x+6=0");
        assert_eq!(normalize("x⁻¹"), "x^(-1)");
        assert_eq!(normalize("x¹² + 1"), "x^12+1");
        assert_eq!(normalize("[x + 1]·2"), "(x+1)*2");
        assert_eq!(normalize("x \\cdot y"), "x*y");
    }

    #[test]
    fn radicals_and_greek() {
        assert_eq!(normalize("√x + 1"), "sqrt(x)+1");
        assert_eq!(normalize("√(x+1)"), "sqrt(x+1)");
        assert_eq!(normalize("2π"), "2pi");
        assert_eq!(normalize("πr²"), "pi r^2");
        assert_eq!(normalize("\\theta + 1"), "theta+1");
    }

    #[test]
    fn labels_and_leading_words() {
        assert_eq!(normalize("Step 2: x = 3"), "x=3");
        assert_eq!(normalize("step 3 - (x-2)(x-3) = 0"), "(x-2)(x-3)=0");
        assert_eq!(normalize("1. x^2 = 4"), "x^2=4");
        assert_eq!(normalize("2) x = 2"), "x=2");
        assert_eq!(normalize("(b) x = 2"), "x=2");
        assert_eq!(normalize("Therefore, x = 5"), "x=5");
        assert_eq!(normalize("=> x = 5"), "x=5");
        assert_eq!(normalize("= 2x + 4"), "2x+4");
        assert_eq!(normalize("Answer: x = 5"), "x=5");
    }

    #[test]
    fn labels_are_not_confused_with_math() {
        assert_eq!(normalize("3.14159"), "3.14159");
        assert_eq!(normalize("(x) = 2"), "(x)=2");
        assert_eq!(normalize("sin(x)"), "sin(x)");
        assert_eq!(normalize("some"), "some");
    }

    #[test]
    fn trailing_punctuation() {
        assert_eq!(normalize("x = 3."), "x=3");
        assert_eq!(normalize("x = 2, x = 3;"), "x=2,x=3");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("."), "");
    }

    #[test]
    fn idempotent() {
        let inputs = [
            "Step 1: x² − 5x + 6 = 0",
            "x**2 + 3*x",
            "2π r",
            "= 2 x (x + 1).",
            "x = 2 OR x = 3",
            "I think the answer is probably something",
            "√x ÷ 2",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "normalizing {input:?} twice");
        }
    }
}
