use mathgrade_compute::{parse, ParseError, ParsedExpr};

/// One step of a student's submission, parsed once per grading call.
#[derive(Debug)]
pub struct StudentStep {
    index: usize,
    raw: String,
    parsed: Result<ParsedExpr, ParseError>,
}

impl StudentStep {
    /// Normalizes and parses a submitted step. Steps that are not recognizable mathematics are
    /// kept, with the parse error.
    pub fn new(index: usize, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let parsed = parse(&raw);
        Self { index, raw, parsed }
    }

    /// Position of the step in the submission, starting from 0.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The step as submitted.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The step after notation normalization.
    pub fn normalized(&self) -> &str {
        match &self.parsed {
            Ok(parsed) => parsed.normalized(),
            Err(err) => err.normalized(),
        }
    }

    pub fn parsed(&self) -> Result<&ParsedExpr, &ParseError> {
        self.parsed.as_ref()
    }
}
