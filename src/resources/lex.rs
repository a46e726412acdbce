//! Line scanner shared by the OBJ and MTL grammars.

use crate::error::ParseError;

/// One meaningful line: its keyword, whitespace-split arguments, and the raw
/// argument string for names and paths that may contain spaces.
pub(crate) struct Statement<'a> {
    pub line: usize,
    pub keyword: &'a str,
    pub parts: Vec<&'a str>,
    pub unparsed: &'a str,
}

/// Yields every non-blank, non-comment line of `text`.
pub(crate) fn statements(text: &str) -> impl Iterator<Item = Statement<'_>> {
    text.lines().enumerate().filter_map(|(idx, raw)| {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        let (keyword, unparsed) = match line.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim_start()),
            None => (line, ""),
        };
        Some(Statement {
            line: idx + 1,
            keyword,
            parts: unparsed.split_whitespace().collect(),
            unparsed,
        })
    })
}

impl Statement<'_> {
    /// Parses a finite float. `nan` and `inf` spellings are malformed.
    pub fn float(&self, token: &str) -> Result<f64, ParseError> {
        match token.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(ParseError::MalformedNumber {
                line: self.line,
                token: token.to_string(),
            }),
        }
    }

    pub fn int(&self, token: &str) -> Result<i64, ParseError> {
        token.parse::<i64>().map_err(|_| ParseError::MalformedNumber {
            line: self.line,
            token: token.to_string(),
        })
    }

    pub fn require(&self, expected: usize) -> Result<(), ParseError> {
        if self.parts.len() < expected {
            return Err(ParseError::MissingComponents {
                line: self.line,
                keyword: self.keyword.to_string(),
                expected,
                found: self.parts.len(),
            });
        }
        Ok(())
    }

    /// The first `N` arguments as floats.
    pub fn floats<const N: usize>(&self) -> Result<[f64; N], ParseError> {
        self.require(N)?;
        let mut out = [0.0; N];
        for (slot, token) in out.iter_mut().zip(&self.parts) {
            *slot = self.float(token)?;
        }
        Ok(out)
    }

    /// The raw argument string, which must not be empty.
    pub fn text(&self) -> Result<&str, ParseError> {
        if self.unparsed.is_empty() {
            return Err(ParseError::MissingComponents {
                line: self.line,
                keyword: self.keyword.to_string(),
                expected: 1,
                found: 0,
            });
        }
        Ok(self.unparsed)
    }
}
