//! Line preprocessor (component E).
//!
//! Strips line comments (`-- ...`), inline comments (`< ... >` on one
//! line), and multi-line comments (`< ...` spanning lines, closed by the
//! first `>` on a later line). State for the multi-line case is carried
//! across calls in [`Preprocessor`].

#[derive(Debug, Default)]
pub struct Preprocessor {
    in_multi_line_comment: bool,
}

impl Preprocessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preprocess one line (trailing newline already stripped by the
    /// caller's line reader). Returns `None` if the line carries no
    /// executable content after comment stripping.
    pub fn process(&mut self, line: &str) -> Option<String> {
        let line = line.strip_suffix('\r').unwrap_or(line);

        let mut rest = line.to_string();
        if self.in_multi_line_comment {
            match rest.find('>') {
                Some(idx) => {
                    self.in_multi_line_comment = false;
                    rest = rest[idx + 1..].to_string();
                }
                None => return None,
            }
        } else if let Some(lt) = rest.find('<') {
            match rest.find('>') {
                // Inline comment: splice out the `<..>` span, keeping
                // whatever came before and after it on the line.
                Some(gt) if lt < gt => rest = format!("{}{}", &rest[..lt], &rest[gt + 1..]),
                _ => {
                    self.in_multi_line_comment = true;
                    rest.truncate(lt);
                }
            }
        }

        if let Some(idx) = rest.find("--") {
            rest.truncate(idx);
        }

        if rest.is_empty() {
            None
        } else {
            Some(rest)
        }
    }
}
