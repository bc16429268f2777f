//! `.sql` script assembly.

use std::fmt;

use chrono::NaiveDateTime;

use crate::sql::TIMESTAMP_FORMAT;

/// A generated SQL file: header, one block per entry, and a total.
#[derive(Debug, Clone)]
pub struct SqlScript {
    generated_at: NaiveDateTime,
    entries: Vec<(u64, Vec<String>)>,
}

impl SqlScript {
    pub fn new(generated_at: NaiveDateTime) -> Self {
        Self {
            generated_at,
            entries: Vec::new(),
        }
    }

    /// Append one entry's statements.
    pub fn push_entry(&mut self, entry_id: u64, statements: Vec<String>) {
        self.entries.push((entry_id, statements));
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn statement_count(&self) -> usize {
        self.entries.iter().map(|(_, s)| s.len()).sum()
    }
}

impl fmt::Display for SqlScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "-- Forminator Form Entry Meta INSERT Queries")?;
        writeln!(f, "-- Generated: {}", self.generated_at.format(TIMESTAMP_FORMAT))?;
        writeln!(f)?;

        for (entry_id, statements) in &self.entries {
            writeln!(f, "-- Entry ID: {}", entry_id)?;
            for statement in statements {
                writeln!(f, "{}", statement)?;
            }
            writeln!(f)?;
        }

        writeln!(f, "-- Total queries generated: {}", self.statement_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render() {
        let at = NaiveDate::from_ymd_opt(2025, 7, 21)
            .and_then(|d| d.and_hms_opt(14, 5, 9))
            .unwrap();
        let mut script = SqlScript::new(at);
        script.push_entry(1, vec!["INSERT 1;".to_string(), "INSERT 2;".to_string()]);
        script.push_entry(2, vec!["INSERT 3;".to_string()]);

        assert_eq!(script.entry_count(), 2);
        assert_eq!(
            script.to_string(),
            "-- Forminator Form Entry Meta INSERT Queries\n\
             -- Generated: 2025-07-21 14:05:09\n\
             \n\
             -- Entry ID: 1\n\
             INSERT 1;\n\
             INSERT 2;\n\
             \n\
             -- Entry ID: 2\n\
             INSERT 3;\n\
             \n\
             -- Total queries generated: 3\n"
        );
    }
}
