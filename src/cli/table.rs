//! Plain-text tables for console listings.

use std::fmt;

#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    #[must_use]
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(ToString::to_string).collect(),
            rows: Vec::new(),
        }
    }

    /// Rows shorter than the header are padded; extra cells are dropped.
    pub fn add_row(&mut self, mut cells: Vec<String>) {
        cells.resize(self.headers.len(), String::new());
        self.rows.push(cells);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, cells: &[String], widths: &[usize]) -> fmt::Result {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(" | ");
    writeln!(f, "{}", line.trim_end())
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.widths();
        write_row(f, &self.headers, &widths)?;

        let rule_len = widths.iter().sum::<usize>() + widths.len().saturating_sub(1) * 3;
        writeln!(f, "{:-<rule_len$}", "")?;

        for row in &self.rows {
            write_row(f, row, &widths)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_aligned_columns() {
        let mut table = Table::new(&["ID", "Name"]);
        table.add_row(vec!["1".to_string(), "Kevin Casey".to_string()]);
        table.add_row(vec!["12".to_string(), "Zoé".to_string()]);

        let rendered = table.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "ID | Name");
        assert_eq!(lines[1], "-".repeat(16));
        assert_eq!(lines[2], "1  | Kevin Casey");
        assert_eq!(lines[3], "12 | Zoé");
    }

    #[test]
    fn pads_short_rows() {
        let mut table = Table::new(&["A", "B", "C"]);
        table.add_row(vec!["x".to_string()]);
        assert_eq!(table.len(), 1);
        assert!(table.to_string().lines().nth(2).unwrap().starts_with("x |"));
    }
}
