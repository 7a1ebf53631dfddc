//! Table formatting utilities for CLI output.

use comfy_table::{Cell, Color, ContentArrangement, Table, presets};

/// Coverage data for a single language.
pub struct LanguageCoverage {
    /// Language tag (e.g., "es", "pt-BR").
    pub language: String,
    /// Number of source messages translated.
    pub translated: usize,
    /// Ids of missing messages.
    pub missing: Vec<String>,
}

impl LanguageCoverage {
    /// Share of source messages translated, as a whole percentage.
    fn percent(&self, source_count: usize) -> u32 {
        if source_count == 0 {
            return 100;
        }
        (self.translated as f64 * 100.0 / source_count as f64).floor() as u32
    }
}

/// Format coverage data as a table, one row per language.
pub fn format_coverage_table(source_count: usize, coverage: &[LanguageCoverage]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_BORDERS_ONLY);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Language", "Translated", "Complete", "Missing"]);

    for lang in coverage {
        let percent = lang.percent(source_count);
        let color = match percent {
            100 => Color::Green,
            50..=99 => Color::Yellow,
            _ => Color::Red,
        };
        table.add_row(vec![
            Cell::new(&lang.language),
            Cell::new(format!("{}/{source_count}", lang.translated)),
            Cell::new(format!("{percent}%")).fg(color),
            Cell::new(lang.missing.len()),
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds_down() {
        let coverage = LanguageCoverage {
            language: "de".to_string(),
            translated: 2,
            missing: vec!["c".to_string()],
        };
        assert_eq!(coverage.percent(3), 66);
        assert_eq!(coverage.percent(0), 100);
    }

    #[test]
    fn table_has_a_row_per_language() {
        let coverage = [
            LanguageCoverage {
                language: "de".to_string(),
                translated: 1,
                missing: Vec::new(),
            },
            LanguageCoverage {
                language: "fr".to_string(),
                translated: 0,
                missing: vec!["hello".to_string()],
            },
        ];
        let rendered = format_coverage_table(1, &coverage).to_string();
        assert!(rendered.contains("de"));
        assert!(rendered.contains("0/1"));
    }
}
