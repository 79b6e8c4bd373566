//!
//! src/report.rs  Andrew Belles  Oct 6th, 2025
//!
//! Renders aggregation tables as pipe style markdown and stitches them into
//! the text report printed by `chart-trends report`
//!

use crate::aggregate::{
    self, GenreAverageShare, GenreMean, GenreShare, TopEntry, UnemploymentPoint
};
use crate::clean::EconomicPeriod;
use crate::dataset::ChartRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right
}

/// A markdown table under construction. Cells are stored pre-formatted
pub struct Table {
    columns: Vec<(&'static str, Align)>,
    rows: Vec<Vec<String>>
}

impl Table {
    pub fn new(columns: &[(&'static str, Align)]) -> Self {
        Self { columns: columns.to_vec(), rows: Vec::new() }
    }

    /// Missing cells render empty, extra cells are dropped
    pub fn push(&mut self, mut row: Vec<String>) {
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
    }

    pub fn render(&self) -> String {
        let widths: Vec<usize> = self.columns.iter()
            .enumerate()
            .map(|(idx, (header, _))| {
                self.rows.iter()
                    .map(|row| row[idx].chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
                    .max(3)
            })
            .collect();

        let mut out = String::new();
        let headers: Vec<&str> = self.columns.iter().map(|(h, _)| *h).collect();
        self.write_line(&mut out, &headers, &widths);

        out.push('|');
        for ((_, align), width) in self.columns.iter().zip(&widths) {
            let dashes = "-".repeat(width - 1);
            match align {
                Align::Left => out.push_str(&format!(" :{dashes} |")),
                Align::Right => out.push_str(&format!(" {dashes}: |")),
            }
        }
        out.push('\n');

        for row in &self.rows {
            let cells: Vec<&str> = row.iter().map(String::as_str).collect();
            self.write_line(&mut out, &cells, &widths);
        }
        out
    }

    fn write_line(&self, out: &mut String, cells: &[&str], widths: &[usize]) {
        out.push('|');
        let columns = cells.iter().zip(&self.columns).zip(widths.iter().copied());
        for ((cell, (_, align)), width) in columns {
            // pad on chars, `{:>w$}` counts chars as well
            let padded = match align {
                Align::Left => format!(" {cell:<width$} |"),
                Align::Right => format!(" {cell:>width$} |"),
            };
            out.push_str(&padded);
        }
        out.push('\n');
    }
}

pub fn top_artists_table(rows: &[TopEntry]) -> String {
    top_table("artist_name", rows)
}

pub fn top_genres_table(rows: &[TopEntry]) -> String {
    top_table("genre", rows)
}

fn top_table(name_column: &'static str, rows: &[TopEntry]) -> String {
    let mut table = Table::new(&[
        ("year", Align::Right),
        (name_column, Align::Left),
        ("appearances", Align::Right),
    ]);
    for row in rows {
        table.push(vec![
            row.year.to_string(),
            row.name.clone(),
            row.appearances.to_string()
        ]);
    }
    table.render()
}

pub fn mean_appearances_table(rows: &[GenreMean]) -> String {
    let mut table = Table::new(&[("genre", Align::Left), ("mean_appearances", Align::Right)]);
    for row in rows {
        table.push(vec![row.genre.to_string(), format!("{:.2}", row.mean_appearances)]);
    }
    table.render()
}

pub fn period_shares_table(rows: &[GenreAverageShare]) -> String {
    let mut table = Table::new(&[("genre", Align::Left), ("average_proportion", Align::Right)]);
    for row in rows {
        table.push(vec![row.genre.to_string(), format!("{:.4}", row.average_proportion)]);
    }
    table.render()
}

pub fn genre_shares_table(rows: &[GenreShare]) -> String {
    let mut table = Table::new(&[
        ("year", Align::Right),
        ("genre", Align::Left),
        ("count", Align::Right),
        ("proportion", Align::Right),
    ]);
    for row in rows {
        table.push(vec![
            row.year.to_string(),
            row.genre.to_string(),
            row.count.to_string(),
            format!("{:.4}", row.proportion)
        ]);
    }
    table.render()
}

pub fn unemployment_table(rows: &[UnemploymentPoint]) -> String {
    let mut table = Table::new(&[("year", Align::Right), ("unemployment", Align::Right)]);
    for row in rows {
        table.push(vec![row.year.to_string(), format!("{:.1}", row.unemployment)]);
    }
    table.render()
}

/// Full text report over the loaded records
pub fn render_report(records: &[ChartRecord]) -> String {
    let mut out = String::from("# UK top 40 genre trends\n\n");

    let sections: [(&str, String); 5] = [
        ("Top artist per year", top_artists_table(&aggregate::top_artists_by_year(records))),
        ("Top genre per year", top_genres_table(&aggregate::top_genres_by_year(records))),
        ("Mean yearly appearances per genre",
            mean_appearances_table(&aggregate::mean_genre_appearances(records))),
        ("Unemployment by year", unemployment_table(&aggregate::unemployment_by_year(records))),
        ("Genre share by year", genre_shares_table(&aggregate::genre_shares_by_year(records))),
    ];
    for (title, table) in sections {
        out.push_str(&format!("## {title}\n\n{table}\n"));
    }

    out.push_str("## Genre share by economic period\n\n");
    for period in EconomicPeriod::ALL {
        let shares = aggregate::period_genre_shares(records, period);
        out.push_str(&format!(
            "### {period} ({})\n\n{}\n",
            period.caption(),
            period_shares_table(&shares)
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genre::GenreCategory;

    #[test]
    fn table_pads_and_aligns() {
        let mut table = Table::new(&[("year", Align::Right), ("name", Align::Left)]);
        table.push(vec!["2001".into(), "abba".into()]);
        table.push(vec!["2010".into(), "zed".into()]);

        assert_eq!(table.render(), "\
| year | name |
| ---: | :--- |
| 2001 | abba |
| 2010 | zed  |
");
    }

    #[test]
    fn narrow_columns_keep_a_valid_separator() {
        let mut table = Table::new(&[("n", Align::Right)]);
        table.push(vec!["7".into()]);
        assert_eq!(table.render(), "|   n |\n| --: |\n|   7 |\n");
    }

    #[test]
    fn short_rows_are_padded() {
        let mut table = Table::new(&[("a", Align::Left), ("b", Align::Left)]);
        table.push(vec!["x".into()]);
        assert!(table.render().ends_with("| x   |     |\n"));
    }

    #[test]
    fn top_table_uses_named_column() {
        let rows = vec![TopEntry { year: 2009, name: "dizzee rascal".into(), appearances: 4 }];
        let table = top_artists_table(&rows);
        let mut lines = table.lines();
        assert_eq!(lines.next(), Some("| year | artist_name   | appearances |"));
        assert_eq!(lines.next(), Some("| ---: | :------------ | ----------: |"));
        assert_eq!(lines.next(), Some("| 2009 | dizzee rascal |           4 |"));
    }

    #[test]
    fn mean_table_prints_two_decimals() {
        let rows = vec![GenreMean { genre: GenreCategory::Rock, mean_appearances: 4.0 }];
        assert!(mean_appearances_table(&rows).contains("| Rock  |             4.00 |"));
    }

    #[test]
    fn report_has_every_section() {
        let records = vec![
            ChartRecord::new("a", "Duffy", Some("pop"), 2008, Some(6.0)),
            ChartRecord::new("b", "Dizzee Rascal", Some("grime"), 2009, Some(9.0)),
            ChartRecord::new("c", "Arctic Monkeys", Some("rock"), 2014, Some(4.0)),
        ];
        let report = render_report(&records);

        for heading in [
            "## Top artist per year",
            "## Top genre per year",
            "## Mean yearly appearances per genre",
            "## Unemployment by year",
            "## Genre share by year",
            "### Recession (Unemployment Rate over 8%)",
            "### Moderate Unemployment (Unemployment Rate between 5 and 8%)",
            "### Economic Stability (Unemployment Rate below 5%)",
        ] {
            assert!(report.contains(heading), "missing {heading}");
        }
        assert!(report.contains("| EDM, House, and Dance |"));
        assert_eq!(report, render_report(&records));
    }
}
