//!
//! src/chart.rs  Andrew Belles  Oct 7th, 2025
//!
//! SVG rendering of the aggregation tables. Short genre names, colors and
//! stacking order come from a `ChartStyle` handed to every chart
//!

use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::{Path, PathBuf}
};
use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::info;

use crate::aggregate::{
    self, GenreAverageShare, GenreShare, OverlayPoint, UnemploymentPoint
};
use crate::clean::EconomicPeriod;
use crate::dataset::ChartRecord;
use crate::errors::TrendsError;
use crate::genre::GenreCategory;

const SIZE: (u32, u32) = (1024, 640);
const HEATMAP_SIZE: (u32, u32) = (1024, 800);
const FONT: &str = "sans-serif";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendKind {
    StackedBar,
    Heatmap,
    Area
}

impl TrendKind {
    pub const ALL: [TrendKind; 3] = [TrendKind::StackedBar, TrendKind::Heatmap, TrendKind::Area];

    fn file_stem(self) -> &'static str {
        match self {
            TrendKind::StackedBar => "genre_trends_bar",
            TrendKind::Heatmap => "genre_trends_heatmap",
            TrendKind::Area => "genre_trends_area",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenreStyle {
    pub short_name: &'static str,
    pub color: RGBColor
}

/// Presentation lookups for genres. Categories without an entry use their
/// full label and `fallback`
#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub genres: BTreeMap<GenreCategory, GenreStyle>,
    /// Stacked first, in this order; remaining genres follow in category order
    pub leading: Vec<GenreCategory>,
    pub fallback: RGBColor,
    pub accent: RGBColor,
    pub highlight: RGBColor
}

impl Default for ChartStyle {
    fn default() -> Self {
        let genres = [
            (GenreCategory::JazzAndSoul, "Jazz", RGBColor(0xfe, 0xe0, 0x8b)),
            (GenreCategory::Pop, "Pop", RGBColor(0x32, 0x88, 0xbd)),
            (GenreCategory::EdmHouseDance, "EDM", RGBColor(0xfd, 0xae, 0x61)),
            (GenreCategory::RapAndHipHop, "Rap", RGBColor(0xd5, 0x3e, 0x4f)),
            (GenreCategory::MoviesTvTheater, "Movies", RGBColor(0xff, 0xff, 0xbf)),
            (GenreCategory::RnB, "R&B", RGBColor(0xe6, 0xf5, 0x98)),
            (GenreCategory::Indie, "Indie", RGBColor(0xab, 0xdd, 0xa4)),
            (GenreCategory::Rock, "Rock", RGBColor(0x66, 0xc2, 0xa5)),
            (GenreCategory::CountryAndFolk, "Country", RGBColor(0xf4, 0x6d, 0x43)),
            (GenreCategory::LatinInspired, "Latin", RGBColor(0x5e, 0x4f, 0xa2)),
        ];

        Self {
            genres: genres.into_iter()
                .map(|(genre, short_name, color)| (genre, GenreStyle { short_name, color }))
                .collect(),
            leading: vec![
                GenreCategory::Pop,
                GenreCategory::EdmHouseDance,
                GenreCategory::RapAndHipHop,
                GenreCategory::Rock,
            ],
            fallback: RGBColor(0xbd, 0xbd, 0xbd),
            accent: RGBColor(0x32, 0x88, 0xbd),
            highlight: RED
        }
    }
}

impl ChartStyle {
    pub fn short_name(&self, genre: GenreCategory) -> &str {
        self.genres.get(&genre).map_or(genre.label(), |s| s.short_name)
    }

    pub fn color(&self, genre: GenreCategory) -> RGBColor {
        self.genres.get(&genre).map_or(self.fallback, |s| s.color)
    }

    /// Leading genres that are present, then the rest in category order
    pub fn order(&self, present: impl IntoIterator<Item = GenreCategory>) -> Vec<GenreCategory> {
        let present: BTreeSet<GenreCategory> = present.into_iter().collect();
        let mut order: Vec<GenreCategory> = self.leading.iter()
            .copied()
            .filter(|g| present.contains(g))
            .collect();
        order.extend(present.iter().copied().filter(|g| !self.leading.contains(g)));
        order
    }

    /// File name friendly short name
    pub fn slug(&self, genre: GenreCategory) -> String {
        self.short_name(genre)
            .to_lowercase()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect()
    }
}

fn canvas(path: &Path, size: (u32, u32)) ->
    Result<DrawingArea<SVGBackend<'_>, Shift>, TrendsError> {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    Ok(root)
}

/// Padded x range around the years, one unit when empty
fn year_range(years: impl Iterator<Item = i32>) -> std::ops::Range<f64> {
    let (lo, hi) = years.fold((i32::MAX, i32::MIN), |(lo, hi), y| (lo.min(y), hi.max(y)));
    if lo > hi {
        return 0.0..1.0;
    }
    (lo as f64 - 0.5)..(hi as f64 + 0.5)
}

fn y_upper(max: f64, floor: f64) -> f64 {
    if max * 1.1 > floor { max * 1.1 } else { floor }
}

fn year_label(x: &f64) -> String {
    if x.fract().abs() < 1e-9 { format!("{x:.0}") } else { String::new() }
}

fn percent_label(y: &f64) -> String {
    format!("{:.0}%", y * 100.0)
}

/// Label of the integer tick at `x`, nothing between ticks
fn index_label(names: &[String], x: f64) -> String {
    if x.fract().abs() > 1e-9 || x < 0.0 {
        return String::new();
    }
    names.get(x as usize).cloned().unwrap_or_default()
}

fn legend_box(color: RGBColor) -> impl Fn((i32, i32)) -> Rectangle<(i32, i32)> {
    move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
}

pub fn unemployment_chart(path: &Path, points: &[UnemploymentPoint], style: &ChartStyle) ->
    Result<(), TrendsError> {
    let root = canvas(path, SIZE)?;
    let max = points.iter().map(|p| p.unemployment).fold(0.0, f64::max);

    let mut chart = ChartBuilder::on(&root)
        .caption("UK Unemployment Rates", (FONT, 28))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(year_range(points.iter().map(|p| p.year)), 0f64..y_upper(max, 1.0))?;
    chart.configure_mesh()
        .x_desc("Year")
        .y_desc("Unemployment Rate (%)")
        .x_label_formatter(&year_label)
        .draw()?;

    let series: Vec<(f64, f64)> = points.iter()
        .map(|p| (p.year as f64, p.unemployment))
        .collect();
    chart.draw_series(LineSeries::new(series.clone(), style.accent.stroke_width(3)))?;
    chart.draw_series(series.into_iter().map(|p| Circle::new(p, 4, style.accent.filled())))?;

    root.present()?;
    Ok(())
}

/// Year by genre stacked bars, heights are the share proportions
fn stacked_bars(
    path: &Path,
    title: &str,
    y_desc: &str,
    shares: &[GenreShare],
    style: &ChartStyle
) -> Result<(), TrendsError> {
    let root = canvas(path, SIZE)?;

    let mut heights: BTreeMap<i32, f64> = BTreeMap::new();
    for share in shares {
        *heights.entry(share.year).or_insert(0.0) += share.proportion;
    }
    let max = heights.values().copied().fold(0.0, f64::max);

    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, 24))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(year_range(heights.keys().copied()), 0f64..y_upper(max, 0.1))?;
    chart.configure_mesh()
        .x_desc("Year")
        .y_desc(y_desc)
        .x_label_formatter(&year_label)
        .draw()?;

    let mut base: BTreeMap<i32, f64> = BTreeMap::new();
    for genre in style.order(shares.iter().map(|s| s.genre)) {
        let color = style.color(genre);
        let bars: Vec<Rectangle<(f64, f64)>> = shares.iter()
            .filter(|s| s.genre == genre)
            .map(|s| {
                let bottom = base.entry(s.year).or_insert(0.0);
                let x = s.year as f64;
                let bar = Rectangle::new(
                    [(x - 0.4, *bottom), (x + 0.4, *bottom + s.proportion)],
                    color.filled()
                );
                *bottom += s.proportion;
                bar
            })
            .collect();
        chart.draw_series(bars)?
            .label(style.short_name(genre))
            .legend(legend_box(color));
    }

    chart.configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

/// Genres on rows, years on columns, white to blue by share
fn heatmap(path: &Path, shares: &[GenreShare], style: &ChartStyle) -> Result<(), TrendsError> {
    let root = canvas(path, HEATMAP_SIZE)?;
    let order = style.order(shares.iter().map(|s| s.genre));
    let names: Vec<String> = order.iter().map(|g| style.short_name(*g).to_string()).collect();
    let max = shares.iter().map(|s| s.proportion).fold(0.0, f64::max);

    let mut chart = ChartBuilder::on(&root)
        .caption("Proportion of Chart per Genre", (FONT, 24))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(90)
        .build_cartesian_2d(
            year_range(shares.iter().map(|s| s.year)),
            -0.5f64..(order.len().max(1) as f64 - 0.5)
        )?;
    let row_label = |y: &f64| index_label(&names, *y);
    chart.configure_mesh()
        .disable_mesh()
        .x_desc("Year")
        .y_desc("Genre")
        .y_labels(names.len().max(1))
        .x_label_formatter(&year_label)
        .y_label_formatter(&row_label)
        .draw()?;

    let cells = shares.iter().filter_map(|s| {
        let row = order.iter().position(|g| *g == s.genre)? as f64;
        let t = if max > 0.0 { s.proportion / max } else { 0.0 };
        let fade = (255.0 * (1.0 - t)).round() as u8;
        let x = s.year as f64;
        Some(Rectangle::new(
            [(x - 0.5, row - 0.5), (x + 0.5, row + 0.5)],
            RGBColor(fade, fade, 255).filled()
        ))
    });
    chart.draw_series(cells)?;

    root.present()?;
    Ok(())
}

/// Stacked area, one polygon per genre between its lower and upper bound
fn area(path: &Path, shares: &[GenreShare], style: &ChartStyle) -> Result<(), TrendsError> {
    let root = canvas(path, SIZE)?;
    let years: Vec<i32> = shares.iter()
        .map(|s| s.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let lookup: BTreeMap<(i32, GenreCategory), f64> = shares.iter()
        .map(|s| ((s.year, s.genre), s.proportion))
        .collect();

    let mut chart = ChartBuilder::on(&root)
        .caption("Proportion of Chart per Genre", (FONT, 24))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(year_range(years.iter().copied()), 0f64..1.0)?;
    chart.configure_mesh()
        .x_desc("Year")
        .y_desc("Proportion of Chart")
        .x_label_formatter(&year_label)
        .draw()?;

    let mut lower = vec![0.0; years.len()];
    for genre in style.order(shares.iter().map(|s| s.genre)) {
        let upper: Vec<f64> = years.iter()
            .zip(&lower)
            .map(|(year, low)| low + lookup.get(&(*year, genre)).copied().unwrap_or(0.0))
            .collect();

        let mut outline: Vec<(f64, f64)> = years.iter()
            .zip(&upper)
            .map(|(year, high)| (*year as f64, *high))
            .collect();
        outline.extend(years.iter().zip(&lower).rev().map(|(year, low)| (*year as f64, *low)));

        let color = style.color(genre);
        chart.draw_series(std::iter::once(Polygon::new(outline, color.filled())))?
            .label(style.short_name(genre))
            .legend(legend_box(color));
        lower = upper;
    }

    chart.configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

pub fn genre_trends_chart(
    path: &Path,
    shares: &[GenreShare],
    kind: TrendKind,
    style: &ChartStyle
) -> Result<(), TrendsError> {
    match kind {
        TrendKind::StackedBar => stacked_bars(
            path,
            "Proportion of the UK top 40 Charts per Genre",
            "Proportion of Chart",
            shares,
            style
        ),
        TrendKind::Heatmap => heatmap(path, shares, style),
        TrendKind::Area => area(path, shares, style),
    }
}

pub fn minor_genres_chart(path: &Path, shares: &[GenreShare], style: &ChartStyle) ->
    Result<(), TrendsError> {
    stacked_bars(
        path,
        "Genres other than Pop, EDM and Rap",
        "Proportion of Chart (Relative to All Genres)",
        shares,
        style
    )
}

/// One bar per genre, in the order of `averages`. The axis tops out at 0.5
/// unless a bar is taller
pub fn period_chart(
    path: &Path,
    averages: &[GenreAverageShare],
    period: EconomicPeriod,
    style: &ChartStyle
) -> Result<(), TrendsError> {
    let root = canvas(path, SIZE)?;
    let names: Vec<String> = averages.iter()
        .map(|a| style.short_name(a.genre).to_string())
        .collect();
    let max = averages.iter().map(|a| a.average_proportion).fold(0.0, f64::max);
    let title = format!("Genre Appearance in UK top 40 Charts, {}", period.caption());

    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, 24))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(
            -0.5f64..(names.len().max(1) as f64 - 0.5),
            0f64..y_upper(max, 0.5)
        )?;
    let bar_label = |x: &f64| index_label(&names, *x);
    chart.configure_mesh()
        .disable_x_mesh()
        .x_labels(names.len().max(1))
        .x_label_formatter(&bar_label)
        .y_desc("Proportion")
        .draw()?;

    chart.draw_series(averages.iter().enumerate().map(|(idx, a)| {
        let x = idx as f64;
        Rectangle::new(
            [(x - 0.4, 0.0), (x + 0.4, a.average_proportion)],
            style.color(a.genre).filled()
        )
    }))?;

    root.present()?;
    Ok(())
}

/// Genre share bars with the rescaled unemployment rate drawn over them
pub fn overlay_chart(
    path: &Path,
    points: &[OverlayPoint],
    genre: GenreCategory,
    style: &ChartStyle
) -> Result<(), TrendsError> {
    let root = canvas(path, SIZE)?;
    let max = points.iter()
        .flat_map(|p| [Some(p.proportion), p.scaled_unemployment])
        .flatten()
        .fold(0.0, f64::max);

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("{} and Unemployment", style.short_name(genre)), (FONT, 24))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(year_range(points.iter().map(|p| p.year)), 0f64..y_upper(max, 0.1))?;
    chart.configure_mesh()
        .x_desc("Year")
        .y_desc("Proportion (Genre and Scaled Unemployment)")
        .x_label_formatter(&year_label)
        .y_label_formatter(&percent_label)
        .draw()?;

    chart.draw_series(points.iter().map(|p| {
        let x = p.year as f64;
        Rectangle::new([(x - 0.4, 0.0), (x + 0.4, p.proportion)], style.accent.mix(0.7).filled())
    }))?
        .label(format!("{} share", style.short_name(genre)))
        .legend(legend_box(style.accent));

    let line: Vec<(f64, f64)> = points.iter()
        .filter_map(|p| p.scaled_unemployment.map(|s| (p.year as f64, s)))
        .collect();
    let highlight = style.highlight;
    chart.draw_series(LineSeries::new(line.clone(), highlight.stroke_width(3)))?
        .label("Unemployment (scaled)")
        .legend(legend_box(highlight));
    chart.draw_series(line.into_iter().map(|p| Circle::new(p, 4, highlight.filled())))?;

    chart.configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

pub fn genre_trend_chart(
    path: &Path,
    trend: &[GenreShare],
    genre: GenreCategory,
    style: &ChartStyle
) -> Result<(), TrendsError> {
    let root = canvas(path, SIZE)?;
    let max = trend.iter().map(|s| s.proportion).fold(0.0, f64::max);

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Proportion of the Chart for {}", genre.label()), (FONT, 24))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(year_range(trend.iter().map(|s| s.year)), 0f64..y_upper(max, 0.1))?;
    chart.configure_mesh()
        .x_desc("Year")
        .y_desc("Proportion")
        .x_label_formatter(&year_label)
        .y_label_formatter(&percent_label)
        .draw()?;

    chart.draw_series(trend.iter().map(|s| {
        let x = s.year as f64;
        Rectangle::new([(x - 0.4, 0.0), (x + 0.4, s.proportion)], style.accent.filled())
    }))?;

    root.present()?;
    Ok(())
}

/// Renders every chart into `dir` and returns the written files
pub fn render_all(
    records: &[ChartRecord],
    dir: &Path,
    genre: GenreCategory,
    style: &ChartStyle
) -> Result<Vec<PathBuf>, TrendsError> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    let path = dir.join("unemployment.svg");
    unemployment_chart(&path, &aggregate::unemployment_by_year(records), style)?;
    written.push(path);

    let shares = aggregate::genre_shares_by_year(records);
    for kind in TrendKind::ALL {
        let path = dir.join(format!("{}.svg", kind.file_stem()));
        genre_trends_chart(&path, &shares, kind, style)?;
        written.push(path);
    }

    for period in EconomicPeriod::ALL {
        let slug = period.label().to_lowercase().replace(' ', "_");
        let path = dir.join(format!("period_{slug}.svg"));
        period_chart(&path, &aggregate::period_genre_shares(records, period), period, style)?;
        written.push(path);
    }

    let path = dir.join(format!("overlay_{}.svg", style.slug(genre)));
    overlay_chart(&path, &aggregate::genre_unemployment_overlay(records, genre), genre, style)?;
    written.push(path);

    let path = dir.join(format!("trend_{}.svg", style.slug(genre)));
    genre_trend_chart(&path, &aggregate::genre_trend(records, genre), genre, style)?;
    written.push(path);

    let path = dir.join("minor_genres.svg");
    minor_genres_chart(&path, &aggregate::minor_genre_shares(records), style)?;
    written.push(path);

    for path in &written {
        info!(path = %path.display(), "chart.written");
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<ChartRecord> {
        vec![
            ChartRecord::new("a", "Duffy", Some("pop"), 2008, Some(6.0)),
            ChartRecord::new("b", "Dizzee Rascal", Some("grime"), 2008, Some(6.0)),
            ChartRecord::new("c", "Lady Gaga", Some("dance pop"), 2009, Some(9.0)),
            ChartRecord::new("d", "Florence and the Machine", Some("indie"), 2009, Some(9.0)),
            ChartRecord::new("e", "Arctic Monkeys", Some("rock"), 2014, Some(4.0)),
            ChartRecord::new("f", "Nobody", Some("chamber psych"), 2014, Some(4.0)),
            ChartRecord::new("g", "Nobody", None, 2014, Some(4.0)),
        ]
    }

    #[test]
    fn leading_genres_stack_first() {
        let style = ChartStyle::default();
        let order = style.order([
            GenreCategory::Indie,
            GenreCategory::Rock,
            GenreCategory::Other,
            GenreCategory::Pop,
            GenreCategory::Indie,
        ]);
        assert_eq!(order, vec![
            GenreCategory::Pop,
            GenreCategory::Rock,
            GenreCategory::Indie,
            GenreCategory::Other,
        ]);
    }

    #[test]
    fn unstyled_genres_fall_back() {
        let style = ChartStyle::default();
        assert_eq!(style.short_name(GenreCategory::EdmHouseDance), "EDM");
        assert_eq!(style.short_name(GenreCategory::Other), "Other");
        assert_eq!(style.color(GenreCategory::Other), style.fallback);
        assert_eq!(style.color(GenreCategory::Pop), RGBColor(0x32, 0x88, 0xbd));
        assert_eq!(style.slug(GenreCategory::RnB), "r_b");
    }

    #[test]
    fn index_labels_only_on_ticks() {
        let names = vec!["Pop".to_string(), "EDM".to_string()];
        assert_eq!(index_label(&names, 1.0), "EDM");
        assert_eq!(index_label(&names, 0.5), "");
        assert_eq!(index_label(&names, 5.0), "");
        assert_eq!(index_label(&names, -1.0), "");
    }

    #[test]
    fn year_range_pads_and_handles_empty() {
        assert_eq!(year_range([2001, 2005, 2003].into_iter()), 2000.5..2005.5);
        assert_eq!(year_range(std::iter::empty()), 0.0..1.0);
    }

    #[test]
    fn render_all_writes_svg_files() -> Result<(), TrendsError> {
        let dir = tempfile::tempdir()?;
        let out = dir.path().join("plots");
        let written = render_all(&records(), &out, GenreCategory::Pop, &ChartStyle::default())?;

        assert_eq!(written.len(), 10);
        assert!(written.contains(&out.join("overlay_pop.svg")));
        assert!(written.contains(&out.join("period_moderate_unemployment.svg")));
        for path in &written {
            let body = fs::read_to_string(path)?;
            assert!(body.contains("<svg"), "{}", path.display());
        }
        Ok(())
    }

    #[test]
    fn charts_render_without_data() -> Result<(), TrendsError> {
        let dir = tempfile::tempdir()?;
        let written = render_all(&[], dir.path(), GenreCategory::Rock, &ChartStyle::default())?;
        assert_eq!(written.len(), 10);
        Ok(())
    }
}
