use super::format::{billions_label, number_label, score_label, year_label};
use super::scale::{BandScale, LinearScale};
use crate::color::{CategoryColors, Rgb};
use crate::config::LayoutConfig;
use crate::data::aggregate::{DirectorAverage, YearlyTotal};

const TITLE_SIZE: f64 = 18.0;
const LABEL_SIZE: f64 = 12.0;
const TICK_LEN: f64 = 6.0;
const GRID: Rgb = Rgb(225, 225, 225);

// ---------------------------------------------------------------------------
// Scene – back-end neutral drawing list in pixel space
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Middle,
    Bottom,
}

/// One drawing instruction. Coordinates are pixels, origin top-left.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Line {
        from: (f64, f64),
        to: (f64, f64),
        color: Rgb,
        width: f64,
    },
    Polyline {
        points: Vec<(f64, f64)>,
        color: Rgb,
        width: f64,
    },
    Circle {
        center: (f64, f64),
        radius: f64,
        color: Rgb,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Rgb,
    },
    Text {
        pos: (f64, f64),
        text: String,
        size: f64,
        color: Rgb,
        h_align: HAlign,
        v_align: VAlign,
    },
}

/// A complete chart, ready for any renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub primitives: Vec<Primitive>,
}

impl Scene {
    fn new(layout: &LayoutConfig) -> Self {
        Scene {
            width: layout.width,
            height: layout.height,
            primitives: Vec::new(),
        }
    }

    fn line(&mut self, from: (f64, f64), to: (f64, f64), color: Rgb) {
        self.primitives.push(Primitive::Line {
            from,
            to,
            color,
            width: 1.0,
        });
    }

    fn text(&mut self, pos: (f64, f64), text: impl Into<String>, size: f64, align: (HAlign, VAlign)) {
        self.primitives.push(Primitive::Text {
            pos,
            text: text.into(),
            size,
            color: Rgb::BLACK,
            h_align: align.0,
            v_align: align.1,
        });
    }

    /// Every text primitive, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Title, both axis lines, axis captions and horizontal grid lines with
    /// labelled y ticks.
    fn frame(
        &mut self,
        layout: &LayoutConfig,
        title: &str,
        x_caption: &str,
        y_caption: &str,
        y: &LinearScale,
        y_label: impl Fn(f64) -> String,
    ) {
        let (left, right, top, bottom) = layout.inner_bounds();

        self.text(
            (layout.width / 2.0, top / 2.0),
            title,
            TITLE_SIZE,
            (HAlign::Center, VAlign::Middle),
        );

        for tick in y.ticks(layout.tick_count) {
            let py = y.map(tick);
            if tick != y.domain.0 {
                self.line((left, py), (right, py), GRID);
            }
            self.line((left - TICK_LEN, py), (left, py), Rgb::BLACK);
            self.text(
                (left - TICK_LEN - 3.0, py),
                y_label(tick),
                LABEL_SIZE,
                (HAlign::Right, VAlign::Middle),
            );
        }

        self.line((left, bottom), (right, bottom), Rgb::BLACK);
        self.line((left, top), (left, bottom), Rgb::BLACK);

        self.text(
            ((left + right) / 2.0, layout.height - 6.0),
            x_caption,
            LABEL_SIZE,
            (HAlign::Center, VAlign::Bottom),
        );
        self.text(
            (left, top - 8.0),
            y_caption,
            LABEL_SIZE,
            (HAlign::Right, VAlign::Bottom),
        );
    }

    fn no_data(&mut self, layout: &LayoutConfig) {
        let (left, right, top, bottom) = layout.inner_bounds();
        self.text(
            ((left + right) / 2.0, (top + bottom) / 2.0),
            "No data",
            LABEL_SIZE,
            (HAlign::Center, VAlign::Middle),
        );
    }
}

// ---------------------------------------------------------------------------
// LineChart – gross revenue by year
// ---------------------------------------------------------------------------

/// Scales and data for the revenue line chart.
#[derive(Debug, Clone)]
pub struct LineChart {
    /// year → x pixel
    pub x: LinearScale,
    /// gross → y pixel
    pub y: LinearScale,
    totals: Vec<YearlyTotal>,
    layout: LayoutConfig,
}

impl LineChart {
    pub fn new(totals: &[YearlyTotal], layout: &LayoutConfig) -> Self {
        let (left, right, top, bottom) = layout.inner_bounds();
        let years = LinearScale::domain_from_extent(totals.iter().map(|t| f64::from(t.year)));
        let max_gross = totals.iter().map(|t| t.gross_total).fold(0.0, f64::max);

        LineChart {
            x: LinearScale::new(years, (left, right)),
            y: LinearScale::new((0.0, max_gross), (bottom, top)).nice(layout.tick_count),
            totals: totals.to_vec(),
            layout: layout.clone(),
        }
    }

    pub fn scene(&self) -> Scene {
        let layout = &self.layout;
        let (_, _, _, bottom) = layout.inner_bounds();
        let mut scene = Scene::new(layout);
        scene.frame(
            layout,
            "Total Gross Revenue by Year",
            "Year",
            "Gross",
            &self.y,
            billions_label,
        );

        if self.totals.is_empty() {
            scene.no_data(layout);
            return scene;
        }

        for tick in self.x.ticks(layout.tick_count) {
            let Some(label) = year_label(tick) else {
                continue;
            };
            let px = self.x.map(tick);
            scene.line((px, bottom), (px, bottom + TICK_LEN), Rgb::BLACK);
            scene.text(
                (px, bottom + TICK_LEN + 3.0),
                label,
                LABEL_SIZE,
                (HAlign::Center, VAlign::Top),
            );
        }

        let color = Rgb::from_hex(&layout.line_color).unwrap_or(Rgb::STEEL_BLUE);
        let points: Vec<(f64, f64)> = self
            .totals
            .iter()
            .map(|t| (self.x.map(f64::from(t.year)), self.y.map(t.gross_total)))
            .collect();
        if points.len() > 1 {
            scene.primitives.push(Primitive::Polyline {
                points: points.clone(),
                color,
                width: 2.0,
            });
        }
        for center in points {
            scene.primitives.push(Primitive::Circle {
                center,
                radius: 3.0,
                color,
            });
        }
        scene
    }
}

// ---------------------------------------------------------------------------
// BarChart – top directors by average score
// ---------------------------------------------------------------------------

/// Scales and data for the director bar chart.
#[derive(Debug, Clone)]
pub struct BarChart {
    /// director → x pixel (band start)
    pub x: BandScale,
    /// score → y pixel
    pub y: LinearScale,
    averages: Vec<DirectorAverage>,
    layout: LayoutConfig,
}

impl BarChart {
    pub fn new(averages: &[DirectorAverage], layout: &LayoutConfig) -> Self {
        let (left, right, top, bottom) = layout.inner_bounds();
        let directors = averages.iter().map(|d| d.director.clone()).collect();
        let max_score = averages.iter().map(|d| d.average_score).fold(0.0, f64::max);

        BarChart {
            x: BandScale::new(directors, (left, right), layout.band_padding),
            y: LinearScale::new((0.0, max_score), (bottom, top)).nice(layout.tick_count),
            averages: averages.to_vec(),
            layout: layout.clone(),
        }
    }

    pub fn scene(&self) -> Scene {
        let layout = &self.layout;
        let (_, _, _, bottom) = layout.inner_bounds();
        let mut scene = Scene::new(layout);
        scene.frame(
            layout,
            "Top Directors by Average Score",
            "Director",
            "Score",
            &self.y,
            number_label,
        );

        if self.averages.is_empty() {
            scene.no_data(layout);
            return scene;
        }

        let colors = CategoryColors::new(self.x.categories());
        let bandwidth = self.x.bandwidth();
        for avg in &self.averages {
            let Some(x) = self.x.position(&avg.director) else {
                continue;
            };
            let y = self.y.map(avg.average_score);
            scene.primitives.push(Primitive::Rect {
                x,
                y,
                width: bandwidth,
                height: bottom - y,
                color: colors.color_for(&avg.director),
            });
            let center = x + bandwidth / 2.0;
            scene.text(
                (center, y - 3.0),
                score_label(avg.average_score),
                LABEL_SIZE,
                (HAlign::Center, VAlign::Bottom),
            );
            scene.text(
                (center, bottom + 4.0),
                avg.director.as_str(),
                LABEL_SIZE,
                (HAlign::Center, VAlign::Top),
            );
        }
        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals() -> Vec<YearlyTotal> {
        vec![
            YearlyTotal {
                year: 2010,
                gross_total: 1.2e9,
            },
            YearlyTotal {
                year: 2012,
                gross_total: 3.7e9,
            },
            YearlyTotal {
                year: 2014,
                gross_total: 2.0e9,
            },
        ]
    }

    fn directors() -> Vec<DirectorAverage> {
        vec![
            DirectorAverage {
                director: "B".into(),
                average_score: 9.0,
            },
            DirectorAverage {
                director: "A".into(),
                average_score: 7.0,
            },
        ]
    }

    #[test]
    fn line_chart_scales_cover_the_plot_area() {
        let layout = LayoutConfig::default();
        let chart = LineChart::new(&totals(), &layout);
        let (left, right, top, bottom) = layout.inner_bounds();
        assert_eq!(chart.x.map(2010.0), left);
        assert_eq!(chart.x.map(2014.0), right);
        assert_eq!(chart.y.map(0.0), bottom);
        assert_eq!(chart.y.domain, (0.0, 4e9));
        assert_eq!(chart.y.map(4e9), top);
    }

    #[test]
    fn line_chart_scene_has_line_labels_and_points() {
        let scene = LineChart::new(&totals(), &LayoutConfig::default()).scene();
        let texts: Vec<&str> = scene.texts().collect();
        assert!(texts.contains(&"Total Gross Revenue by Year"));
        assert!(texts.contains(&"2010"));
        assert!(texts.contains(&"2014"));
        assert!(texts.contains(&"$2B"));
        assert!(!texts.iter().any(|t| t.contains('.') && t.starts_with("20")));

        let polylines: Vec<_> = scene
            .primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::Polyline { points, .. } => Some(points),
                _ => None,
            })
            .collect();
        assert_eq!(polylines.len(), 1);
        assert_eq!(polylines[0].len(), 3);
        let circles = scene
            .primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Circle { .. }))
            .count();
        assert_eq!(circles, 3);
    }

    #[test]
    fn single_year_draws_a_point_without_a_line() {
        let one = vec![YearlyTotal {
            year: 2016,
            gross_total: 5e8,
        }];
        let scene = LineChart::new(&one, &LayoutConfig::default()).scene();
        assert!(!scene
            .primitives
            .iter()
            .any(|p| matches!(p, Primitive::Polyline { .. })));
        assert!(scene
            .primitives
            .iter()
            .any(|p| matches!(p, Primitive::Circle { .. })));
        assert!(scene.texts().any(|t| t == "2016"));
    }

    #[test]
    fn empty_charts_do_not_panic() {
        let layout = LayoutConfig::default();
        let line = LineChart::new(&[], &layout);
        assert_eq!(line.x.map(2010.0), layout.margin.left);
        assert!(line.scene().texts().any(|t| t == "No data"));

        let bars = BarChart::new(&[], &layout);
        assert_eq!(bars.x.bandwidth(), 0.0);
        assert!(bars.scene().texts().any(|t| t == "No data"));
    }

    #[test]
    fn bar_chart_bars_sit_on_the_axis() {
        let layout = LayoutConfig::default();
        let chart = BarChart::new(&directors(), &layout);
        let (_, _, _, bottom) = layout.inner_bounds();
        let scene = chart.scene();

        let rects: Vec<(f64, f64, f64, f64)> = scene
            .primitives
            .iter()
            .filter_map(|p| match *p {
                Primitive::Rect {
                    x,
                    y,
                    width,
                    height,
                    ..
                } => Some((x, y, width, height)),
                _ => None,
            })
            .collect();
        assert_eq!(rects.len(), 2);
        for (_, y, width, height) in &rects {
            assert!((y + height - bottom).abs() < 1e-9);
            assert!((width - chart.x.bandwidth()).abs() < 1e-9);
        }
        // Higher score, taller bar, drawn first.
        assert!(rects[0].3 > rects[1].3);
        assert!(rects[0].0 < rects[1].0);

        let texts: Vec<&str> = scene.texts().collect();
        assert!(texts.contains(&"9.0"));
        assert!(texts.contains(&"A"));
        assert!(texts.contains(&"B"));
    }
}
