use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::chart::scene::{BarChart, HAlign, LineChart, Primitive, Scene, VAlign};
use crate::color::Rgb;
use crate::config::LayoutConfig;
use crate::data::aggregate::Analysis;

pub const LINE_CHART_FILE: &str = "gross_by_year.svg";
pub const BAR_CHART_FILE: &str = "top_directors.svg";

// ---------------------------------------------------------------------------
// Static SVG export
// ---------------------------------------------------------------------------

/// Write both charts into `dir`, creating it if needed.
pub fn export_charts(analysis: &Analysis, layout: &LayoutConfig, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let charts = [
        (LINE_CHART_FILE, LineChart::new(&analysis.yearly, layout).scene()),
        (BAR_CHART_FILE, BarChart::new(&analysis.directors, layout).scene()),
    ];
    let mut written = Vec::with_capacity(charts.len());
    for (name, scene) in &charts {
        let path = dir.join(name);
        write_svg(scene, &path)?;
        log::info!("Wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

pub fn write_svg(scene: &Scene, path: &Path) -> Result<()> {
    let svg = render_svg(scene)?;
    std::fs::write(path, svg).with_context(|| format!("writing {}", path.display()))
}

/// Render a scene to an SVG document.
pub fn render_svg(scene: &Scene) -> Result<String> {
    let mut svg = String::new();
    {
        let size = (scene.width.max(1.0) as u32, scene.height.max(1.0) as u32);
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE)?;
        for primitive in &scene.primitives {
            draw(&root, primitive)?;
        }
        root.present()?;
    }
    Ok(svg)
}

fn draw<DB>(root: &DrawingArea<DB, Shift>, primitive: &Primitive) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    match primitive {
        Primitive::Line {
            from,
            to,
            color,
            width,
        } => {
            let style = rgb(*color).stroke_width(width.round().max(1.0) as u32);
            root.draw(&PathElement::new(vec![px(*from), px(*to)], style))?;
        }
        Primitive::Polyline {
            points,
            color,
            width,
        } => {
            let style = rgb(*color).stroke_width(width.round().max(1.0) as u32);
            let points: Vec<(i32, i32)> = points.iter().copied().map(px).collect();
            root.draw(&PathElement::new(points, style))?;
        }
        Primitive::Circle {
            center,
            radius,
            color,
        } => {
            root.draw(&Circle::new(
                px(*center),
                radius.round() as i32,
                rgb(*color).filled(),
            ))?;
        }
        Primitive::Rect {
            x,
            y,
            width,
            height,
            color,
        } => {
            let corners = [px((*x, *y)), px((x + width, y + height))];
            root.draw(&Rectangle::new(corners, rgb(*color).filled()))?;
        }
        Primitive::Text {
            pos,
            text,
            size,
            color,
            h_align,
            v_align,
        } => {
            let anchor = Pos::new(
                match h_align {
                    HAlign::Left => HPos::Left,
                    HAlign::Center => HPos::Center,
                    HAlign::Right => HPos::Right,
                },
                match v_align {
                    VAlign::Top => VPos::Top,
                    VAlign::Middle => VPos::Center,
                    VAlign::Bottom => VPos::Bottom,
                },
            );
            let style = ("sans-serif", *size)
                .into_font()
                .color(&rgb(*color))
                .pos(anchor);
            root.draw(&Text::new(text.clone(), px(*pos), style))?;
        }
    }
    Ok(())
}

fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

fn px((x, y): (f64, f64)) -> (i32, i32) {
    (x.round() as i32, y.round() as i32)
}
