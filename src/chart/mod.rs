/// Chart geometry: scales, tick labels, and drawing scenes.
///
/// ```text
///  YearlyTotal[] ──► LineChart { x: year → px, y: gross → px } ──┐
///                                                                ├─► Scene ──► egui / SVG
///  DirectorAverage[] ► BarChart { x: band(director), y: score } ─┘
/// ```

pub mod format;
pub mod scale;
pub mod scene;
