//! Log-versus-model overlay charts rendered with `plotters`.

use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::prelude::*;

const FONT: &str = "sans-serif";

/// Image size of every overlay (px).
pub const CHART_SIZE: (u32, u32) = (1000, 600);

/// Relative y-axis margin around logged height and velocity.
pub const KINEMATIC_MARGIN: f64 = 0.05;
/// Relative y-axis margin around logged mass.
pub const MASS_MARGIN: f64 = 0.001;

/// One comparison chart: logged samples against a model curve.
#[derive(Debug, Clone)]
pub struct Overlay {
    /// File name without extension, e.g. `graph_height_comparison`.
    pub stem: String,
    pub title: String,
    pub y_label: String,
    pub logged: Vec<[f64; 2]>,
    pub model: Vec<[f64; 2]>,
    pub model_label: String,
    /// Relative margin applied to the logged y extent.
    pub margin: f64,
    pub color: RGBColor,
}

fn extent(points: &[[f64; 2]], axis: usize) -> Option<(f64, f64)> {
    points
        .iter()
        .map(|p| p[axis])
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

fn widen_if_flat(lo: f64, hi: f64) -> (f64, f64) {
    if hi > lo {
        (lo, hi)
    } else {
        let pad = if lo == 0.0 { 1.0 } else { lo.abs() * 0.01 };
        (lo - pad, hi + pad)
    }
}

impl Overlay {
    /// Y range: logged extent scaled outward by `margin`, or the model extent
    /// plus 5 % of its span when nothing was logged.
    pub fn y_range(&self) -> (f64, f64) {
        if let Some((lo, hi)) = extent(&self.logged, 1) {
            return widen_if_flat(lo - lo.abs() * self.margin, hi + hi.abs() * self.margin);
        }
        match extent(&self.model, 1) {
            Some((lo, hi)) => {
                let pad = (hi - lo) * 0.05;
                widen_if_flat(lo - pad, hi + pad)
            }
            None => (0.0, 1.0),
        }
    }

    /// Time range covering both series.
    pub fn x_range(&self) -> (f64, f64) {
        let spans = [extent(&self.logged, 0), extent(&self.model, 0)];
        let (lo, hi) = spans
            .iter()
            .flatten()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (a, b)| (lo.min(*a), hi.max(*b)));
        if lo.is_finite() && hi.is_finite() {
            widen_if_flat(lo, hi)
        } else {
            (0.0, 1.0)
        }
    }

    /// Draw onto any plotters backend.
    pub fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        let (x0, x1) = self.x_range();
        let (y0, y1) = self.y_range();

        root.fill(&WHITE)?;
        let mut chart = ChartBuilder::on(root)
            .caption(&self.title, (FONT, 26).into_font())
            .margin(16)
            .x_label_area_size(45)
            .y_label_area_size(80)
            .build_cartesian_2d(x0..x1, y0..y1)?;

        chart
            .configure_mesh()
            .light_line_style(BLACK.mix(0.05))
            .x_desc("Time, s")
            .y_desc(self.y_label.as_str())
            .axis_desc_style((FONT, 16).into_font())
            .draw()?;

        let color = self.color;
        chart.draw_series(LineSeries::new(
            self.logged.iter().map(|p| (p[0], p[1])),
            color.mix(0.4).stroke_width(1),
        ))?;
        chart
            .draw_series(
                self.logged
                    .iter()
                    .map(|p| Circle::new((p[0], p[1]), 3, color.mix(0.7).filled())),
            )?
            .label("Logged flight")
            .legend(move |(x, y)| Circle::new((x + 10, y), 3, color.filled()));

        chart
            .draw_series(LineSeries::new(
                self.model.iter().map(|p| (p[0], p[1])),
                RED.stroke_width(3),
            ))?
            .label(self.model_label.as_str())
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(3)));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .label_font((FONT, 15).into_font())
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        root.present()?;
        Ok(())
    }

    /// Write `<stem>.png` and `<stem>.svg` into `dir`.
    pub fn render(&self, dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
        let png = dir.join(format!("{}.png", self.stem));
        let svg = dir.join(format!("{}.svg", self.stem));
        {
            let root = BitMapBackend::new(&png, CHART_SIZE).into_drawing_area();
            self.draw(&root)?;
        }
        {
            let root = SVGBackend::new(&svg, CHART_SIZE).into_drawing_area();
            self.draw(&root)?;
        }
        log::info!("wrote {} and {}", png.display(), svg.display());
        Ok(vec![png, svg])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlay(logged: Vec<[f64; 2]>, model: Vec<[f64; 2]>, margin: f64) -> Overlay {
        Overlay {
            stem: "graph_test".into(),
            title: "test".into(),
            y_label: "y".into(),
            logged,
            model,
            model_label: "model".into(),
            margin,
            color: BLUE,
        }
    }

    #[test]
    fn y_range_scales_logged_extent() {
        let o = overlay(vec![[0.0, 100.0], [1.0, 200.0]], vec![[0.0, 0.0], [1.0, 9_000.0]], KINEMATIC_MARGIN);
        let (lo, hi) = o.y_range();
        assert!((lo - 95.0).abs() < 1e-9);
        assert!((hi - 210.0).abs() < 1e-9);
    }

    #[test]
    fn mass_margin_is_tight() {
        let o = overlay(vec![[0.0, 186_000.0], [1.0, 180_000.0]], vec![], MASS_MARGIN);
        let (lo, hi) = o.y_range();
        assert!((lo - 179_820.0).abs() < 1e-6);
        assert!((hi - 186_186.0).abs() < 1e-6);
    }

    #[test]
    fn empty_log_falls_back_to_model() {
        let o = overlay(vec![], vec![[0.0, 0.0], [70.0, 1_000.0]], KINEMATIC_MARGIN);
        let (lo, hi) = o.y_range();
        assert!((lo + 50.0).abs() < 1e-9);
        assert!((hi - 1_050.0).abs() < 1e-9);
        assert_eq!(o.x_range(), (0.0, 70.0));
    }

    #[test]
    fn negative_values_widen_outward() {
        let o = overlay(vec![[0.0, -10.0], [1.0, 20.0]], vec![], 0.1);
        let (lo, hi) = o.y_range();
        assert!((lo + 11.0).abs() < 1e-9);
        assert!((hi - 22.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_ranges_stay_drawable() {
        let o = overlay(vec![], vec![], KINEMATIC_MARGIN);
        assert_eq!(o.y_range(), (0.0, 1.0));
        assert_eq!(o.x_range(), (0.0, 1.0));

        let flat = overlay(vec![[5.0, 0.0]], vec![], KINEMATIC_MARGIN);
        let (lo, hi) = flat.y_range();
        assert!(lo < hi);
        let (x0, x1) = flat.x_range();
        assert!(x0 < 5.0 && x1 > 5.0);
    }

    #[test]
    fn x_range_spans_both_series() {
        let o = overlay(vec![[0.1, 1.0], [65.0, 2.0]], vec![[0.0, 1.0], [70.0, 2.0]], KINEMATIC_MARGIN);
        assert_eq!(o.x_range(), (0.0, 70.0));
    }

    #[test]
    fn draws_svg_with_both_series_and_legend() {
        let o = overlay(
            vec![[0.1, 11.0], [0.2, 14.0], [0.3, 19.0]],
            vec![[0.0, 10.0], [0.3, 18.0]],
            KINEMATIC_MARGIN,
        );
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
            o.draw(&root).unwrap();
        }
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("<circle"));
        assert!(svg.contains("<polyline"));
        assert!(svg.contains("Logged flight"));
        assert!(svg.contains("model"));
    }

    #[test]
    fn render_writes_png_and_svg() {
        let dir = std::env::temp_dir().join(format!("rocket-ascent-plot-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let o = overlay(vec![[0.1, 11.0], [1.0, 40.0]], vec![[0.0, 10.0], [1.0, 38.0]], KINEMATIC_MARGIN);

        let files = o.render(&dir).unwrap();
        assert_eq!(files, vec![dir.join("graph_test.png"), dir.join("graph_test.svg")]);
        for f in &files {
            assert!(std::fs::metadata(f).unwrap().len() > 0, "{} is empty", f.display());
        }
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
