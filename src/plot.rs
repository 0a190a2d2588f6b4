// src/plot.rs
use crate::comparison::Comparison; // The four series to draw
use crate::error::{PendulumError, Result};
use image::ImageFormat; // PNG encoding of the raw pixel buffer
use plotters::prelude::*; // Plotters plotting library prelude
use std::io::Cursor; // In-memory byte sink for the encoder

/// Image width in pixels
pub const WIDTH: u32 = 800;

/// Image height in pixels
pub const HEIGHT: u32 = 500;

fn render_err<E: std::fmt::Display>(e: E) -> PendulumError {
    PendulumError::Render(e.to_string())
}

/// Draws angle against time for every method, with title, axis labels and legend, and returns the PNG bytes.
pub fn render_png(comparison: &Comparison, initial_angle_deg: f64) -> Result<Vec<u8>> {
    let caption = format!("Pendulum Motion (Initial Angle = {} degrees)", initial_angle_deg);
    render(comparison, Some(caption))
}

/// Curves only: no caption, ticks or legend, so no font is needed.
pub fn render_png_plain(comparison: &Comparison) -> Result<Vec<u8>> {
    render(comparison, None)
}

fn render(comparison: &Comparison, caption: Option<String>) -> Result<Vec<u8>> {
    // Allocate RGB pixel buffer (3 bytes per pixel)
    let mut pixel_buffer = vec![0u8; (WIDTH * HEIGHT * 3) as usize];

    let times = comparison.times();
    let t_min = times.first().copied().unwrap_or(0.0);
    let t_max = times.last().copied().unwrap_or(1.0).max(t_min + f64::EPSILON);

    // Symmetric angle range covering every curve, with a little headroom
    let limit = comparison
        .labelled()
        .iter()
        .flat_map(|(_, s)| s.angles.iter())
        .fold(comparison.constants.initial_angle(), |acc, a| acc.max(a.abs()))
        * 1.1;

    let labelled = caption.is_some();
    let (x_area, y_area) = if labelled { (40, 50) } else { (0, 0) };

    {
        let root = BitMapBackend::with_buffer(&mut pixel_buffer, (WIDTH, HEIGHT)).into_drawing_area();

        root.fill(&WHITE).map_err(render_err)?;

        let mut builder = ChartBuilder::on(&root);
        builder.margin(10).x_label_area_size(x_area).y_label_area_size(y_area);
        if let Some(caption) = caption {
            builder.caption(caption, ("sans-serif", 20).into_font());
        }
        let mut chart = builder
            .build_cartesian_2d(t_min..t_max, -limit..limit)
            .map_err(render_err)?;

        if labelled {
            // Grid lines, axes and labels
            chart
                .configure_mesh()
                .x_desc("time (s)")
                .y_desc("angle (rad)")
                .draw()
                .map_err(render_err)?;
        }

        // RK45 and fourier are drawn translucent so the exact curve shows through
        let styles: [ShapeStyle; 4] = [
            BLUE.mix(0.7).stroke_width(2),
            RED.stroke_width(1),
            GREEN.stroke_width(1),
            MAGENTA.mix(0.5).stroke_width(2),
        ];

        for ((label, series), style) in comparison.labelled().into_iter().zip(styles) {
            chart
                .draw_series(LineSeries::new(series.iter(), style))
                .map_err(render_err)?
                .label(label)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
        }

        if labelled {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::LowerRight)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(render_err)?;
        }

        root.present().map_err(render_err)?;
    }

    let img_buffer = image::RgbImage::from_raw(WIDTH, HEIGHT, pixel_buffer)
        .ok_or_else(|| PendulumError::Render("pixel buffer has the wrong size".to_string()))?;

    let mut png = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img_buffer)
        .write_to(&mut png, ImageFormat::Png)
        .map_err(render_err)?;

    Ok(png.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::IntegratorOptions;
    use crate::model::{PhysicalConstants, TimeGrid};

    const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn comparison() -> Comparison {
        let consts = PhysicalConstants::from_degrees(150.0, 10.0, 1.0).unwrap();
        let grid = TimeGrid::new(0.0, 2.0, 0.05).unwrap();
        Comparison::run(&consts, &grid, &IntegratorOptions::default()).unwrap()
    }

    #[test]
    fn renders_curves_to_png() {
        let png = render_png_plain(&comparison()).unwrap();
        assert_eq!(&png[..8], PNG_SIGNATURE);

        let decoded = image::load_from_memory(&png).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (WIDTH, HEIGHT));
        // Something other than the white background was drawn.
        assert!(decoded.pixels().any(|p| p.0 != [255, 255, 255]));
    }

    #[test]
    #[ignore = "caption and labels need a system sans-serif font"]
    fn renders_labelled_png() {
        let png = render_png(&comparison(), 150.0).unwrap();
        assert_eq!(&png[..8], PNG_SIGNATURE);
    }
}
