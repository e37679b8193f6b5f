//! Static Chart Renderer
//! Draws the yearly rate lines with plotters and writes them out as PNG.
//!
//! Layout:
//! 1. Title centered at the top
//! 2. Plot area: x = year, y = percent (0-100), one line per disposition
//! 3. Legend in the plot's upper right
//! 4. Source caption below the plot

use super::ChartData;
use crate::config::ChartStyle;
use image::RgbImage;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

const CAPTION_HEIGHT: u32 = 30;
const FONT: &str = "sans-serif";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Nothing to draw for '{0}'")]
    EmptyData(String),
    #[error("Chart drawing failed: {0}")]
    Draw(String),
    #[error("Chart size {width}x{height} is too small")]
    InvalidSize { width: u32, height: u32 },
    #[error("Failed to encode image: {0}")]
    Image(#[from] image::ImageError),
}

fn draw_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Draw(e.to_string())
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the chart into an RGB image in memory.
    pub fn render_image(data: &ChartData, style: &ChartStyle) -> Result<RgbImage, RenderError> {
        let (width, height) = (style.width, style.height);
        if width < 200 || height < CAPTION_HEIGHT + 150 {
            return Err(RenderError::InvalidSize { width, height });
        }
        let (first_year, last_year) = data
            .year_range()
            .ok_or_else(|| RenderError::EmptyData(data.title.clone()))?;

        let mut buffer = vec![0u8; (width as usize) * (height as usize) * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;
            let (plot_area, caption_area) = root.split_vertically(height - CAPTION_HEIGHT);

            let mut chart = ChartBuilder::on(&plot_area)
                .caption(&data.title, (FONT, 22))
                .margin(15)
                .x_label_area_size(45)
                .y_label_area_size(65)
                .build_cartesian_2d(first_year..last_year, 0f64..100f64)
                .map_err(draw_err)?;

            let year_count = (last_year - first_year + 1) as usize;
            chart
                .configure_mesh()
                .x_labels(year_count)
                .x_label_formatter(&|year| year.to_string())
                .y_labels(11)
                .y_label_formatter(&|pct| format!("{pct:.0}"))
                .x_desc(style.x_label.as_str())
                .y_desc(style.y_label.as_str())
                .axis_desc_style((FONT, 15))
                .light_line_style(&WHITE)
                .draw()
                .map_err(draw_err)?;

            for series in &data.series {
                let color = series.color;
                chart
                    .draw_series(LineSeries::new(
                        series.points.iter().copied(),
                        color.stroke_width(2),
                    ))
                    .map_err(draw_err)?
                    .label(series.label.as_str())
                    .legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                    });
                chart
                    .draw_series(
                        series
                            .points
                            .iter()
                            .map(|&point| Circle::new(point, 4, color.filled())),
                    )
                    .map_err(draw_err)?;
            }

            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(&WHITE.mix(0.85))
                .border_style(&BLACK)
                .label_font((FONT, 14))
                .draw()
                .map_err(draw_err)?;

            caption_area
                .draw_text(
                    &style.caption,
                    &(FONT, 13).into_font().color(&BLACK.mix(0.7)),
                    (15, 8),
                )
                .map_err(draw_err)?;

            root.present().map_err(draw_err)?;
        }

        RgbImage::from_raw(width, height, buffer).ok_or(RenderError::InvalidSize { width, height })
    }

    /// Render and save as PNG at `path`.
    pub fn render_png(data: &ChartData, style: &ChartStyle, path: &Path) -> Result<(), RenderError> {
        let img = Self::render_image(data, style)?;
        img.save(path)?;
        log::info!("Wrote chart '{}' to {}", data.title, path.display());
        Ok(())
    }
}
