//! Charts module - Chart data and static rendering

mod plotter;
mod renderer;

pub use plotter::ChartData;
pub use renderer::{RenderError, StaticChartRenderer};
