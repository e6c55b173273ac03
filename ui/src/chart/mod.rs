mod grid;
pub use grid::RedrawEpoch;

mod view;
pub use view::{provide_chart_session, ChartSession, ChartView};
