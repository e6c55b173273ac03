mod chart;
pub use chart::Chart;

mod privacy;
pub use privacy::PrivacyPolicy;
