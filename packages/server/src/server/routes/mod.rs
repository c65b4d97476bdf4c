pub mod analyze;
pub mod health;

pub use analyze::{analyze_api_handler, analyze_form_handler, index_handler, AnalyzeRequest};
pub use health::health_handler;
