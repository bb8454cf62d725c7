pub mod analyzer;
pub mod mock;
pub mod vision;

pub use analyzer::{DefectAnalyzer, build_request};
pub use mock::MockGenerator;
pub use vision::{API_KEY_ENV, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, GeminiProvider};
