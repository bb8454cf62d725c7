pub mod error;
pub mod prompt;
pub mod traits;
pub mod types;

pub use error::DefectError;
pub use prompt::INSTRUCTION_TEMPLATE;
pub use traits::{
    GenerationRequest, GenerationResponse, InlineImage, MultimodalGenerator, Part, JPEG_MIME,
};
pub use types::{AnalysisResult, ImageSummary};
