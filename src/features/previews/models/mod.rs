pub mod parser;
pub mod preview;

pub use parser::{extract_metadata, PageMetadata};
pub use preview::{LinkPreview, LINK_PREVIEW_COLUMNS};
