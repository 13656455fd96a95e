pub mod backends;
pub mod error;
#[cfg(feature = "csv")]
pub mod source;
pub mod traits;

pub use backends::MemoryAdapter;
#[cfg(feature = "umya")]
pub use backends::UmyaAdapter;
pub use error::{IoError, with_cell_context};
#[cfg(feature = "csv")]
pub use source::{DelimitedSource, SourceReadError};
pub use traits::{SaveDestination, SpreadsheetReader, SpreadsheetWriter};

// Re-export for convenience
pub use markbridge_common::{CellData, CellValue, NumberFormat};
