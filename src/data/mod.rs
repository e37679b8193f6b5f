//! Data module - CSV loading, filtering and record types

mod loader;
mod model;
mod processor;

pub use loader::{DataLoader, LoaderError};
pub use model::{CaseOutcomeRecord, Disposition, YearRateRecord};
pub use processor::{DataProcessor, ProcessorError, YearRange};
