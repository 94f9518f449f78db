pub mod axiscare;
pub mod caregivers;
pub mod error;
pub mod memory;
pub mod processor;

pub use caregivers::{decode_caregivers, CaregiverApi};
pub use error::{Result, SyncError};
pub use processor::CallSummaryProcessor;
