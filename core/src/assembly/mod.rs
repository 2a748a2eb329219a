//! Result assembly
//!
//! Orders studies by date, flags the latest one, re-validates LLM replies and
//! merges studies of different modalities.

mod combine;
mod latest;
mod response;

pub use combine::{combine, combine_by_date, flatten};
pub use latest::{sort_and_mark_latest, sort_by_date_desc, Dated, Latest};
pub use response::{parse_llm_response, validate_and_clean};
