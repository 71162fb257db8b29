pub mod api;
pub mod chain;
pub mod interface;
pub mod mailto;
pub mod relay;

pub use chain::SubmissionChain;
pub use interface::{Delivery, SubmissionError, SubmissionStrategy};
