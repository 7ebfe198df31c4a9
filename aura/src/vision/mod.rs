mod api;
pub mod prompts;
mod provider;

pub use api::VisionApiClient;
pub use provider::{DescribeCollaborator, VisionBackend, VisionProvider};
