mod history;
mod location;
mod session;

pub use history::*;
pub use location::*;
pub use session::*;
