mod history;
mod locations;

pub use history::HistoryRepository;
pub use locations::LocationRepository;
