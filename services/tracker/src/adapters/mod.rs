pub mod file_store;
pub mod memory_store;
pub mod nutrition;

pub use file_store::JsonFileStore;
pub use memory_store::InMemoryStore;
pub use nutrition::CannedNutritionResponder;
