mod columns;
mod errors;
mod loader;

pub use errors::DatasetError;
pub use loader::DatasetLoader;
