pub mod brands;
pub mod extractor;
pub mod fetch;
pub mod normalize;
pub mod state;
pub mod store;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod tracker;
