pub mod parallel;

pub use parallel::ParallelExecutor;
