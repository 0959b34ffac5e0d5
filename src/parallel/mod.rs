pub mod partition;
pub mod merger;
pub mod observer;
pub mod sorter;
