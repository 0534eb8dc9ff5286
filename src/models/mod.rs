pub mod gbm;
pub mod paths;
