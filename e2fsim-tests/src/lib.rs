#[cfg(not(tarpaulin_include))]
pub mod imagegen;

pub mod tools;
