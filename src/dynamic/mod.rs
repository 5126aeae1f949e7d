//! Bundled stub framework: stubs checked against a declared type catalog and
//! invoked by method name.

pub mod catalog;
pub mod stub;
