//! Rule language: literal values, type references, directed errors,
//! sequences, option tables and the explicit-null sentinel.

pub mod options;
pub mod rule;
pub mod sequence;
pub mod value;
