//! Instructions whose semantics depend on code analysis.

pub mod control;
