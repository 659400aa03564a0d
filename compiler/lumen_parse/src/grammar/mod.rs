//! Grammar rules, split by syntactic category.

mod element;
mod expr;
mod item;
