//! SQL text primitives shared by every generation path.
//!
//! - [`quote`] - escaping and list-joining helpers
//! - [`fragment`] - named-stage statement assembly

pub mod quote;

pub(crate) mod fragment;

pub use quote::{
    double_quote, double_quote_list, join, plain, plain_list, single_quote, single_quote_list,
    SEMICOLON_WARNING,
};
