//! Dependency resolution index for build rules.
//!
//! Rules are registered with a [`resolve::RuleIndex`], which computes
//! embed closures and maps import specs to the rules that provide them.
//! Language providers in [`lang`] decide what each rule kind imports and
//! embeds and turn a rule's import strings into dependency labels.

pub mod cli;
pub mod config;
pub mod errors;
pub mod label;
pub mod lang;
pub mod output;
pub mod resolve;
pub mod rule;
pub mod walk;
