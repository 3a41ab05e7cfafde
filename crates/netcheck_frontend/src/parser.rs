//! The `pest` grammar for the reference interaction-description language.
//!
//! Deliberately smaller than `language-spec.lark`: one file, no includes,
//! no nested comments, and exactly the concrete syntax the seed scenarios
//! need (component declarations, guarded clauses, broadcasts, and
//! `assumption`/`property` string entries).

use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct InteractionParser;
