//! Parser collaborator for the xpiguard engine.
//!
//! Parses script text with swc and lowers the result into the engine's arena
//! [`ScriptTree`](xpiguard_domain::script::ScriptTree), or reports an explicit
//! [`ParseFailure`](xpiguard_domain::script::ParseFailure). Scripts and modules up to the
//! latest ECMAScript edition are accepted; JSX and TypeScript are not.

#![forbid(unsafe_code)]

mod lower;
mod parse;
mod position;

pub use parse::parse;
