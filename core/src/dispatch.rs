//! Name-to-intent parsing for the method-name calling convention.
//!
//! # Design
//! The original DeployBot clients route every undeclared method name
//! through one handler: `get<Name>` fetches a resource, anything else sets
//! a query parameter. Rust has no magic-method interception, so the
//! convention becomes an explicit parser producing a tagged [`Intent`]
//! which [`DeployBot::call`](crate::DeployBot::call) executes.

/// What a method-style name means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// `get<Name>` — fetch the resource `<name>` (lower-cased remainder).
    Fetch { resource: String },
    /// Anything else — set the query parameter `<name>` (snake_cased).
    SetParam { name: String },
}

impl Intent {
    /// Parse a method-style name. The `get` prefix is case-sensitive and
    /// must be followed by at least one character; a bare `get` is a
    /// parameter setter like any other name.
    pub fn parse(name: &str) -> Intent {
        match name.strip_prefix("get") {
            Some(rest) if !rest.is_empty() => Intent::Fetch {
                resource: rest.to_lowercase(),
            },
            _ => Intent::SetParam {
                name: snake_case(name),
            },
        }
    }
}

/// Convert a camelCase name to snake_case.
///
/// Reproduces the reference conversion exactly: input that is already
/// entirely lower-case letters passes through untouched; otherwise a `_`
/// is inserted before every upper-case character that follows another
/// character, the result is lower-cased and whitespace is stripped. The
/// boundary rule splits consecutive upper-case letters too, so `FOOBAR`
/// becomes `f_o_o_b_a_r` — a documented quirk callers depend on.
pub fn snake_case(value: &str) -> String {
    if value.chars().all(|c| c.is_ascii_lowercase()) {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len() * 2);
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if !c.is_whitespace() {
            out.extend(c.to_lowercase());
        }
        if chars.peek().is_some_and(|next| next.is_uppercase()) {
            out.push('_');
        }
    }
    out
}
