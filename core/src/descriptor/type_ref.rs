//! # Type References
//!
//! A parsed Rust type expression (`Option<Vec<Page<Employee>>>`, `[u8; 16]`,
//! `&'a str`). This is the unit the dispatcher classifies; references,
//! lifetimes and `mut` are stripped while parsing.

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Wrapper types that carry no schema of their own.
const TRANSPARENT_WRAPPERS: &[&str] = &["Box", "Rc", "Arc", "Cow", "Cell", "RefCell", "Mutex"];

/// A structural type expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeRef {
    /// A (possibly generic) named type, e.g. `std::collections::HashMap<String, User>`.
    Path {
        /// The path as written, minus any leading `crate::`.
        name: String,
        /// Generic type arguments, lifetimes excluded.
        args: Vec<TypeRef>,
    },
    /// A fixed-size array `[T; N]` or a slice `[T]`.
    Array {
        /// Element type.
        element: Box<TypeRef>,
        /// Length for fixed arrays, `None` for slices.
        len: Option<usize>,
    },
    /// A tuple `(A, B)`. The unit type is an empty tuple.
    Tuple(Vec<TypeRef>),
}

impl TypeRef {
    /// A non-generic named type.
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Path {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// A generic named type with the given arguments.
    pub fn generic(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        TypeRef::Path {
            name: name.into(),
            args,
        }
    }

    /// `Option<inner>`.
    pub fn optional(inner: TypeRef) -> Self {
        TypeRef::generic("Option", vec![inner])
    }

    /// Parses a Rust type string.
    ///
    /// Unknown syntax (function pointers, trait objects) parses into an opaque
    /// path so it can reach the dispatcher's fallback; only empty input and
    /// unbalanced brackets are rejected.
    ///
    /// ```
    /// use typeschema_core::TypeRef;
    ///
    /// let ty = TypeRef::parse("Option<Vec<&'a str>>").unwrap();
    /// assert_eq!(ty.to_string(), "Option<Vec<str>>");
    /// assert!(ty.is_option());
    /// ```
    pub fn parse(raw: &str) -> AppResult<TypeRef> {
        let ty = strip_reference(raw.trim());
        if ty.is_empty() {
            return Err(AppError::General(format!("Empty type expression: '{}'", raw)));
        }
        if !is_balanced(ty) {
            return Err(AppError::General(format!(
                "Unbalanced brackets in type expression: '{}'",
                raw
            )));
        }

        if let Some(inner) = ty.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
            let parts = split_top_level(inner, ';');
            let element = TypeRef::parse(&parts[0])?;
            let len = match parts.get(1) {
                Some(n) => Some(n.trim().parse::<usize>().map_err(|_| {
                    AppError::General(format!("Array length must be a literal: '{}'", raw))
                })?),
                None => None,
            };
            return Ok(TypeRef::Array {
                element: Box::new(element),
                len,
            });
        }

        if let Some(inner) = ty.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
            let items = split_top_level(inner, ',')
                .into_iter()
                .filter(|s| !s.is_empty())
                .map(|s| TypeRef::parse(&s))
                .collect::<AppResult<Vec<_>>>()?;
            return Ok(TypeRef::Tuple(items));
        }

        if let Some((base, inner)) = split_generic(ty) {
            let args = split_top_level(inner, ',')
                .into_iter()
                .filter(|arg| !arg.is_empty() && !arg.starts_with('\''))
                .map(|arg| TypeRef::parse(&arg))
                .collect::<AppResult<Vec<_>>>()?;
            return Ok(TypeRef::generic(clean_path(base), args));
        }

        Ok(TypeRef::named(clean_path(ty)))
    }

    /// The last path segment (`HashMap` for `std::collections::HashMap<..>`).
    pub fn simple_name(&self) -> Option<&str> {
        match self {
            TypeRef::Path { name, .. } => name.rsplit("::").next(),
            _ => None,
        }
    }

    /// Generic arguments of a path type; empty for arrays and tuples.
    pub fn args(&self) -> &[TypeRef] {
        match self {
            TypeRef::Path { args, .. } => args,
            _ => &[],
        }
    }

    /// Whether this is `Option<T>`.
    pub fn is_option(&self) -> bool {
        self.simple_name() == Some("Option") && self.args().len() == 1
    }

    /// Strips `Option` and transparent smart pointers, reporting whether an
    /// `Option` was seen on the way down.
    pub fn peel(&self) -> (&TypeRef, bool) {
        let mut current = self;
        let mut nullable = false;
        loop {
            match current.simple_name() {
                Some("Option") if current.args().len() == 1 => {
                    nullable = true;
                    current = &current.args()[0];
                }
                Some(name) if TRANSPARENT_WRAPPERS.contains(&name) && current.args().len() == 1 => {
                    current = &current.args()[0];
                }
                _ => return (current, nullable),
            }
        }
    }

    /// Rewrites every path name through `f`, leaving structure intact.
    pub fn map_names<F>(&self, f: &F) -> TypeRef
    where
        F: Fn(&str) -> Option<String>,
    {
        match self {
            TypeRef::Path { name, args } => TypeRef::Path {
                name: f(name).unwrap_or_else(|| name.clone()),
                args: args.iter().map(|a| a.map_names(f)).collect(),
            },
            TypeRef::Array { element, len } => TypeRef::Array {
                element: Box::new(element.map_names(f)),
                len: *len,
            },
            TypeRef::Tuple(items) => TypeRef::Tuple(items.iter().map(|i| i.map_names(f)).collect()),
        }
    }
}

impl Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Path { name, args } => {
                write!(f, "{}", name)?;
                if !args.is_empty() {
                    write!(f, "<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", arg)?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            TypeRef::Array { element, len } => match len {
                Some(n) => write!(f, "[{}; {}]", element, n),
                None => write!(f, "[{}]", element),
            },
            TypeRef::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl TryFrom<String> for TypeRef {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TypeRef::parse(&value)
    }
}

impl From<TypeRef> for String {
    fn from(value: TypeRef) -> Self {
        value.to_string()
    }
}

impl std::str::FromStr for TypeRef {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeRef::parse(s)
    }
}

fn strip_reference(mut ty: &str) -> &str {
    loop {
        let trimmed = ty.trim_start();
        if let Some(rest) = trimmed.strip_prefix('&') {
            let rest = rest.trim_start();
            // lifetime: `&'a T`
            ty = if rest.starts_with('\'') {
                rest.split_once(char::is_whitespace)
                    .map(|(_, t)| t)
                    .unwrap_or("")
            } else {
                rest
            };
        } else if let Some(rest) = trimmed.strip_prefix("mut ") {
            ty = rest;
        } else {
            return trimmed.trim_end();
        }
    }
}

fn clean_path(path: &str) -> String {
    let path = path.trim();
    let path = path.strip_prefix("::").unwrap_or(path);
    let path = path.strip_prefix("crate::").unwrap_or(path);
    path.replace(' ', "")
}

fn is_balanced(ty: &str) -> bool {
    let mut stack = Vec::new();
    for ch in ty.chars() {
        match ch {
            '<' | '[' | '(' => stack.push(ch),
            '>' if !stack.is_empty() && stack.last() == Some(&'<') => {
                stack.pop();
            }
            ']' if stack.last() == Some(&'[') => {
                stack.pop();
            }
            ')' if stack.last() == Some(&'(') => {
                stack.pop();
            }
            // `->` in fn pointers
            '>' if stack.is_empty() => {}
            '>' | ']' | ')' => return false,
            _ => {}
        }
    }
    stack.is_empty()
}

fn split_generic(ty: &str) -> Option<(&str, &str)> {
    let start = ty.find('<')?;
    if !ty.ends_with('>') {
        return None;
    }
    let base = ty[..start].trim();
    if base.is_empty() || base.contains(['(', '[', ' ']) {
        return None;
    }
    Some((base, &ty[start + 1..ty.len() - 1]))
}

/// Splits on `sep` only at bracket depth zero.
fn split_top_level(inner: &str, sep: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();

    for ch in inner.chars() {
        match ch {
            '<' | '[' | '(' => {
                depth += 1;
                current.push(ch);
            }
            '>' | ']' | ')' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            c if c == sep && depth == 0 => {
                parts.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    parts.push(current.trim().to_string());
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_primitive() {
        assert_eq!(TypeRef::parse("i32").unwrap(), TypeRef::named("i32"));
        assert_eq!(TypeRef::parse("  String ").unwrap(), TypeRef::named("String"));
    }

    #[test]
    fn test_parse_nested_generics() {
        let ty = TypeRef::parse("HashMap<String, Vec<Page<Employee>>>").unwrap();
        assert_eq!(ty.simple_name(), Some("HashMap"));
        assert_eq!(ty.args().len(), 2);
        assert_eq!(ty.args()[1].to_string(), "Vec<Page<Employee>>");
    }

    #[test]
    fn test_parse_strips_references_and_lifetimes() {
        assert_eq!(TypeRef::parse("&'a str").unwrap(), TypeRef::named("str"));
        assert_eq!(TypeRef::parse("&mut String").unwrap(), TypeRef::named("String"));
        let cow = TypeRef::parse("Cow<'a, str>").unwrap();
        assert_eq!(cow.to_string(), "Cow<str>");
    }

    #[test]
    fn test_parse_arrays_and_slices() {
        let fixed = TypeRef::parse("[u8; 16]").unwrap();
        assert_eq!(
            fixed,
            TypeRef::Array {
                element: Box::new(TypeRef::named("u8")),
                len: Some(16)
            }
        );
        let slice = TypeRef::parse("&[Employee]").unwrap();
        assert_eq!(slice.to_string(), "[Employee]");
    }

    #[test]
    fn test_parse_tuple_and_unit() {
        assert_eq!(TypeRef::parse("()").unwrap(), TypeRef::Tuple(vec![]));
        let pair = TypeRef::parse("(i32, String)").unwrap();
        assert_eq!(pair.to_string(), "(i32, String)");
    }

    #[test]
    fn test_parse_strips_crate_prefix() {
        let ty = TypeRef::parse("crate::models::User").unwrap();
        assert_eq!(ty, TypeRef::named("models::User"));
        assert_eq!(ty.simple_name(), Some("User"));
    }

    #[test]
    fn test_parse_rejects_empty_and_unbalanced() {
        assert!(TypeRef::parse("   ").is_err());
        assert!(TypeRef::parse("Vec<String").is_err());
        assert!(TypeRef::parse("[u8; N]").is_err());
    }

    #[test]
    fn test_peel_option_and_box() {
        let ty = TypeRef::parse("Option<Box<Node>>").unwrap();
        let (inner, nullable) = ty.peel();
        assert!(nullable);
        assert_eq!(inner, &TypeRef::named("Node"));

        let plain = TypeRef::named("Node");
        assert_eq!(plain.peel(), (&plain, false));
    }

    #[test]
    fn test_serde_as_string() {
        let ty: TypeRef = serde_json::from_str("\"Page<Employee>\"").unwrap();
        assert_eq!(ty.args()[0], TypeRef::named("Employee"));
        assert_eq!(serde_json::to_string(&ty).unwrap(), "\"Page<Employee>\"");
    }
}
