//! URI template parsing and expansion
//!
//! Image records carry URI templates such as
//! `https://static.sfomuseum.org/media/{label}/{secret}_{label}.{extension}`.
//! This module parses them once and expands them with string variables.
//!
//! Supported syntax follows RFC 6570 up to level 3 for string values:
//! simple `{var}`, reserved `{+var}`, fragment `{#var}`, label `{.var}`,
//! path `{/var}`, path-parameter `{;var}`, query `{?var}` and continuation
//! `{&var}` expressions, several comma-separated variables per expression,
//! and the `:n` prefix modifier. The `*` explode modifier is accepted and has
//! no effect on string values.
//!
//! Expansion is strict: a variable the template names but the caller does not
//! supply is an error, so a half-expanded URI is never produced.

use crate::error::{Error, Result};
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Regex for one variable specifier: name, optional `:n` prefix or `*`
static VARSPEC_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^((?:[A-Za-z0-9_]|%[0-9A-Fa-f]{2})(?:\.?(?:[A-Za-z0-9_]|%[0-9A-Fa-f]{2}))*)(?::([1-9][0-9]{0,3})|(\*))?$",
    )
    .unwrap()
});

/// Template variables by name
pub type TemplateVars = HashMap<String, String>;

// ============================================================================
// Template AST
// ============================================================================

/// A parsed URI template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriTemplate {
    source: String,
    parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Literal(String),
    Expression(Expression),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Expression {
    operator: Operator,
    vars: Vec<VarSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct VarSpec {
    name: String,
    prefix: Option<usize>,
}

/// Expression operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Simple,
    Reserved,
    Fragment,
    Label,
    Path,
    PathParam,
    Query,
    QueryContinuation,
}

impl Operator {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Reserved),
            '#' => Some(Self::Fragment),
            '.' => Some(Self::Label),
            '/' => Some(Self::Path),
            ';' => Some(Self::PathParam),
            '?' => Some(Self::Query),
            '&' => Some(Self::QueryContinuation),
            _ => None,
        }
    }

    fn first(self) -> &'static str {
        match self {
            Self::Simple | Self::Reserved => "",
            Self::Fragment => "#",
            Self::Label => ".",
            Self::Path => "/",
            Self::PathParam => ";",
            Self::Query => "?",
            Self::QueryContinuation => "&",
        }
    }

    fn separator(self) -> &'static str {
        match self {
            Self::Simple | Self::Reserved | Self::Fragment => ",",
            Self::Label => ".",
            Self::Path => "/",
            Self::PathParam => ";",
            Self::Query | Self::QueryContinuation => "&",
        }
    }

    fn named(self) -> bool {
        matches!(self, Self::PathParam | Self::Query | Self::QueryContinuation)
    }

    /// Text after a named variable whose value is empty
    fn if_empty(self) -> &'static str {
        match self {
            Self::Query | Self::QueryContinuation => "=",
            _ => "",
        }
    }

    fn allow_reserved(self) -> bool {
        matches!(self, Self::Reserved | Self::Fragment)
    }
}

// ============================================================================
// Parsing
// ============================================================================

impl UriTemplate {
    /// Parse a template
    pub fn parse(source: &str) -> Result<Self> {
        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut rest = source;

        while let Some(pos) = rest.find(['{', '}']) {
            let (before, after) = rest.split_at(pos);
            literal.push_str(before);

            if after.starts_with('}') {
                return Err(Error::template(format!(
                    "unmatched '}}' at offset {} in '{source}'",
                    source.len() - after.len()
                )));
            }

            let body = &after[1..];
            let end = body.find('}').ok_or_else(|| {
                Error::template(format!("unclosed expression in '{source}'"))
            })?;

            if !literal.is_empty() {
                parts.push(Part::Literal(std::mem::take(&mut literal)));
            }
            parts.push(Part::Expression(parse_expression(&body[..end], source)?));
            rest = &body[end + 1..];
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            parts.push(Part::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            parts,
        })
    }

    /// Original template text
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Names of every variable the template references, in order of first use
    pub fn variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for part in &self.parts {
            if let Part::Expression(expr) = part {
                for var in &expr.vars {
                    if !names.contains(&var.name.as_str()) {
                        names.push(&var.name);
                    }
                }
            }
        }
        names
    }

    /// Expand the template with `vars`
    ///
    /// Fails with `Error::UndefinedVariable` for the first referenced
    /// variable missing from `vars`.
    pub fn expand(&self, vars: &TemplateVars) -> Result<String> {
        let mut out = String::with_capacity(self.source.len());

        for part in &self.parts {
            match part {
                Part::Literal(text) => out.push_str(text),
                Part::Expression(expr) => expand_expression(expr, vars, &mut out)?,
            }
        }

        Ok(out)
    }
}

impl FromStr for UriTemplate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for UriTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn parse_expression(body: &str, source: &str) -> Result<Expression> {
    let mut chars = body.chars();
    let (operator, list) = match chars.next().and_then(Operator::from_char) {
        Some(op) => (op, chars.as_str()),
        None => (Operator::Simple, body),
    };

    if list.is_empty() {
        return Err(Error::template(format!("empty expression in '{source}'")));
    }

    let vars = list
        .split(',')
        .map(|spec| parse_varspec(spec, source))
        .collect::<Result<Vec<_>>>()?;

    Ok(Expression { operator, vars })
}

fn parse_varspec(spec: &str, source: &str) -> Result<VarSpec> {
    let caps = VARSPEC_REGEX.captures(spec).ok_or_else(|| {
        Error::template(format!("invalid variable '{spec}' in '{source}'"))
    })?;

    let prefix = match caps.get(2) {
        Some(m) => Some(m.as_str().parse::<usize>().map_err(|e| {
            Error::template(format!("invalid prefix in '{spec}': {e}"))
        })?),
        None => None,
    };

    Ok(VarSpec {
        name: caps[1].to_string(),
        prefix,
    })
}

// ============================================================================
// Expansion
// ============================================================================

fn expand_expression(expr: &Expression, vars: &TemplateVars, out: &mut String) -> Result<()> {
    let op = expr.operator;

    for (i, var) in expr.vars.iter().enumerate() {
        let value = vars
            .get(&var.name)
            .ok_or_else(|| Error::undefined_var(&var.name))?;

        out.push_str(if i == 0 { op.first() } else { op.separator() });

        if op.named() {
            out.push_str(&var.name);
            if value.is_empty() {
                out.push_str(op.if_empty());
                continue;
            }
            out.push('=');
        }

        let value = match var.prefix {
            Some(n) => truncate_chars(value, n),
            None => value.as_str(),
        };
        encode_into(value, op.allow_reserved(), out);
    }

    Ok(())
}

fn truncate_chars(value: &str, n: usize) -> &str {
    match value.char_indices().nth(n) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}

fn is_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~')
}

fn is_reserved(b: u8) -> bool {
    matches!(
        b,
        b':' | b'/'
            | b'?'
            | b'#'
            | b'['
            | b']'
            | b'@'
            | b'!'
            | b'$'
            | b'&'
            | b'\''
            | b'('
            | b')'
            | b'*'
            | b'+'
            | b','
            | b';'
            | b'='
    )
}

/// Percent-encode `value`; reserved characters and existing `%XX` triplets
/// pass through when `allow_reserved` is set
fn encode_into(value: &str, allow_reserved: bool, out: &mut String) {
    let bytes = value.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        let pct_triplet = b == b'%'
            && bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
            && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit);

        if is_unreserved(b) || (allow_reserved && (is_reserved(b) || pct_triplet)) {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
        i += 1;
    }
}

/// Parse and expand in one step
pub fn expand(template: &str, vars: &TemplateVars) -> Result<String> {
    UriTemplate::parse(template)?.expand(vars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn vars(pairs: &[(&str, &str)]) -> TemplateVars {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn image_vars() -> TemplateVars {
        vars(&[("label", "k"), ("secret", "abc"), ("extension", "jpg")])
    }

    #[test]
    fn test_expand_image_template() {
        let template = UriTemplate::parse(
            "https://static.sfomuseum.org/media/172/956/659/3/1729566593_{secret}_{label}.{extension}",
        )
        .unwrap();

        assert_eq!(
            template.expand(&image_vars()).unwrap(),
            "https://static.sfomuseum.org/media/172/956/659/3/1729566593_abc_k.jpg"
        );
        assert_eq!(template.variables(), vec!["secret", "label", "extension"]);
    }

    #[test]
    fn test_literal_only() {
        let template = UriTemplate::parse("https://example.org/a.jpg").unwrap();
        assert!(template.variables().is_empty());
        assert_eq!(
            template.expand(&TemplateVars::new()).unwrap(),
            "https://example.org/a.jpg"
        );
    }

    #[test_case("{var}", "value" ; "simple")]
    #[test_case("{hello}", "Hello%20World%21" ; "simple encodes")]
    #[test_case("{+path}/here", "/foo/bar/here" ; "reserved")]
    #[test_case("{#path}", "#/foo/bar" ; "fragment")]
    #[test_case("X{.var}", "X.value" ; "label")]
    #[test_case("{/var,x}", "/value/1024" ; "path")]
    #[test_case("{;x,empty}", ";x=1024;empty" ; "path params")]
    #[test_case("{?x,empty}", "?x=1024&empty=" ; "query")]
    #[test_case("?a=1{&x}", "?a=1&x=1024" ; "query continuation")]
    #[test_case("{var:3}", "val" ; "prefix")]
    #[test_case("{var*}", "value" ; "explode on string")]
    #[test_case("{path}", "%2Ffoo%2Fbar" ; "simple encodes slash")]
    #[test_case("{+pct}", "50%25" ; "reserved keeps triplet")]
    fn test_rfc_operators(template: &str, expected: &str) {
        let vars = vars(&[
            ("var", "value"),
            ("hello", "Hello World!"),
            ("path", "/foo/bar"),
            ("x", "1024"),
            ("empty", ""),
            ("pct", "50%25"),
        ]);
        assert_eq!(expand(template, &vars).unwrap(), expected);
    }

    #[test_case("https://x/{label" ; "unclosed")]
    #[test_case("https://x/label}" ; "stray close")]
    #[test_case("https://x/{}" ; "empty expression")]
    #[test_case("https://x/{+}" ; "operator only")]
    #[test_case("https://x/{la bel}" ; "space in name")]
    #[test_case("https://x/{label:0}" ; "zero prefix")]
    #[test_case("https://x/{a,,b}" ; "empty varspec")]
    fn test_parse_errors(template: &str) {
        let err = UriTemplate::parse(template).unwrap_err();
        assert!(matches!(err, Error::Template { .. }), "{err:?}");
    }

    #[test]
    fn test_undefined_variable_is_error() {
        let template = UriTemplate::parse("https://x/{label}/{secret}.{extension}").unwrap();
        let mut vars = image_vars();
        vars.remove("secret");

        let err = template.expand(&vars).unwrap_err();
        assert!(matches!(err, Error::UndefinedVariable { ref variable } if variable == "secret"));
    }

    #[test]
    fn test_from_str_and_display() {
        let template: UriTemplate = "https://x/{label}".parse().unwrap();
        assert_eq!(template.to_string(), "https://x/{label}");
        assert_eq!(template.as_str(), "https://x/{label}");
    }

    #[test]
    fn test_prefix_respects_char_boundaries() {
        let vars = vars(&[("name", "élan")]);
        assert_eq!(expand("{name:2}", &vars).unwrap(), "%C3%A9l");
    }
}
