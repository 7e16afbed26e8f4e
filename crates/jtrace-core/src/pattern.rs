//! Pattern matching for fully-qualified Java names.
//!
//! The pattern form is picked from syntactic cues, in this order:
//!
//! 1. `^...` or `...$`: regular expression. Invalid syntax degrades to
//!    exact equality against the raw pattern.
//! 2. `prefix..*`: recursive descendant, any name under `prefix.`. A prefix
//!    with `*` or `?` is itself matched as a glob.
//! 3. `prefix.*`: single level, names directly under `prefix.`. A prefix with
//!    wildcards falls through to the glob form, which has the same meaning.
//! 4. Contains `*` or `?`: glob, where `*` and `?` never cross a `.`.
//! 5. Anything else: exact equality.
//!
//! Matching never fails: malformed patterns fall back to exact equality.

use regex::Regex;

/// A compiled name pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    raw: String,
    kind: PatternKind,
}

#[derive(Debug, Clone)]
enum PatternKind {
    Regex(Regex),
    Recursive(String),
    SingleLevel(String),
    Glob(Regex),
    Exact,
}

impl Pattern {
    /// Compiles a pattern string.
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        Self {
            raw: pattern.to_string(),
            kind: classify(pattern),
        }
    }

    /// Returns the pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Tests whether a fully-qualified name matches this pattern.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        match &self.kind {
            PatternKind::Regex(re) | PatternKind::Glob(re) => re.is_match(name),
            PatternKind::Recursive(prefix) => name.starts_with(prefix.as_str()),
            PatternKind::SingleLevel(prefix) => name
                .strip_prefix(prefix.as_str())
                .is_some_and(|rest| !rest.contains('.')),
            PatternKind::Exact => name == self.raw,
        }
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for Pattern {}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

fn classify(pattern: &str) -> PatternKind {
    if pattern.starts_with('^') || pattern.ends_with('$') {
        return Regex::new(pattern).map_or(PatternKind::Exact, PatternKind::Regex);
    }
    // Keep the package dot in the prefix: `a.b..*` selects `a.b.X`, never `a.bX`.
    if let Some(base) = pattern.strip_suffix("..*") {
        if !base.contains(['*', '?']) {
            return PatternKind::Recursive(format!("{base}."));
        }
        let anchored = glob_to_regex(base);
        let head = anchored.strip_suffix('$').unwrap_or(&anchored);
        return Regex::new(&format!("{head}\\..*$"))
            .map_or(PatternKind::Exact, PatternKind::Glob);
    }
    if let Some(prefix) = pattern.strip_suffix('*').filter(|p| p.ends_with('.')) {
        if !prefix.contains(['*', '?']) {
            return PatternKind::SingleLevel(prefix.to_string());
        }
    }
    if pattern.contains(['*', '?']) {
        return Regex::new(&glob_to_regex(pattern)).map_or(PatternKind::Exact, PatternKind::Glob);
    }
    PatternKind::Exact
}

/// Translates a glob into an anchored regular expression.
fn glob_to_regex(glob: &str) -> String {
    let chars: Vec<char> = glob.chars().collect();
    let mut out = String::with_capacity(glob.len() * 2 + 2);
    out.push('^');

    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => out.push_str("[^.]*"),
            '?' => out.push_str("[^.]"),
            '[' => {
                // Bracket expressions pass through verbatim when closed.
                if let Some(end) = chars[i + 1..].iter().position(|&c| c == ']') {
                    let end = i + 1 + end;
                    out.extend(&chars[i..=end]);
                    i = end;
                } else {
                    out.push_str("\\[");
                }
            }
            c => {
                let mut buf = [0u8; 4];
                out.push_str(&regex::escape(c.encode_utf8(&mut buf)));
            }
        }
        i += 1;
    }

    out.push('$');
    out
}

/// Tests a single pattern string against a name.
#[must_use]
pub fn matches(pattern: &str, name: &str) -> bool {
    Pattern::new(pattern).matches(name)
}

/// Returns `true` if any of the patterns matches the name.
#[must_use]
pub fn matches_any<S: AsRef<str>>(patterns: &[S], name: &str) -> bool {
    patterns.iter().any(|p| matches(p.as_ref(), name))
}

/// Returns `true` if every pattern matches the name.
///
/// An empty pattern list matches everything.
#[must_use]
pub fn matches_all<S: AsRef<str>>(patterns: &[S], name: &str) -> bool {
    patterns.iter().all(|p| matches(p.as_ref(), name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recursive_descendant() {
        let p = "com.myapp.controller..*";
        assert!(matches(p, "com.myapp.controller.UserController"));
        assert!(matches(p, "com.myapp.controller.v2.Admin"));
        assert!(!matches(p, "com.myapp.controllerX.Foo"));
        assert!(!matches(p, "com.myapp.service.UserService"));
    }

    #[test]
    fn recursive_descendant_with_wildcard_prefix() {
        let p = "com.*.service..*";
        assert!(matches(p, "com.myapp.service.UserService"));
        assert!(matches(p, "com.myapp.service.impl.UserServiceImpl"));
        assert!(!matches(p, "com.my.app.service.UserService"));
        assert!(!matches(p, "com.myapp.serviceX.UserService"));
    }

    #[test]
    fn single_level_with_wildcard_prefix() {
        let p = "com.*.dto.*";
        assert!(matches(p, "com.myapp.dto.UserDto"));
        assert!(!matches(p, "com.myapp.dto.v2.UserDto"));
    }

    #[test]
    fn single_level() {
        let p = "com.myapp.*";
        assert!(matches(p, "com.myapp.User"));
        assert!(!matches(p, "com.myapp.service.User"));
        assert!(!matches(p, "com.myappx.User"));
    }

    #[test]
    fn glob_question_mark_is_one_non_dot_char() {
        let p = "com.myapp.?ser";
        assert!(matches(p, "com.myapp.User"));
        assert!(matches(p, "com.myapp.4ser"));
        assert!(!matches(p, "com.myapp.Usser"));
        assert!(!matches(p, "com.myapp..ser"));
    }

    #[test]
    fn glob_star_stays_within_segment() {
        let p = "com.*.service.*Service";
        assert!(matches(p, "com.myapp.service.UserService"));
        assert!(!matches(p, "com.my.app.service.UserService"));
        assert!(!matches(p, "com.myapp.service.UserRepository"));
    }

    #[test]
    fn glob_bracket_passthrough() {
        let p = "com.myapp.[UA]*";
        assert!(matches(p, "com.myapp.User"));
        assert!(matches(p, "com.myapp.Admin"));
        assert!(!matches(p, "com.myapp.Order"));
    }

    #[test]
    fn glob_unclosed_bracket_is_literal() {
        assert!(matches("com.[a*", "com.[abc"));
    }

    #[test]
    fn regex_patterns() {
        assert!(matches("^com\\.myapp\\..*Controller$", "com.myapp.web.UserController"));
        assert!(!matches("^com\\.myapp\\..*Controller$", "com.myapp.web.UserService"));
        assert!(matches("Service$", "com.myapp.UserService"));
    }

    #[test]
    fn invalid_regex_degrades_to_exact() {
        let p = "^com.(unclosed";
        assert!(!matches(p, "com.x"));
        assert!(matches(p, "^com.(unclosed"));
    }

    #[test]
    fn exact_match() {
        assert!(matches("com.myapp.User", "com.myapp.User"));
        assert!(!matches("com.myapp.User", "com.myapp.UserDto"));
    }

    #[test]
    fn empty_pattern_never_panics() {
        assert!(matches("", ""));
        assert!(!matches("", "com.x"));
        assert!(!matches("..*", "com.x"));
    }

    #[test]
    fn any_and_all() {
        let pats = ["com.a..*", "com.b..*"];
        assert!(matches_any(&pats, "com.b.X"));
        assert!(!matches_any(&pats, "com.c.X"));
        assert!(matches_all(&["com..*", "*.*.X"], "com.a.X"));
        assert!(!matches_all(&["com..*", "org..*"], "com.a.X"));
        assert!(matches_all::<&str>(&[], "anything"));
    }
}
