//! Route table and the token-presence navigation guard.
//!
//! DESIGN
//! ======
//! The guard runs once, synchronously, before a navigation commits. It looks
//! at two things only: the `requires_auth` marker of every route record the
//! target path matches (parents included) and whether the token store holds
//! a token. It never consults the session manager and never checks the
//! token's validity, so a forged or expired token passes.
//!
//! Paths use `/`-separated segments; a `:name` segment matches any single
//! non-empty segment. Child route paths are relative to their parent.
//! Segments are percent-decoded before matching and static segments compare
//! ASCII case-insensitively, so `/Dashboard` and `/dash%62oard` resolve to
//! `/dashboard`. Captured params keep their decoded text as written.

use std::borrow::Cow;
use std::sync::Arc;

use percent_encoding::percent_decode_str;

use crate::storage::TokenStore;

pub const LOGIN_PATH: &str = "/login";

/// A route record as declared by the routing collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDef {
    pub path: String,
    pub requires_auth: bool,
    pub children: Vec<RouteDef>,
}

impl RouteDef {
    #[must_use]
    pub fn public(path: &str) -> Self {
        Self { path: path.to_owned(), requires_auth: false, children: Vec::new() }
    }

    #[must_use]
    pub fn protected(path: &str) -> Self {
        Self { path: path.to_owned(), requires_auth: true, children: Vec::new() }
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<RouteDef>) -> Self {
        self.children = children;
        self
    }

    fn segments(&self) -> Vec<Cow<'_, str>> {
        split_path(&self.path)
    }
}

/// The records a path matched, outermost first, plus captured params.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub matched: Vec<&'a RouteDef>,
    pub params: Vec<(String, String)>,
}

impl RouteMatch<'_> {
    #[must_use]
    pub fn requires_auth(&self) -> bool {
        self.matched.iter().any(|r| r.requires_auth)
    }

    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<RouteDef>,
}

impl RouteTable {
    #[must_use]
    pub fn new(routes: Vec<RouteDef>) -> Self {
        Self { routes }
    }

    /// The application's pages.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(vec![
            RouteDef::public("/"),
            RouteDef::public(LOGIN_PATH),
            RouteDef::public("/register"),
            RouteDef::protected("/dashboard"),
            RouteDef::protected("/upload"),
            RouteDef::protected("/videos"),
            RouteDef::public("/video/:slug"),
            RouteDef::protected("/embed/:id"),
        ])
    }

    #[must_use]
    pub fn routes(&self) -> &[RouteDef] {
        &self.routes
    }

    /// First declared route (depth-first) matching `path`. Query string and
    /// fragment are ignored.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<RouteMatch<'_>> {
        let segments = split_path(path);
        self.routes.iter().find_map(|route| {
            let mut found = RouteMatch { matched: Vec::new(), params: Vec::new() };
            match_route(route, &segments, &mut found).then_some(found)
        })
    }
}

fn split_path(path: &str) -> Vec<Cow<'_, str>> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| percent_decode_str(s).decode_utf8_lossy())
        .collect()
}

fn match_route<'a>(route: &'a RouteDef, segments: &[Cow<'_, str>], found: &mut RouteMatch<'a>) -> bool {
    let pattern = route.segments();
    if pattern.len() > segments.len() {
        return false;
    }

    let mut params = Vec::new();
    for (want, got) in pattern.iter().zip(segments) {
        if let Some(name) = want.strip_prefix(':') {
            params.push((name.to_owned(), got.to_string()));
        } else if !want.eq_ignore_ascii_case(got) {
            return false;
        }
    }

    let rest = &segments[pattern.len()..];
    let params_before = found.params.len();
    found.matched.push(route);
    found.params.extend(params);

    if route.children.iter().any(|child| match_route(child, rest, found)) || rest.is_empty() {
        return true;
    }

    found.matched.pop();
    found.params.truncate(params_before);
    false
}

// =============================================================================
// GUARD
// =============================================================================

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Proceed,
    Redirect(String),
}

/// Pure decision: redirect only when a matched record requires auth and no
/// token is stored.
#[must_use]
pub fn decide(route: Option<&RouteMatch<'_>>, has_token: bool, login_path: &str) -> Navigation {
    let requires_auth = route.is_some_and(RouteMatch::requires_auth);
    if requires_auth && !has_token {
        Navigation::Redirect(login_path.to_owned())
    } else {
        Navigation::Proceed
    }
}

pub struct RouteGuard {
    table: RouteTable,
    tokens: Arc<dyn TokenStore>,
    login_path: String,
}

impl RouteGuard {
    #[must_use]
    pub fn new(table: RouteTable, tokens: Arc<dyn TokenStore>) -> Self {
        Self { table, tokens, login_path: LOGIN_PATH.to_owned() }
    }

    #[must_use]
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Decide whether navigation to `target` may proceed.
    #[must_use]
    pub fn check(&self, target: &str) -> Navigation {
        let route = self.table.resolve(target);
        let decision = decide(route.as_ref(), self.tokens.has_token(), &self.login_path);
        if let Navigation::Redirect(to) = &decision {
            tracing::debug!(%target, redirect = %to, "navigation requires auth");
        }
        decision
    }
}

#[cfg(test)]
#[path = "router_test.rs"]
mod tests;
