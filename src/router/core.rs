//! Router core: route table compilation and request matching.

use http::Method;
use regex::Regex;
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::{debug, info};

/// Maximum number of path parameters before heap allocation.
pub const MAX_INLINE_PARAMS: usize = 4;

/// Path parameters as `(name, value)` pairs. Names are shared with the route
/// table; values are per-request.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Static description of one route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMeta {
    pub method: Method,
    /// Path template, parameters written as `{name}` (e.g. `/items/{id}`)
    pub path_pattern: String,
    /// Name the dispatcher uses to find the handler coroutine
    pub handler_name: String,
}

impl RouteMeta {
    #[must_use]
    pub fn new(method: Method, path_pattern: &str, handler_name: &str) -> Self {
        Self {
            method,
            path_pattern: path_pattern.to_string(),
            handler_name: handler_name.to_string(),
        }
    }
}

/// Result of matching a request to a route
#[derive(Debug, Clone)]
pub struct RouteMatch {
    pub route: Arc<RouteMeta>,
    /// Path parameters extracted from the URL (`{id}` -> `("id", "123")`)
    pub path_params: ParamVec,
    pub handler_name: String,
}

impl RouteMatch {
    /// Get a path parameter by name. Last occurrence wins.
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Method, compiled regex, route metadata, parameter names
type CompiledRoute = (Method, Regex, Arc<RouteMeta>, Vec<Arc<str>>);

/// Matches `(method, path)` pairs against a fixed route table.
#[derive(Clone)]
pub struct Router {
    routes: Vec<CompiledRoute>,
}

impl Router {
    /// Compile the route table.
    ///
    /// Routes are tried longest pattern first so `/items/{id}` is considered
    /// before `/items`.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern does not compile to a valid regex.
    pub fn new(routes: Vec<RouteMeta>) -> Result<Self, regex::Error> {
        let mut routes = routes;
        routes.sort_by_key(|r| std::cmp::Reverse(r.path_pattern.len()));

        let compiled = routes
            .into_iter()
            .map(|route| {
                let (regex, param_names) = Self::path_to_regex(&route.path_pattern)?;
                info!(
                    method = %route.method,
                    path = %route.path_pattern,
                    handler = %route.handler_name,
                    "Route registered"
                );
                Ok((route.method.clone(), regex, Arc::new(route), param_names))
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;

        Ok(Self { routes: compiled })
    }

    /// Find the route for `method` + `path` (path without query string).
    #[must_use]
    pub fn route(&self, method: Method, path: &str) -> Option<RouteMatch> {
        for (m, regex, route, param_names) in &self.routes {
            if *m != method {
                continue;
            }
            if let Some(captures) = regex.captures(path) {
                let mut params = ParamVec::new();
                for (i, name) in param_names.iter().enumerate() {
                    if let Some(val) = captures.get(i + 1) {
                        params.push((Arc::clone(name), val.as_str().to_string()));
                    }
                }
                return Some(RouteMatch {
                    route: Arc::clone(route),
                    path_params: params,
                    handler_name: route.handler_name.clone(),
                });
            }
        }
        debug!(method = %method, path = %path, "No route matched");
        None
    }

    /// Registered routes, in matching order
    pub fn routes(&self) -> impl Iterator<Item = &RouteMeta> {
        self.routes.iter().map(|(_, _, meta, _)| meta.as_ref())
    }

    pub(crate) fn path_to_regex(path: &str) -> Result<(Regex, Vec<Arc<str>>), regex::Error> {
        if path == "/" {
            return Ok((Regex::new(r"^/$")?, Vec::new()));
        }

        let mut pattern = String::with_capacity(path.len() + 8);
        pattern.push('^');
        let mut param_names = Vec::with_capacity(path.matches('{').count());

        for segment in path.split('/') {
            if segment.starts_with('{') && segment.ends_with('}') {
                let name = segment.trim_start_matches('{').trim_end_matches('}');
                pattern.push_str("/([^/]+)");
                param_names.push(Arc::from(name));
            } else if !segment.is_empty() {
                pattern.push('/');
                pattern.push_str(&regex::escape(segment));
            }
        }

        pattern.push_str("/?$");
        Ok((Regex::new(&pattern)?, param_names))
    }
}
