use axum::http::Method;

/// A route that may be reached without credentials. A trailing `*` in the
/// path makes it a prefix match; `method: None` matches any method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicRoute {
    pub method: Option<Method>,
    pub path: String,
}

impl PublicRoute {
    pub fn any(path: impl Into<String>) -> Self {
        Self {
            method: None,
            path: path.into(),
        }
    }

    pub fn method(method: Method, path: impl Into<String>) -> Self {
        Self {
            method: Some(method),
            path: path.into(),
        }
    }

    fn matches(&self, method: &Method, path: &str) -> bool {
        if self.method.as_ref().is_some_and(|m| m != method) {
            return false;
        }
        match self.path.strip_suffix('*') {
            Some(prefix) => path.starts_with(prefix),
            None => self.path == path,
        }
    }
}

/// Decides which requests may proceed anonymously. Everything not listed
/// requires a verified token.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    public: Vec<PublicRoute>,
}

impl AccessPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_public(mut self, route: PublicRoute) -> Self {
        self.public.push(route);
        self
    }

    /// Registration, login, every read under `/api/`, plus health and metrics.
    pub fn catalog_default() -> Self {
        Self::new()
            .with_public(PublicRoute::method(Method::POST, "/user/register"))
            .with_public(PublicRoute::method(Method::POST, "/user/login"))
            .with_public(PublicRoute::method(Method::GET, "/api/*"))
            .with_public(PublicRoute::method(Method::GET, "/healthz"))
            .with_public(PublicRoute::method(Method::GET, "/metrics"))
    }

    pub fn is_public(&self, method: &Method, path: &str) -> bool {
        self.public.iter().any(|route| route.matches(method, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_under_api_are_public() {
        let policy = AccessPolicy::catalog_default();
        assert!(policy.is_public(&Method::GET, "/api/products"));
        assert!(policy.is_public(&Method::GET, "/api/products/category/3"));
        assert!(policy.is_public(&Method::GET, "/api/categories/7"));
    }

    #[test]
    fn writes_under_api_are_protected() {
        let policy = AccessPolicy::catalog_default();
        assert!(!policy.is_public(&Method::POST, "/api/products"));
        assert!(!policy.is_public(&Method::PUT, "/api/products/1"));
        assert!(!policy.is_public(&Method::DELETE, "/api/categories/1"));
    }

    #[test]
    fn user_endpoints_are_exact_matches() {
        let policy = AccessPolicy::catalog_default();
        assert!(policy.is_public(&Method::POST, "/user/login"));
        assert!(policy.is_public(&Method::POST, "/user/register"));
        assert!(!policy.is_public(&Method::POST, "/user/login/extra"));
        assert!(!policy.is_public(&Method::GET, "/user/whoami"));
    }

    #[test]
    fn any_method_route() {
        let policy = AccessPolicy::new().with_public(PublicRoute::any("/status"));
        assert!(policy.is_public(&Method::GET, "/status"));
        assert!(policy.is_public(&Method::DELETE, "/status"));
        assert!(!policy.is_public(&Method::GET, "/statusx"));
    }
}
