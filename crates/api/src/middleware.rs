use axum::{
    extract::State,
    http::{uri::PathAndQuery, Uri},
    middleware::Next,
    response::Response,
};

/// How request paths are rewritten before routing.
///
/// Paths match case-insensitively, ignore a trailing `/`, and may carry a
/// deployment stage prefix (e.g. `/prod`) that is stripped. The query string
/// is left untouched.
#[derive(Debug, Clone, Default)]
pub struct PathRules {
    stage_prefix: Option<String>,
}

impl PathRules {
    /// `stage_prefix` must already be normalized (leading `/`, lowercase, no trailing `/`).
    pub fn new(stage_prefix: Option<String>) -> Self {
        Self { stage_prefix }
    }

    pub fn normalize(&self, path: &str) -> String {
        let mut path = path.to_ascii_lowercase();

        while path.len() > 1 && path.ends_with('/') {
            path.pop();
        }

        if let Some(prefix) = &self.stage_prefix {
            if path == *prefix {
                return "/".to_string();
            }
            // Segment boundary only: `/prod` must not eat the start of `/products`.
            if let Some(rest) = path.strip_prefix(prefix.as_str()) {
                if rest.starts_with('/') {
                    return rest.to_string();
                }
            }
        }

        path
    }
}

pub async fn normalize_path(
    State(rules): State<PathRules>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let normalized = rules.normalize(req.uri().path());

    if normalized != req.uri().path() {
        let path_and_query = match req.uri().query() {
            Some(q) => format!("{normalized}?{q}"),
            None => normalized,
        };

        let mut parts = req.uri().clone().into_parts();
        if let Ok(pq) = PathAndQuery::try_from(path_and_query) {
            parts.path_and_query = Some(pq);
            if let Ok(uri) = Uri::from_parts(parts) {
                *req.uri_mut() = uri;
            }
        }
    }

    next.run(req).await
}
