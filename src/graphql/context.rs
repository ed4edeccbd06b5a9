/// Where a GraphQL request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOrigin {
    Http,
    Cli,
}

/// Per-request diagnostics attached to every executed request as request data.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    pub origin: RequestOrigin,
    pub user_agent: Option<String>,
}

impl RequestContext {
    pub fn http(user_agent: Option<String>) -> Self {
        Self {
            request_id: nanoid::nanoid!(12),
            origin: RequestOrigin::Http,
            user_agent,
        }
    }

    pub fn cli() -> Self {
        Self {
            request_id: nanoid::nanoid!(12),
            origin: RequestOrigin::Cli,
            user_agent: None,
        }
    }
}
