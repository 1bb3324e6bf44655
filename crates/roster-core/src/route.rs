use serde::Serialize;
use std::fmt;

/// The application's views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "view", content = "id", rename_all = "snake_case")]
pub enum Route {
    Home,
    List,
    Create,
    /// `None` when the path carried no usable id; the form opens blank.
    Edit(Option<u64>),
    Delete(Option<u64>),
    NotFound,
}

impl Route {
    /// Resolve a URL path. The empty path redirects to home; unknown paths
    /// resolve to [`Route::NotFound`].
    pub fn parse(path: &str) -> Route {
        let trimmed = path.trim_matches('/');
        let segments: Vec<&str> = if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed.split('/').collect()
        };
        match segments.as_slice() {
            [] | ["home"] => Route::Home,
            ["list"] => Route::List,
            ["create"] => Route::Create,
            ["edit", id] => Route::Edit(parse_id(id)),
            ["delete", id] => Route::Delete(parse_id(id)),
            _ => Route::NotFound,
        }
    }

    pub fn employee_id(self) -> Option<u64> {
        match self {
            Route::Edit(id) | Route::Delete(id) => id,
            _ => None,
        }
    }
}

/// Ids are positive integers; anything else means "no id".
pub fn parse_id(raw: &str) -> Option<u64> {
    raw.parse::<u64>().ok().filter(|id| *id > 0)
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => f.write_str("/home"),
            Route::List => f.write_str("/list"),
            Route::Create | Route::Edit(None) => f.write_str("/create"),
            Route::Edit(Some(id)) => write!(f, "/edit/{id}"),
            Route::Delete(Some(id)) => write!(f, "/delete/{id}"),
            Route::Delete(None) => f.write_str("/list"),
            Route::NotFound => f.write_str("/not-found"),
        }
    }
}
