//! Backend endpoint paths.
//!
//! Paths are absolute templates turned into [`ApiPath`] segment lists and
//! appended to the configured origin by [`ApiClient::url`](super::ApiClient::url).
//! Parent-scoped collections use a `{parent}` placeholder filled in by
//! [`scoped_path`].

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use std::fmt;

pub const LOGIN: &str = "/api/v1/auth/login";

pub const USERS: &str = "/api/v1/users";
pub const ROLES: &str = "/api/v1/auth/roles";
pub const PERMISSIONS: &str = "/api/v1/auth/permissions";
pub const ROLE_PERMISSIONS: &str = "/api/v1/auth/roles/{parent}/permissions";
pub const TENANTS: &str = "/api/v1/tenants";
pub const STAFF_SALARIES: &str = "/api/v1/staff/salaries";
pub const STUDENTS: &str = "/api/v1/students";
pub const STUDENT_FEES: &str = "/api/v1/students/{parent}/fees";
pub const STUDENT_FACILITIES: &str = "/api/v1/students/{parent}/facilities";
pub const STUDENT_ATTENDANCE: &str = "/api/v1/students/{parent}/attendance";
pub const PROBABLE_STAFF: &str = "/api/v1/user-mapping/probable-staff";
pub const PROBABLE_PARENTS: &str = "/api/v1/user-mapping/probable-parents";

const PARENT_PLACEHOLDER: &str = "{parent}";

/// An API path as a list of raw, unencoded segments.
///
/// Segments are only percent-encoded when [`ApiClient::url`](super::ApiClient::url)
/// appends them to the base URL, so an id can never split into several
/// segments or climb out of its collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApiPath {
    segments: Vec<String>,
}

impl ApiPath {
    /// Split a fixed `/`-separated path. Empty segments are dropped.
    pub fn new(path: &str) -> Self {
        Self {
            segments: path
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Append one segment taken verbatim.
    pub fn join(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }
}

impl fmt::Display for ApiPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

/// Whether a path template needs a parent id.
pub fn is_scoped(template: &str) -> bool {
    template.contains(PARENT_PLACEHOLDER)
}

/// Fill the `{parent}` placeholder. Returns `None` when the template needs
/// a parent and none was given.
pub fn scoped_path(template: &str, parent_id: Option<&str>) -> Option<ApiPath> {
    let parent_id = parent_id.filter(|id| !id.is_empty());
    if is_scoped(template) && parent_id.is_none() {
        return None;
    }

    let segments = template
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| match (segment, parent_id) {
            (PARENT_PLACEHOLDER, Some(id)) => id.to_string(),
            (other, _) => other.to_string(),
        })
        .collect();
    Some(ApiPath { segments })
}

/// Path of one record inside a collection.
pub fn record_path(collection: &ApiPath, id: &str) -> ApiPath {
    collection.join(id)
}

/// Path of the activation action on a mapping candidate.
pub fn activate_path(collection: &ApiPath, id: &str) -> ApiPath {
    record_path(collection, id).join("activate")
}

/// `skip`/`limit` query parameters for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub skip: u32,
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    pub fn new(limit: u32) -> Self {
        Self {
            skip: 0,
            limit: limit.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn page(&self) -> u32 {
        self.skip / self.limit.max(1) + 1
    }

    pub fn next(&self) -> Self {
        Self {
            skip: self.skip.saturating_add(self.limit),
            ..*self
        }
    }

    pub fn previous(&self) -> Self {
        Self {
            skip: self.skip.saturating_sub(self.limit),
            ..*self
        }
    }

    pub fn query(&self) -> Vec<(&'static str, String)> {
        vec![("skip", self.skip.to_string()), ("limit", self.limit.to_string())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_path_fills_parent() {
        assert_eq!(
            scoped_path(STUDENT_FEES, Some("42")).map(|path| path.to_string()).as_deref(),
            Some("/api/v1/students/42/fees")
        );
        assert_eq!(scoped_path(STUDENT_FEES, None), None);
        assert_eq!(scoped_path(STUDENT_FEES, Some("")), None);
        assert_eq!(scoped_path(USERS, None), Some(ApiPath::new(USERS)));
    }

    #[test]
    fn test_parent_id_stays_one_segment() {
        let path = scoped_path(STUDENT_FEES, Some("12/../..")).unwrap();
        assert_eq!(path.segments(), ["api", "v1", "students", "12/../..", "fees"]);
    }

    #[test]
    fn test_record_paths() {
        let roles = ApiPath::new(ROLES);
        assert_eq!(record_path(&roles, "7").to_string(), "/api/v1/auth/roles/7");
        assert_eq!(
            activate_path(&ApiPath::new(PROBABLE_STAFF), "abc").to_string(),
            "/api/v1/user-mapping/probable-staff/abc/activate"
        );
        let odd = record_path(&ApiPath::new(USERS), "a/b");
        assert_eq!(odd.segments().last().map(String::as_str), Some("a/b"));
    }

    #[test]
    fn test_pagination_moves_by_limit() {
        let first = Pagination::new(25);
        assert_eq!(first.page(), 1);
        let second = first.next();
        assert_eq!(second.skip, 25);
        assert_eq!(second.page(), 2);
        assert_eq!(second.previous(), first);
        assert_eq!(first.previous(), first);
        assert_eq!(first.query(), vec![("skip", "0".to_string()), ("limit", "25".to_string())]);
    }

    #[test]
    fn test_pagination_limit_is_clamped() {
        assert_eq!(Pagination::new(0).limit, 1);
        assert_eq!(Pagination::new(50_000).limit, MAX_PAGE_SIZE);
    }
}
