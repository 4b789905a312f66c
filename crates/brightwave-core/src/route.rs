//! Path routing for the site's pages.
//!
//! Only three shapes exist: `/`, `/contact` and `/case-studies/{slug}`. The
//! slug is opaque; it is echoed back as display text and never validated.

use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Route {
    #[default]
    Home,
    Contact,
    CaseStudy { slug: String },
    NotFound { path: String },
}

impl Route {
    /// Resolve a request path. Query strings, fragments and trailing slashes
    /// are ignored.
    pub fn parse(path: &str) -> Self {
        let clean = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim();

        let segments: Vec<&str> = clean.split('/').filter(|s| !s.is_empty()).collect();

        let route = match segments.as_slice() {
            [] => Route::Home,
            ["contact"] => Route::Contact,
            ["case-studies", slug] => Route::CaseStudy {
                slug: (*slug).to_string(),
            },
            _ => Route::NotFound {
                path: clean.to_string(),
            },
        };

        tracing::debug!(path, route = %route, "Resolved route");
        route
    }

    /// Canonical path of this route
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Contact => "/contact".to_string(),
            Route::CaseStudy { slug } => format!("/case-studies/{}", slug),
            Route::NotFound { path } => path.clone(),
        }
    }

    /// Short label for navigation bars
    pub fn label(&self) -> &str {
        match self {
            Route::Home => "Home",
            Route::Contact => "Contact",
            Route::CaseStudy { .. } => "Case study",
            Route::NotFound { .. } => "Not found",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_routes() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("/contact"), Route::Contact);
        assert_eq!(Route::parse("/contact/"), Route::Contact);
        assert_eq!(Route::parse("/contact?ref=nav"), Route::Contact);
    }

    #[test]
    fn test_slug_is_opaque() {
        assert_eq!(
            Route::parse("/case-studies/Some%20Thing_42"),
            Route::CaseStudy {
                slug: "Some%20Thing_42".into()
            }
        );
        assert_eq!(
            Route::parse("/case-studies/anything#top").path(),
            "/case-studies/anything"
        );
    }

    #[test]
    fn test_not_found() {
        assert!(matches!(Route::parse("/case-studies"), Route::NotFound { .. }));
        assert!(matches!(Route::parse("/case-studies/a/b"), Route::NotFound { .. }));
        assert_eq!(
            Route::parse("/pricing"),
            Route::NotFound {
                path: "/pricing".into()
            }
        );
    }
}
