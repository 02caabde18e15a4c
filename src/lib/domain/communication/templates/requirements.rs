//! Rendering requirements: stylesheets and scripts injected into rendered
//! pages.
//!
//! Emails must not pick these up, so the content resolver suspends the
//! registry while rendering. Suspension is registry-wide and cannot be
//! nested; [`RenderingRequirements::suspend`] returns a guard that restores
//! the registry when dropped.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lazy_static::lazy_static;
use tracing::debug;

use super::RenderError;

lazy_static! {
    static ref GLOBAL_REQUIREMENTS: RenderingRequirements = RenderingRequirements::new();
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Includes {
    css: Vec<String>,
    javascript: Vec<String>,
}

impl Includes {
    fn is_empty(&self) -> bool {
        self.css.is_empty() && self.javascript.is_empty()
    }
}

#[derive(Debug, Default)]
struct State {
    includes: Includes,
    suspended: bool,
}

/// Registry of stylesheets and scripts required by rendered pages
#[derive(Clone, Debug, Default)]
pub struct RenderingRequirements {
    state: Arc<Mutex<State>>,
}

impl RenderingRequirements {
    /// Creates an empty, standalone registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry
    pub fn global() -> Self {
        GLOBAL_REQUIREMENTS.clone()
    }

    /// Requires a stylesheet
    pub fn css(&self, href: impl Into<String>) {
        let href = href.into();
        let mut state = self.lock();

        if !state.includes.css.contains(&href) {
            state.includes.css.push(href);
        }
    }

    /// Requires a script
    pub fn javascript(&self, src: impl Into<String>) {
        let src = src.into();
        let mut state = self.lock();

        if !state.includes.javascript.contains(&src) {
            state.includes.javascript.push(src);
        }
    }

    /// Currently required stylesheets
    pub fn stylesheets(&self) -> Vec<String> {
        self.lock().includes.css.clone()
    }

    /// Currently required scripts
    pub fn scripts(&self) -> Vec<String> {
        self.lock().includes.javascript.clone()
    }

    /// Whether a [`RequirementsSuspension`] is currently held
    pub fn is_suspended(&self) -> bool {
        self.lock().suspended
    }

    /// Clears the registry until the returned guard is dropped.
    ///
    /// Anything required while suspended is discarded on restore.
    ///
    /// # Errors
    /// [`RenderError::RequirementsSuspended`] if the registry is already
    /// suspended.
    pub fn suspend(&self) -> Result<RequirementsSuspension, RenderError> {
        let mut state = self.lock();

        if state.suspended {
            return Err(RenderError::RequirementsSuspended);
        }

        state.suspended = true;
        let backup = std::mem::take(&mut state.includes);

        debug!(
            css = backup.css.len(),
            javascript = backup.javascript.len(),
            "suspended rendering requirements"
        );

        Ok(RequirementsSuspension {
            requirements: self.clone(),
            backup,
        })
    }

    /// Injects the required stylesheets before `</head>` and scripts before
    /// `</body>` of a full HTML document. Fragments, and any document while
    /// the registry is suspended, are returned unchanged.
    pub fn include_in_html(&self, html: &str) -> String {
        let state = self.lock();

        if state.suspended || state.includes.is_empty() {
            return html.to_string();
        }

        let Some(head_end) = html.find("</head>") else {
            return html.to_string();
        };

        let css: String = state
            .includes
            .css
            .iter()
            .map(|href| format!("<link rel=\"stylesheet\" type=\"text/css\" href=\"{href}\">\n"))
            .collect();
        let javascript: String = state
            .includes
            .javascript
            .iter()
            .map(|src| format!("<script type=\"application/javascript\" src=\"{src}\"></script>\n"))
            .collect();

        let mut out = String::with_capacity(html.len() + css.len() + javascript.len());
        out.push_str(&html[..head_end]);
        out.push_str(&css);

        let rest = &html[head_end..];
        match rest.rfind("</body>") {
            Some(body_end) => {
                out.push_str(&rest[..body_end]);
                out.push_str(&javascript);
                out.push_str(&rest[body_end..]);
            }
            None => {
                out.push_str(rest);
                out.push_str(&javascript);
            }
        }

        out
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Guard returned by [`RenderingRequirements::suspend`]; restores the
/// registry on drop.
#[derive(Debug)]
#[must_use = "requirements are restored as soon as the suspension is dropped"]
pub struct RequirementsSuspension {
    requirements: RenderingRequirements,
    backup: Includes,
}

impl Drop for RequirementsSuspension {
    fn drop(&mut self) {
        let mut state = self.requirements.lock();

        state.includes = std::mem::take(&mut self.backup);
        state.suspended = false;

        debug!("restored rendering requirements");
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    const PAGE: &str = "<html><head><title>Page</title></head><body><p>Hi</p></body></html>";

    #[test]
    fn test_suspend_clears_and_restores() -> TestResult {
        let requirements = RenderingRequirements::new();
        requirements.css("/themes/site.css");
        requirements.javascript("/themes/site.js");

        {
            let _suspension = requirements.suspend()?;

            assert!(requirements.is_suspended());
            assert!(requirements.stylesheets().is_empty());
            assert!(requirements.scripts().is_empty());
        }

        assert!(!requirements.is_suspended());
        assert_eq!(requirements.stylesheets(), vec!["/themes/site.css"]);
        assert_eq!(requirements.scripts(), vec!["/themes/site.js"]);

        Ok(())
    }

    #[test]
    fn test_requirements_added_while_suspended_are_discarded() -> TestResult {
        let requirements = RenderingRequirements::new();

        {
            let _suspension = requirements.suspend()?;
            requirements.css("/email-only.css");
        }

        assert!(requirements.stylesheets().is_empty());

        Ok(())
    }

    #[test]
    fn test_nested_suspension_is_rejected() -> TestResult {
        let requirements = RenderingRequirements::new();
        let _suspension = requirements.suspend()?;

        let nested = requirements.suspend();

        assert!(matches!(nested, Err(RenderError::RequirementsSuspended)));
        assert!(requirements.is_suspended());

        Ok(())
    }

    #[test]
    fn test_include_in_html() {
        let requirements = RenderingRequirements::new();
        requirements.css("/site.css");
        requirements.javascript("/site.js");

        let html = requirements.include_in_html(PAGE);

        assert_eq!(
            html,
            "<html><head><title>Page</title>\
             <link rel=\"stylesheet\" type=\"text/css\" href=\"/site.css\">\n\
             </head><body><p>Hi</p>\
             <script type=\"application/javascript\" src=\"/site.js\"></script>\n\
             </body></html>"
        );
    }

    #[test]
    fn test_include_in_html_leaves_fragments_alone() {
        let requirements = RenderingRequirements::new();
        requirements.css("/site.css");

        assert_eq!(requirements.include_in_html("<p>Hi</p>"), "<p>Hi</p>");
    }

    #[test]
    fn test_include_in_html_is_noop_while_suspended() -> TestResult {
        let requirements = RenderingRequirements::new();
        requirements.css("/site.css");
        let _suspension = requirements.suspend()?;

        assert_eq!(requirements.include_in_html(PAGE), PAGE);

        Ok(())
    }

    #[test]
    fn test_global_registry_is_shared() {
        let a = RenderingRequirements::global();
        let b = RenderingRequirements::global();

        assert!(Arc::ptr_eq(&a.state, &b.state));
    }
}
