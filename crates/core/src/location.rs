//! Editor page location.
//!
//! A saved workflow is addressable through the page fragment
//! (`#workflow={id}`) so that reloading the page reopens it.

use url::Url;

use crate::error::CoreError;
use crate::types::WorkflowId;

/// Query parameter (or fragment key) naming the workflow being edited.
pub const WORKFLOW_PARAM: &str = "workflow";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    url: Url,
}

impl Location {
    pub fn parse(url: &str) -> Result<Self, CoreError> {
        Ok(Self {
            url: Url::parse(url)?,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Whether the query string carries a parameter named `name`.
    pub fn has_query_param(&self, name: &str) -> bool {
        self.url.query_pairs().any(|(key, _)| key == name)
    }

    /// Point the fragment at a saved workflow.
    pub fn set_workflow_fragment(&mut self, id: &WorkflowId) {
        self.url
            .set_fragment(Some(&format!("{WORKFLOW_PARAM}={id}")));
    }

    /// The workflow id referenced by the fragment, if any.
    pub fn workflow_fragment(&self) -> Option<WorkflowId> {
        let fragment = self.url.fragment()?;
        url::form_urlencoded::parse(fragment.as_bytes())
            .find(|(key, _)| key == WORKFLOW_PARAM)
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
            .map(WorkflowId::new)
    }

    /// The workflow id this page refers to, from the query string first and
    /// the fragment second.
    pub fn workflow_reference(&self) -> Option<WorkflowId> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == WORKFLOW_PARAM)
            .map(|(_, value)| WorkflowId::new(value.into_owned()))
            .or_else(|| self.workflow_fragment())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const EDITOR: &str = "http://hue.example.com:8888/oozie/editor/workflow/new/";

    #[test]
    fn fragment_is_set_and_read_back() {
        let mut location = Location::parse(EDITOR).unwrap();
        assert!(location.workflow_fragment().is_none());

        location.set_workflow_fragment(&WorkflowId::new("42"));

        assert_eq!(location.url().fragment(), Some("workflow=42"));
        assert_eq!(location.workflow_fragment(), Some(WorkflowId::new("42")));
    }

    #[test]
    fn detects_workflow_query_param() {
        let with = Location::parse(&format!("{EDITOR}?workflow=5")).unwrap();
        let without = Location::parse(&format!("{EDITOR}?other=1")).unwrap();

        assert!(with.has_query_param(WORKFLOW_PARAM));
        assert!(!without.has_query_param(WORKFLOW_PARAM));
        assert_eq!(with.workflow_reference(), Some(WorkflowId::new("5")));
    }

    #[test]
    fn reference_falls_back_to_fragment() {
        let location = Location::parse(&format!("{EDITOR}#workflow=9")).unwrap();
        assert_eq!(location.workflow_reference(), Some(WorkflowId::new("9")));
    }

    #[test]
    fn rejects_invalid_url() {
        assert_matches!(Location::parse("not a url"), Err(CoreError::Url(_)));
    }
}
