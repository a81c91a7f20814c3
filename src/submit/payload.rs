use serde::Serialize;

use crate::config::GithubContext;
use crate::models::Summary;

/// Body POSTed to the reporting service. The summaries are embedded as
/// produced by the normalizer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    pub tool_id: String,
    pub build_number: String,
    pub build_id: String,
    pub attempt_number: String,
    pub stage_name: String,
    pub workflow: String,
    pub repository: String,
    pub test_summaries: Vec<Summary>,
    pub file_content: String,
    pub test_type: &'static str,
}

impl Payload {
    pub fn new(
        tool_id: &str,
        stage_name: &str,
        context: &GithubContext,
        test_summaries: Vec<Summary>,
    ) -> Self {
        let test_type = test_summaries
            .first()
            .map_or("JUnit", |summary| summary.test_type);
        Self {
            tool_id: tool_id.to_string(),
            build_number: context.run_number.clone(),
            build_id: context.run_id.clone(),
            attempt_number: context.run_attempt.clone(),
            stage_name: stage_name.to_string(),
            workflow: context.workflow.clone(),
            repository: context.repository.clone(),
            test_summaries,
            file_content: String::new(),
            test_type,
        }
    }
}
