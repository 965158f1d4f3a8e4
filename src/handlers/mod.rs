pub mod common;
pub mod issue;

pub use common::{IssueBody, Supplied};
pub use issue::{
    create_issue, delete_issue, list_issues, update_issue, CreateIssueRequest, DeleteIssueRequest,
    IssueQuery, IssueResult, UpdateIssueRequest,
};
