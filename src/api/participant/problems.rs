//! Problem statement catalog endpoint

use serde::Serialize;

use crate::api::types::Json;
use crate::domain::problem::{list_problem_statements as catalog, ProblemStatement};

#[derive(Debug, Serialize)]
pub struct ListProblemStatementsResponse {
    pub problem_statements: Vec<ProblemStatement>,
    pub total: usize,
}

/// GET /api/problem-statements
pub async fn list_problem_statements() -> Json<ListProblemStatementsResponse> {
    let problem_statements = catalog().to_vec();
    let total = problem_statements.len();

    Json(ListProblemStatementsResponse {
        problem_statements,
        total,
    })
}
