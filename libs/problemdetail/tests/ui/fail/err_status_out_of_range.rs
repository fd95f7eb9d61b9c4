// Status codes outside 100..=599 are rejected.

use problemdetail::ProblemDetail;

#[derive(ProblemDetail)]
#[problem(status = 600)]
pub struct TooHighException;

fn main() {}
