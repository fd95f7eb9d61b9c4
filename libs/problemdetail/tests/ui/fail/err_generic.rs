// Generic problem types are rejected.

use problemdetail::ProblemDetail;

#[derive(ProblemDetail)]
pub struct Wrapper<T>(T);

fn main() {}
