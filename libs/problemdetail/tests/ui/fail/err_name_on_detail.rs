// `name` only makes sense for extension members.

use problemdetail::ProblemDetail;

#[derive(ProblemDetail)]
#[problem(detail(method = "summary", name = "brief"))]
pub struct NamedDetailException;

fn main() {}
