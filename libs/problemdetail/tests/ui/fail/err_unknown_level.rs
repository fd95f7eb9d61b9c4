// Log levels are checked at compile time.

use problemdetail::ProblemDetail;

#[derive(ProblemDetail)]
#[problem(logging(at = "loud"))]
pub struct LoudException;

fn main() {}
