// Accessor members need the method to call.

use problemdetail::ProblemDetail;

#[derive(ProblemDetail)]
#[problem(extension(name = "retry"))]
pub struct NoMethodException;

fn main() {}
