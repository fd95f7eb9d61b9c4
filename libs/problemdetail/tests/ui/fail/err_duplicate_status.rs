// Each container key may appear once across all #[problem] attributes.

use problemdetail::ProblemDetail;

#[derive(ProblemDetail)]
#[problem(status = 404)]
#[problem(status = 410)]
pub struct GoneException;

fn main() {}
