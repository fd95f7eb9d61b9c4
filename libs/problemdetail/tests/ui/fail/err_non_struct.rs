// Derive macro applied to a non-struct should abort.

use problemdetail::ProblemDetail;

#[derive(ProblemDetail)]
pub enum NotAStruct {
    Missing,
}

fn main() {}
