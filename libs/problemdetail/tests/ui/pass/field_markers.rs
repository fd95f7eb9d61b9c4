use problemdetail::ProblemDetail;

#[derive(Debug, thiserror::Error, ProblemDetail)]
#[error("stock for {sku} exhausted")]
pub struct OutOfStockException {
    #[problem(detail, extension)]
    sku: String,
    #[problem(extension = "in-stock")]
    remaining: u32,
    #[problem(instance)]
    location: Option<String>,
    #[allow(dead_code)]
    internal: bool,
}

#[derive(Debug, thiserror::Error, ProblemDetail)]
#[error("{0}")]
pub struct Rejected(#[problem(detail)] String, #[problem(instance)] String);

fn main() {
    assert_eq!(OutOfStockException::members().len(), 4);
    assert_eq!(Rejected::members().len(), 2);
}
