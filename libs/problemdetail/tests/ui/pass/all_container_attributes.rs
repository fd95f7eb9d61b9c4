use problemdetail::{ProblemDetail, ProblemDetails};

#[derive(Debug, thiserror::Error, ProblemDetail)]
#[error("payment of {amount} declined")]
#[problem(
    status = 402,
    type_uri = "https://example.com/probs/declined",
    title = "Payment declined",
    bad_argument,
    logging(to = "payments", at = "warning")
)]
#[problem(detail(method = "reason"), instance(method = "receipt"))]
#[problem(extension(method = "retry_after", name = "retry-after"))]
pub struct PaymentDeclinedException {
    amount: u64,
}

impl PaymentDeclinedException {
    fn reason(&self) -> &'static str {
        "card expired"
    }

    fn receipt(&self) -> Option<String> {
        Some(format!("/receipts/{}", self.amount))
    }

    fn retry_after(&self) -> u32 {
        30
    }
}

fn main() {
    let err = PaymentDeclinedException { amount: 12 };
    let problem = ProblemDetails::new(&err);
    assert_eq!(problem.status().as_u16(), 402);
    assert_eq!(problem.body().instance.as_str(), "/receipts/12");
}
