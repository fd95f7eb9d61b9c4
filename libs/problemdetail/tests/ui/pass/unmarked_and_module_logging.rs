use problemdetail::{LogLevel, ProblemDetail, module_logging};

module_logging!(to = "inventory", at = LogLevel::Debug);

#[derive(Debug, thiserror::Error, ProblemDetail)]
#[error("warehouse offline")]
pub struct WarehouseOfflineException;

#[derive(Debug, thiserror::Error, ProblemDetail)]
#[error("shelf {0} missing")]
#[problem(status = 404, logging(at = "info"))]
pub struct ShelfMissing(pub u32);

fn main() {
    assert!(WarehouseOfflineException::members().is_empty());
    assert_eq!(WarehouseOfflineException::KIND.name, "WarehouseOfflineException");
    assert_eq!(ShelfMissing::KIND.status, Some(404));
}
