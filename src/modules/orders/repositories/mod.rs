pub mod order_repository;
pub mod order_return_repository;
pub mod refund_repository;

pub use order_repository::OrderRepository;
pub use order_return_repository::OrderReturnRepository;
pub use refund_repository::RefundRepository;
