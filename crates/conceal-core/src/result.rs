use crate::error::ConcealError;

pub type Result<T> = std::result::Result<T, ConcealError>;
