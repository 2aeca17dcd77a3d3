mod common;
mod insurance;
mod refund;
