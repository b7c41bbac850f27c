pub mod cli;
pub mod recharge;
pub mod upload;
