pub mod pricing;
pub mod proposals;
