pub mod aggregate;
pub mod build;
pub mod expansion;
pub mod filter;
pub mod query;

#[cfg(test)]
pub mod test_helpers;
