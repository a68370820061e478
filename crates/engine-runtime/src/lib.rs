pub mod error;
pub mod fanout;
pub mod sink;

#[cfg(test)]
mod tests;
