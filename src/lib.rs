pub mod config;
pub mod infer;
pub mod prompts;
pub mod relay;
pub mod service;

#[cfg(test)]
mod test_utils;
