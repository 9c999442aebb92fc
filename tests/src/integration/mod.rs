//! # Integration Test Flows


#[cfg(test)]
mod sync_flow;
