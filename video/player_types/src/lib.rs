mod player_config;

pub use player_config::*;

#[cfg(test)]
mod tests;
