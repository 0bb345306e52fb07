pub mod aggregate;
pub mod chart;
pub mod config;
pub mod error;
pub mod lookup;
pub mod output;
pub mod pipeline;
pub mod postcode;
pub mod rank;
pub mod source;
