//! Aggregate views over cleaned fatality records.
//!
//! Each submodule turns the cleaned record set into one chart-ready series:
//! monthly and yearly totals, category rankings, the borough×year grid with
//! population-normalized rates, rolling totals, and the incident map view.
//! All of them are pure functions of their inputs.

pub mod grid;
pub mod incidents;
pub mod ranking;
pub mod rolling;
pub mod totals;
pub mod types;
pub mod utility;
pub mod victim;
