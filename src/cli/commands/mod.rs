pub mod add;
pub mod audit_cmd;
pub mod check;
pub mod completions;
pub mod create;
pub mod drop;
pub mod generate;
pub mod list;
pub mod remove;
pub mod update;
pub mod vaults;
