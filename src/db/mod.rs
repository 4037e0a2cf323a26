pub mod db;
pub mod snapshots;

pub use snapshots::Snapshots;
