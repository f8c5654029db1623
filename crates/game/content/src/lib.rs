//! Data-driven content definitions and loaders.
//!
//! This crate houses balance data and provides loaders for RON/TOML data files:
//! - Upgrade catalog (data-driven via RON)
//! - Class bonus table (data-driven via RON)
//! - Enemy, reward and leveling curves (data-driven via TOML)
//! - Game configuration (data-driven via TOML)
//!
//! Default files are embedded at compile time; a data directory may override
//! any of them.

pub mod balance;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use balance::{BalanceTables, EnemyCurve, EnemyKind, GoldCurve, XpCurve};

#[cfg(feature = "loaders")]
pub use loaders::{
    ClassLoader, ConfigLoader, ContentFactory, GameContent, LoadResult, TablesLoader,
    UpgradeLoader,
};
