//! # NuGet Janitor
//!
//! Retention-policy cleanup for a NuGet package repository laid out on a
//! file share as `<source>/<packageId>/<version>/<package>.nupkg`.
//!
//! For each package the version directories are parsed into a sorted
//! catalog, the enabled policies pick pre-release versions to drop, and
//! the result is either printed (dry run) or deleted with an audit log:
//!
//! - **Released**: pre-releases whose exact release exists
//! - **Later release**: pre-releases superseded by the same or a later release
//! - **Max age**: pre-releases whose package file is older than a threshold
//!
//! Release versions are never removed.

pub mod catalog;
pub mod cleaner;
pub mod cli;
pub mod common;
pub mod janitor;
pub mod policy;
pub mod repo;
