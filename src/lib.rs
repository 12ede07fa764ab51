//! mergeexp - build disposable experimental integration branches
//!
//! Candidate branches come from open Bitbucket pull requests tagged for
//! deployment in their comments, from explicitly named Bitbucket or GitLab
//! branches, or from the highest version tag of a remote. They are merged one
//! by one into an experimental branch, pausing for manual conflict resolution
//! when git cannot merge on its own.

pub mod auth;
pub mod config;
pub mod discovery;
pub mod error;
pub mod git;
pub mod merge;
pub mod platform;
pub mod progress;
pub mod types;
