// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend implementations for different spatial strategies.
//!
//! - `flatvec`: flat vector with linear scans (small, simple). Also serves as the
//!   brute-force reference the quadtree is tested against.
//! - `quadtree`: region quadtree with a per-node capacity and a depth limit.
//!
//! Quadtree note
//! -------------
//! Each node covers a rectangle and, once split, exactly four equal quadrants of it.
//! A box is stored in the deepest node whose rectangle fully contains it; boxes that
//! straddle a split line stay with the parent and are tested directly on every query
//! that reaches that parent. Nodes at `max_depth` never split and accept any number
//! of boxes, which bounds recursion on degenerate input (many identical points).

pub mod flatvec;
pub mod quadtree;
