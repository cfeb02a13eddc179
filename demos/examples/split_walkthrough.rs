// Copyright 2025 the NIR-tree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Split-node walkthrough.
//!
//! Populate the reference tree, split branch B through its children and then
//! split the root, dumping the tree as JSON after each step.
//!
//! Run:
//! - `RUST_LOG=nir_tree=debug cargo run -p nir_tree_demos --example split_walkthrough`

use nir_tree::{NirTree, Point, reference_tree};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn dump(tree: &NirTree<2>) {
    match serde_json::to_string_pretty(&tree.to_template()) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("cannot serialize tree: {err}"),
    }
}

fn main() -> Result<(), nir_tree::NirError> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut tree = NirTree::from_template(&reference_tree());
    for p in [[2.0, 2.0], [5.0, 8.0], [7.0, 4.0], [7.0, 6.0], [8.5, 4.5], [14.0, 6.0]] {
        tree.insert(Point(p))?;
    }
    info!(nodes = tree.node_count(), depth = tree.depth(), "populated");

    // Branch B straddles x = 7, so E and F are split along with it.
    let b = tree.branches(tree.root())?[1].child;
    let (left, right) = tree.split_and_replace(b, 7.0, 0)?;
    info!(%left, %right, nodes = tree.node_count(), "split B at x = 7");
    dump(&tree);

    let (upper, lower) = tree.split_and_replace(tree.root(), 5.0, 1)?;
    info!(%upper, %lower, depth = tree.depth(), "split root at y = 5");
    dump(&tree);

    tree.validate()
}
