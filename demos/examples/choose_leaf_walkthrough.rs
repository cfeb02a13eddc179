// Copyright 2025 the NIR-tree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Choose-leaf walkthrough.
//!
//! Build the reference tree, insert points that fall outside every branch and
//! print how the branch regions were reshaped to take them.
//!
//! Run:
//! - `RUST_LOG=nir_tree=debug cargo run -p nir_tree_demos --example choose_leaf_walkthrough`

use nir_tree::{NirTree, NodeKind, Point, reference_tree};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

fn print_tree(tree: &NirTree<2>) {
    for (id, node) in tree.iter() {
        let region = match tree.node_polygon(id) {
            Ok(Some(polygon)) => format!("{:?}", polygon.rectangles()),
            _ => String::from("(root)"),
        };
        match node.kind() {
            NodeKind::Leaf { points } => println!("  leaf {id} {region} points={points:?}"),
            NodeKind::Routing { branches } => {
                println!("  routing {id} {region} branches={}", branches.len());
            }
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .with_span_events(FmtSpan::CLOSE)
        .init();

    let mut tree = NirTree::from_template(&reference_tree());
    println!("reference tree:");
    print_tree(&tree);

    for p in [[10.0, 7.0], [10.0, 2.0], [1.0, 8.0], [11.0, 5.5]] {
        match tree.insert(Point(p)) {
            Ok(leaf) => {
                println!("\ninserted {p:?} into {leaf}:");
                print_tree(&tree);
            }
            Err(err) => {
                eprintln!("insert {p:?} failed: {err}");
                return;
            }
        }
    }

    match tree.validate() {
        Ok(()) => println!("\ntree is consistent"),
        Err(err) => eprintln!("\ntree is broken: {err}"),
    }
}
