pub mod tree_walker;
