pub mod interface;
pub mod prefix;
