#![forbid(unsafe_code)]

//! Map request normalization + region resolution (headless).
//!
//! Design goals:
//! - deterministic, testable outputs (same request, same dataset)
//! - resolver misses degrade to default styling, never abort a render
//! - all completion traffic goes through the reverse-proxy boundary

pub mod boundaries;
pub mod error;
pub mod model;
pub mod normalize;
pub mod proxy;
pub mod resolve;

pub use boundaries::{BoundaryPaths, BoundarySet, feature_code, feature_name};
pub use error::{Error, Result};
pub use model::{
    CANVAS_HEIGHT, CANVAS_WIDTH, DEFAULT_BORDER_COLOR, DEFAULT_FILL, MapDataset, MapDomain,
    RegionRecord, StylingConfig, format_value,
};
pub use proxy::{CompletionClient, CompletionProxy, ProxyConfig};
pub use resolve::Resolver;
