//! # Bridge Deliver
//!
//! The ordering service's `Deliver` gRPC stream consumer: issues one
//! seek request, then reads blocks (or a terminating status) until the
//! stream closes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Generated protobuf/tonic types for the `Deliver` service.
pub mod proto {
    #![allow(missing_docs)]
    tonic::include_proto!("bridge.deliver.v1");
}

mod client;
mod error;

pub use client::{
    next_item, DeliveredItem, DeliveryClient, SeekTarget, LAST_CONFIG_KEY, SIGNATURES_KEY,
};
pub use error::{DeliverError, Result};
