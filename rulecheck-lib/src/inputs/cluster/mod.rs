//! Inputs read from a Kubernetes-style cluster API

mod client;
mod http;
mod kubeconfig;
mod provider;

pub use client::{ClusterClient, GroupVersionResource};
pub use http::HttpClusterClient;
pub use kubeconfig::{Auth, Connection, Kubeconfig};
pub use provider::Provider;
