//! Web validator for policy YAML.
//!
//! `GET /` serves a form; `POST /` checks the submitted YAML three ways:
//! plain YAML syntax, engine `validate`, and engine `run` (a dry run unless
//! configured otherwise). `/healthz` and `/metrics` come from [`crate::ops`].

pub mod error;
pub mod handlers;
pub mod page;

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::config::CheckerSection;
use crate::engine::PolicyEngine;
use crate::obs::CheckerMetrics;
use crate::ops;

pub use error::HttpError;

#[derive(Clone)]
pub struct CheckerState {
    inner: Arc<CheckerStateInner>,
}

struct CheckerStateInner {
    cfg: CheckerSection,
    engine: Arc<dyn PolicyEngine>,
    metrics: CheckerMetrics,
}

impl CheckerState {
    pub fn new(cfg: CheckerSection, engine: Arc<dyn PolicyEngine>) -> Self {
        Self {
            inner: Arc::new(CheckerStateInner { cfg, engine, metrics: CheckerMetrics::default() }),
        }
    }

    pub fn cfg(&self) -> &CheckerSection {
        &self.inner.cfg
    }

    pub fn engine(&self) -> Arc<dyn PolicyEngine> {
        Arc::clone(&self.inner.engine)
    }

    pub fn metrics(&self) -> &CheckerMetrics {
        &self.inner.metrics
    }
}

pub fn build_router(state: CheckerState) -> Router {
    Router::new()
        .route("/", get(handlers::form).post(handlers::check))
        .route("/healthz", get(ops::healthz))
        .route("/metrics", get(ops::metrics))
        .with_state(state)
}
