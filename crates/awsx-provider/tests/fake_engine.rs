//! Scripted stand-in for the `custodian` binary.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use awsx_core::error::{AwsxError, Result};
use awsx_provider::engine::{EngineOutput, PolicyEngine};

/// Fails any file whose text contains `bogus`; records every call.
#[derive(Default)]
pub struct FakeEngine {
    pub calls: Mutex<Vec<Vec<String>>>,
    pub missing: bool,
}

impl FakeEngine {
    pub fn missing() -> Self {
        Self { missing: true, ..Self::default() }
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PolicyEngine for FakeEngine {
    async fn exec(&self, args: Vec<String>) -> Result<EngineOutput> {
        if self.missing {
            return Err(AwsxError::Engine("failed to start custodian: not found".into()));
        }
        self.calls.lock().unwrap().push(args.clone());

        let file = args.last().cloned().unwrap_or_default();
        let text = std::fs::read_to_string(Path::new(&file)).unwrap_or_default();
        if text.contains("bogus") {
            return Ok(EngineOutput::failed(1, format!("{file}: unknown filter bogus")));
        }
        Ok(EngineOutput::ok(format!("{} ok: {file}\n", args[0])))
    }
}
